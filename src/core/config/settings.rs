use super::parsing::{
    env_optional, env_or_default, normalize_host, parse_bool, parse_environment,
    parse_positive_u64, parse_u16,
};
use super::types::{
    ConfigError, DatabaseSettings, GithubSettings, ReaperSettings, RedisSettings, RuntimeSettings,
    Settings, TelemetrySettings,
};
use crate::db::types::REGRADING_STATE;

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let environment =
            parse_environment(env_optional("REAPER_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("REAPER_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "anubis");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "anubis");
        let database_url = env_optional("DATABASE_URL");
        let run_migrations =
            env_optional("RUN_MIGRATIONS").map(|value| parse_bool(&value)).unwrap_or(true);

        let redis_host = env_or_default("REDIS_HOST", "localhost");
        let redis_port = parse_u16("REDIS_PORT", env_or_default("REDIS_PORT", "6379"))?;
        let redis_db = parse_u16("REDIS_DB", env_or_default("REDIS_DB", "0"))?;
        let redis_password = env_or_default("REDIS_PASSWORD", "");

        let github_host = normalize_host(env_or_default("GITHUB_HOST", "github.com"));
        let github_api_url = env_or_default("GITHUB_API_URL", "https://api.github.com")
            .trim_end_matches('/')
            .to_string();
        let github_token = env_or_default("GITHUB_TOKEN", "");
        let github_timeout_seconds = parse_positive_u64(
            "GITHUB_TIMEOUT_SECONDS",
            env_or_default("GITHUB_TIMEOUT_SECONDS", "30"),
        )?;

        let timeout_minutes = parse_positive_u64(
            "REAPER_TIMEOUT_MINUTES",
            env_or_default("REAPER_TIMEOUT_MINUTES", "60"),
        )?;
        let stats_reap_days = parse_positive_u64(
            "STATS_REAP_DURATION_DAYS",
            env_or_default("STATS_REAP_DURATION_DAYS", "60"),
        )?;
        let excluded_state = env_or_default("REAPER_EXCLUDED_STATE", REGRADING_STATE);
        let queue_prefix = env_or_default("REAPER_QUEUE_PREFIX", "rpc");
        let interval_seconds = parse_positive_u64(
            "REAPER_INTERVAL_SECONDS",
            env_or_default("REAPER_INTERVAL_SECONDS", "300"),
        )?;

        let log_level = env_or_default("REAPER_LOG_LEVEL", "info");
        let json = env_optional("REAPER_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            runtime: RuntimeSettings { environment, strict_config },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
                run_migrations,
            },
            redis: RedisSettings {
                host: redis_host,
                port: redis_port,
                db: redis_db,
                password: redis_password,
            },
            github: GithubSettings {
                host: github_host,
                api_url: github_api_url,
                token: github_token,
                timeout_seconds: github_timeout_seconds,
            },
            reaper: ReaperSettings {
                timeout_minutes,
                stats_reap_days,
                excluded_state,
                queue_prefix,
                interval_seconds,
            },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn github(&self) -> &GithubSettings {
        &self.github
    }

    pub(crate) fn reaper(&self) -> &ReaperSettings {
        &self.reaper
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.github.host.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "GITHUB_HOST",
                value: String::from("<empty>"),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }

        if self.github.token.is_empty() {
            return Err(ConfigError::MissingSecret("GITHUB_TOKEN"));
        }

        Ok(())
    }
}
