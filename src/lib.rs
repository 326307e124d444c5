pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod services;
pub(crate) mod tasks;

#[cfg(test)]
mod test_support;

use crate::core::{config::Settings, redis::RedisHandle, state::AppState, telemetry};
use crate::tasks::reaper::Sweep;

/// Runs a single reconciliation sweep and returns. Step failures end up in the
/// logged report; only startup problems are returned as errors.
pub async fn run() -> anyhow::Result<()> {
    let (state, redis) = bootstrap().await?;

    let sweep = Sweep::from_state(&state)?;
    let report = sweep.run().await;
    report.log();
    core::metrics::log_snapshot();

    redis.disconnect().await;
    tracing::info!("Redis disconnected");

    Ok(())
}

pub async fn run_worker() -> anyhow::Result<()> {
    let (state, redis) = bootstrap().await?;

    let result = tasks::scheduler::run(state, core::shutdown::watch_shutdown()).await;

    redis.disconnect().await;
    tracing::info!("Redis disconnected");

    result?;

    Ok(())
}

async fn bootstrap() -> anyhow::Result<(AppState, RedisHandle)> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    if settings.database().run_migrations {
        db::run_migrations(&db_pool).await?;
    }

    let redis = RedisHandle::new(settings.redis().redis_url());
    if let Err(err) = redis.connect().await {
        tracing::error!(error = %err, "Failed to connect to Redis; queue steps will fail this run");
    } else {
        tracing::info!("Redis connected successfully");
    }
    let health = redis.health().await;
    tracing::debug!(redis = ?health, "Redis health");

    tracing::info!(
        environment = %settings.runtime().environment.as_str(),
        "Submission reaper starting"
    );

    let state = AppState::new(settings, db_pool, redis.clone());

    Ok((state, redis))
}
