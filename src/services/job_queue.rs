use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::core::redis::RedisHandle;
use crate::core::time::{format_primitive, primitive_now_utc};

/// Fire-and-forget job submission; consumers are expected to tolerate
/// duplicate delivery.
#[async_trait]
pub(crate) trait JobQueue: Send + Sync {
    async fn enqueue_stale_resource_reap(&self) -> Result<()>;
    async fn enqueue_autograde_pipeline(&self, submission_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum JobKind {
    IdeReapStale,
    AutogradePipeline,
}

#[derive(Debug, Serialize)]
struct JobEnvelope<'a> {
    id: String,
    kind: JobKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    submission_id: Option<&'a str>,
    enqueued_at: String,
}

#[derive(Clone)]
pub(crate) struct RedisJobQueue {
    redis: RedisHandle,
    prefix: String,
}

impl RedisJobQueue {
    pub(crate) fn new(redis: RedisHandle, prefix: impl Into<String>) -> Self {
        Self { redis, prefix: prefix.into() }
    }

    fn queue_name(&self, kind: JobKind) -> String {
        match kind {
            JobKind::IdeReapStale => format!("{}:ide", self.prefix),
            JobKind::AutogradePipeline => format!("{}:autograde", self.prefix),
        }
    }

    async fn push(&self, kind: JobKind, submission_id: Option<&str>) -> Result<()> {
        let queue = self.queue_name(kind);
        let payload = encode_job(kind, submission_id)?;
        let depth = self
            .redis
            .push_job(&queue, &payload)
            .await
            .with_context(|| format!("Failed to enqueue {kind:?} job"))?;

        tracing::debug!(queue = %queue, depth, submission_id = ?submission_id, "Enqueued job");
        Ok(())
    }
}

fn encode_job(kind: JobKind, submission_id: Option<&str>) -> Result<String> {
    let envelope = JobEnvelope {
        id: uuid::Uuid::new_v4().to_string(),
        kind,
        submission_id,
        enqueued_at: format_primitive(primitive_now_utc()),
    };
    serde_json::to_string(&envelope).context("Failed to encode job payload")
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue_stale_resource_reap(&self) -> Result<()> {
        self.push(JobKind::IdeReapStale, None).await
    }

    async fn enqueue_autograde_pipeline(&self, submission_id: &str) -> Result<()> {
        self.push(JobKind::AutogradePipeline, Some(submission_id)).await
    }
}
