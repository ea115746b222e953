//! Scenario endpoint query parameters and responses.

use serde::{Deserialize, Serialize};

const fn default_block_seconds() -> u64 {
    30
}

const fn default_hang_seconds() -> u64 {
    90
}

const fn default_cpu_seconds() -> u64 {
    10
}

/// `POST /api/test/block-thread` query.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockQuery {
    #[serde(default = "default_block_seconds")]
    pub seconds: u64,
    /// Set on fan-out requests so they do not fan out again.
    #[serde(default)]
    pub internal: bool,
}

/// `POST /api/test/hang` query.
#[derive(Debug, Clone, Deserialize)]
pub struct HangQuery {
    #[serde(default = "default_hang_seconds")]
    pub seconds: u64,
}

/// `POST /api/test/cpu-intensive` query.
#[derive(Debug, Clone, Deserialize)]
pub struct CpuQuery {
    #[serde(default = "default_cpu_seconds")]
    pub seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResponse {
    pub message: String,
    pub thread: String,
    /// Seconds with an `s` suffix, e.g. `"30s"`.
    pub duration: String,
    pub internal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HangResponse {
    pub message: String,
    pub thread: String,
    pub duration: String,
    pub completed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuResponse {
    pub message: String,
    pub thread: String,
    pub iterations: String,
    pub duration: String,
    pub result_checksum: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadStatusResponse {
    pub total_threads: usize,
    pub active_workers: usize,
    pub max_workers: usize,
    pub waiting_threads: usize,
    pub waiting_thread_names: Vec<String>,
    pub locked_threads: usize,
    pub locked_thread_names: Vec<String>,
    pub lock_held: bool,
    pub has_queued_threads: bool,
    pub queue_length: usize,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_query_defaults() {
        let q: BlockQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.seconds, 30);
        assert!(!q.internal);
    }

    #[test]
    fn test_thread_status_field_names() {
        let json = serde_json::to_value(ThreadStatusResponse {
            total_threads: 12,
            active_workers: 2,
            max_workers: 5,
            waiting_threads: 1,
            waiting_thread_names: vec!["http-worker-2".into()],
            locked_threads: 1,
            locked_thread_names: vec!["http-worker-1".into()],
            lock_held: true,
            has_queued_threads: true,
            queue_length: 1,
            timestamp: "2024-01-01T00:00:00Z".into(),
        })
        .unwrap();

        for key in [
            "totalThreads",
            "activeWorkers",
            "maxWorkers",
            "waitingThreads",
            "waitingThreadNames",
            "lockedThreads",
            "lockedThreadNames",
            "lockHeld",
            "hasQueuedThreads",
            "queueLength",
            "timestamp",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
