//! Wait-for-ready loop over file status checks.

use std::future::Future;
use tokio::time::{sleep, Instant};

use crate::error::{MemicResult, ProcessingError};
use crate::observability::Logger;
use crate::types::{File, FileStatus, PollConfig};

/// Where a wait loop stands after observing a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Keep checking.
    Polling,
    /// The file is ready.
    Ready,
    /// Processing failed.
    Failed,
    /// The deadline passed before a terminal status was seen.
    TimedOut,
}

impl PollState {
    /// State after observing `status`.
    pub fn observe(status: FileStatus) -> Self {
        if status.is_ready() {
            PollState::Ready
        } else if status.is_failed() {
            PollState::Failed
        } else {
            PollState::Polling
        }
    }

    /// State of a loop that is still polling at `now`.
    pub fn at(now: Instant, deadline: Instant) -> Self {
        if now >= deadline {
            PollState::TimedOut
        } else {
            PollState::Polling
        }
    }
}

/// Runs status checks until the file is ready, fails, or the deadline passes.
///
/// `check` performs one status check. Errors it returns end the loop as-is.
/// The sleep between checks is `config.interval` clamped to the time left
/// before the deadline. The config must already be validated.
pub async fn poll_until_ready<F, Fut>(
    file_id: &str,
    config: PollConfig,
    logger: &dyn Logger,
    mut check: F,
) -> MemicResult<File>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = MemicResult<File>>,
{
    let start = Instant::now();
    let deadline = start + config.timeout;
    let mut checks: u32 = 0;

    loop {
        let file = check().await?;
        checks += 1;

        logger.debug(
            "File status checked",
            serde_json::json!({
                "file_id": file_id,
                "status": file.status.as_str(),
                "check": checks,
            }),
        );

        match PollState::observe(file.status) {
            PollState::Ready => {
                logger.info(
                    "File ready",
                    serde_json::json!({"file_id": file_id, "checks": checks}),
                );
                return Ok(file);
            }
            PollState::Failed => {
                logger.warn(
                    "File processing failed",
                    serde_json::json!({
                        "file_id": file_id,
                        "status": file.status.as_str(),
                        "error_message": file.error_message,
                    }),
                );
                return Err(ProcessingError::Failed {
                    file_id: file_id.to_string(),
                    status: file.status,
                    message: file.error_message,
                }
                .into());
            }
            PollState::Polling | PollState::TimedOut => {}
        }

        let now = Instant::now();
        if now < deadline {
            sleep(config.interval.min(deadline - now)).await;
        }

        let now = Instant::now();
        if PollState::at(now, deadline) == PollState::TimedOut {
            let waited = now - start;
            logger.warn(
                "Timed out waiting for file",
                serde_json::json!({
                    "file_id": file_id,
                    "last_status": file.status.as_str(),
                    "waited_ms": waited.as_millis() as u64,
                    "checks": checks,
                }),
            );
            return Err(ProcessingError::PollTimeout {
                file_id: file_id.to_string(),
                last_status: file.status,
                waited,
            }
            .into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MemicError, NetworkError};
    use crate::observability::DefaultLogger;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    fn file_with(status: FileStatus) -> File {
        serde_json::from_value(serde_json::json!({
            "id": "file-1",
            "status": status.as_str(),
            "error_message": if status.is_failed() { Some("bad pdf") } else { None },
        }))
        .unwrap()
    }

    fn scripted(statuses: Vec<MemicResult<File>>) -> (Mutex<VecDeque<MemicResult<File>>>, Mutex<u32>) {
        (Mutex::new(statuses.into()), Mutex::new(0))
    }

    #[test]
    fn test_poll_state_covers_every_status() {
        for status in FileStatus::ALL {
            let state = PollState::observe(status);
            match state {
                PollState::Ready => assert!(status.is_ready()),
                PollState::Failed => assert!(status.is_failed()),
                PollState::Polling => assert!(status.is_processing()),
                PollState::TimedOut => unreachable!(),
            }
        }
    }

    #[test]
    fn test_deadline_moves_polling_to_timed_out() {
        let now = Instant::now();
        let deadline = now + Duration::from_secs(2);

        assert_eq!(PollState::at(now, deadline), PollState::Polling);
        assert_eq!(PollState::at(deadline, deadline), PollState::TimedOut);
        assert_eq!(
            PollState::at(deadline + Duration::from_millis(1), deadline),
            PollState::TimedOut
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_three_checks() {
        let (queue, calls) = scripted(vec![
            Ok(file_with(FileStatus::ParsingStarted)),
            Ok(file_with(FileStatus::EmbeddingStarted)),
            Ok(file_with(FileStatus::Ready)),
        ]);
        let logger = DefaultLogger::new("test");
        let start = Instant::now();

        let file = poll_until_ready(
            "file-1",
            PollConfig::new(Duration::from_secs(1), Duration::from_secs(3)),
            &logger,
            || {
                *calls.lock().unwrap() += 1;
                let next = queue.lock().unwrap().pop_front().unwrap();
                async move { next }
            },
        )
        .await
        .unwrap();

        assert_eq!(file.status, FileStatus::Ready);
        assert_eq!(*calls.lock().unwrap(), 3);
        assert!(start.elapsed() <= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_two_checks() {
        let calls = Mutex::new(0u32);
        let logger = DefaultLogger::new("test");

        let err = poll_until_ready(
            "file-1",
            PollConfig::new(Duration::from_secs(1), Duration::from_secs(2)),
            &logger,
            || {
                *calls.lock().unwrap() += 1;
                async { Ok(file_with(FileStatus::ChunkingStarted)) }
            },
        )
        .await
        .unwrap_err();

        assert_eq!(*calls.lock().unwrap(), 2);
        match err {
            MemicError::Processing(ProcessingError::PollTimeout { last_status, waited, .. }) => {
                assert_eq!(last_status, FileStatus::ChunkingStarted);
                assert_eq!(waited, Duration::from_secs(2));
            }
            other => panic!("Expected PollTimeout, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_sleep_is_clamped_to_deadline() {
        let logger = DefaultLogger::new("test");
        let start = Instant::now();

        let err = poll_until_ready(
            "file-1",
            PollConfig::new(Duration::from_secs(2), Duration::from_secs(3)),
            &logger,
            || async { Ok(file_with(FileStatus::Uploaded)) },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MemicError::Processing(ProcessingError::PollTimeout { .. })));
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_status_stops_immediately() {
        let (queue, calls) = scripted(vec![
            Ok(file_with(FileStatus::ConversionStarted)),
            Ok(file_with(FileStatus::ConversionFailed)),
        ]);
        let logger = DefaultLogger::new("test");

        let err = poll_until_ready(
            "file-1",
            PollConfig::new(Duration::from_secs(1), Duration::from_secs(10)),
            &logger,
            || {
                *calls.lock().unwrap() += 1;
                let next = queue.lock().unwrap().pop_front().unwrap();
                async move { next }
            },
        )
        .await
        .unwrap_err();

        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(err.last_status(), Some(FileStatus::ConversionFailed));
        match err {
            MemicError::Processing(ProcessingError::Failed { message, .. }) => {
                assert_eq!(message.as_deref(), Some("bad pdf"));
            }
            other => panic!("Expected processing failure, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_error_aborts_loop() {
        let (queue, calls) = scripted(vec![
            Ok(file_with(FileStatus::Uploaded)),
            Err(NetworkError::Timeout.into()),
            Ok(file_with(FileStatus::Ready)),
        ]);
        let logger = DefaultLogger::new("test");

        let err = poll_until_ready(
            "file-1",
            PollConfig::new(Duration::from_secs(1), Duration::from_secs(10)),
            &logger,
            || {
                *calls.lock().unwrap() += 1;
                let next = queue.lock().unwrap().pop_front().unwrap();
                async move { next }
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MemicError::Network(NetworkError::Timeout)));
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
