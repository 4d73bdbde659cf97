use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use ck_core::ports::ClipboardSourcePort;
use ck_core::{
    CaptureError, ClipFormat, ClipboardChangeSignal, ClipboardReadError, RawCaptureEvent,
    SourceApplication,
};

/// Reads one clipboard snapshot, retrying while another process holds the
/// clipboard open.
pub struct ClipboardSnapshotReader {
    source: Arc<dyn ClipboardSourcePort>,
    max_attempts: u32,
    backoff: Duration,
}

impl ClipboardSnapshotReader {
    pub fn new(source: Arc<dyn ClipboardSourcePort>, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            source,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Linear backoff: the n-th retry waits `n * backoff`.
    pub async fn read(&self, signal: ClipboardChangeSignal) -> Result<RawCaptureEvent, CaptureError> {
        let mut attempt: u32 = 1;
        loop {
            let source = Arc::clone(&self.source);
            let result = tokio::task::spawn_blocking(move || read_once(source.as_ref()))
                .await
                .map_err(|e| {
                    CaptureError::ClipboardRead(ClipboardReadError::Platform(format!(
                        "clipboard reader task failed: {e}"
                    )))
                })?;

            match result {
                Ok((source, formats)) => {
                    return Ok(RawCaptureEvent {
                        sequence: signal.sequence,
                        observed_at_ms: signal.observed_at_ms,
                        source,
                        formats,
                    })
                }
                Err(err) if err.is_transient() => {
                    if attempt >= self.max_attempts {
                        return Err(CaptureError::ClipboardUnavailable {
                            attempts: attempt,
                            last_error: err,
                        });
                    }
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        sequence = signal.sequence,
                        "Clipboard busy; retrying"
                    );
                    sleep(self.backoff.saturating_mul(attempt)).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(err) => return Err(CaptureError::ClipboardRead(err)),
            }
        }
    }
}

fn read_once(
    source: &dyn ClipboardSourcePort,
) -> Result<(SourceApplication, Vec<ClipFormat>), ClipboardReadError> {
    let owner = source.current_owner();
    let kinds = source.enumerate_formats()?;
    let mut formats = Vec::with_capacity(kinds.len());
    for kind in kinds {
        match source.read_format(&kind) {
            Ok(bytes) => formats.push(ClipFormat::new(kind, bytes)),
            // The owner replaced the content between enumerate and read.
            Err(ClipboardReadError::FormatUnavailable(kind)) => {
                debug!(format = %kind, "Format disappeared before it could be read");
            }
            Err(err) => return Err(err),
        }
    }
    Ok((owner, formats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_core::FormatKind;
    use mockall::mock;
    use std::sync::atomic::{AtomicU32, Ordering};

    mock! {
        Source {}
        impl ClipboardSourcePort for Source {
            fn current_owner(&self) -> SourceApplication;
            fn enumerate_formats(&self) -> Result<Vec<FormatKind>, ClipboardReadError>;
            fn read_format(&self, kind: &FormatKind) -> Result<Vec<u8>, ClipboardReadError>;
        }
    }

    fn signal() -> ClipboardChangeSignal {
        ClipboardChangeSignal {
            sequence: 7,
            observed_at_ms: 1_000,
        }
    }

    fn busy_for(calls: u32) -> MockSource {
        let mut source = MockSource::new();
        let seen = Arc::new(AtomicU32::new(0));
        source
            .expect_current_owner()
            .returning(|| SourceApplication::new("editor.exe"));
        source.expect_enumerate_formats().returning(move || {
            if seen.fetch_add(1, Ordering::SeqCst) < calls {
                Err(ClipboardReadError::Busy)
            } else {
                Ok(vec![FormatKind::Text, FormatKind::Html])
            }
        });
        source.expect_read_format().returning(|kind| match kind {
            FormatKind::Text => Ok(b"hello".to_vec()),
            other => Err(ClipboardReadError::FormatUnavailable(other.clone())),
        });
        source
    }

    #[tokio::test(start_paused = true)]
    async fn busy_clipboard_is_retried_within_budget() {
        let reader = ClipboardSnapshotReader::new(Arc::new(busy_for(3)), 4, Duration::from_millis(25));
        let event = reader.read(signal()).await.unwrap();
        assert_eq!(event.sequence, 7);
        assert_eq!(event.source.process_name, "editor.exe");
        // Html vanished between enumerate and read.
        assert_eq!(event.formats, vec![ClipFormat::text("hello")]);
    }

    #[tokio::test(start_paused = true)]
    async fn always_busy_clipboard_is_unavailable() {
        let reader =
            ClipboardSnapshotReader::new(Arc::new(busy_for(u32::MAX)), 4, Duration::from_millis(25));
        match reader.read(signal()).await {
            Err(CaptureError::ClipboardUnavailable {
                attempts,
                last_error,
            }) => {
                assert_eq!(attempts, 4);
                assert_eq!(last_error, ClipboardReadError::Busy);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn platform_errors_are_not_retried() {
        let mut source = MockSource::new();
        source
            .expect_current_owner()
            .returning(SourceApplication::unknown);
        source
            .expect_enumerate_formats()
            .times(1)
            .returning(|| Err(ClipboardReadError::Platform("no display".into())));
        let reader = ClipboardSnapshotReader::new(Arc::new(source), 4, Duration::from_millis(25));
        assert!(matches!(
            reader.read(signal()).await,
            Err(CaptureError::ClipboardRead(ClipboardReadError::Platform(_)))
        ));
    }
}
