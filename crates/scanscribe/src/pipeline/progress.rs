/// Events emitted while a run is in progress. Page text is not included.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    DocumentStarted {
        file: String,
        index: usize,
        total: usize,
    },
    PageRecognized {
        file: String,
        page_number: u32,
        lines: usize,
    },
    FallbackStarted {
        file: String,
    },
    DocumentFinished {
        file: String,
        records: usize,
    },
    DocumentSkipped {
        file: String,
        reason: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards progress to `tracing` at debug level.
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::DocumentStarted { file, index, total } => {
                tracing::debug!(%file, "Document {}/{} started", index + 1, total);
            }
            ProgressEvent::PageRecognized {
                file,
                page_number,
                lines,
            } => {
                tracing::debug!(%file, page_number, lines, "Page recognized");
            }
            ProgressEvent::FallbackStarted { file } => {
                tracing::debug!(%file, "Text layer fallback started");
            }
            ProgressEvent::DocumentFinished { file, records } => {
                tracing::debug!(%file, records, "Document finished");
            }
            ProgressEvent::DocumentSkipped { file, reason } => {
                tracing::debug!(%file, %reason, "Document skipped");
            }
        }
    }
}
