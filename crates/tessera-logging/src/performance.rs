// ABOUTME: Timing guard for operations that are expected to return promptly
// ABOUTME: Records elapsed time on a span and warns when a threshold is exceeded

use std::time::{Duration, Instant};
use tracing::{Level, Span, field, span, warn};

/// Timer guard that records elapsed time when dropped
pub struct PerfTimer {
    span: Span,
    start: Instant,
    operation: String,
    warn_threshold: Option<Duration>,
}

impl PerfTimer {
    pub fn new(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        let span =
            span!(Level::TRACE, "perf_timer", operation = %operation, elapsed_ms = field::Empty);

        Self {
            span,
            start: Instant::now(),
            operation,
            warn_threshold: None,
        }
    }

    /// Operations taking longer than `threshold` log a warning
    pub fn with_warn_threshold(mut self, threshold: Duration) -> Self {
        self.warn_threshold = Some(threshold);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timing now and return the elapsed time
    pub fn finish(self) -> Duration {
        self.elapsed()
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        // Precision loss is acceptable for logging milliseconds
        #[allow(clippy::cast_precision_loss)]
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.span.record("elapsed_ms", elapsed_ms);

        if let Some(threshold) = self.warn_threshold {
            if elapsed > threshold {
                warn!(
                    operation = %self.operation,
                    elapsed_ms = elapsed_ms,
                    threshold_ms = threshold.as_millis() as u64,
                    "Slow operation detected"
                );
            }
        }
    }
}
