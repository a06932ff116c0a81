use std::mem;
use std::time::Instant;

use chrono::Utc;

use crate::event::current_thread_hash;
use crate::{Instrumentor, Measurement};

/// A guard that measures the wall-clock duration of the scope it lives in.
///
/// Construction captures the start timestamp; dropping the guard (or calling
/// [`stop`](ScopeTimer::stop) explicitly) captures the end timestamp and
/// submits exactly one [`Measurement`] to the sink. The drop path runs on
/// every way out of the scope, including early returns and unwinding panics,
/// so an abnormal exit still records an accurate end time.
///
/// The duration comes from a monotonic [`Instant`], so `dur >= 0` holds even
/// if the wall clock is adjusted mid-measurement.
pub struct ScopeTimer<'a> {
    name: String,
    sink: &'a Instrumentor,
    start: Instant,
    start_us: i64,
    stopped: bool,
}

impl ScopeTimer<'static> {
    /// A timer feeding the process-wide sink.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_sink(Instrumentor::global(), label)
    }
}

impl<'a> ScopeTimer<'a> {
    /// A timer feeding a specific sink instance.
    pub fn with_sink(sink: &'a Instrumentor, label: impl Into<String>) -> Self {
        ScopeTimer {
            name: label.into(),
            sink,
            start: Instant::now(),
            start_us: Utc::now().timestamp_micros(),
            stopped: false,
        }
    }

    /// Ends the measurement now and submits it to the sink. No-op when
    /// already stopped; the drop path relies on that.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        let end_us = self.start_us + self.start.elapsed().as_micros() as i64;
        self.sink.write_measurement(Measurement {
            name: mem::take(&mut self.name),
            start_us: self.start_us,
            end_us,
            thread_id: current_thread_hash(),
        });
    }
}

impl Drop for ScopeTimer<'_> {
    fn drop(&mut self) {
        self.stop();
    }
}
