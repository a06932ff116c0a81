use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;

use crate::event::{sanitize_label, TraceEvent, EVENT_CATEGORY, PHASE_COMPLETE};
use crate::Measurement;

/// Where [`Instrumentor::begin_session`] writes when no path is given.
pub const DEFAULT_TRACE_PATH: &str = "results.json";

const FILE_HEADER: &[u8] = b"{\"otherData\": {},\"traceEvents\":[";
const FILE_FOOTER: &[u8] = b"]}";

static GLOBAL_INSTRUMENTOR: Lazy<Instrumentor> = Lazy::new(Instrumentor::new);

/// The trace sink: owns at most one active recording session and serializes
/// measurements from any number of threads into its output file.
///
/// Most callers use the process-wide instance from [`Instrumentor::global`];
/// tests can construct private sinks with [`Instrumentor::new`] and feed them
/// through [`ScopeTimer::with_sink`](crate::ScopeTimer::with_sink).
///
/// None of the methods here return errors: instrumentation must never disturb
/// the instrumented program. An unopenable output path or a measurement
/// arriving outside a session both degrade to "nothing recorded".
pub struct Instrumentor {
    session: Mutex<Option<Session>>,
}

struct Session {
    name: String,
    out: BufWriter<File>,
    event_count: usize,
}

impl Instrumentor {
    /// A sink with no active session.
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }

    /// The process-wide sink instance.
    ///
    /// Note that statics run no destructor at process exit: a session left
    /// active on the global sink when the process terminates yields the
    /// documented partial file (header plus events, no closing `]}`).
    pub fn global() -> &'static Instrumentor {
        &GLOBAL_INSTRUMENTOR
    }

    /// Begins a session writing to [`DEFAULT_TRACE_PATH`].
    pub fn begin_session(&self, name: &str) {
        self.begin_session_to(name, DEFAULT_TRACE_PATH);
    }

    /// Begins a recording session writing to `path`, truncating any existing
    /// file there. A session already active is ended first, so its file is
    /// finalized cleanly before the new one opens.
    ///
    /// If `path` cannot be opened the sink stays inactive and subsequent
    /// measurements are dropped silently.
    pub fn begin_session_to(&self, name: &str, path: impl AsRef<Path>) {
        let mut session = self.lock_session();
        if let Some(old) = session.take() {
            finalize(old).ok();
        }
        *session = open_session(name, path.as_ref()).ok();
    }

    /// Writes the document footer and closes the output file. No-op when no
    /// session is active, so calling it twice is harmless.
    pub fn end_session(&self) {
        let mut session = self.lock_session();
        if let Some(old) = session.take() {
            finalize(old).ok();
        }
    }

    /// Appends one measurement to the active session's file, comma-separated
    /// from the previous one and flushed immediately so that already-recorded
    /// events survive a crash. Dropped silently when no session is active.
    pub fn write_measurement(&self, measurement: Measurement) {
        let mut session = self.lock_session();
        if let Some(session) = session.as_mut() {
            append_event(session, &measurement).ok();
        }
    }

    pub fn session_active(&self) -> bool {
        self.lock_session().is_some()
    }

    pub fn session_name(&self) -> Option<String> {
        self.lock_session().as_ref().map(|s| s.name.clone())
    }

    // A poisoned lock only means some thread panicked while appending; the
    // session state itself stays usable, so keep recording.
    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Instrumentor {
    fn default() -> Self {
        Self::new()
    }
}

fn open_session(name: &str, path: &Path) -> io::Result<Session> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    out.write_all(FILE_HEADER)?;
    out.flush()?;
    Ok(Session {
        name: name.to_owned(),
        out,
        event_count: 0,
    })
}

fn finalize(mut session: Session) -> io::Result<()> {
    session.out.write_all(FILE_FOOTER)?;
    session.out.flush()
}

fn append_event(session: &mut Session, measurement: &Measurement) -> io::Result<()> {
    // The element count is unknown up front, so separators go before every
    // event but the first instead of after each one.
    if session.event_count > 0 {
        session.out.write_all(b",")?;
    }
    let name = sanitize_label(&measurement.name);
    let event = TraceEvent {
        cat: EVENT_CATEGORY,
        dur: measurement.duration_us(),
        name: &name,
        ph: PHASE_COMPLETE,
        pid: 0,
        tid: measurement.thread_id,
        ts: measurement.start_us,
    };
    serde_json::to_writer(&mut session.out, &event)?;
    session.out.flush()?;
    session.event_count += 1;
    Ok(())
}
