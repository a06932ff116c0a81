use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// One completed timing record, handed from a [`ScopeTimer`](crate::ScopeTimer)
/// to the sink. Timestamps are microseconds since the Unix epoch.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub name: String,
    pub start_us: i64,
    pub end_us: i64,
    /// Stable hash of the capturing thread's identity.
    pub thread_id: u64,
}

impl Measurement {
    pub fn duration_us(&self) -> i64 {
        self.end_us - self.start_us
    }
}

/// Wire form of a single complete ("X") trace event.
/// Field declaration order here is the key order in the output file.
#[derive(Serialize)]
pub(crate) struct TraceEvent<'a> {
    pub cat: &'static str,
    pub dur: i64,
    pub name: &'a str,
    pub ph: &'static str,
    pub pid: u32,
    pub tid: u64,
    pub ts: i64,
}

pub(crate) const EVENT_CATEGORY: &str = "function";
pub(crate) const PHASE_COMPLETE: &str = "X";

/// Double quotes inside a label become single quotes before serialization.
/// Everything else is left to the serializer's own string escaping.
pub(crate) fn sanitize_label(name: &str) -> Cow<'_, str> {
    if name.contains('"') {
        Cow::Owned(name.replace('"', "'"))
    } else {
        Cow::Borrowed(name)
    }
}

pub(crate) fn current_thread_hash() -> u64 {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}
