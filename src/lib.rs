//! A minimal scoped wall-clock tracer that streams Chrome Trace Event JSON.
//!
//! Wrap any code region in a [`ScopeTimer`] (or the [`profile_scope!`] /
//! [`profile_function!`] macros) while a session is open on the
//! [`Instrumentor`], and every region contributes one complete-duration
//! event to the output file. Load the file at `chrome://tracing` or in
//! Perfetto to view the timeline.
//!
//! ```no_run
//! use tracelite::{profile_function, Instrumentor};
//!
//! fn expensive() {
//!     profile_function!();
//!     // work...
//! }
//!
//! Instrumentor::global().begin_session("startup");
//! expensive();
//! Instrumentor::global().end_session();
//! ```
//!
//! Timers may nest freely and run on any number of threads at once; the sink
//! serializes concurrent submissions behind one lock. Events land in the file
//! in completion order, not start order; a reader that needs chronological
//! order should sort by `ts` after loading.

mod event;
mod sink;
mod timer;

pub use event::Measurement;
pub use sink::{Instrumentor, DEFAULT_TRACE_PATH};
pub use timer::ScopeTimer;

#[doc(hidden)]
pub fn __enclosing_function_name<T>(_: T) -> &'static str {
    let name = std::any::type_name::<T>();
    name.strip_suffix("::__here").unwrap_or(name)
}

/// Times the current lexical scope under the given label, reporting to the
/// process-wide sink.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _scope_timer = $crate::ScopeTimer::new($name);
    };
}

/// Like [`profile_scope!`], with the label derived from the enclosing
/// function's path.
#[macro_export]
macro_rules! profile_function {
    () => {
        fn __here() {}
        let _scope_timer =
            $crate::ScopeTimer::new($crate::__enclosing_function_name(__here));
    };
}
