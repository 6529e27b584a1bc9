//! Request middleware shared by both services.

pub mod trace;

pub use trace::{TRACE_ID_HEADER, Trace};
