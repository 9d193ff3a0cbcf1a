//! Default limits used by [`ServerConfig`](crate::ServerConfig) and the worker loop
//!

use std::time::Duration;

/// Default ceiling of pending, not yet accepted connections
pub const BACKLOG_DEFAULT: i32 = 10_000;
/// Default number of readiness events a worker takes per wait
pub const EVENTS_PER_WAIT_DEFAULT: usize = 1;
/// Default size of the single read a request has to fit in
pub const MAX_REQUEST_SIZE_DEFAULT: usize = 10 * 1024;
/// Default timeout of a readiness wait, bounds how late a worker sees shutdown
pub const WAIT_TIMEOUT_DEFAULT: Duration = Duration::from_millis(1000);
