#[cfg(feature = "log")]
pub(crate) use log::{debug, error, info, log_enabled, warn, Level};

#[cfg(not(feature = "log"))]
macro_rules! log_mock {
    (target: $target:expr, $($arg:tt)+) => {};
    ($($arg:tt)+) => {};
}

#[cfg(not(feature = "log"))]
macro_rules! log_enabled {
    ($($arg:tt)+) => {
        false
    };
}

/// Stand-in for [`log::Level`] when the `log` feature is disabled.
///
/// Only exists so that `log_enabled!(Level::Info)` guards keep compiling.
#[cfg(not(feature = "log"))]
#[allow(dead_code)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Level {
    Error = 1,
    Warn,
    Info,
    Debug,
}

#[cfg(not(feature = "log"))]
pub(crate) use {
    log_enabled, log_mock as debug, log_mock as error, log_mock as info, log_mock as warn,
};
