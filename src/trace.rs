//! Diagnostic events, compiled in only with the `tracing` feature.

/// Emits a `tracing::trace!` event when the `tracing` feature is enabled.
macro_rules! avl_trace {
    ($($argument:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($argument)*);
    };
}

/// Emits a `tracing::error!` event when the `tracing` feature is enabled.
macro_rules! avl_error {
    ($($argument:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::error!($($argument)*);
    };
}
