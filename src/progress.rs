//! Progress reporting for long full-program operations.
//!
//! Index construction walks every class and behavior in the program and can
//! take a while on large inputs. Callers that want feedback pass a
//! [`ProgressListener`]; there is deliberately no cancellation hook - a caller
//! that wants to abort discards the whole in-flight result and retries.

/// Receives progress callbacks from full-program operations.
pub trait ProgressListener {
    /// Called once before the operation starts, with the total number of
    /// steps and a human-readable title.
    fn init(&mut self, total: usize, title: &str);

    /// Called after each completed step.
    fn on_progress(&mut self, done: usize, message: &str);
}

/// A [`ProgressListener`] that ignores all callbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressListener for NoProgress {
    fn init(&mut self, _total: usize, _title: &str) {}

    fn on_progress(&mut self, _done: usize, _message: &str) {}
}
