//! Progress reporting hooks for in-flight downloads.

/// Receives byte-level progress for each job, keyed by inventory index.
///
/// Called from download tasks, so implementations must be thread-safe.
pub trait ProgressObserver: Send + Sync {
    /// A body stream is about to start. `total_bytes` comes from
    /// `Content-Length` when the host sends one.
    fn started(&self, index: usize, file_name: &str, total_bytes: Option<u64>);

    /// `bytes` more bytes were written to disk.
    fn advanced(&self, index: usize, bytes: u64);

    /// The stream ended, successfully or not.
    fn finished(&self, index: usize);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn started(&self, _index: usize, _file_name: &str, _total_bytes: Option<u64>) {}

    fn advanced(&self, _index: usize, _bytes: u64) {}

    fn finished(&self, _index: usize) {}
}
