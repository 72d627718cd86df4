//! Concurrent streaming downloads of resolved game files.
//!
//! - [`HttpClient`] streams one URL to disk, skipping files already present
//! - [`DownloadEngine`] runs a selection of inventory entries under a fixed
//!   concurrency cap and yields results through a [`CompletionStream`]
//!
//! Destination layout is `<root>/<platform>/<game folder>/<file name>`, where
//! the file name is the decoded last segment of the final response URL.

mod client;
pub mod constants;
mod engine;
mod error;
pub mod filename;
mod progress;

pub use client::{FetchedFile, HttpClient, JobStatus};
pub use constants::{DEFAULT_OUTPUT_DIR, MAX_CONCURRENT_DOWNLOADS};
pub use engine::{CompletionStream, DownloadEngine, JobFailure, JobOutcome, JobResult};
pub use error::DownloadError;
pub use progress::{NoProgress, ProgressObserver};
