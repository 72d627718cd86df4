//! Bounded concurrent downloads for one game's selected files.
//!
//! The engine validates the selection, creates the destination directory and
//! hands back a [`CompletionStream`] immediately. A dispatcher task walks the
//! selected indices in order, acquiring one of [`MAX_CONCURRENT_DOWNLOADS`]
//! semaphore permits before spawning each job; the permit is held until the
//! job ends. Results arrive in completion order. A failed job never cancels
//! its siblings.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use emudl_core::catalog::CatalogEntry;
//! use emudl_core::download::{DownloadEngine, HttpClient};
//! use emudl_core::inventory::FileCandidate;
//! use emudl_core::site::SiteConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(HttpClient::new(&SiteConfig::default())?);
//! let entry = CatalogEntry::new("Sonic", "https://www.emuparadise.me/Sega_Dreamcast_ISOs/Sonic/1");
//! let files: Arc<[FileCandidate]> = Vec::new().into();
//!
//! let mut results = engine.download(&entry, files, &[0, 1], Path::new("Games")).await?;
//! while let Some(result) = results.next().await {
//!     match result {
//!         Ok(done) => println!("{}: {:?}", done.candidate.title, done.status),
//!         Err(failure) => eprintln!("{failure}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use thiserror::Error;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::client::{FetchedFile, HttpClient, JobStatus};
use super::constants::MAX_CONCURRENT_DOWNLOADS;
use super::filename::sanitize_filename;
use super::progress::{NoProgress, ProgressObserver};
use super::DownloadError;
use crate::catalog::CatalogEntry;
use crate::inventory::FileCandidate;

/// A selected file that finished without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    /// Inventory index.
    pub index: usize,
    /// The candidate that was fetched.
    pub candidate: FileCandidate,
    /// Destination path.
    pub path: PathBuf,
    /// Downloaded or skipped.
    pub status: JobStatus,
}

/// A selected index that could not be fetched.
#[derive(Debug, Error)]
#[error("file {index}{}: {error}", title_suffix(.title))]
pub struct JobFailure {
    /// Inventory index.
    pub index: usize,
    /// Candidate title, absent for out-of-range indices.
    pub title: Option<String>,
    /// What went wrong.
    #[source]
    pub error: DownloadError,
}

fn title_suffix(title: &Option<String>) -> String {
    title.as_deref().map(|t| format!(" ({t})")).unwrap_or_default()
}

impl JobFailure {
    fn new(index: usize, title: Option<String>, error: DownloadError) -> Self {
        Self {
            index,
            title,
            error,
        }
    }
}

/// Per-job result yielded by [`CompletionStream`].
pub type JobResult = Result<JobOutcome, JobFailure>;

/// Results of one [`DownloadEngine::download`] call, in completion order.
///
/// Ends once every spawned job has reported. Not restartable.
#[derive(Debug)]
pub struct CompletionStream {
    receiver: mpsc::UnboundedReceiver<JobResult>,
}

impl CompletionStream {
    /// Waits for the next finished job; `None` when all jobs have reported.
    pub async fn next(&mut self) -> Option<JobResult> {
        self.receiver.recv().await
    }
}

impl Stream for CompletionStream {
    type Item = JobResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Fetches selected inventory entries with at most
/// [`MAX_CONCURRENT_DOWNLOADS`] bodies streaming at once.
///
/// The cap is shared by every `download` call on the same engine.
pub struct DownloadEngine {
    client: HttpClient,
    semaphore: Arc<Semaphore>,
    observer: Arc<dyn ProgressObserver>,
}

impl DownloadEngine {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        debug!(
            concurrency = MAX_CONCURRENT_DOWNLOADS,
            "creating download engine"
        );
        Self {
            client,
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_DOWNLOADS)),
            observer: Arc::new(NoProgress),
        }
    }

    /// Reports byte progress of every job to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Starts fetching `indices` of `files` into
    /// `<root>/<platform>/<game folder>/` and returns their results as they
    /// complete.
    ///
    /// Out-of-range indices yield a [`DownloadError::Selection`] failure for
    /// that index only. Candidates without a URL are skipped silently.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] if `entry`'s URL lacks the
    /// platform and game folder segments, and [`DownloadError::Io`] if the
    /// destination directory cannot be created. No job starts in either case.
    #[instrument(skip(self, entry, files, indices), fields(game = %entry.title, selected = indices.len()))]
    pub async fn download(
        &self,
        entry: &CatalogEntry,
        files: Arc<[FileCandidate]>,
        indices: &[usize],
        root: &Path,
    ) -> Result<CompletionStream, DownloadError> {
        let destination = destination_dir(entry, root)?;
        tokio::fs::create_dir_all(&destination)
            .await
            .map_err(|e| DownloadError::io(&destination, e))?;
        debug!(destination = %destination.display(), "destination ready");

        let (sender, receiver) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher {
            client: self.client.clone(),
            semaphore: Arc::clone(&self.semaphore),
            observer: Arc::clone(&self.observer),
            files,
            destination,
            sender,
        };
        tokio::spawn(dispatcher.run(indices.to_vec()));

        Ok(CompletionStream { receiver })
    }
}

impl std::fmt::Debug for DownloadEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadEngine")
            .field("client", &self.client)
            .field("available_permits", &self.semaphore.available_permits())
            .finish_non_exhaustive()
    }
}

/// `<root>/<platform segment>/<game folder segment>`.
fn destination_dir(entry: &CatalogEntry, root: &Path) -> Result<PathBuf, DownloadError> {
    let invalid = |_| DownloadError::invalid_url(&entry.page_url);
    let platform = entry.platform_segment().map_err(invalid)?;
    let game_folder = entry.game_folder_segment().map_err(invalid)?;
    Ok(root
        .join(sanitize_filename(&platform))
        .join(sanitize_filename(&game_folder)))
}

struct Dispatcher {
    client: HttpClient,
    semaphore: Arc<Semaphore>,
    observer: Arc<dyn ProgressObserver>,
    files: Arc<[FileCandidate]>,
    destination: PathBuf,
    sender: mpsc::UnboundedSender<JobResult>,
}

impl Dispatcher {
    async fn run(self, indices: Vec<usize>) {
        let mut handles: Vec<(usize, JoinHandle<()>)> = Vec::new();

        for index in indices {
            let Some(candidate) = self.files.get(index) else {
                warn!(index, len = self.files.len(), "selected file does not exist");
                let error = DownloadError::selection(index, self.files.len());
                let _ = self.sender.send(Err(JobFailure::new(index, None, error)));
                continue;
            };
            let Some(url) = candidate.url.clone() else {
                debug!(index, title = %candidate.title, "no download URL, skipping");
                continue;
            };

            // Permit is held by the job until it finishes (RAII).
            let Ok(permit) = Arc::clone(&self.semaphore).acquire_owned().await else {
                let error = DownloadError::TaskFailed {
                    reason: "download slots closed".to_string(),
                };
                let _ = self
                    .sender
                    .send(Err(JobFailure::new(index, Some(candidate.title.clone()), error)));
                break;
            };

            let client = self.client.clone();
            let observer = Arc::clone(&self.observer);
            let destination = self.destination.clone();
            let sender = self.sender.clone();
            let candidate = candidate.clone();

            handles.push((
                index,
                tokio::spawn(async move {
                    let _permit = permit;
                    let result = client
                        .fetch_to_dir(&url, &destination, index, observer.as_ref())
                        .await;
                    let message = match result {
                        Ok(FetchedFile { path, status }) => {
                            info!(index, path = %path.display(), ?status, "job finished");
                            Ok(JobOutcome {
                                index,
                                candidate,
                                path,
                                status,
                            })
                        }
                        Err(error) => {
                            warn!(index, url = %url, error = %error, "job failed");
                            Err(JobFailure::new(index, Some(candidate.title), error))
                        }
                    };
                    let _ = sender.send(message);
                }),
            ));
        }

        for (index, handle) in handles {
            if let Err(join_error) = handle.await {
                warn!(index, error = %join_error, "download task panicked");
                let title = self.files.get(index).map(|c| c.title.clone());
                let error = DownloadError::TaskFailed {
                    reason: join_error.to_string(),
                };
                let _ = self.sender.send(Err(JobFailure::new(index, title, error)));
            }
        }
    }
}
