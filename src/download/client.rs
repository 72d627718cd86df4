//! Streaming HTTP client for file bodies.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{COOKIE, HeaderValue};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::WRITE_BUFFER_BYTES;
use super::filename::file_name_from_url;
use super::progress::ProgressObserver;
use super::DownloadError;
use crate::site::{DOWNLOAD_COOKIE, SiteConfig, SiteError, build_download_client};

/// How a fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// The body was written to disk.
    Downloaded {
        /// Bytes written.
        bytes: u64,
    },
    /// A file with the same name already existed; nothing was written.
    AlreadyPresent,
}

/// A file fetched (or skipped) into the destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Destination path.
    pub path: PathBuf,
    /// Whether bytes were written.
    pub status: JobStatus,
}

/// Byte-streaming client sending the browser headers plus the download cookie.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with per-read timeouts suitable for large images.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::ClientBuild`] if reqwest rejects the configuration.
    pub fn new(config: &SiteConfig) -> Result<Self, SiteError> {
        Ok(Self {
            client: build_download_client(config)?,
        })
    }

    /// Wraps an existing client. It should follow redirects.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` into `dir`, naming the file after the final response URL.
    ///
    /// If the destination already exists the body is never read and
    /// [`JobStatus::AlreadyPresent`] is returned. A partially written file
    /// is removed when the stream fails.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for invalid URLs, transport failures,
    /// non-success statuses, unusable file names and filesystem errors.
    #[instrument(skip(self, dir, observer), fields(url = %url))]
    pub async fn fetch_to_dir(
        &self,
        url: &str,
        dir: &Path,
        index: usize,
        observer: &dyn ProgressObserver,
    ) -> Result<FetchedFile, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .header(COOKIE, HeaderValue::from_static(DOWNLOAD_COOKIE))
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let final_url = response.url().clone();
        let file_name =
            file_name_from_url(&final_url).ok_or_else(|| DownloadError::MissingFileName {
                url: final_url.to_string(),
            })?;
        let path = dir.join(&file_name);

        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| DownloadError::io(&path, e))?
        {
            info!(path = %path.display(), "SKIPPING, already exists");
            return Ok(FetchedFile {
                path,
                status: JobStatus::AlreadyPresent,
            });
        }

        let total = response.content_length();
        debug!(path = %path.display(), total, final_url = %final_url, "streaming body");

        let mut file = File::create(&path)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;

        observer.started(index, &file_name, total);
        let result = stream_to_file(&mut file, response, url, &path, index, observer).await;
        observer.finished(index);

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(error) => {
                drop(file);
                debug!(path = %path.display(), "removing partial file after error");
                let _ = tokio::fs::remove_file(&path).await;
                return Err(error);
            }
        };

        info!(path = %path.display(), bytes, "download complete");
        Ok(FetchedFile {
            path,
            status: JobStatus::Downloaded { bytes },
        })
    }
}

/// Streams the response body to `file`, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
    index: usize,
    observer: &dyn ProgressObserver,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_BYTES, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::from_reqwest(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += chunk.len() as u64;
        observer.advanced(index, chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::download::progress::NoProgress;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(&SiteConfig::default()).unwrap()
    }

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<String>>,
    }

    impl ProgressObserver for Recording {
        fn started(&self, index: usize, file_name: &str, total_bytes: Option<u64>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {index} {file_name} {total_bytes:?}"));
        }

        fn advanced(&self, _index: usize, _bytes: u64) {}

        fn finished(&self, index: usize) {
            self.events.lock().unwrap().push(format!("finish {index}"));
        }
    }

    #[tokio::test]
    async fn test_fetch_writes_body_and_sends_cookie() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/files/Game%20One.7z"))
            .and(header("Cookie", DOWNLOAD_COOKIE))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"game-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        let observer = Recording::default();

        let fetched = client()
            .fetch_to_dir(
                &format!("{}/files/Game%20One.7z", server.uri()),
                dir.path(),
                3,
                &observer,
            )
            .await
            .unwrap();

        assert_eq!(fetched.path, dir.path().join("Game One.7z"));
        assert_eq!(fetched.status, JobStatus::Downloaded { bytes: 10 });
        assert_eq!(std::fs::read(&fetched.path).unwrap(), b"game-bytes");
        assert_eq!(
            *observer.events.lock().unwrap(),
            vec!["start 3 Game One.7z Some(10)", "finish 3"]
        );
    }

    #[tokio::test]
    async fn test_file_name_comes_from_final_url_after_redirect() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/get"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/real/Final%20Name.zip", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/real/Final%20Name.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip".to_vec()))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();

        let fetched = client()
            .fetch_to_dir(&format!("{}/get", server.uri()), dir.path(), 0, &NoProgress)
            .await
            .unwrap();

        assert_eq!(fetched.path, dir.path().join("Final Name.zip"));
    }

    #[tokio::test]
    async fn test_existing_file_is_left_untouched() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/files/game.7z"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("game.7z"), b"old").unwrap();

        let fetched = client()
            .fetch_to_dir(
                &format!("{}/files/game.7z", server.uri()),
                dir.path(),
                0,
                &NoProgress,
            )
            .await
            .unwrap();

        assert_eq!(fetched.status, JobStatus::AlreadyPresent);
        assert_eq!(std::fs::read(dir.path().join("game.7z")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_http_error_status_creates_no_file() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();

        let result = client()
            .fetch_to_dir(
                &format!("{}/files/missing.7z", server.uri()),
                dir.path(),
                0,
                &NoProgress,
            )
            .await;

        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 404, .. })
        ));
        assert!(!dir.path().join("missing.7z").exists());
    }

    #[tokio::test]
    async fn test_directory_url_has_no_file_name() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"listing".to_vec()))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();

        let result = client()
            .fetch_to_dir(&format!("{}/", server.uri()), dir.path(), 0, &NoProgress)
            .await;

        assert!(matches!(result, Err(DownloadError::MissingFileName { .. })));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_any_request() {
        let dir = TempDir::new().unwrap();
        let result = client()
            .fetch_to_dir("not a url", dir.path(), 0, &NoProgress)
            .await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }
}
