//! Constants for the download module.

/// Byte streams the catalog host tolerates per client. Not configurable.
pub const MAX_CONCURRENT_DOWNLOADS: usize = 2;

/// Buffer size for writing response chunks to disk.
pub const WRITE_BUFFER_BYTES: usize = 32 * 1024;

/// Default destination root, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "Games";
