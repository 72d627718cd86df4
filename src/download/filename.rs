//! File names for downloaded images.
//!
//! The host names files by the last segment of the final (post-redirect)
//! URL, percent-encoded. Names are decoded, then made safe for the local
//! filesystem.

use std::borrow::Cow;
use std::path::{Component, Path};

use url::Url;

/// Derives the on-disk file name from the final response URL.
///
/// Returns `None` when the URL ends in `/` or has no path.
#[must_use]
pub fn file_name_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last).unwrap_or(Cow::Borrowed(last));
    let sanitized = sanitize_filename(&decoded);
    (!sanitized.trim_matches('_').is_empty()).then_some(sanitized)
}

/// Sanitizes a name for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |`) and control characters with `_`. Dot-only names
/// such as `..` are rewritten so they cannot escape the destination.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
