//! Media source and render target descriptors handed to the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Immutable reference to the media the engine should open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaSource {
    /// File reachable through the host filesystem.
    LocalFile { path: PathBuf },
    /// Network location the engine opens itself (http, rtmp, ...).
    Remote { url: String },
}

impl MediaSource {
    /// Source for a local file path.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        MediaSource::LocalFile { path: path.into() }
    }

    /// Parses a location string.
    ///
    /// `file://` URIs and bare paths become [`MediaSource::LocalFile`]; any
    /// other `scheme://` becomes [`MediaSource::Remote`].
    pub fn from_uri(uri: &str) -> Self {
        if let Some(path) = uri.strip_prefix("file://") {
            return MediaSource::local(path);
        }
        match uri.find("://") {
            Some(idx) if idx > 0 && uri[..idx].chars().all(|c| c.is_ascii_alphanumeric()) => {
                MediaSource::Remote {
                    url: uri.to_string(),
                }
            }
            _ => MediaSource::local(uri),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, MediaSource::Remote { .. })
    }

    /// Filesystem path for local sources.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            MediaSource::LocalFile { path } => Some(path),
            MediaSource::Remote { .. } => None,
        }
    }

    /// Location as handed to C-style bindings.
    pub fn to_uri_string(&self) -> String {
        match self {
            MediaSource::LocalFile { path } => path.to_string_lossy().into_owned(),
            MediaSource::Remote { url } => url.clone(),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::LocalFile { path } => write!(f, "{}", path.display()),
            MediaSource::Remote { url } => f.write_str(url),
        }
    }
}

impl From<&str> for MediaSource {
    fn from(uri: &str) -> Self {
        MediaSource::from_uri(uri)
    }
}

/// Opaque render target owned by the UI collaborator.
///
/// On Android this is the `ANativeWindow*` obtained from a `Surface`; other
/// hosts pass whatever native window pointer their engine understands. The
/// core never dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}
