//! Static file serving under a fixed root directory.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::server::response::{HttpResponse, StatusCode};

/// Extension to content-type lookup used for served files.
///
/// The map is injected into the file server; [`ContentTypeMap::default`]
/// covers the usual web asset types, anything unknown falls back to
/// `application/octet-stream`.
#[derive(Debug, Clone)]
pub struct ContentTypeMap {
    types: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Create an empty map.
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Register a content type for an extension (without the dot).
    pub fn insert(&mut self, extension: impl Into<String>, content_type: impl Into<String>) {
        self.types.insert(extension.into(), content_type.into());
    }

    /// Guess the content type for a path from its extension.
    pub fn guess(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?;
        self.types.get(&ext.to_ascii_lowercase()).map(String::as_str)
    }
}

impl Default for ContentTypeMap {
    fn default() -> Self {
        let mut map = Self::empty();
        for (ext, ctype) in [
            ("html", "text/html"),
            ("htm", "text/html"),
            ("css", "text/css"),
            ("js", "text/javascript"),
            ("json", "application/json"),
            ("txt", "text/plain"),
            ("png", "image/png"),
            ("jpg", "image/jpeg"),
            ("jpeg", "image/jpeg"),
            ("gif", "image/gif"),
            ("svg", "image/svg+xml"),
            ("ico", "image/x-icon"),
            ("pdf", "application/pdf"),
            ("woff2", "font/woff2"),
        ] {
            map.insert(ext, ctype);
        }
        map
    }
}

/// Resolves URL paths to files under a served root.
pub struct StaticFileServer {
    root: PathBuf,
    content_types: ContentTypeMap,
}

impl StaticFileServer {
    /// Create a file server rooted at `root` with the given type lookup.
    pub fn new(root: impl Into<PathBuf>, content_types: ContentTypeMap) -> Self {
        Self {
            root: root.into(),
            content_types,
        }
    }

    /// Serve the file at the given URL path.
    ///
    /// A directory answers 301 to the same path with `index.html` appended,
    /// built from the request's `Host` header. A readable file answers 200
    /// with its raw bytes; everything else, including paths that try to
    /// escape the root, answers 404.
    pub async fn serve(&self, path: &str, host: &str) -> HttpResponse {
        let relative = path.trim_start_matches('/');
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            debug!("rejecting traversal attempt: {path}");
            return HttpResponse::not_found();
        }
        let resolved = self.root.join(relative);

        let meta = match tokio::fs::metadata(&resolved).await {
            Ok(meta) => meta,
            Err(_) => return HttpResponse::not_found(),
        };

        if meta.is_dir() {
            let location = if path.ends_with('/') {
                format!("http://{host}{path}index.html")
            } else {
                format!("http://{host}{path}/index.html")
            };
            return HttpResponse::moved_permanently(location);
        }

        match tokio::fs::read(&resolved).await {
            Ok(bytes) => {
                let content_type = self
                    .content_types
                    .guess(&resolved)
                    .unwrap_or("application/octet-stream");
                HttpResponse::new(StatusCode::Ok)
                    .with_content_type(content_type)
                    .with_body_bytes(bytes)
            }
            Err(e) => {
                debug!("failed to read {resolved:?}: {e}");
                HttpResponse::not_found()
            }
        }
    }
}
