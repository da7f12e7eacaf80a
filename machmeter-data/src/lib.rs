#![warn(missing_docs)]
//! Machmeter Data - Dataset Acquisition
//!
//! Resolves the datasets workloads declare: fetches them over HTTP, caches
//! the raw payload on disk under a hidden working directory, and
//! transparently decompresses gzip payloads by URL extension. A populated
//! cache file is never re-fetched. The driver resolves datasets before the
//! timed interval starts, so none of this I/O is ever measured.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use machmeter_core::{DatasetMap, DatasetSpec};
use thiserror::Error;
use tracing::{debug, info};

/// Default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".machmeter";

/// Network or filesystem failure while resolving a declared dataset.
///
/// Surfaces immediately and aborts the run; there is no retry.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source could not deliver the payload.
    #[error("fetching `{name}` from {url}: {source}")]
    Fetch {
        /// Dataset name from the spec.
        name: String,
        /// Source URL that failed.
        url: String,
        /// Underlying transport error.
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the cache failed.
    #[error("dataset cache I/O at {path}: {source}")]
    Io {
        /// Cache path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cached payload is not valid gzip.
    #[error("decompressing `{name}`: {source}")]
    Decompress {
        /// Dataset name from the spec.
        name: String,
        /// Underlying decoder error.
        #[source]
        source: std::io::Error,
    },
}

/// Where raw dataset bytes come from.
///
/// The production source is HTTP; tests inject counting or failing mocks
/// through this seam.
pub trait DatasetSource {
    /// Fetch the raw payload behind `url`.
    fn fetch(&self, url: &str) -> std::io::Result<Vec<u8>>;
}

/// Blocking HTTP GET source.
pub struct HttpSource;

impl DatasetSource for HttpSource {
    fn fetch(&self, url: &str) -> std::io::Result<Vec<u8>> {
        let response = ureq::get(url).call().map_err(std::io::Error::other)?;
        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Local dataset cache backed by a [`DatasetSource`].
///
/// Cache layout is one file per dataset name directly under the root
/// directory; the file holds the payload exactly as fetched (so a gzip
/// source stays gzip on disk and is decompressed on every read).
pub struct DataStore<S = HttpSource> {
    root: PathBuf,
    source: S,
}

impl DataStore<HttpSource> {
    /// Store fetching over HTTP, rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_source(root, HttpSource)
    }
}

impl<S: DatasetSource> DataStore<S> {
    /// Store with an explicit source (tests).
    pub fn with_source(root: impl Into<PathBuf>, source: S) -> Self {
        Self {
            root: root.into(),
            source,
        }
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve every spec to its decompressed bytes, fetching on cache miss.
    pub fn resolve(&self, specs: &[DatasetSpec]) -> Result<DatasetMap, DatasetError> {
        let mut resolved = DatasetMap::new();
        for spec in specs {
            resolved.insert(spec.name.to_string(), self.resolve_one(spec)?);
        }
        Ok(resolved)
    }

    fn resolve_one(&self, spec: &DatasetSpec) -> Result<Vec<u8>, DatasetError> {
        let path = self.root.join(spec.name);

        if path.exists() {
            debug!(name = spec.name, "dataset cache hit");
        } else {
            fs::create_dir_all(&self.root).map_err(|source| DatasetError::Io {
                path: self.root.clone(),
                source,
            })?;

            info!(name = spec.name, url = spec.url, "fetching dataset");
            let payload = self
                .source
                .fetch(spec.url)
                .map_err(|source| DatasetError::Fetch {
                    name: spec.name.to_string(),
                    url: spec.url.to_string(),
                    source,
                })?;

            fs::write(&path, &payload).map_err(|source| DatasetError::Io {
                path: path.clone(),
                source,
            })?;
        }

        let raw = fs::read(&path).map_err(|source| DatasetError::Io {
            path: path.clone(),
            source,
        })?;

        if spec.url.ends_with(".gz") {
            let mut decoder = GzDecoder::new(&raw[..]);
            let mut decompressed = Vec::new();
            decoder
                .read_to_end(&mut decompressed)
                .map_err(|source| DatasetError::Decompress {
                    name: spec.name.to_string(),
                    source,
                })?;
            Ok(decompressed)
        } else {
            Ok(raw)
        }
    }

    /// Delete the cache directory and everything in it.
    ///
    /// A cache that was never created is not an error.
    pub fn purge(&self) -> Result<(), DatasetError> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                info!(root = %self.root.display(), "removed dataset cache");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(DatasetError::Io {
                path: self.root.clone(),
                source,
            }),
        }
    }
}
