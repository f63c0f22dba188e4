//! Loading banners by name
//!
//! A [`BannerSource`] turns a banner name such as `"block"` into a [`GlyphTable`]. [`Directory`]
//! reads `<root>/<name>.txt` on every call; wrap it in [`Cached`] to decode each banner once per
//! process.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::font::GlyphTable;

/// Something that can produce glyph tables by banner name
pub trait BannerSource: Send + Sync {
    /// Loads the banner called `name`.
    ///
    /// # Errors
    /// See [`LoadError`]. A missing banner is always [`LoadError::NotFound`], never an empty
    /// table.
    fn load(&self, name: &str) -> Result<Arc<GlyphTable>, LoadError>;

    /// Names of the banners this source can load, sorted.
    ///
    /// # Errors
    /// Returns [`LoadError::List`] if the available banners cannot be enumerated.
    fn names(&self) -> Result<Vec<String>, LoadError>;
}

/// Checks that `name` is non-empty and only contains ASCII letters, digits, `-` and `_`.
///
/// Names are used as file stems, so anything that could leave the banner directory is rejected.
///
/// # Errors
/// Returns [`LoadError::InvalidName`] otherwise.
pub fn check_name(name: &str) -> Result<(), LoadError> {
    if !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        Ok(())
    } else {
        Err(LoadError::InvalidName(name.to_owned()))
    }
}

/// Banners stored as `<name>.txt` files in one directory
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
}

impl Directory {
    /// File extension of banner resources
    pub const EXTENSION: &'static str = "txt";

    /// A source reading from `root`. The directory is not accessed until the first load.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The banner directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path of the resource for `name`.
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidName`] if `name` fails [`check_name`].
    pub fn path(&self, name: &str) -> Result<PathBuf, LoadError> {
        check_name(name)?;
        Ok(self.root.join(name).with_extension(Self::EXTENSION))
    }
}

impl BannerSource for Directory {
    fn load(&self, name: &str) -> Result<Arc<GlyphTable>, LoadError> {
        let path = self.path(name)?;
        let bytes = fs::read(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound(name.to_owned())
            } else {
                LoadError::Io {
                    name: name.to_owned(),
                    source,
                }
            }
        })?;
        let (table, warnings) = GlyphTable::from_bytes_with_warnings(bytes);
        for warning in warnings {
            warn!(banner = name, %warning, "suspicious glyph table");
        }
        debug!(banner = name, lines = table.len(), path = %path.display(), "loaded banner");
        Ok(Arc::new(table))
    }

    fn names(&self) -> Result<Vec<String>, LoadError> {
        let list_error = |source| LoadError::List {
            path: self.root.clone(),
            source,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(list_error)? {
            let path = entry.map_err(list_error)?.path();
            if path.extension() != Some(OsStr::new(Self::EXTENSION)) || !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
                continue;
            };
            if check_name(stem).is_ok() {
                names.push(stem.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }
}

/// A source that keeps every successfully loaded banner
///
/// Tables are never modified or evicted once inserted, so a cache hit only takes the read lock.
/// Failed loads are not remembered and are retried on the next call.
#[derive(Debug)]
pub struct Cached<S> {
    inner: S,
    tables: RwLock<HashMap<String, Arc<GlyphTable>>>,
}

impl<S> Cached<S> {
    /// Wraps `inner` with an empty cache.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped source.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of banners currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Returns true if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

impl<S: BannerSource> BannerSource for Cached<S> {
    fn load(&self, name: &str) -> Result<Arc<GlyphTable>, LoadError> {
        if let Some(table) = self.tables.read().get(name) {
            return Ok(Arc::clone(table));
        }
        let table = self.inner.load(name)?;
        // another caller may have inserted this name meanwhile; the first insert wins
        let mut tables = self.tables.write();
        let table = Arc::clone(tables.entry(name.to_owned()).or_insert(table));
        debug!(banner = name, cached = tables.len(), "cached banner");
        Ok(table)
    }

    fn names(&self) -> Result<Vec<String>, LoadError> {
        self.inner.names()
    }
}

/// An error in loading a banner
#[derive(Debug, Error)]
pub enum LoadError {
    /// The name is empty or contains characters other than ASCII letters, digits, `-` and `_`.
    #[error(r#""{0}" is not a valid banner name"#)]
    InvalidName(String),
    /// There is no resource for this banner.
    #[error(r#"banner "{0}" not found"#)]
    NotFound(String),
    /// The resource exists but could not be read.
    #[error(r#"failed to read banner "{name}""#)]
    Io {
        /// The banner name
        name: String,
        /// The underlying error
        source: io::Error,
    },
    /// The available banners could not be listed.
    #[error("failed to list banners in {}", .path.display())]
    List {
        /// The directory being listed
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },
}
