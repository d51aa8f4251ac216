//! SHA-256 digests over a file or a directory tree.

use crate::error::{ReloaderError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Byte written before and after each path when hashing a directory tree.
const DELIMITER: u8 = 0xff;

/// Fixed-length hash of the watch target at a point in time.
///
/// Only equality is meaningful; two digests are the same exactly when every
/// hashed byte (paths and contents) was the same.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for ContentDigest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self)
    }
}

/// Computes [`ContentDigest`]s for a watch target.
///
/// A file target hashes to the digest of its bytes. A directory target is
/// walked recursively in lexicographic order; every regular file contributes
/// its path relative to the root, framed by delimiter bytes, followed by its
/// contents. Renames, additions and removals therefore change the digest, and
/// file boundaries cannot be confused (`"ab" + ""` differs from `"a" + "b"`).
///
/// Symbolic links are followed: the root is resolved before walking, and each
/// entry is classified by what it points to. Anything that does not resolve to
/// a file or a directory is an error.
///
/// # Examples
///
/// ```rust,no_run
/// use config_reloader::digest::ContentDigester;
///
/// # fn example() -> config_reloader::error::Result<()> {
/// let digester = ContentDigester::new("/etc/prometheus");
/// let digest = digester.digest()?;
/// println!("current digest: {}", digest);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ContentDigester {
    target: PathBuf,
}

impl ContentDigester {
    /// Create a digester for the given file or directory.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Hash the current content of the target.
    ///
    /// # Errors
    ///
    /// Returns an error if any path cannot be resolved, opened, or read, or if
    /// an entry is neither a file nor a directory (e.g. a broken link).
    pub fn digest(&self) -> Result<ContentDigest> {
        let root = fs::canonicalize(&self.target)
            .map_err(|e| ReloaderError::digest(&self.target, e))?;
        let metadata = fs::metadata(&root).map_err(|e| ReloaderError::digest(&root, e))?;

        let mut hasher = Sha256::new();
        if metadata.is_file() {
            hash_contents(&mut hasher, &root)?;
        } else if metadata.is_dir() {
            hash_tree(&mut hasher, &root)?;
        } else {
            return Err(ReloaderError::UnsupportedEntry(root));
        }

        Ok(ContentDigest(hasher.finalize().into()))
    }
}

fn hash_tree(hasher: &mut Sha256, root: &Path) -> Result<()> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        let path = entry.path();

        // walkdir reports links unresolved
        let metadata = fs::metadata(path).map_err(|e| ReloaderError::digest(path, e))?;
        if metadata.is_dir() {
            continue;
        }
        if !metadata.is_file() {
            return Err(ReloaderError::UnsupportedEntry(path.to_path_buf()));
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        hasher.update([DELIMITER]);
        hasher.update(relative.as_os_str().as_encoded_bytes());
        hasher.update([DELIMITER]);
        hash_contents(hasher, path)?;
    }

    Ok(())
}

fn hash_contents(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| ReloaderError::digest(path, e))?;
    io::copy(&mut file, hasher).map_err(|e| ReloaderError::digest(path, e))?;
    Ok(())
}

fn walk_error(root: &Path, err: walkdir::Error) -> ReloaderError {
    let path = err.path().unwrap_or(root).to_path_buf();
    ReloaderError::digest(path, io::Error::from(err))
}
