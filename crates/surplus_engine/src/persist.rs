use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{0:?} has no file name")]
    NoFileName(PathBuf),
    #[error("{0:?} exists and is not a directory")]
    NotADirectory(PathBuf),
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Creates `dir` and its parents unless it already is a directory.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| PersistError::io(dir, err))
        }
        Err(err) => Err(PersistError::io(dir, err)),
    }
}

/// Replaces `target` with `content` so that readers see either the old or
/// the new file, never a torn one. The temp file lives next to the target
/// because rename is only atomic within one filesystem.
pub fn write_atomically(target: &Path, content: &str) -> Result<(), PersistError> {
    if target.file_name().is_none() {
        return Err(PersistError::NoFileName(target.to_path_buf()));
    }
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| PersistError::io(dir, err))?;
    let synced = tmp
        .write_all(content.as_bytes())
        .and_then(|()| tmp.as_file_mut().sync_all());
    synced.map_err(|err| PersistError::io(tmp.path(), err))?;
    tmp.persist(target)
        .map_err(|err| PersistError::io(target, err.error))?;
    Ok(())
}
