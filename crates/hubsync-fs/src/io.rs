//! Reading and writing tracked source files

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::{Error, NormalizedPath, Result};

/// Read a source file as text.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read a source file, treating a missing file as `None`.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    match read_text(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Replace a source file's content.
///
/// The content is staged in a temp file next to the target and renamed
/// over it, so a failed write leaves the previous content intact. An
/// existing target must be writable: it is opened for writing (without
/// truncation) before anything is staged, and its permissions carry over
/// to the replacement. Parent directories are not created: a file whose
/// directory has vanished is reported as an error rather than silently
/// recreated.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    let native_path = path.to_native();
    replace_with(&native_path, |file| file.write_all(content.as_bytes()))?;

    tracing::debug!(path = %path, bytes = content.len(), "wrote source file");
    Ok(())
}

fn replace_with<F>(native_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let permissions = match OpenOptions::new().write(true).open(native_path) {
        Ok(target) => Some(
            target
                .metadata()
                .map_err(|e| Error::io(native_path, e))?
                .permissions(),
        ),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(Error::io(native_path, e)),
    };

    let dir = match native_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::io(native_path, e))?;

    staged.as_file().lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })?;
    write(staged.as_file_mut()).map_err(|e| Error::io(staged.path(), e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(staged.path(), e))?;

    match permissions {
        Some(permissions) => staged
            .as_file()
            .set_permissions(permissions)
            .map_err(|e| Error::io(staged.path(), e))?,
        None => set_new_file_permissions(staged.as_file())
            .map_err(|e| Error::io(staged.path(), e))?,
    }

    staged
        .persist(native_path)
        .map_err(|e| Error::io(native_path, e.error))?;
    Ok(())
}

/// Temp files are private; a newly created source file should not be.
#[cfg(unix)]
fn set_new_file_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}

/// Canonicalize a directory without Windows verbatim prefixes.
///
/// Watchers report canonical paths, so roots must be canonical too
/// before event paths are made relative to them.
pub fn canonical_dir(path: &NormalizedPath) -> Result<NormalizedPath> {
    let native_path = path.to_native();
    dunce::canonicalize(&native_path)
        .map(NormalizedPath::from)
        .map_err(|e| Error::io(&native_path, e))
}
