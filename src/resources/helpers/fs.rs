//! File-system resource helpers.
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Permission bits for directories created on the way to a file (`rwxr-xr-x`).
pub const DIR_MODE: u32 = 0o755;

/// Permission bits for files written from inline `content` (`rw-------`).
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Create the parent directory of `path` (and any ancestors) if needed.
///
/// Returns the parent that was ensured, or `None` when `path` has no
/// parent component.
///
/// # Errors
///
/// Returns the I/O error from directory creation.
pub fn ensure_parent_dir(path: &Path) -> io::Result<Option<&Path>> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(None);
    };
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(parent)?;
    Ok(Some(parent))
}

/// Write `bytes` to `path`, creating it owner-read/write only.
///
/// Like `open(2)`, the mode only applies when the file is created; an
/// existing file keeps its permissions and is truncated.
///
/// # Errors
///
/// Returns the I/O error from opening or writing the file.
pub fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::io::Write as _;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PRIVATE_FILE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Create (or truncate) `path` with the platform's default permissions.
///
/// # Errors
///
/// Returns the I/O error from creating the file.
pub fn create_default(path: &Path) -> io::Result<File> {
    File::create(path)
}

/// Remove `path` if it exists.
///
/// # Errors
///
/// Returns any I/O error other than the file already being gone.
pub fn discard(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Set the permission bits of `path` to `mode`.
///
/// # Errors
///
/// Returns the I/O error from `chmod`; on non-Unix platforms this is an
/// `Unsupported` error.
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    {
        let _ = (path, mode);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "file modes are not supported on this platform",
        ))
    }
}
