//! File-level operations used by the sync planner.
//!
//! This module provides the destination directory check, the byte-level
//! up-to-date comparison and an atomic single file copy (temp file in the
//! destination directory + rename).

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Chunk size for content comparison.
const COMPARE_CHUNK: usize = 64 * 1024;

// =============================================================================
// Destination checks
// =============================================================================

/// Check that the directory that will hold `output` exists.
///
/// Walks upward from the parent of `output` until an existing directory is
/// found. Nothing is created.
///
/// # Errors
///
/// Returns [`Error::MissingParent`] naming the topmost missing directory
/// and the nearest existing ancestor.
pub fn check_parent(output: &Path) -> Result<()> {
    let absolute = std::path::absolute(output).map_err(|e| Error::io(output, e))?;
    let Some(parent) = absolute.parent() else {
        return Ok(());
    };

    let mut missing = None;
    let mut current = parent;
    while !current.exists() {
        missing = Some(current);
        match current.parent() {
            Some(up) => current = up,
            None => break,
        }
    }

    match missing {
        None => Ok(()),
        Some(last) => Err(Error::MissingParent {
            segment: last
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ancestor: current.to_path_buf(),
        }),
    }
}

// =============================================================================
// Content comparison
// =============================================================================

/// Whether `output` exists and holds exactly the bytes of `input`.
///
/// Sizes are compared first so differing files are usually rejected
/// without being read.
///
/// # Errors
///
/// Returns [`Error::Io`] if either file cannot be inspected or read.
pub fn up_to_date(input: &Path, output: &Path) -> Result<bool> {
    let out_meta = match fs::metadata(output) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io(output, e)),
    };
    let in_meta = fs::metadata(input).map_err(|e| Error::io(input, e))?;

    if !out_meta.is_file() || !in_meta.is_file() || out_meta.len() != in_meta.len() {
        return Ok(false);
    }

    let mut a = File::open(input).map_err(|e| Error::io(input, e))?;
    let mut b = File::open(output).map_err(|e| Error::io(output, e))?;
    let mut buf_a = vec![0u8; COMPARE_CHUNK];
    let mut buf_b = vec![0u8; COMPARE_CHUNK];

    loop {
        let n = read_full(&mut a, &mut buf_a).map_err(|e| Error::io(input, e))?;
        let m = read_full(&mut b, &mut buf_b).map_err(|e| Error::io(output, e))?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; returns the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

// =============================================================================
// Copy
// =============================================================================

/// Copy `src` over `dst` atomically.
///
/// The contents are written to a temporary file next to `dst`, optionally
/// synced, then renamed over `dst`. An existing `dst` is replaced; a reader
/// never observes a partially written file.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns an error if:
/// - Source is a directory ([`Error::IsADirectory`])
/// - IO operations fail ([`Error::Io`])
/// - Temp file creation fails ([`Error::TempFile`])
/// - Atomic rename fails ([`Error::Persist`])
pub fn copy_file(src: &Path, dst: &Path, fsync: bool) -> Result<u64> {
    let src_meta = fs::metadata(src).map_err(|e| Error::io(src, e))?;
    if src_meta.is_dir() {
        return Err(Error::IsADirectory(src.to_path_buf()));
    }

    let src_file = File::open(src).map_err(|e| Error::io(src, e))?;

    let dst_parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp_file = new_temp_file(dst_parent)?;

    // Zero-copy on Linux
    let bytes_copied = copy_file_contents(&src_file, temp_file.as_file(), src_meta.len())
        .map_err(|e| Error::io(dst, e))?;

    if fsync {
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| Error::io(dst, e))?;
    }

    temp_file.persist(dst).map_err(|e| Error::Persist {
        path: dst.to_path_buf(),
        source: e.error,
    })?;

    Ok(bytes_copied)
}

/// Temp file honoring the umask, like a freshly created destination would.
fn new_temp_file(dir: &Path) -> Result<tempfile::NamedTempFile> {
    let to_error = |source| Error::TempFile {
        path: dir.to_path_buf(),
        source,
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tempfile::Builder::new()
            .permissions(fs::Permissions::from_mode(0o666))
            .tempfile_in(dir)
            .map_err(to_error)
    }
    #[cfg(not(unix))]
    {
        tempfile::NamedTempFile::new_in(dir).map_err(to_error)
    }
}

/// Efficiently copy file contents using the best available method.
///
/// On Linux 4.5+, uses `copy_file_range` for zero-copy kernel-to-kernel transfer.
/// Falls back to `std::io::copy` on other platforms or on error.
fn copy_file_contents(src: &File, dst: &File, len: u64) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        copy_file_range_all(src, dst, len)
    }
    #[cfg(not(target_os = "linux"))]
    {
        use std::io::BufReader;
        let _ = len;
        io::copy(&mut BufReader::new(src), &mut &*dst)
    }
}

/// Linux-specific: copy using copy_file_range(2).
///
/// Falls back to io::copy if the syscall is refused before any byte moved
/// (cross-filesystem, old kernel, unsupported filesystem).
#[cfg(target_os = "linux")]
fn copy_file_range_all(src: &File, dst: &File, len: u64) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    let src_fd = src.as_raw_fd();
    let dst_fd = dst.as_raw_fd();
    let mut remaining = len;
    let mut copied: u64 = 0;

    while remaining > 0 {
        // 128MB chunks
        let chunk_size = remaining.min(128 * 1024 * 1024) as usize;

        // SAFETY: valid file descriptors and null offsets (use current position)
        let result = unsafe {
            libc::copy_file_range(
                src_fd,
                std::ptr::null_mut(),
                dst_fd,
                std::ptr::null_mut(),
                chunk_size,
                0,
            )
        };

        if result < 0 {
            let err = io::Error::last_os_error();
            if copied == 0
                && matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV)
                        | Some(libc::ENOSYS)
                        | Some(libc::EINVAL)
                        | Some(libc::EOPNOTSUPP)
                )
            {
                use std::io::BufReader;
                return io::copy(&mut BufReader::new(src), &mut &*dst);
            }
            return Err(err);
        }

        if result == 0 {
            // Source shrank while copying
            break;
        }

        let bytes_copied = result as u64;
        copied += bytes_copied;
        remaining = remaining.saturating_sub(bytes_copied);
    }

    Ok(copied)
}

// =============================================================================
// Tests
// =============================================================================
