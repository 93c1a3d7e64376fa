//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Map an `io::Error` from a text read to the matching error code.
///
/// `InvalidData` is what `read_to_string` reports for non-UTF-8 content,
/// so it becomes a decode failure; anything else is an IO error.
pub fn map_read_error(err: io::Error, path: &Path, operation: &str) -> Error {
    if err.kind() == io::ErrorKind::InvalidData {
        Error::file_decode_failed(path.display().to_string(), err.to_string())
    } else {
        Error::internal_io(err.to_string(), Some(operation.to_string()))
    }
}

/// Read file contents with standardized error handling.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| map_read_error(e, path, operation))
}

/// Read the whole of an open handle as UTF-8 text.
pub fn read_handle(file: &mut File, path: &Path, operation: &str) -> Result<String> {
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| map_read_error(e, path, operation))?;
    Ok(text)
}

/// Replace the whole content of an open handle.
///
/// Seeks to the start, writes `content`, then truncates to its length so no
/// bytes from a longer previous version survive.
pub fn overwrite_handle(file: &mut File, content: &str, operation: &str) -> Result<()> {
    let io_err = |e: io::Error| Error::internal_io(e.to_string(), Some(operation.to_string()));

    file.seek(SeekFrom::Start(0)).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.set_len(content.len() as u64).map_err(io_err)?;
    file.flush().map_err(io_err)?;

    Ok(())
}
