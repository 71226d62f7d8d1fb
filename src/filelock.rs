use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Result;
use file_lock::{FileLock, FileOptions};

/// Reads the whole file under a lock, `None` if the file does not exist.
pub fn read_file_lock(path: &Path) -> Result<Option<Vec<u8>>> {
    let lock_opts = FileOptions::new().read(true);
    let mut file = match FileLock::lock(path, true, lock_opts) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let mut data = Vec::new();
    file.file.read_to_end(&mut data)?;
    Ok(Some(data))
}

pub fn write_file_lock(path: &Path, data: &[u8]) -> Result<()> {
    let lock_opts = FileOptions::new().write(true).truncate(true).create(true);
    let mut file = FileLock::lock(path, true, lock_opts)?;
    file.file.write_all(data)?;
    Ok(())
}

/// Removes the file once no one else is writing it. A missing file is not
/// an error.
pub fn remove_file_lock(path: &Path) -> Result<()> {
    let lock_opts = FileOptions::new().write(true);
    match FileLock::lock(path, true, lock_opts) {
        Ok(lock) => drop(lock),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    }

    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
