//! File-based save/load built on top of the binary frame.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use super::error::{PersistenceError, Result};
use super::frame::{read_frame, write_frame};
use super::record::PersistedCommand;

/// Extension used to filter selectable files under the user-data directory.
pub const FILE_EXTENSION: &str = "scad";

/// Save `commands` to `path`, overwriting any existing file.
pub fn save(path: impl AsRef<Path>, commands: &[PersistedCommand]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_frame(&mut writer, commands)
}

/// Load the command list from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<PersistedCommand>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PersistenceError::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_frame(&mut reader)
}

/// List the `.scad` files directly under `directory`, for OPEN's enumerated
/// file-list requirement. Entries are bare file names, sorted, with no path
/// prefix and no extension, matching what a filename-kind requirement
/// expects back from the user.
pub fn list_circuit_files(directory: impl AsRef<Path>) -> Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(directory.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    Ok(names)
}

/// Build the full path for `filename` under the user-data `directory`,
/// appending [`FILE_EXTENSION`] if the caller did not already supply one.
pub fn circuit_path(directory: impl AsRef<Path>, filename: &str) -> PathBuf {
    let mut path = directory.as_ref().join(filename);
    if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
        path.set_extension(FILE_EXTENSION);
    }
    path
}
