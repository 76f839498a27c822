use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::SCRIPT_EXTENSION;
use crate::error::AssemblyError;

/// Collect every script file below `root`, in a stable order.
///
/// Directory entries are visited sorted by file name, so the result does not
/// depend on the order the filesystem enumerates them in.
pub fn discover_scripts(root: &Path) -> Result<Vec<PathBuf>, AssemblyError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| AssemblyError::Scan {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_file() && is_script(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Discovered {} script files under {}", files.len(), root.display());
    Ok(files)
}

fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(SCRIPT_EXTENSION))
        .unwrap_or(false)
}

/// Move `entry` to the front, keeping the relative order of everything else.
///
/// The caller has already verified that `entry` exists. On a case-insensitive
/// filesystem the scan may report it under a different spelling (`Main.gsc`),
/// so an exact match is preferred and a sibling whose name differs only in
/// ASCII case is accepted otherwise. If the scan missed it anyway it is
/// inserted at the front rather than left out.
pub fn entry_first(mut files: Vec<PathBuf>, entry: &Path) -> Vec<PathBuf> {
    let position = files
        .iter()
        .position(|p| p == entry)
        .or_else(|| files.iter().position(|p| is_entry_spelling(p, entry)));

    match position {
        Some(index) => {
            let entry = files.remove(index);
            files.insert(0, entry);
        }
        None => {
            warn!(
                "Entry file {} was not found by the scan, placing it first",
                entry.display()
            );
            files.insert(0, entry.to_path_buf());
        }
    }
    files
}

fn is_entry_spelling(path: &Path, entry: &Path) -> bool {
    if path.parent() != entry.parent() {
        return false;
    }
    match (
        path.file_name().and_then(|n| n.to_str()),
        entry.file_name().and_then(|n| n.to_str()),
    ) {
        (Some(name), Some(expected)) => name.eq_ignore_ascii_case(expected),
        _ => false,
    }
}
