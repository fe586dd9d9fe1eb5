use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the web configuration file, matched case-insensitively.
pub const CONFIG_FILE_NAME: &str = "Web.config";

/// Find the `Web.config` inside an extracted package.
///
/// The whole tree is scanned, `root` included, one depth at a time with
/// entries sorted by name. The shallowest match wins; ties at the same
/// depth go to the first path in that order. Symlinked directories are not
/// followed.
pub fn locate_config(root: &Path) -> Result<PathBuf> {
    let mut level = vec![root.to_path_buf()];

    while !level.is_empty() {
        let mut next = Vec::new();
        for dir in &level {
            for (path, is_dir) in sorted_entries(dir)? {
                if is_dir {
                    next.push(path);
                } else if is_config_file(&path) {
                    return Ok(path);
                }
            }
        }
        level = next;
    }

    Err(Error::ConfigNotFound(root.to_path_buf()))
}

fn is_config_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.eq_ignore_ascii_case(CONFIG_FILE_NAME))
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<(PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            continue;
        }
        entries.push((entry.path(), file_type.is_dir()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
