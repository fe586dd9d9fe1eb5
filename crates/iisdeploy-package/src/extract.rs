use crate::{Error, Result};
use log::info;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::ZipArchive;

/// Receives one message per processed package entry during verbose extraction.
pub trait ProgressSink {
    fn output(&self, message: &str);
}

impl<F: Fn(&str)> ProgressSink for F {
    fn output(&self, message: &str) {
        self(message)
    }
}

/// Progress sink that forwards entry names to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn output(&self, message: &str) {
        info!("extracting {}", message);
    }
}

/// Extract every entry of the zip at `package` into `dest`.
///
/// When `progress` is given it receives each entry name in archive order.
/// Returns the number of entries processed.
pub fn extract_archive(
    package: &Path,
    dest: &Path,
    progress: Option<&dyn ProgressSink>,
) -> Result<usize> {
    let file = File::open(package)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| Error::UnsafeEntry(name.clone()))?;
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        }

        if let Some(progress) = progress {
            progress.output(&name);
        }
    }

    Ok(archive.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PackageBuilder;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[test]
    fn test_extract_writes_nested_files() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("site.zip");
        PackageBuilder::new()
            .with_directory("Content/")
            .with_file("Content/bin/site.dll", b"MZ".to_vec())
            .with_file("parameters.xml", b"<parameters />".to_vec())
            .write_to(&package)
            .unwrap();

        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let count = extract_archive(&package, &out, None).unwrap();

        assert_eq!(count, 3);
        assert!(out.join("Content").is_dir());
        assert_eq!(fs::read(out.join("Content/bin/site.dll")).unwrap(), b"MZ");
        assert!(out.join("parameters.xml").is_file());
    }

    #[test]
    fn test_extract_reports_each_entry() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("site.zip");
        PackageBuilder::new()
            .with_file("a.txt", b"a".to_vec())
            .with_file("b/b.txt", b"b".to_vec())
            .write_to(&package)
            .unwrap();

        let seen = Mutex::new(Vec::new());
        let sink = |name: &str| seen.lock().unwrap().push(name.to_string());
        extract_archive(&package, dir.path(), Some(&sink as &dyn ProgressSink)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["a.txt", "b/b.txt"]);
    }

    #[test]
    fn test_extract_rejects_escaping_entries() {
        let dir = tempdir().unwrap();
        let package = dir.path().join("evil.zip");
        PackageBuilder::new()
            .with_file("../outside.txt", b"x".to_vec())
            .write_to(&package)
            .unwrap();

        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let err = extract_archive(&package, &out, None).unwrap_err();
        assert!(matches!(err, Error::UnsafeEntry(name) if name == "../outside.txt"));
        assert!(!dir.path().join("outside.txt").exists());
    }

    #[test]
    fn test_extract_missing_package_is_io_error() {
        let dir = tempdir().unwrap();
        let err = extract_archive(&dir.path().join("nope.zip"), dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
