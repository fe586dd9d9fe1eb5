use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

#[derive(Debug, Clone)]
enum PackageEntry {
    Directory(String),
    File(String, Vec<u8>),
}

/// Builder for writing zip deployment packages.
///
/// Entries are written in the order they were added.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    entries: Vec<PackageEntry>,
    compression: CompressionMethod,
}

impl Default for PackageBuilder {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            compression: CompressionMethod::Stored,
        }
    }
}

impl PackageBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit directory entry (e.g. "Content/").
    pub fn with_directory(mut self, name: impl Into<String>) -> Self {
        self.entries.push(PackageEntry::Directory(name.into()));
        self
    }

    /// Add a file entry with the given contents.
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.entries
            .push(PackageEntry::File(name.into(), contents.into()));
        self
    }

    /// Set the compression method used for file entries.
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    /// Write the package to the specified path.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<()> = FileOptions::default().compression_method(self.compression);

        for entry in &self.entries {
            match entry {
                PackageEntry::Directory(name) => zip.add_directory(name.as_str(), options)?,
                PackageEntry::File(name, contents) => {
                    zip.start_file(name.as_str(), options)?;
                    zip.write_all(contents)?;
                }
            }
        }

        zip.finish()?;

        Ok(path.to_path_buf())
    }
}
