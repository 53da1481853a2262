use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: Filesystem helpers shared across the pipeline

// @struct: Namespace for file and directory operations
pub struct FileManager;

impl FileManager {
    // @checks: Path points at an existing regular file
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Path points at an existing directory
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: The directory chain, tolerating directories already there
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {:?}", path))
    }

    /// Derive an output subdirectory name from a transcript filename.
    ///
    /// Strips the extension, trims surrounding whitespace, lowercases and
    /// replaces spaces with underscores: `"Goudron Bitimeux.TXT"` becomes
    /// `"goudron_bitimeux"`.
    pub fn normalize_file_stem(filename: &str) -> String {
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.to_string());
        stem.trim().to_lowercase().replace(' ', "_")
    }

    /// List the files of a directory whose name ends with the given extension.
    ///
    /// The match is on the file name, case-insensitive, and only the top level
    /// of the directory is considered: transcripts are expected flat, not
    /// nested. Results are sorted by file name so processing order is stable
    /// across platforms.
    pub fn list_files_with_extension<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let suffix = if extension.starts_with('.') {
            extension.to_lowercase()
        } else {
            format!(".{}", extension.to_lowercase())
        };

        let mut matches = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read a directory entry")?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if name.ends_with(&suffix) {
                matches.push(entry.into_path());
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Read a whole file into a UTF-8 string.
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating missing parent directories.
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append one timestamped line to a log file, creating it on first use.
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {:?} for appending", path.as_ref()))?;

        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{}] {}", stamp, content)
            .with_context(|| format!("Failed to append to {:?}", path.as_ref()))?;

        Ok(())
    }
}
