use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

// @module: ZIP archiving of the output tree

// @struct: Archive creation utility
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    /// Zip a directory tree into the given archive path.
    ///
    /// Entry names are the paths relative to `source_dir`, with forward
    /// slashes. Directories themselves are not stored, and files already
    /// ending in `.zip` are skipped so that an archive placed inside the
    /// tree being walked never swallows itself or a prior day's archive.
    ///
    /// Returns the number of entries written.
    pub fn create_archive(source_dir: &Path, archive_path: &Path) -> Result<usize> {
        let file = File::create(archive_path)
            .with_context(|| format!("Failed to create archive file: {:?}", archive_path))?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut entry_count = 0;
        for entry in WalkDir::new(source_dir) {
            let entry = entry.context("Failed to walk the output tree")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().ends_with(".zip") {
                continue;
            }

            let relative = path
                .strip_prefix(source_dir)
                .with_context(|| format!("Entry outside archive root: {:?}", path))?;
            let entry_name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            zip.start_file(entry_name, options)
                .with_context(|| format!("Failed to add archive entry for {:?}", relative))?;
            let mut input = File::open(path)
                .with_context(|| format!("Failed to open file for archiving: {:?}", path))?;
            io::copy(&mut input, &mut zip)
                .with_context(|| format!("Failed to compress {:?}", path))?;
            entry_count += 1;
        }

        zip.finish().context("Failed to finalize archive")?;
        Ok(entry_count)
    }
}
