//! Zip assembly of a rendered file set.
//!
//! The archive is byte-stable: entries are written in path order with a fixed
//! timestamp and fixed permissions, and every directory entry is emitted right
//! before its first child.

// Internal imports (std, crate)
use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::templates::RenderedFileSet;

// External imports (alphabetized)
use tempfile::NamedTempFile;
use zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

fn options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(mode)
}

/// Directory prefixes of a relative path, outermost first (`a/b/c.txt` -> `a/`, `a/b/`).
fn parent_dirs(path: &str) -> Vec<String> {
    let mut dirs = Vec::new();
    let mut end = 0;
    while let Some(pos) = path[end..].find('/') {
        end += pos + 1;
        dirs.push(path[..end].to_string());
    }
    dirs
}

/// Bundle the file set into an in-memory zip.
///
/// Nothing is returned on failure; a partially written buffer is dropped.
pub fn assemble(files: &RenderedFileSet) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut written_dirs = BTreeSet::new();

    for (path, contents) in files.iter() {
        for dir in parent_dirs(path) {
            if written_dirs.insert(dir.clone()) {
                writer.add_directory(dir, options(DIR_MODE))?;
            }
        }
        writer.start_file(path, options(FILE_MODE))?;
        writer
            .write_all(contents)
            .map_err(|e| Error::ArchiveWriteFailure(format!("{}: {}", path, e)))?;
    }

    let cursor = writer.finish()?;
    let bytes = cursor.into_inner();
    log::debug!(
        "Assembled archive: {} files, {} directories, {} bytes",
        files.len(),
        written_dirs.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Write archive bytes to `path` atomically.
///
/// The bytes go to a temporary file in the destination directory which is
/// renamed over `path` only once fully written.
pub fn write_archive(path: &Path, bytes: &[u8]) -> Result<()> {
    let failure = |e: std::io::Error| Error::ArchiveWriteFailure(format!("{}: {}", path.display(), e));

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(failure)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(failure)?;
    tmp.write_all(bytes).map_err(failure)?;
    tmp.as_file().sync_all().map_err(failure)?;
    tmp.persist(path).map_err(|e| failure(e.error))?;

    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn sample() -> RenderedFileSet {
        let mut files = RenderedFileSet::new();
        files.insert("pom.xml", b"<project/>\n".to_vec()).unwrap();
        files
            .insert("src/main/java/api/beer/model/Beer.java", b"class Beer {}\n".to_vec())
            .unwrap();
        files
            .insert("src/main/java/api/beer/rest/BeersResource.java", b"class R {}\n".to_vec())
            .unwrap();
        files
    }

    fn entries(bytes: &[u8]) -> Vec<(String, bool, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut contents = String::new();
            entry.read_to_string(&mut contents).unwrap();
            out.push((entry.name().to_string(), entry.is_dir(), contents));
        }
        out
    }

    #[test]
    fn test_parent_dirs() {
        assert_eq!(parent_dirs("a/b/c.txt"), vec!["a/", "a/b/"]);
        assert!(parent_dirs("pom.xml").is_empty());
    }

    #[test]
    fn test_directories_precede_children() {
        let bytes = assemble(&sample()).unwrap();
        let names: Vec<String> = entries(&bytes).into_iter().map(|(n, _, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "pom.xml",
                "src/",
                "src/main/",
                "src/main/java/",
                "src/main/java/api/",
                "src/main/java/api/beer/",
                "src/main/java/api/beer/model/",
                "src/main/java/api/beer/model/Beer.java",
                "src/main/java/api/beer/rest/",
                "src/main/java/api/beer/rest/BeersResource.java",
            ]
        );
    }

    #[test]
    fn test_round_trip_contents() {
        let files = sample();
        let bytes = assemble(&files).unwrap();
        for (name, is_dir, contents) in entries(&bytes) {
            assert!(!name.split('/').any(|s| s == ".."));
            if !is_dir {
                assert_eq!(contents.as_bytes(), files.get(&name).unwrap());
            }
        }
    }

    #[test]
    fn test_fixed_metadata() {
        let bytes = assemble(&sample()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_name("pom.xml").unwrap();
        assert_eq!(entry.unix_mode().map(|m| m & 0o777), Some(0o644));
        drop(entry);
        let dir = archive.by_name("src/").unwrap();
        assert_eq!(dir.unix_mode().map(|m| m & 0o777), Some(0o755));
    }

    #[test]
    fn test_assembly_is_byte_stable() {
        assert_eq!(assemble(&sample()).unwrap(), assemble(&sample()).unwrap());
    }

    #[test]
    fn test_empty_set() {
        let bytes = assemble(&RenderedFileSet::new()).unwrap();
        assert!(entries(&bytes).is_empty());
    }

    #[test]
    fn test_write_archive() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("nested").join("beer-api.zip");
        let bytes = assemble(&sample())?;
        write_archive(&target, &bytes)?;
        assert_eq!(std::fs::read(&target)?, bytes);

        // Overwrites in place
        write_archive(&target, b"x")?;
        assert_eq!(std::fs::read(&target)?, b"x");
        Ok(())
    }
}
