//! Assertions over archive entries
//!
//! Only entry names are inspected; contents are never read.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::common::{Error, Result};

/// Open a build output as a zip archive
pub fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    Ok(ZipArchive::new(file)?)
}

/// Entry names in archive order
pub fn entry_names<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    archive.file_names().map(|name| name.to_string()).collect()
}

/// Fail with the first of `entries` the archive does not contain
pub fn assert_contains<R, S>(archive: &ZipArchive<R>, entries: &[S]) -> Result<()>
where
    R: Read + Seek,
    S: AsRef<str>,
{
    for entry in entries {
        let entry = entry.as_ref();
        if archive.index_for_name(entry).is_none() {
            return Err(Error::MissingEntry {
                entry: entry.to_string(),
            });
        }
    }
    Ok(())
}

/// Fail with the first of `entries` the archive does contain
pub fn assert_does_not_contain<R, S>(archive: &ZipArchive<R>, entries: &[S]) -> Result<()>
where
    R: Read + Seek,
    S: AsRef<str>,
{
    let present: HashSet<&str> = archive.file_names().collect();
    for entry in entries {
        let entry = entry.as_ref();
        if present.contains(entry) {
            return Err(Error::UnexpectedEntry {
                entry: entry.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::unstable::write::FileOptionsExt;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive_with(entries: &[&str]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in entries {
            writer.start_file(*entry, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"x").unwrap();
        }
        let cursor = writer.finish().unwrap();
        ZipArchive::new(cursor).unwrap()
    }

    #[test]
    fn test_contains_all_present() {
        let archive = archive_with(&["A", "B"]);
        assert!(assert_contains(&archive, &["A", "B"]).is_ok());
    }

    #[test]
    fn test_contains_reports_first_missing() {
        let archive = archive_with(&["A", "B"]);
        let err = assert_contains(&archive, &["A", "B", "C", "D"]).unwrap_err();
        assert!(matches!(err, Error::MissingEntry { ref entry } if entry == "C"));
        assert_eq!(err.to_string(), "jar does not contain file [C]");
    }

    #[test]
    fn test_contains_entry_that_cannot_be_opened() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().with_deprecated_encryption(b"hunter2");
        writer.start_file("secret.txt", options).unwrap();
        writer.write_all(b"classified").unwrap();
        let mut archive = ZipArchive::new(writer.finish().unwrap()).unwrap();
        assert!(archive.by_name("secret.txt").is_err());

        assert!(assert_contains(&archive, &["secret.txt"]).is_ok());
        let err = assert_does_not_contain(&archive, &["secret.txt"]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEntry { ref entry } if entry == "secret.txt"));
    }

    #[test]
    fn test_does_not_contain_reports_present_entry() {
        let archive = archive_with(&["A", "B"]);
        let err = assert_does_not_contain(&archive, &["B", "C"]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEntry { ref entry } if entry == "B"));
    }

    #[test]
    fn test_does_not_contain_passes_for_absent_entries() {
        let archive = archive_with(&["META-INF/MANIFEST.MF"]);
        assert!(assert_does_not_contain(&archive, &["src/AClass.class"]).is_ok());
    }

    #[test]
    fn test_entry_names_lists_every_entry() {
        let archive = archive_with(&["a/C.class", "META-INF/MANIFEST.MF", "a/B.class"]);
        let mut names = entry_names(&archive);
        names.sort();
        assert_eq!(names, vec!["META-INF/MANIFEST.MF", "a/B.class", "a/C.class"]);
    }

    #[test]
    fn test_open_archive_missing_file() {
        let err = open_archive(Path::new("/nonexistent/app.jar")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_open_archive_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.jar");
        std::fs::write(&path, b"not a zip").unwrap();
        let err = open_archive(&path).unwrap_err();
        assert!(matches!(err, Error::Archive(_)));
    }
}
