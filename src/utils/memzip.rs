use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{ClassifierError, Result};

/// upper bound for the buffer reserved up front from a member's declared size
const MAX_SIZE_HINT: u64 = 1 << 20;

/// Initial buffer size for a member; the header value is not trusted beyond `MAX_SIZE_HINT`
#[inline]
fn size_hint(declared: u64) -> usize {
    declared.min(MAX_SIZE_HINT) as usize
}

/// Zip archive fully extracted into memory.
///
/// Every non-directory member is read once in `open`; afterwards the map is
/// never mutated, so shared reads need no lock.
#[derive(Debug, Clone)]
pub struct MemZip {
    path: PathBuf,
    files: HashMap<String, Box<[u8]>>,
}

impl MemZip {
    /// Load the archive at `path` into memory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let abs = std::path::absolute(path)?;
        let file = File::open(&abs)?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Load an archive from any seekable reader.
    /// `path` is only used to name the archive in errors.
    pub fn from_reader<R, P>(reader: R, path: P) -> Result<Self>
    where
        R: Read + Seek,
        P: Into<PathBuf>,
    {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut files = HashMap::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut bytes = Vec::with_capacity(size_hint(entry.size()));
            entry.read_to_end(&mut bytes)?;
            files.insert(entry.name().to_string(), bytes.into_boxed_slice());
        }
        let path = path.into();
        debug!("loaded {} members from {}", files.len(), path.display());
        Ok(Self { path, files })
    }

    /// Bytes of the member `name`
    pub fn get(&self, name: &str) -> Result<&[u8]> {
        self.files
            .get(name)
            .map(|bytes| &bytes[..])
            .ok_or_else(|| ClassifierError::ResourceNotFound {
                archive: self.path.clone(),
                path: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// member names, unordered
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8])]) -> Result<()> {
        let file = File::create(path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in entries {
            zip.start_file(*name, options)?;
            zip.write_all(data)?;
        }
        zip.finish()?;
        Ok(())
    }

    #[test]
    fn open_reads_members_and_skips_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.add_directory("sub/", options).unwrap();
        zip.start_file("sub/a.txt", options).unwrap();
        zip.write_all(b"hello").unwrap();
        zip.finish().unwrap();

        let mz = MemZip::open(&path).unwrap();
        assert_eq!(mz.len(), 1);
        assert_eq!(mz.get("sub/a.txt").unwrap(), b"hello");
        assert!(!mz.contains("sub/"));
    }

    #[test]
    fn missing_member_names_archive_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        write_zip(&path, &[("name.map", b"spam:1\n")]).unwrap();

        let mz = MemZip::open(&path).unwrap();
        match mz.get("train.date.model") {
            Err(ClassifierError::ResourceNotFound { archive, path: member }) => {
                assert_eq!(archive, path);
                assert_eq!(member, "train.date.model");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn declared_size_only_bounds_the_hint() {
        assert_eq!(size_hint(5), 5);
        assert_eq!(size_hint(u64::MAX), MAX_SIZE_HINT as usize);
    }

    #[test]
    fn oversized_header_does_not_reserve_it() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip.start_file("a.txt", options).unwrap();
        zip.write_all(b"hello").unwrap();
        let mut bytes = zip.finish().unwrap().into_inner();

        // claim ~4 GiB uncompressed in both the local and the central header
        let claimed = 0xFFFF_FFF0u32.to_le_bytes();
        for (signature, offset) in [([0x50, 0x4b, 0x03, 0x04], 22), ([0x50, 0x4b, 0x01, 0x02], 24)] {
            let at = bytes.windows(4).position(|w| w == signature).unwrap();
            bytes[at + offset..at + offset + 4].copy_from_slice(&claimed);
        }

        if let Ok(mz) = MemZip::from_reader(Cursor::new(bytes), "crafted.zip") {
            assert_eq!(mz.get("a.txt").unwrap(), b"hello");
        }
    }

    #[test]
    fn missing_archive_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MemZip::open(dir.path().join("nope.zip")).unwrap_err();
        assert!(matches!(err, ClassifierError::Io(_)));
    }
}
