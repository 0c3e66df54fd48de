//! Re-openable byte sources
//!
//! Archives keep only their index in memory. Each read opens a fresh handle on the underlying
//! source, reads the extent it needs and drops the handle again.

use std::{
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek},
    path::{Path, PathBuf},
    sync::Arc,
};

/// A source of bytes that can be opened any number of times
pub trait ByteSource {
    /// Reader handed out by [`ByteSource::open`]
    type Reader<'a>: Read + Seek
    where
        Self: 'a;

    /// Open a new, independently positioned reader over the source
    fn open(&self) -> io::Result<Self::Reader<'_>>;

    /// Human readable description used in log messages
    fn describe(&self) -> String;
}

impl ByteSource for PathBuf {
    type Reader<'a> = BufReader<File>;

    fn open(&self) -> io::Result<Self::Reader<'_>> {
        Ok(BufReader::new(File::open(self)?))
    }

    fn describe(&self) -> String {
        self.display().to_string()
    }
}

impl ByteSource for Vec<u8> {
    type Reader<'a> = Cursor<&'a [u8]>;

    fn open(&self) -> io::Result<Self::Reader<'_>> {
        Ok(Cursor::new(self.as_slice()))
    }

    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.len())
    }
}

impl ByteSource for Arc<[u8]> {
    type Reader<'a> = Cursor<&'a [u8]>;

    fn open(&self) -> io::Result<Self::Reader<'_>> {
        Ok(Cursor::new(self.as_ref()))
    }

    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.len())
    }
}

/// Resolve `name` inside `dir` ignoring the case of the file name
///
/// Game data is authored on a case-insensitive file system, so `Chitin.key` and `chitin.key`
/// refer to the same file.
pub fn find_case_insensitive(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.exists() {
        return Some(exact);
    }

    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(name))
        .map(|entry| entry.path())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::{
        io::{self, Read},
        sync::Arc,
    };

    use super::ByteSource;

    #[test]
    fn every_open_starts_at_zero() -> io::Result<()> {
        let source: Arc<[u8]> = Arc::from(vec![1u8, 2, 3]);

        let mut first = source.open()?;
        let mut byte = [0u8; 1];
        first.read_exact(&mut byte)?;
        assert_eq!(byte, [1]);

        let mut second = source.open()?;
        second.read_exact(&mut byte)?;
        assert_eq!(byte, [1]);

        Ok(())
    }
}
