//! Offset driven reading helpers shared by every decoder

use byteorder::{LittleEndian, ReadBytesExt};
use glam::{Vec2, Vec3};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use tracing::debug;

/// Trim a fixed-length byte region at its first null byte
pub fn trim_nul(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Extension methods for seekable readers
///
/// ```
/// use aurora_common::cursor::SeekExt;
/// use byteorder::{LittleEndian, ReadBytesExt};
/// use std::io::Cursor;
///
/// let mut reader = Cursor::new(vec![0x01, 0x00, 0x2A, 0x00]);
/// let value = reader.peek_at(2, |r| r.read_u16::<LittleEndian>())?;
///
/// assert_eq!(value, 42);
/// assert_eq!(reader.position(), 0);
/// # Ok::<(), std::io::Error>(())
/// ```
pub trait SeekExt: Read + Seek {
    /// Run `f` with the reader positioned at `pos`, then return to the previous position.
    ///
    /// The saved position is restored whether `f` succeeds or fails.
    fn peek_at<T, E, F>(&mut self, pos: u64, f: F) -> Result<T, E>
    where
        E: From<io::Error>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let saved = self.stream_position()?;
        self.seek(SeekFrom::Start(pos))?;
        let result = f(self);
        let restored = self.seek(SeekFrom::Start(saved));
        let value = result?;
        restored?;
        Ok(value)
    }

    /// Bytes left between the current position and the end of the stream
    fn remaining(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(end.saturating_sub(pos))
    }

    /// Fail with [`ErrorKind::UnexpectedEof`] unless `len` more bytes can be read
    fn ensure_remaining(&mut self, len: u64) -> io::Result<()> {
        let remaining = self.remaining()?;
        if len > remaining {
            debug!(len, remaining, "read would pass the end of the stream");
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("{len} bytes requested, {remaining} left"),
            ));
        }
        Ok(())
    }

    /// Capacity to reserve for `count` records of `record_size` bytes
    ///
    /// Counts come from the file itself, so they are capped by what the rest of the stream can hold.
    fn capacity_for(&mut self, count: u64, record_size: u64) -> io::Result<usize> {
        let fits = self.remaining()? / record_size.max(1);
        Ok(usize::try_from(count.min(fits)).unwrap_or(usize::MAX))
    }

    /// Skip `count` bytes forward
    fn skip(&mut self, count: i64) -> io::Result<()> {
        self.seek(SeekFrom::Current(count)).map(|_| ())
    }

    /// Read exactly `len` bytes
    fn read_bytes(&mut self, len: usize) -> io::Result<Vec<u8>> {
        self.ensure_remaining(len as u64)?;
        let mut buffer = vec![0u8; len];
        self.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a fixed-length string field, trimmed at the first null byte
    fn read_fixed_str(&mut self, len: usize) -> io::Result<String> {
        Ok(trim_nul(&self.read_bytes(len)?))
    }

    /// Read bytes up to and excluding the next null byte
    fn read_cstring(&mut self) -> io::Result<String> {
        let mut raw = Vec::new();
        loop {
            let byte = self.read_u8()?;
            if byte == b'\0' {
                break;
            }
            raw.push(byte);
        }
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Read three floats without any axis conversion
    fn read_vec3(&mut self) -> io::Result<Vec3> {
        let x = self.read_f32::<LittleEndian>()?;
        let y = self.read_f32::<LittleEndian>()?;
        let z = self.read_f32::<LittleEndian>()?;
        Ok(Vec3::new(x, y, z))
    }

    /// Read two floats
    fn read_vec2(&mut self) -> io::Result<Vec2> {
        let x = self.read_f32::<LittleEndian>()?;
        let y = self.read_f32::<LittleEndian>()?;
        Ok(Vec2::new(x, y))
    }

    /// Read `count` consecutive floats
    fn read_f32_array(&mut self, count: usize) -> io::Result<Vec<f32>> {
        self.ensure_remaining((count as u64).saturating_mul(4))?;
        let mut values = vec![0f32; count];
        self.read_f32_into::<LittleEndian>(&mut values)?;
        Ok(values)
    }

    /// Read `count` consecutive 32-bit unsigned integers
    fn read_u32_array(&mut self, count: usize) -> io::Result<Vec<u32>> {
        self.ensure_remaining((count as u64).saturating_mul(4))?;
        let mut values = vec![0u32; count];
        self.read_u32_into::<LittleEndian>(&mut values)?;
        Ok(values)
    }
}

impl<R: Read + Seek + ?Sized> SeekExt for R {}

#[cfg(test)]
mod test {
    use byteorder::{LittleEndian, ReadBytesExt};
    use glam::Vec3;
    use pretty_assertions::assert_eq;
    use std::io::{self, Cursor, ErrorKind};
    use tracing_test::traced_test;

    use super::{trim_nul, SeekExt};

    #[test]
    fn peek_restores_position() -> io::Result<()> {
        #[rustfmt::skip]
        let mut reader = Cursor::new(vec![
            0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
        ]);

        reader.set_position(1);
        let peeked = reader.peek_at(4, |r| r.read_u32::<LittleEndian>())?;
        assert_eq!(peeked, 2);
        assert_eq!(reader.position(), 1);

        Ok(())
    }

    #[test]
    fn peek_restores_position_on_error() {
        let mut reader = Cursor::new(vec![0x01, 0x02]);
        reader.set_position(1);

        let result: io::Result<u32> = reader.peek_at(0, |r| r.read_u32::<LittleEndian>());
        assert_eq!(result.map_err(|e| e.kind()), Err(ErrorKind::UnexpectedEof));
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn fixed_strings_stop_at_null() -> io::Result<()> {
        let mut reader = Cursor::new(b"root\0junk\0\0\0tail".to_vec());
        assert_eq!(reader.read_fixed_str(12)?, "root");
        assert_eq!(reader.position(), 12);
        assert_eq!(trim_nul(b"nonull"), "nonull");
        Ok(())
    }

    #[test]
    fn cstring_requires_terminator() -> io::Result<()> {
        let mut reader = Cursor::new(b"abc\0de".to_vec());
        assert_eq!(reader.read_cstring()?, "abc");
        assert!(reader.read_cstring().is_err());
        Ok(())
    }

    #[test]
    fn read_vectors() -> io::Result<()> {
        #[rustfmt::skip]
        let mut reader = Cursor::new(vec![
            0x00, 0x00, 0x80, 0x3F,
            0x00, 0x00, 0x00, 0x40,
            0x00, 0x00, 0x40, 0x40,
        ]);
        assert_eq!(reader.read_vec3()?, Vec3::new(1.0, 2.0, 3.0));
        Ok(())
    }

    #[traced_test]
    #[test]
    fn oversized_reads_fail_before_allocating() {
        let mut reader = Cursor::new(vec![0u8; 8]);
        reader.set_position(4);

        let bytes = reader.read_bytes(usize::MAX).map_err(|e| e.kind());
        assert_eq!(bytes, Err(ErrorKind::UnexpectedEof));
        let words = reader.read_u32_array(0xFFFF_FFFF).map_err(|e| e.kind());
        assert_eq!(words, Err(ErrorKind::UnexpectedEof));
        let floats = reader.read_f32_array(2).map_err(|e| e.kind());
        assert_eq!(floats, Err(ErrorKind::UnexpectedEof));

        assert_eq!(reader.position(), 4);
        assert!(logs_contain("read would pass the end of the stream"));
    }

    #[test]
    fn capacity_is_limited_by_the_stream() -> io::Result<()> {
        let mut reader = Cursor::new(vec![0u8; 40]);
        reader.set_position(8);

        assert_eq!(reader.remaining()?, 32);
        assert_eq!(reader.capacity_for(0xFFFF_FFFF, 16)?, 2);
        assert_eq!(reader.capacity_for(1, 16)?, 1);
        assert_eq!(reader.capacity_for(3, 0)?, 3);
        assert_eq!(reader.position(), 8);
        Ok(())
    }
}
