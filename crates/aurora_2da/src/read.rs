//! Types for reading 2DA tables
//!

use aurora_common::cursor::SeekExt;
use byteorder::{LittleEndian, ReadBytesExt};
use std::{
    collections::HashMap,
    io::{Read, Seek},
    str::FromStr,
};
use tracing::{instrument, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tag every binary 2DA file starts with
pub const MAGIC: &[u8; 8] = b"2DA V2.b";

/// Placeholder stored in cells that have no value
pub const NO_VALUE: &str = "****";

/// A decoded 2DA table
///
/// ```no_run
/// use std::fs::File;
///
/// fn music_for(row: usize) -> aurora_2da::error::Result<Option<String>> {
///     let table = aurora_2da::TwoDa::read(File::open("ambientmusic.2da")?)?;
///     Ok(table.get(row, "resource")?.map(str::to_owned))
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TwoDa {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TwoDa {
    /// Decode a table from a seekable reader positioned at the start of the file
    #[instrument(skip(reader))]
    pub fn read<R: Read + Seek>(mut reader: R) -> Result<TwoDa> {
        let mut tag = [0u8; 8];
        reader.read_exact(&mut tag)?;
        if &tag != MAGIC {
            return Err(Error::InvalidMagic {
                found: String::from_utf8_lossy(&tag).into_owned(),
            });
        }

        // 0x0A after the tag
        reader.read_u8()?;

        let columns = Self::read_column_names(&mut reader)?;
        let row_count = reader.read_u32::<LittleEndian>()? as usize;
        Self::skip_row_labels(&mut reader, row_count)?;

        let cell_count = row_count.saturating_mul(columns.len());
        let mut offsets = Vec::with_capacity(reader.capacity_for(cell_count as u64, 2)?);
        for _ in 0..cell_count {
            offsets.push(reader.read_u16::<LittleEndian>()?);
        }

        // data region size
        reader.skip(2)?;
        let data_start = reader.stream_position()?;

        let mut strings: HashMap<u16, String> = HashMap::new();
        let mut cells = Vec::with_capacity(offsets.len());
        for offset in offsets {
            if let Some(value) = strings.get(&offset) {
                cells.push(value.clone());
                continue;
            }
            let value = reader.peek_at(data_start + offset as u64, |r| r.read_cstring())?;
            strings.insert(offset, value.clone());
            cells.push(value);
        }

        let rows = match columns.len() {
            0 => vec![Vec::new(); row_count],
            width => cells.chunks(width).map(|row| row.to_vec()).collect(),
        };

        trace!(columns = columns.len(), rows = rows.len(), "decoded 2da");

        Ok(TwoDa { columns, rows })
    }

    fn read_column_names<R: Read>(reader: &mut R) -> Result<Vec<String>> {
        let mut raw = Vec::new();
        loop {
            let byte = reader.read_u8()?;
            if byte == b'\0' {
                break;
            }
            raw.push(byte);
        }

        Ok(String::from_utf8_lossy(&raw)
            .split('\t')
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect())
    }

    fn skip_row_labels<R: Read>(reader: &mut R, rows: usize) -> Result<()> {
        for _ in 0..rows {
            while reader.read_u8()? != b'\t' {}
        }
        Ok(())
    }

    /// Names of the columns in file order
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, matched exactly by name
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Number of rows in the table
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw cell strings of every row, including empty and `****` cells
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Look up a cell.
    ///
    /// Returns `Ok(None)` when the cell is empty or holds the `****` placeholder. Unknown columns
    /// and rows past the end of the table are errors.
    pub fn get(&self, row: usize, column: &str) -> Result<Option<&str>> {
        let index = self
            .column_index(column)
            .ok_or_else(|| Error::UnknownColumn(column.to_owned()))?;
        let cells = self.rows.get(row).ok_or(Error::RowOutOfRange {
            row,
            rows: self.rows.len(),
        })?;

        Ok(cells
            .get(index)
            .map(String::as_str)
            .filter(|value| !value.is_empty() && *value != NO_VALUE))
    }

    /// Look up a cell and parse it, treating unparsable values like missing ones
    pub fn get_parsed<T: FromStr>(&self, row: usize, column: &str) -> Result<Option<T>> {
        Ok(self.get(row, column)?.and_then(|value| value.parse().ok()))
    }

    /// Index of the first row whose cell in `column` equals `value`, ignoring case
    pub fn find_row(&self, column: &str, value: &str) -> Result<Option<usize>> {
        let index = self
            .column_index(column)
            .ok_or_else(|| Error::UnknownColumn(column.to_owned()))?;

        Ok(self.rows.iter().position(|cells| {
            cells
                .get(index)
                .is_some_and(|cell| cell.eq_ignore_ascii_case(value))
        }))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tracing_test::traced_test;

    use crate::{
        error::{Error, Result},
        read::TwoDa,
    };

    fn two_column_table() -> Vec<u8> {
        #[rustfmt::skip]
        let input = vec![
            // Tag
            b'2', b'D', b'A', b' ', b'V', b'2', b'.', b'b', 0x0A,
            // Columns
            b'a', 0x09, b'b', 0x09, 0x00,
            // Rows
            0x01, 0x00, 0x00, 0x00,
            b'0', 0x09,
            // Offsets
            0x00, 0x00, 0x04, 0x00,
            // Data size
            0x09, 0x00,
            // Data
            b'f', b'o', b'o', 0x00,
            b'*', b'*', b'*', b'*', 0x00,
        ];
        input
    }

    #[traced_test]
    #[test]
    fn read_two_column_table() -> Result<()> {
        let table = TwoDa::read(Cursor::new(two_column_table()))?;

        assert_eq!(table.column_names(), &["a".to_owned(), "b".to_owned()]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.get(0, "a")?, Some("foo"));
        assert_eq!(table.get(0, "b")?, None);

        Ok(())
    }

    #[test]
    fn offsets_past_the_end_of_the_file() {
        let mut input = two_column_table();
        // Claim 0x01000001 rows, more than the file has labels for
        input[17] = 0x01;
        assert!(matches!(
            TwoDa::read(Cursor::new(input)),
            Err(Error::IOError(_))
        ));

        // One row, but its offsets and data are cut off
        let mut input = two_column_table();
        input.truncate(22);
        assert!(matches!(
            TwoDa::read(Cursor::new(input)),
            Err(Error::IOError(_))
        ));
    }

    #[test]
    fn read_invalid_magic() {
        #[rustfmt::skip]
        let input = vec![
            b'2', b'D', b'A', b' ', b'V', b'2', b'.', b'0', 0x0A,
            0x00,
        ];

        let table = TwoDa::read(Cursor::new(input));
        assert!(matches!(table, Err(Error::InvalidMagic { .. })));
    }

    #[test]
    fn shared_offsets_and_empty_cells() -> Result<()> {
        #[rustfmt::skip]
        let input = vec![
            b'2', b'D', b'A', b' ', b'V', b'2', b'.', b'b', 0x0A,
            b'l', b'a', b'b', b'e', b'l', 0x09, b'v', b'a', b'l', b'u', b'e', 0x09, 0x00,
            0x02, 0x00, 0x00, 0x00,
            b'0', 0x09, b'1', 0x09,
            // both rows share the label string, the second value is empty
            0x00, 0x00, 0x04, 0x00,
            0x00, 0x00, 0x07, 0x00,
            0x08, 0x00,
            b'a', b'b', b'c', 0x00,
            b'4', b'2', 0x00,
            0x00,
        ];

        let table = TwoDa::read(Cursor::new(input))?;
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "label")?, Some("abc"));
        assert_eq!(table.get(1, "label")?, Some("abc"));
        assert_eq!(table.get_parsed::<u32>(0, "value")?, Some(42));
        assert_eq!(table.get(1, "value")?, None);
        assert_eq!(table.find_row("label", "ABC")?, Some(0));

        Ok(())
    }

    #[test]
    fn unknown_column_and_row() -> Result<()> {
        let table = TwoDa::read(Cursor::new(two_column_table()))?;

        assert!(matches!(table.get(0, "A"), Err(Error::UnknownColumn(_))));
        assert!(matches!(
            table.get(1, "a"),
            Err(Error::RowOutOfRange { row: 1, rows: 1 })
        ));

        Ok(())
    }

    #[test]
    fn truncated_offsets() {
        let mut input = two_column_table();
        input.truncate(22);

        assert!(matches!(
            TwoDa::read(Cursor::new(input)),
            Err(Error::IOError(_))
        ));
    }
}
