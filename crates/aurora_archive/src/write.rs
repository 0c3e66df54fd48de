//! Types for writing ERF archives
//!

use aurora_common::ResourceKey;
use binrw::BinWrite;
use bon::Builder;
use std::io::{self, Seek, Write};
use tracing::{instrument, Level};

use crate::error::Result;
use crate::types::{
    ErfHeader, ErfKey, ErfResource, ErfStringHeader, ERF_HEADER_SIZE, ERF_KEY_SIZE,
    ERF_RESOURCE_SIZE,
};

/// Options for how the ERF file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct ErfWriterOptions {
    /// The four character file type, `ERF ` or `MOD ` for example
    #[builder(default = *b"ERF ")]
    pub file_type: [u8; 4],

    /// Years since 1900
    #[builder(default)]
    pub build_year: u32,

    /// Days since January 1st
    #[builder(default)]
    pub build_day: u32,

    /// Talk table reference of the archive description
    #[builder(default = u32::MAX)]
    pub description_strref: u32,
}

#[derive(Debug)]
struct PendingResource {
    key: ResourceKey,
    data: Vec<u8>,
}

/// ERF archive generator
///
/// Resource data is buffered until [`ErfWriter::finish`] lays out the tables.
///
/// ```
/// # fn doit() -> aurora_archive::error::Result<()>
/// # {
/// use aurora_archive::{write::ErfWriterOptions, ErfWriter};
/// use aurora_common::{ResourceKey, ResourceType};
/// use std::io::Write;
///
/// let mut erf = ErfWriter::new(
///     std::io::Cursor::new(Vec::new()),
///     ErfWriterOptions::builder().file_type(*b"MOD ").build(),
/// );
///
/// erf.start_file(ResourceKey::new("module", ResourceType::Ifo))?;
/// erf.write_all(b"IFO V3.2")?;
///
/// // Apply the changes you've made.
/// erf.finish()?;
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct ErfWriter<W: Write + Seek> {
    inner: W,
    options: ErfWriterOptions,
    descriptions: Vec<(u32, String)>,
    resources: Vec<PendingResource>,
    current: Option<PendingResource>,
}

impl<W: Write + Seek> ErfWriter<W> {
    /// Initializes the archive.
    ///
    /// Before writing to this object, the [`ErfWriter::start_file`] function should be called.
    pub fn new(inner: W, options: ErfWriterOptions) -> ErfWriter<W> {
        ErfWriter {
            inner,
            options,
            descriptions: Vec::new(),
            resources: Vec::new(),
            current: None,
        }
    }

    /// Returns true if a resource is currently open for writing.
    pub const fn is_writing_file(&self) -> bool {
        self.current.is_some()
    }

    /// Add a localized description of the archive
    pub fn add_description(&mut self, language: u32, text: impl Into<String>) {
        self.descriptions.push((language, text.into()));
    }

    /// Start a new resource; the previous one, if any, is finished first.
    #[instrument(skip(self), fields(key = %key), err)]
    pub fn start_file(&mut self, key: ResourceKey) -> Result<()> {
        self.finish_file();
        self.current = Some(PendingResource {
            key,
            data: Vec::new(),
        });
        Ok(())
    }

    fn finish_file(&mut self) {
        if let Some(resource) = self.current.take() {
            self.resources.push(resource);
        }
    }

    /// Finish the last resource and write all ERF structures
    ///
    /// Layout: header, descriptions, key list, resource list, then the data of every resource in
    /// the order they were started.
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<W> {
        self.finish_file();

        let mut strings = io::Cursor::new(Vec::new());
        for (language, text) in &self.descriptions {
            ErfStringHeader {
                language_id: *language,
                size: text.len() as u32,
            }
            .write(&mut strings)?;
            strings.write_all(text.as_bytes())?;
        }
        let strings = strings.into_inner();

        let count = self.resources.len() as u32;
        let key_list_offset = ERF_HEADER_SIZE + strings.len() as u32;
        let resource_list_offset = key_list_offset + count * ERF_KEY_SIZE;
        let data_offset = resource_list_offset + count * ERF_RESOURCE_SIZE;

        ErfHeader {
            file_type: self.options.file_type,
            version: *b"V1.0",
            language_count: self.descriptions.len() as u32,
            localized_string_size: strings.len() as u32,
            entry_count: count,
            localized_string_offset: ERF_HEADER_SIZE,
            key_list_offset,
            resource_list_offset,
            build_year: self.options.build_year,
            build_day: self.options.build_day,
            description_strref: self.options.description_strref,
        }
        .write(&mut self.inner)?;
        self.inner.write_all(&strings)?;

        for (id, resource) in self.resources.iter().enumerate() {
            ErfKey {
                resref: resource.key.resref.to_bytes(),
                resource_id: id as u32,
                restype: resource.key.restype.code(),
            }
            .write(&mut self.inner)?;
        }

        let mut offset = data_offset;
        for resource in &self.resources {
            ErfResource {
                offset,
                size: resource.data.len() as u32,
            }
            .write(&mut self.inner)?;
            offset += resource.data.len() as u32;
        }

        for resource in &self.resources {
            self.inner.write_all(&resource.data)?;
        }

        Ok(self.inner)
    }
}

impl<W: Write + Seek> Write for ErfWriter<W> {
    #[instrument(skip_all, err, ret(level = Level::TRACE), fields(size = buf.len()))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(current) = self.current.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "No resource has been started",
            ));
        };
        current.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[instrument(skip(self), err)]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
