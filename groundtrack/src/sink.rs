use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tleprotocol::{format_record, RecordFormat};
use tletypes::prelude::*;

/// Destination of generated samples
pub trait CoordinateSink {
    /// A record is either fully appended or not at all
    fn append(&mut self, sample: &CoordinateSample) -> io::Result<()>;
}

impl<T: CoordinateSink + ?Sized> CoordinateSink for &mut T {
    fn append(&mut self, sample: &CoordinateSample) -> io::Result<()> {
        (**self).append(sample)
    }
}

/// Appends formatted records to a file, never truncating it.
///
/// The file (and its parent directory) is created on the first append.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    format: RecordFormat,
    file: Option<File>,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(path: P, format: RecordFormat) -> Self {
        Self {
            path: path.into(),
            format,
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }

    fn open(&self) -> io::Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl CoordinateSink for FileSink {
    fn append(&mut self, sample: &CoordinateSample) -> io::Result<()> {
        let record = format_record(sample, self.format);
        if self.file.is_none() {
            self.file = Some(self.open()?);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(record.as_bytes())?;
        }
        Ok(())
    }
}

/// Keeps samples in memory
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub samples: Vec<CoordinateSample>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoordinateSink for MemorySink {
    fn append(&mut self, sample: &CoordinateSample) -> io::Result<()> {
        self.samples.push(*sample);
        Ok(())
    }
}
