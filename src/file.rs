//! Opening transport stream files.
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use derive_more::{Display, IsVariant};

use crate::errors::{Result, UnsupportedMode};
use crate::reader::TSReader;

#[cfg(feature = "tracing")]
use tracing::debug;

/// How a transport stream file is opened.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, IsVariant)]
pub enum OpenMode {
    /// `r`: read only. The file must already exist.
    #[default]
    #[display("read only")]
    Read,
    /// `w`: read and write. The file is created if needed and truncated if it exists.
    #[display("read and write")]
    Write,
    /// `x`: read and write. The file must not already exist.
    #[display("read and write (new file)")]
    Exclusive,
}

impl OpenMode {
    fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Read => options.read(true),
            OpenMode::Write => options.read(true).write(true).create(true).truncate(true),
            OpenMode::Exclusive => options.read(true).write(true).create_new(true),
        };
        options
    }
}

impl FromStr for OpenMode {
    type Err = UnsupportedMode;

    fn from_str(mode: &str) -> std::result::Result<Self, Self::Err> {
        match mode {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            "x" => Ok(OpenMode::Exclusive),
            other => Err(UnsupportedMode(other.to_string())),
        }
    }
}

impl TSReader<File> {
    /// Open a transport stream file. The reader is named after the path.
    ///
    /// The file is closed when the reader is dropped or closed.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();

        #[cfg(feature = "tracing")]
        debug!("Opening {} for {}", path.display(), mode);

        let file = mode.options().open(path)?;
        Ok(TSReader::new(path.display().to_string(), file).opened_as(mode))
    }
}
