//! A module for reading the transport stream.
use std::collections::HashSet;
use std::fmt;
use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use crate::PACKET_SIZE;
use crate::OpenMode;
use crate::errors::{ClosedStream, Result, ShortRead};
use crate::packet::{TSPacket, pid_of};

#[cfg(feature = "tracing")]
use tracing::{debug, info, trace};

/// Struct used for holding information related to reading the transport stream.
///
/// The reader pulls exactly [`PACKET_SIZE`] bytes at a time from its source. It keeps a count of
/// packets read, which together with the initial offset gives each packet its position in the
/// stream. These positions are only accurate while this reader is the only thing reading from (or
/// seeking) the source.
///
/// The source is released when the reader is dropped, or earlier with [`TSReader::close`]. A
/// reader is meant to be used from one place at a time and does no locking of its own.
#[derive(Debug)]
pub struct TSReader<R> {
    /// Name of the stream. Only really used for logging and errors.
    name: String,
    /// The byte source, `None` once closed.
    source: Option<R>,
    /// Mode the source was opened with, if it was opened with [`TSReader::open`].
    mode: Option<OpenMode>,
    /// Byte offset of the first packet this reader will read.
    initial_offset: u64,
    /// Counter of the number of packets read
    packets_read: u64,
}

impl<R: Read> TSReader<R> {
    /// Create a new TSReader for a source positioned at the start of the stream.
    pub fn new(name: impl Into<String>, source: R) -> Self {
        Self::with_position(name, source, 0, 0)
    }

    /// Create a new TSReader for a source that is not at the start of the stream.
    ///
    /// # Parameters
    /// - `initial_offset`: byte offset added to every packet's offset.
    /// - `packets_read`: number of packets already consumed, which is where indices continue from.
    pub fn with_position(
        name: impl Into<String>,
        source: R,
        initial_offset: u64,
        packets_read: u64,
    ) -> Self {
        TSReader {
            name: name.into(),
            source: Some(source),
            mode: None,
            initial_offset,
            packets_read,
        }
    }

    /// Read the next packet from the transport stream.
    /// # Returns
    /// `Ok(Some(TSPacket))` if the next transport stream packet could be read.
    /// `Ok(None)` if the end of the stream was reached exactly at a packet boundary.
    /// # Errors
    /// [`ShortRead`] if the stream ends partway through a packet, [`ClosedStream`] if the reader
    /// has been closed, a malformed-packet error if the bytes are not a valid packet, or any I/O
    /// error from the source.
    pub fn read(&mut self) -> Result<Option<TSPacket>> {
        let Some(chunk) = self.read_chunk()? else {
            return Ok(None);
        };
        let (index, offset) = self.next_position();

        #[cfg(feature = "tracing")]
        trace!("Packets read in stream {}: {}", self.name, self.packets_read);

        TSPacket::from_bytes_at(&chunk, Some(index), Some(offset)).map(Some)
    }

    /// Read the next packet whose PID is in `pids`.
    ///
    /// Packets with other PIDs are skipped without being validated or built, but still count
    /// towards the position of later packets.
    pub fn read_filtered(&mut self, pids: &HashSet<u16>) -> Result<Option<TSPacket>> {
        loop {
            let Some(chunk) = self.read_chunk()? else {
                return Ok(None);
            };
            let (index, offset) = self.next_position();

            let pid = pid_of(&chunk);
            if !pids.contains(&pid) {
                #[cfg(feature = "tracing")]
                trace!("Skipping packet {} with PID {:#06x} in stream {}", index, pid, self.name);
                continue;
            }

            return TSPacket::from_bytes_at(&chunk, Some(index), Some(offset)).map(Some);
        }
    }

    /// Iterate over every remaining packet.
    ///
    /// Iteration continues from wherever the reader currently is, and stops after the end of the
    /// stream or the first error.
    pub fn packets(&mut self) -> Packets<'_, R> {
        Packets {
            reader: self,
            done: false,
        }
    }

    /// Iterate over the remaining packets whose PID is one of `pids`.
    pub fn filtered<I>(&mut self, pids: I) -> FilteredPackets<'_, R>
    where
        I: IntoIterator<Item = u16>,
    {
        FilteredPackets {
            reader: self,
            pids: pids.into_iter().collect(),
            done: false,
        }
    }

    /// Pull up to `PACKET_SIZE` bytes, retrying until the packet is full or the source ends.
    fn read_chunk(&mut self) -> Result<Option<[u8; PACKET_SIZE]>> {
        let Some(source) = self.source.as_mut() else {
            return Err(ClosedStream {
                name: self.name.clone(),
            }
            .into());
        };

        let mut chunk = [0u8; PACKET_SIZE];
        let mut filled = 0;
        while filled < PACKET_SIZE {
            match source.read(&mut chunk[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => {
                #[cfg(feature = "tracing")]
                info!("Finished reading stream {}", self.name);
                Ok(None)
            }
            PACKET_SIZE => Ok(Some(chunk)),
            _ => {
                #[cfg(feature = "tracing")]
                debug!("Short read of {} bytes from stream {}", filled, self.name);
                Err(ShortRead {
                    name: self.name.clone(),
                    data: chunk[..filled].to_vec(),
                }
                .into())
            }
        }
    }
}

impl<R> TSReader<R> {
    /// Release the source. Every later read fails with [`ClosedStream`].
    ///
    /// Closing an already closed reader does nothing.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            #[cfg(feature = "tracing")]
            info!("Closed stream {}", self.name);
        }
    }

    /// Returns `true` once [`TSReader::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Name given to the stream.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mode the file was opened with. `None` for readers over other sources.
    pub fn mode(&self) -> Option<OpenMode> {
        self.mode
    }

    pub(crate) fn opened_as(mut self, mode: OpenMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Byte offset of the first packet this reader read.
    pub fn initial_offset(&self) -> u64 {
        self.initial_offset
    }

    /// Number of full packets read so far, skipped ones included.
    pub fn packets_read(&self) -> u64 {
        self.packets_read
    }

    /// Borrow the source, e.g. to write to it. `None` once closed.
    ///
    /// Reading from or seeking the source directly makes packet positions inaccurate.
    pub fn get_ref(&self) -> Option<&R> {
        self.source.as_ref()
    }

    /// Mutably borrow the source. `None` once closed.
    ///
    /// Reading from or seeking the source directly makes packet positions inaccurate.
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.source.as_mut()
    }

    fn next_position(&mut self) -> (u64, u64) {
        let index = self.packets_read;
        self.packets_read += 1;
        (index, index * PACKET_SIZE as u64 + self.initial_offset)
    }
}

impl<R> fmt::Display for TSReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TS reader for {:?}", self.name)?;
        match self.mode {
            _ if self.is_closed() => write!(f, ", closed"),
            Some(mode) => write!(f, ", open for {}", mode),
            None => Ok(()),
        }
    }
}

/// Iterator over every packet of a [`TSReader`], created by [`TSReader::packets`].
#[derive(Debug)]
pub struct Packets<'a, R> {
    reader: &'a mut TSReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Packets<'_, R> {
    type Item = Result<TSPacket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.reader.read().transpose();
        self.done = !matches!(next, Some(Ok(_)));
        next
    }
}

impl<R: Read> FusedIterator for Packets<'_, R> {}

/// Iterator over the packets of a [`TSReader`] with selected PIDs, created by
/// [`TSReader::filtered`].
#[derive(Debug)]
pub struct FilteredPackets<'a, R> {
    reader: &'a mut TSReader<R>,
    pids: HashSet<u16>,
    done: bool,
}

impl<R: Read> Iterator for FilteredPackets<'_, R> {
    type Item = Result<TSPacket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.reader.read_filtered(&self.pids).transpose();
        self.done = !matches!(next, Some(Ok(_)));
        next
    }
}

impl<R: Read> FusedIterator for FilteredPackets<'_, R> {}
