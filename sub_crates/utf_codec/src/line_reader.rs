//! Reading encoded text one line at a time.
//!
//! The source is read in fixed-size chunks.  When a chunk turns out to
//! contain the end of the line, the source is seeked back to just after
//! the line feed, so the next read picks up exactly where the line ended.
//! That's why sources must be `Seek` as well as `Read`.
//!
//! A CR LF pair at the end of a line is folded into a single LF.  Other
//! than that, units are passed through as-is: no validation is done.

use std::collections::TryReserveError;
use std::io::{self, Read, Seek, SeekFrom};
use std::marker::PhantomData;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::line_buf::LineBuf;
use crate::units::{ByteOrder, CodeUnit};

/// Default number of bytes read from the source at a time.
pub const DEFAULT_CHUNK_BYTES: usize = 8192;

/// Represents a failure to read a line.
///
/// Reaching the end of the source is not an error: `read_line()` returns
/// `Ok(None)` for that.
#[derive(Debug, Error)]
pub enum LineError {
    /// Reading from or seeking the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Memory for the line or the read buffer couldn't be allocated.
    #[error("failed to allocate line buffer: {0}")]
    Alloc(#[from] TryReserveError),

    /// The line is too long to fit in addressable memory.
    #[error("line length overflows the maximum buffer size")]
    CapacityOverflow,
}

/// One line read from a source, in host byte order, including its line
/// feed (if it had one) and followed by a zero terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<U> {
    // Always ends with a zero unit.
    units: Vec<U>,
}

impl<U: CodeUnit> Line<U> {
    pub(crate) fn from_terminated(units: Vec<U>) -> Line<U> {
        debug_assert_eq!(units.last().copied(), Some(U::ZERO));
        Line { units }
    }

    /// The units of the line, without the terminator.
    pub fn units(&self) -> &[U] {
        &self.units[..self.units.len() - 1]
    }

    /// The units of the line, including the terminator.
    pub fn units_with_nul(&self) -> &[U] {
        &self.units
    }

    /// Number of units in the line, not counting the terminator.
    pub fn len(&self) -> usize {
        self.units.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the line ends with a line feed.  Only the last line of a
    /// source can be missing one.
    pub fn ends_with_newline(&self) -> bool {
        self.units().last() == Some(&U::LF)
    }

    /// Takes ownership of the units, dropping the terminator.
    pub fn into_vec(mut self) -> Vec<U> {
        self.units.pop();
        self.units
    }

    /// Takes ownership of the units, keeping the terminator.
    pub fn into_vec_with_nul(self) -> Vec<U> {
        self.units
    }
}

impl<U: CodeUnit> AsRef<[U]> for Line<U> {
    fn as_ref(&self) -> &[U] {
        self.units()
    }
}

/// Reads lines of `U` units from a seekable byte source.
///
/// Also usable as an iterator over the lines of the source.
#[derive(Debug)]
pub struct LineReader<R, U> {
    source: R,
    order: ByteOrder,
    chunk_units: usize,
    chunk: Vec<u8>,
    _unit: PhantomData<U>,
}

impl<R: Read + Seek, U: CodeUnit> LineReader<R, U> {
    /// Creates a reader for units stored in host byte order.
    pub fn new(source: R) -> LineReader<R, U> {
        LineReader::with_byte_order(source, ByteOrder::default())
    }

    /// Creates a reader for units stored in the opposite byte order to the
    /// host.  Lines are returned in host byte order.
    pub fn swapped(source: R) -> LineReader<R, U> {
        LineReader::with_byte_order(source, ByteOrder::Swapped)
    }

    pub fn with_byte_order(source: R, order: ByteOrder) -> LineReader<R, U> {
        LineReader {
            source,
            order,
            chunk_units: chunk_units::<U>(DEFAULT_CHUNK_BYTES),
            chunk: Vec::new(),
            _unit: PhantomData,
        }
    }

    /// Sets how many bytes to read from the source at a time.  This is
    /// rounded down to a whole number of units, but is always at least one
    /// unit.
    pub fn chunk_size(mut self, bytes: usize) -> LineReader<R, U> {
        self.chunk_units = chunk_units::<U>(bytes);
        self
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Reads the next line.
    ///
    /// Returns `Ok(None)` once the source is exhausted.  The last line of a
    /// source is returned even if it has no line feed.
    pub fn read_line(&mut self) -> Result<Option<Line<U>>, LineError> {
        let chunk_bytes = self.chunk_units * U::WIDTH;
        if self.chunk.len() != chunk_bytes {
            self.chunk.clear();
            self.chunk.try_reserve_exact(chunk_bytes)?;
            self.chunk.resize(chunk_bytes, 0);
        }

        // The units we look for, as they're stored in the source.
        let line_feed = self.order.apply(U::LF);
        let carriage_return = self.order.apply(U::CR);

        let mut line = LineBuf::new();
        let mut got_any = false;

        loop {
            let filled = fill_chunk(&mut self.source, &mut self.chunk)?;
            let whole = filled - (filled % U::WIDTH);
            trace!(filled, "read chunk");
            if whole == 0 {
                if filled > 0 {
                    warn!(
                        discarded = filled,
                        "discarding trailing bytes that don't form a whole code unit"
                    );
                }
                break;
            }
            got_any = true;

            let bytes = &self.chunk[..whole];
            let found = bytes
                .chunks_exact(U::WIDTH)
                .position(|b| U::from_ne_slice(b) == line_feed);

            match found {
                Some(i) => {
                    line.extend_from_bytes(&bytes[..(i * U::WIDTH)])?;

                    // Fold CR LF into LF.
                    if line.last() == Some(carriage_return) {
                        line.set_last(line_feed);
                    } else {
                        line.push(line_feed)?;
                    }

                    // Put back everything after the line feed.  The chunk
                    // buffer was successfully allocated, so its length
                    // always fits in an i64.
                    let unread = filled - ((i + 1) * U::WIDTH);
                    if unread > 0 {
                        debug!(unread, "rewinding source past end of line");
                        self.source.seek(SeekFrom::Current(-(unread as i64)))?;
                    }

                    return line.finish(self.order).map(Some);
                }
                None => {
                    line.extend_from_bytes(bytes)?;

                    // A short chunk means we're at the end of the source.
                    if whole < filled {
                        warn!(
                            discarded = filled - whole,
                            "discarding trailing bytes that don't form a whole code unit"
                        );
                        break;
                    }
                }
            }
        }

        if !got_any {
            return Ok(None);
        }
        line.finish(self.order).map(Some)
    }
}

impl<R: Read + Seek, U: CodeUnit> Iterator for LineReader<R, U> {
    type Item = Result<Line<U>, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}

fn chunk_units<U: CodeUnit>(bytes: usize) -> usize {
    (bytes / U::WIDTH).max(1)
}

/// Reads into `chunk` until it's full or the source runs dry, returning
/// the number of bytes read.
fn fill_chunk<R: Read>(source: &mut R, chunk: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < chunk.len() {
        match source.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reads one utf8 line from `source`.
pub fn read_line_utf8<R: Read + Seek>(source: &mut R) -> Result<Option<Line<u8>>, LineError> {
    LineReader::new(source).read_line()
}

/// Reads one host-order utf16 line from `source`.
pub fn read_line_utf16<R: Read + Seek>(source: &mut R) -> Result<Option<Line<u16>>, LineError> {
    LineReader::new(source).read_line()
}

/// Reads one utf16 line stored in the opposite byte order to the host from
/// `source`.  The returned line is in host byte order.
pub fn read_line_utf16_swapped<R: Read + Seek>(
    source: &mut R,
) -> Result<Option<Line<u16>>, LineError> {
    LineReader::swapped(source).read_line()
}

/// Reads one host-order utf32 line from `source`.
pub fn read_line_utf32<R: Read + Seek>(source: &mut R) -> Result<Option<Line<u32>>, LineError> {
    LineReader::new(source).read_line()
}

/// Reads one utf32 line stored in the opposite byte order to the host from
/// `source`.  The returned line is in host byte order.
pub fn read_line_utf32_swapped<R: Read + Seek>(
    source: &mut R,
) -> Result<Option<Line<u32>>, LineError> {
    LineReader::swapped(source).read_line()
}
