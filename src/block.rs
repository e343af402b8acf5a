// Copyright (c) 2023 Franco Solleza, Intel Corporation, Brown University
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Fixed-size block writer and reader. A block holds one series' samples:
//! a 14-byte header, then chunks of sixteen compressed timestamps followed
//! by sixteen compressed values, all sharing one byte cursor. The header's
//! chunk count is the sole authority on how much the payload holds.

use crate::{
    compression::{DeltaRleReader, DeltaRleWriter, FcmReader, FcmWriter},
    constants::*,
    error::Error,
    id::SeriesId,
    sample::Sample,
    stream::{StreamReader, StreamWriter},
};
use log::{debug, warn};

// Worst case for one flushed chunk: sixteen run pairs whose deltas are all
// ten-byte varints, plus eight flag bytes and sixteen eight-byte payloads,
// rounded up to keep the check cheap.
const CHUNK_RESERVE: usize = 10 * CHUNK_SZ + 9 * CHUNK_SZ + CHUNK_SZ;

pub struct BlockWriter<'a> {
    stream: StreamWriter<'a>,
    ts_stream: DeltaRleWriter,
    val_stream: FcmWriter,
    ts_scratch: [u64; CHUNK_SZ],
    val_scratch: [f64; CHUNK_SZ],
    write_index: usize,
    nchunks_slot: usize,
    ntail_slot: usize,
    sealed: bool,
}

impl<'a> BlockWriter<'a> {
    /// Start a block over a caller-owned buffer. The header is stamped
    /// immediately with placeholder chunk counts.
    pub fn new(id: SeriesId, buf: &'a mut [u8]) -> Result<Self, Error> {
        if buf.len() < HEADER_SZ {
            return Err(Error::BadArgument);
        }
        let mut stream = StreamWriter::new(buf);
        stream.put_raw_u16(BLOCK_VERSION)?;
        let nchunks_slot = stream.allocate_u16()?;
        let ntail_slot = stream.allocate_u16()?;
        stream.put_raw_u64(id.0)?;
        Ok(BlockWriter {
            stream,
            ts_stream: DeltaRleWriter::new(),
            val_stream: FcmWriter::new(FCM_TABLE_SZ),
            ts_scratch: [0; CHUNK_SZ],
            val_scratch: [0.0; CHUNK_SZ],
            write_index: 0,
            nchunks_slot,
            ntail_slot,
            sealed: false,
        })
    }

    fn room_for_chunk(&self) -> bool {
        self.stream.space_left() >= CHUNK_RESERVE
    }

    /// Append one sample. Samples accumulate in a sixteen-entry scratch;
    /// the append that fills it flushes the whole chunk through both
    /// compressors. A rejected sample is never consumed and every later
    /// append is rejected the same way.
    pub fn put(&mut self, ts: u64, value: f64) -> Result<(), Error> {
        if self.sealed {
            return Err(Error::StateError);
        }
        if !self.room_for_chunk() || self.write_index / CHUNK_SZ >= u16::MAX as usize {
            return Err(Error::Overflow);
        }
        let idx = self.write_index & CHUNK_MASK;
        self.ts_scratch[idx] = ts;
        self.val_scratch[idx] = value;
        self.write_index += 1;
        if self.write_index & CHUNK_MASK == 0 {
            let start = self.stream.len();
            let saved_ts = self.ts_stream;
            let result = self
                .ts_stream
                .tput(&mut self.stream, &self.ts_scratch)
                .and_then(|_| self.val_stream.tput(&mut self.stream, &self.val_scratch));
            if let Err(e) = result {
                self.stream.truncate(start);
                self.ts_stream = saved_ts;
                self.write_index -= 1;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Seal the block: the real chunk and tail counts land in the header
    /// and the total bytes used come back. Scratch samples that never
    /// filled a chunk are not persisted; read them out beforehand with
    /// `read_tail_elements` if they matter. Sealing twice returns the same
    /// count and changes nothing.
    pub fn commit(&mut self) -> Result<usize, Error> {
        if !self.sealed {
            let nchunks = (self.write_index / CHUNK_SZ) as u16;
            let ntail = (self.write_index & CHUNK_MASK) as u16;
            self.stream.patch_u16(self.nchunks_slot, nchunks);
            self.stream.patch_u16(self.ntail_slot, ntail);
            self.sealed = true;
            debug!(
                "sealed block: {} chunks, {} tail samples, {} bytes",
                nchunks,
                ntail,
                self.stream.len()
            );
        }
        Ok(self.stream.len())
    }

    /// Copy out the scratch samples that have not been flushed to the
    /// payload. These are lost once the block is handed off.
    pub fn read_tail_elements(&self, timestamps: &mut Vec<u64>, values: &mut Vec<f64>) {
        let tail = self.write_index & CHUNK_MASK;
        timestamps.extend_from_slice(&self.ts_scratch[..tail]);
        values.extend_from_slice(&self.val_scratch[..tail]);
    }

    /// Total samples accepted so far, flushed chunks plus scratch tail.
    pub fn get_write_index(&self) -> usize {
        self.write_index
    }
}

pub struct BlockReader<'a> {
    stream: StreamReader<'a>,
    ts_stream: DeltaRleReader,
    val_stream: FcmReader,
    read_buffer: [u64; CHUNK_SZ],
    read_index: usize,
    nchunks: u16,
    version: u16,
    id: SeriesId,
    corrupt: bool,
}

impl<'a> BlockReader<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self, Error> {
        if buf.len() < HEADER_SZ {
            return Err(Error::BadArgument);
        }
        let mut stream = StreamReader::new(buf);
        let version = stream.read_raw_u16()?;
        let nchunks = stream.read_raw_u16()?;
        let ntail = stream.read_raw_u16()?;
        let id = SeriesId(stream.read_raw_u64()?);
        if version != BLOCK_VERSION {
            warn!("rejecting block with unknown version {}", version);
            return Err(Error::Corrupt);
        }
        if ntail as usize > CHUNK_MASK {
            return Err(Error::Corrupt);
        }
        Ok(BlockReader {
            stream,
            ts_stream: DeltaRleReader::new(),
            val_stream: FcmReader::new(FCM_TABLE_SZ),
            read_buffer: [0; CHUNK_SZ],
            read_index: 0,
            nchunks,
            version,
            id,
            corrupt: false,
        })
    }

    /// Decode the next sample. Each chunk boundary decodes its sixteen
    /// timestamps in one pass; values stream out one at a time. `Ok(None)`
    /// once the header's chunk count is exhausted. Corruption is terminal.
    pub fn next(&mut self) -> Result<Option<Sample>, Error> {
        if self.corrupt {
            return Err(Error::Corrupt);
        }
        if self.read_index >= self.nelements() {
            return Ok(None);
        }
        let chunk_index = self.read_index & CHUNK_MASK;
        if chunk_index == 0 {
            for i in 0..CHUNK_SZ {
                match self.ts_stream.next(&mut self.stream) {
                    Ok(ts) => self.read_buffer[i] = ts,
                    Err(e) => {
                        self.corrupt = true;
                        return Err(e);
                    }
                }
            }
        }
        let value = match self.val_stream.next(&mut self.stream) {
            Ok(v) => v,
            Err(e) => {
                self.corrupt = true;
                return Err(e);
            }
        };
        self.read_index += 1;
        Ok(Some(Sample::new(self.read_buffer[chunk_index], value)))
    }

    /// Number of samples the sealed payload holds.
    pub fn nelements(&self) -> usize {
        self.nchunks as usize * CHUNK_SZ
    }

    pub fn get_id(&self) -> SeriesId {
        self.id
    }

    pub fn version(&self) -> u16 {
        self.version
    }
}
