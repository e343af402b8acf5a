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

//! Chunked delta encoding with a per-chunk bias. Each chunk of sixteen
//! deltas is rebased on its minimum, which is written first; series whose
//! second-order differences hover near zero leave mostly tiny residuals.
//! An alternative timestamp path; the block codec ships the delta + RLE
//! stack instead.

use crate::constants::CHUNK_SZ;
use crate::error::Error;
use crate::stream::{StreamReader, StreamWriter};

#[derive(Copy, Clone)]
pub struct DeltaDeltaWriter {
    prev: u64,
    put_calls: usize,
}

impl DeltaDeltaWriter {
    pub fn new() -> Self {
        DeltaDeltaWriter {
            prev: 0,
            put_calls: 0,
        }
    }

    /// Append one chunk, all or nothing: the chunk minimum as one varint,
    /// then the sixteen rebased deltas.
    pub fn tput(&mut self, stream: &mut StreamWriter, values: &[u64; CHUNK_SZ]) -> Result<(), Error> {
        let saved = *self;
        let mut deltas = [0u64; CHUNK_SZ];
        for (slot, &v) in deltas.iter_mut().zip(values.iter()) {
            *slot = v.wrapping_sub(self.prev);
            self.prev = v;
        }
        let min = *deltas.iter().min().unwrap();
        for slot in deltas.iter_mut() {
            *slot = slot.wrapping_sub(min);
        }
        let start = stream.len();
        let result = stream
            .put_varint(min)
            .and_then(|_| stream.tput_varint(&deltas));
        if let Err(e) = result {
            stream.truncate(start);
            *self = saved;
            return Err(e);
        }
        Ok(())
    }

    /// Slow path for streams shorter than one chunk. The bias is emitted
    /// once, as zero, ahead of the first delta; a reader expects a fresh
    /// bias every sixteen values, so longer streams must go through `tput`.
    pub fn put(&mut self, stream: &mut StreamWriter, v: u64) -> Result<(), Error> {
        if self.put_calls == 0 {
            stream.put_varint(0)?;
        }
        self.put_calls += 1;
        stream.put_varint(v.wrapping_sub(self.prev))?;
        self.prev = v;
        Ok(())
    }
}

#[derive(Copy, Clone)]
pub struct DeltaDeltaReader {
    prev: u64,
    min: u64,
    counter: usize,
}

impl DeltaDeltaReader {
    pub fn new() -> Self {
        DeltaDeltaReader {
            prev: 0,
            min: 0,
            counter: 0,
        }
    }

    pub fn next(&mut self, stream: &mut StreamReader) -> Result<u64, Error> {
        if self.counter % CHUNK_SZ == 0 {
            self.min = stream.next_varint()?;
        }
        self.counter += 1;
        let delta = stream.next_varint()?;
        self.prev = self.prev.wrapping_add(delta).wrapping_add(self.min);
        Ok(self.prev)
    }
}
