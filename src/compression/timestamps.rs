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

//! Delta + run-length stack for non-decreasing u64 timestamps. Regularly
//! sampled series produce equal deltas, so each chunk usually collapses to
//! one or two (count, delta) pairs of varints.

use crate::constants::CHUNK_SZ;
use crate::error::Error;
use crate::stream::{StreamReader, StreamWriter};

#[derive(Copy, Clone)]
pub struct DeltaRleWriter {
    prev: u64,
    run_value: u64,
    run_len: u64,
}

impl DeltaRleWriter {
    pub fn new() -> Self {
        DeltaRleWriter {
            prev: 0,
            run_value: 0,
            run_len: 0,
        }
    }

    /// Append one value. Not transactional; a failure can leave a partial
    /// run pair in the stream. Chunked callers use `tput`.
    pub fn put(&mut self, stream: &mut StreamWriter, v: u64) -> Result<(), Error> {
        let delta = v.wrapping_sub(self.prev);
        self.prev = v;
        if delta != self.run_value {
            if self.run_len > 0 {
                stream.put_varint(self.run_len)?;
                stream.put_varint(self.run_value)?;
            }
            self.run_value = delta;
            self.run_len = 0;
        }
        self.run_len += 1;
        Ok(())
    }

    /// Append one chunk, all or nothing. The run state is chunk-local: the
    /// final run of the chunk is flushed before returning, so a reader can
    /// decode chunk boundaries without extra framing.
    pub fn tput(&mut self, stream: &mut StreamWriter, values: &[u64; CHUNK_SZ]) -> Result<(), Error> {
        let saved = *self;
        let mut pairs = [0u64; CHUNK_SZ * 2];
        let mut npairs = 0;
        for &v in values.iter() {
            let delta = v.wrapping_sub(self.prev);
            self.prev = v;
            if delta != self.run_value {
                if self.run_len > 0 {
                    pairs[npairs] = self.run_len;
                    pairs[npairs + 1] = self.run_value;
                    npairs += 2;
                }
                self.run_value = delta;
                self.run_len = 0;
            }
            self.run_len += 1;
        }
        pairs[npairs] = self.run_len;
        pairs[npairs + 1] = self.run_value;
        npairs += 2;
        self.run_value = 0;
        self.run_len = 0;
        if let Err(e) = stream.tput_varint(&pairs[..npairs]) {
            *self = saved;
            return Err(e);
        }
        Ok(())
    }

    /// Flush the pending run. Emits one pair even when nothing was put;
    /// count-driven readers never consume it.
    pub fn commit(&mut self, stream: &mut StreamWriter) -> Result<(), Error> {
        stream.put_varint(self.run_len)?;
        stream.put_varint(self.run_value)?;
        self.run_value = 0;
        self.run_len = 0;
        Ok(())
    }
}

#[derive(Copy, Clone)]
pub struct DeltaRleReader {
    prev: u64,
    run_value: u64,
    run_left: u64,
}

impl DeltaRleReader {
    pub fn new() -> Self {
        DeltaRleReader {
            prev: 0,
            run_value: 0,
            run_left: 0,
        }
    }

    pub fn next(&mut self, stream: &mut StreamReader) -> Result<u64, Error> {
        // zero-length pairs can appear where a writer flushed an empty run
        while self.run_left == 0 {
            self.run_left = stream.next_varint()?;
            self.run_value = stream.next_varint()?;
        }
        self.run_left -= 1;
        self.prev = self.prev.wrapping_add(self.run_value);
        Ok(self.prev)
    }
}
