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

//! Finite context method codec for f64 values. A table of recent values,
//! indexed by a rolling hash of past updates, predicts each value; only
//! the XOR of prediction and actual goes on the wire, with its leading
//! zero bytes elided. Values travel in pairs behind one flag byte that
//! carries both four-bit leading-zero counts. The codec is bit
//! transparent, so NaN and infinities survive unchanged.

use crate::constants::CHUNK_SZ;
use crate::error::Error;
use crate::stream::{StreamReader, StreamWriter};

pub struct FcmPredictor {
    pub table: Vec<u64>,
    pub last_hash: u64,
    mask: u64,
}

impl FcmPredictor {
    /// `table_size` must be a power of two; the hash is masked into it.
    pub fn new(table_size: usize) -> Self {
        assert!(table_size.is_power_of_two());
        FcmPredictor {
            table: vec![0; table_size],
            last_hash: 0,
            mask: (table_size - 1) as u64,
        }
    }

    pub fn predict_next(&self) -> u64 {
        self.table[self.last_hash as usize]
    }

    pub fn update(&mut self, value: u64) {
        self.table[self.last_hash as usize] = value;
        self.last_hash = ((self.last_hash << 6) ^ (value >> 48)) & self.mask;
    }
}

/// Number of leading zero bytes of the xor, 0 through 8. 8 means the
/// prediction was exact and no payload bytes follow.
fn flag_of(diff: u64) -> u8 {
    (diff.leading_zeros() / 8) as u8
}

fn put_payload(stream: &mut StreamWriter, diff: u64, flag: u8) -> Result<(), Error> {
    let nbytes = 8 - flag as usize;
    stream.put_slice(&diff.to_le_bytes()[..nbytes])
}

pub struct FcmWriter {
    predictor: FcmPredictor,
    pending_diff: u64,
    pending_flag: u8,
    nelements: usize,
}

impl FcmWriter {
    pub fn new(table_size: usize) -> Self {
        FcmWriter {
            predictor: FcmPredictor::new(table_size),
            pending_diff: 0,
            pending_flag: 0,
            nelements: 0,
        }
    }

    /// Append one value. The first of a pair is held back until its partner
    /// arrives; the pair then lands as one flag byte followed by both
    /// payloads. A failed append leaves the stream and codec untouched.
    pub fn put(&mut self, stream: &mut StreamWriter, value: f64) -> Result<(), Error> {
        let bits = value.to_bits();
        let diff = bits ^ self.predictor.predict_next();
        let flag = flag_of(diff);
        if self.nelements % 2 == 0 {
            self.pending_diff = diff;
            self.pending_flag = flag;
        } else {
            let needed = 1 + (8 - self.pending_flag as usize) + (8 - flag as usize);
            if stream.space_left() < needed {
                return Err(Error::Overflow);
            }
            stream.put_raw_u8((self.pending_flag << 4) | flag)?;
            put_payload(stream, self.pending_diff, self.pending_flag)?;
            put_payload(stream, diff, flag)?;
        }
        self.predictor.update(bits);
        self.nelements += 1;
        Ok(())
    }

    /// Append one chunk, all or nothing. A failed chunk restores the stream
    /// cursor along with every piece of codec state it touched.
    pub fn tput(&mut self, stream: &mut StreamWriter, values: &[f64; CHUNK_SZ]) -> Result<(), Error> {
        let start = stream.len();
        let saved_hash = self.predictor.last_hash;
        let saved_pending = (self.pending_diff, self.pending_flag, self.nelements);
        let mut touched = [(0usize, 0u64); CHUNK_SZ];
        for (i, &v) in values.iter().enumerate() {
            let slot = self.predictor.last_hash as usize;
            touched[i] = (slot, self.predictor.table[slot]);
            if let Err(e) = self.put(stream, v) {
                for &(slot, old) in touched[..=i].iter().rev() {
                    self.predictor.table[slot] = old;
                }
                self.predictor.last_hash = saved_hash;
                self.pending_diff = saved_pending.0;
                self.pending_flag = saved_pending.1;
                self.nelements = saved_pending.2;
                stream.truncate(start);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Flush a solitary first-of-pair: its flag rides the high nibble with
    /// the low nibble zeroed, then its payload bytes. A no-op after an even
    /// number of appends.
    pub fn commit(&mut self, stream: &mut StreamWriter) -> Result<(), Error> {
        if self.nelements % 2 == 1 {
            let needed = 1 + (8 - self.pending_flag as usize);
            if stream.space_left() < needed {
                return Err(Error::Overflow);
            }
            stream.put_raw_u8(self.pending_flag << 4)?;
            put_payload(stream, self.pending_diff, self.pending_flag)?;
            self.nelements += 1;
        }
        Ok(())
    }
}

pub struct FcmReader {
    predictor: FcmPredictor,
    flags: u8,
    iter: usize,
}

impl FcmReader {
    /// `table_size` must match the writer's.
    pub fn new(table_size: usize) -> Self {
        FcmReader {
            predictor: FcmPredictor::new(table_size),
            flags: 0,
            iter: 0,
        }
    }

    pub fn next(&mut self, stream: &mut StreamReader) -> Result<f64, Error> {
        let flag = if self.iter % 2 == 0 {
            self.flags = stream.read_raw_u8()?;
            self.flags >> 4
        } else {
            self.flags & 0x0F
        };
        self.iter += 1;
        if flag > 8 {
            return Err(Error::Corrupt);
        }
        let nbytes = 8 - flag as usize;
        let payload = stream.read_slice(nbytes)?;
        let mut le = [0u8; 8];
        le[..nbytes].copy_from_slice(payload);
        let diff = u64::from_le_bytes(le);
        let bits = diff ^ self.predictor.predict_next();
        self.predictor.update(bits);
        Ok(f64::from_bits(bits))
    }
}
