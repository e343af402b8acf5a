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

//! Delta + zig-zag + run-length stack for signed i64 series. Deltas are
//! zig-zag mapped so small magnitudes of either sign stay short on the
//! wire, then run-length packed like the timestamp stack.

use crate::compression::utils::{from_zigzag, to_zigzag};
use crate::constants::CHUNK_SZ;
use crate::error::Error;
use crate::stream::{StreamReader, StreamWriter};

#[derive(Copy, Clone)]
pub struct ZigZagDeltaRleWriter {
    prev: i64,
    run_value: u64,
    run_len: u64,
}

impl ZigZagDeltaRleWriter {
    pub fn new() -> Self {
        ZigZagDeltaRleWriter {
            prev: 0,
            run_value: 0,
            run_len: 0,
        }
    }

    /// Append one value. Not transactional; chunked callers use `tput`.
    pub fn put(&mut self, stream: &mut StreamWriter, v: i64) -> Result<(), Error> {
        let delta = to_zigzag(v.wrapping_sub(self.prev));
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

    /// Append one chunk, all or nothing, with the run state chunk-local.
    pub fn tput(&mut self, stream: &mut StreamWriter, values: &[i64; CHUNK_SZ]) -> Result<(), Error> {
        let saved = *self;
        let mut pairs = [0u64; CHUNK_SZ * 2];
        let mut npairs = 0;
        for &v in values.iter() {
            let delta = to_zigzag(v.wrapping_sub(self.prev));
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

    pub fn commit(&mut self, stream: &mut StreamWriter) -> Result<(), Error> {
        stream.put_varint(self.run_len)?;
        stream.put_varint(self.run_value)?;
        self.run_value = 0;
        self.run_len = 0;
        Ok(())
    }
}

#[derive(Copy, Clone)]
pub struct ZigZagDeltaRleReader {
    prev: i64,
    run_value: u64,
    run_left: u64,
}

impl ZigZagDeltaRleReader {
    pub fn new() -> Self {
        ZigZagDeltaRleReader {
            prev: 0,
            run_value: 0,
            run_left: 0,
        }
    }

    pub fn next(&mut self, stream: &mut StreamReader) -> Result<i64, Error> {
        while self.run_left == 0 {
            self.run_left = stream.next_varint()?;
            self.run_value = stream.next_varint()?;
        }
        self.run_left -= 1;
        self.prev = self.prev.wrapping_add(from_zigzag(self.run_value));
        Ok(self.prev)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{thread_rng, Rng};

    fn round_trip(data: &[i64]) {
        assert_eq!(data.len() % CHUNK_SZ, 0);
        let mut buf = vec![0u8; data.len() * 11 + 16];
        let mut stream = StreamWriter::new(&mut buf);
        let mut writer = ZigZagDeltaRleWriter::new();
        for chunk in data.chunks_exact(CHUNK_SZ) {
            writer.tput(&mut stream, chunk.try_into().unwrap()).unwrap();
        }
        let used = stream.len();

        let mut reader_stream = StreamReader::new(&buf[..used]);
        let mut reader = ZigZagDeltaRleReader::new();
        for &v in data.iter() {
            assert_eq!(reader.next(&mut reader_stream).unwrap(), v);
        }
        assert_eq!(reader_stream.space_left(), 0);
    }

    #[test]
    fn oscillating_series() {
        let data: Vec<i64> = (0..CHUNK_SZ as i64 * 4)
            .map(|k| if k % 2 == 0 { -5 } else { 7 })
            .collect();
        round_trip(&data);
    }

    #[test]
    fn descending_series_stays_dense() {
        let data: Vec<i64> = (0..CHUNK_SZ as i64).map(|k| 10_000 - 3 * k).collect();
        let mut buf = vec![0u8; 256];
        let mut stream = StreamWriter::new(&mut buf);
        let mut writer = ZigZagDeltaRleWriter::new();
        writer.tput(&mut stream, data.as_slice().try_into().unwrap()).unwrap();
        // one pair for the lead-in and one for the fifteen equal deltas
        assert!(stream.len() <= 8);
        round_trip(&data);
    }

    #[test]
    fn random_series_round_trip() {
        let mut rng = thread_rng();
        let data: Vec<i64> = (0..CHUNK_SZ * 64).map(|_| rng.gen()).collect();
        round_trip(&data);
    }

    #[test]
    fn extremes_round_trip() {
        let mut data = vec![0i64, i64::MAX, i64::MIN, -1, 1, i64::MIN / 2];
        data.resize(CHUNK_SZ, 0);
        round_trip(&data);
    }
}
