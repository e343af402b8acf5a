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

//! Value-by-value compressors over a shared byte stream. Each writer holds
//! only its own filter state and takes the stream as an argument, so several
//! compressors can interleave chunks through one cursor.

pub mod delta_of_delta;
pub mod fcm;
pub mod signed;
pub mod timestamps;
pub mod utils;

pub use delta_of_delta::{DeltaDeltaReader, DeltaDeltaWriter};
pub use fcm::{FcmPredictor, FcmReader, FcmWriter};
pub use signed::{ZigZagDeltaRleReader, ZigZagDeltaRleWriter};
pub use timestamps::{DeltaRleReader, DeltaRleWriter};

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::{CHUNK_SZ, FCM_TABLE_SZ};
    use crate::stream::{StreamReader, StreamWriter};

    // Two compressors interleaving chunks through one cursor, the way the
    // block codec lays out its payload.
    #[test]
    fn interleaved_chunks_share_one_stream() {
        let timestamps: Vec<u64> = (0..CHUNK_SZ as u64 * 2).map(|k| 1_000 + 500 * k).collect();
        let values: Vec<f64> = (0..CHUNK_SZ * 2).map(|k| (k as f64 / 7.0).cos()).collect();

        let mut buf = vec![0u8; 4096];
        let mut stream = StreamWriter::new(&mut buf);
        let mut ts_writer = DeltaRleWriter::new();
        let mut val_writer = FcmWriter::new(FCM_TABLE_SZ);
        for chunk in 0..2 {
            let lo = chunk * CHUNK_SZ;
            let ts_chunk: &[u64; CHUNK_SZ] = timestamps[lo..lo + CHUNK_SZ].try_into().unwrap();
            let val_chunk: &[f64; CHUNK_SZ] = values[lo..lo + CHUNK_SZ].try_into().unwrap();
            ts_writer.tput(&mut stream, ts_chunk).unwrap();
            val_writer.tput(&mut stream, val_chunk).unwrap();
        }
        let used = stream.len();

        let mut reader = StreamReader::new(&buf[..used]);
        let mut ts_reader = DeltaRleReader::new();
        let mut val_reader = FcmReader::new(FCM_TABLE_SZ);
        for chunk in 0..2 {
            let lo = chunk * CHUNK_SZ;
            for i in 0..CHUNK_SZ {
                assert_eq!(ts_reader.next(&mut reader).unwrap(), timestamps[lo + i]);
            }
            for i in 0..CHUNK_SZ {
                let got = val_reader.next(&mut reader).unwrap();
                assert_eq!(got.to_bits(), values[lo + i].to_bits());
            }
        }
        assert_eq!(reader.space_left(), 0);
    }
}
