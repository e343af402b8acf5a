pub fn to_zigzag(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

pub fn from_zigzag(v: u64) -> i64 {
    (v >> 1) as i64 ^ (-((v & 1) as i64))
}
