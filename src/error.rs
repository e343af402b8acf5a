use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// No room left for another chunk or value. The caller should commit
    /// this block and move on to a fresh one.
    Overflow,
    /// Buffer handed to the writer or reader cannot hold a block header.
    BadArgument,
    /// Truncated or malformed block contents. Terminal for the block.
    Corrupt,
    /// Operation is invalid in the block's current lifecycle state.
    StateError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Error::Overflow => "out of free space",
            Error::BadArgument => "buffer too small",
            Error::Corrupt => "corrupted block data",
            Error::StateError => "operation invalid in current state",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}
