//! Errors raised while reading the binary format.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),

    #[error("{0} trailing bytes after item")]
    TrailingBytes(usize),

    #[error("invalid UTF-8 in text string at offset {0}")]
    InvalidUtf8(usize),

    /// Reserved additional info, indefinite lengths, or unassigned simple values.
    #[error("unsupported encoding 0x{byte:02x} at offset {offset}")]
    Unsupported { byte: u8, offset: usize },

    #[error("nesting deeper than {0} levels")]
    DepthExceeded(u32),

    #[error("length {0} does not fit in memory")]
    LengthOverflow(u64),
}
