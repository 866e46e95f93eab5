use bytes::Bytes;

/// A RESP (Redis Serialization Protocol) frame.
///
/// This enum represents all frame types defined in RESP2:
/// - SimpleString: Status responses like "OK"
/// - Error: Error responses from the server
/// - Integer: Numeric responses
/// - BulkString: Binary-safe string data
/// - Array: Command arguments and array responses
/// - Null: NULL value
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Simple string (+OK).
    SimpleString(Vec<u8>),
    /// Error (-ERR).
    Error(Vec<u8>),
    /// Integer (:1000).
    Integer(i64),
    /// Bulk string ($6\r\nfoobar).
    BulkString(Option<Bytes>),
    /// Array (*2\r\n...).
    Array(Vec<Frame>),
    /// Null ($-1 or *-1).
    Null,
}

impl Frame {
    /// Creates a bulk string frame holding a copy of `data`.
    pub fn bulk(data: impl AsRef<[u8]>) -> Self {
        Frame::BulkString(Some(Bytes::copy_from_slice(data.as_ref())))
    }

    /// Returns true if this frame is a nil reply (`$-1` or `*-1`).
    pub fn is_null(&self) -> bool {
        matches!(self, Frame::Null | Frame::BulkString(None))
    }

    /// Returns the raw bytes of a simple or bulk string frame.
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Frame::SimpleString(s) => Some(Bytes::from(s)),
            Frame::BulkString(b) => b,
            _ => None,
        }
    }

    /// Short name of the frame kind, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::SimpleString(_) => "simple string",
            Frame::Error(_) => "error",
            Frame::Integer(_) => "integer",
            Frame::BulkString(Some(_)) => "bulk string",
            Frame::BulkString(None) | Frame::Null => "nil",
            Frame::Array(_) => "array",
        }
    }
}
