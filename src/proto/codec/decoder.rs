use bytes::{Buf, Bytes, BytesMut};

use crate::proto::error::DecodeError;
use crate::proto::frame::Frame;

const DEFAULT_MAX_FRAME_SIZE: usize = 512 * 1024 * 1024; // 512 MB default

/// Deepest array nesting accepted in a single frame.
pub const MAX_NESTING_DEPTH: usize = 512;

/// A RESP decoder that converts bytes to [`Frame`] values.
///
/// The decoder handles streaming input. Call [`append`](Decoder::append) to add
/// data, then [`decode`](Decoder::decode) to parse frames. Bytes are only
/// consumed once a whole frame is available, so a frame split across several
/// reads decodes the same as one delivered at once.
///
/// Completeness is checked by a scan that remembers how far it got, so a large
/// reply arriving in many reads is only walked once before it is parsed.
///
/// # Example
///
/// ```
/// use simple_redis::proto::codec::Decoder;
/// use simple_redis::proto::frame::Frame;
///
/// let mut decoder = Decoder::new();
/// decoder.append(b"+OK\r\n");
/// let frame = decoder.decode().unwrap().unwrap();
/// assert_eq!(frame, Frame::SimpleString(b"OK".to_vec()));
/// ```
#[derive(Debug)]
pub struct Decoder {
    buf: BytesMut,
    max_frame_size: usize,
    scan: Scan,
}

/// Progress of the completeness scan over the frame at the head of the buffer.
#[derive(Debug, Default)]
struct Scan {
    /// Offset of the first element not yet known to be complete.
    pos: usize,
    /// Elements still missing from each open array, innermost last.
    pending: Vec<usize>,
}

impl Decoder {
    /// Creates a new decoder with an empty buffer.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Creates a new decoder with a custom maximum frame size in bytes.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            max_frame_size,
            scan: Scan::default(),
        }
    }

    /// Appends raw bytes received from the network.
    pub fn append(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Number of buffered bytes not yet decoded.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Attempts to decode a frame from the buffer.
    ///
    /// Returns `Ok(Some(Frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, and an error if the data is
    /// malformed.
    pub fn decode(&mut self) -> Result<Option<Frame>, DecodeError> {
        if !self.scan()? {
            if self.buf.len() > self.max_frame_size {
                return Err(DecodeError::new("buffer size exceeded maximum frame size"));
            }
            return Ok(None);
        }

        let mut pos = 0;
        let frame = self.parse(&mut pos)?;
        self.scan = Scan::default();
        self.buf.advance(pos);
        Ok(Some(frame))
    }

    /// Walks the head frame without building it, resuming where the last call
    /// stopped. Returns true once the whole frame is buffered.
    fn scan(&mut self) -> Result<bool, DecodeError> {
        let buf = &self.buf[..];
        let scan = &mut self.scan;

        loop {
            let Some(&prefix) = buf.get(scan.pos) else {
                return Ok(false);
            };
            let Some(end) = find_crlf(buf, scan.pos + 1) else {
                return Ok(false);
            };
            let body = &buf[scan.pos + 1..end];
            let next = end + 2;

            match prefix {
                b'+' | b'-' => scan.pos = next,
                b':' => {
                    parse_int(body)?;
                    scan.pos = next;
                }
                b'$' => match bulk_len(body, self.max_frame_size)? {
                    None => scan.pos = next,
                    Some(len) => {
                        if buf.len() < next + len + 2 {
                            return Ok(false);
                        }
                        if &buf[next + len..next + len + 2] != b"\r\n" {
                            return Err(DecodeError::new("bulk string not terminated by CRLF"));
                        }
                        scan.pos = next + len + 2;
                    }
                },
                b'*' => match array_len(body, self.max_frame_size)? {
                    Some(len) if len > 0 => {
                        if scan.pending.len() >= MAX_NESTING_DEPTH {
                            return Err(DecodeError::new("array nesting exceeds maximum depth"));
                        }
                        scan.pending.push(len);
                        scan.pos = next;
                        continue;
                    }
                    _ => scan.pos = next,
                },
                other => {
                    return Err(DecodeError::new(format!(
                        "unknown frame type: {}",
                        other as char
                    )))
                }
            }

            // one element finished, close every array it completes
            loop {
                match scan.pending.last_mut() {
                    None => return Ok(true),
                    Some(remaining) => {
                        *remaining -= 1;
                        if *remaining > 0 {
                            break;
                        }
                        scan.pending.pop();
                    }
                }
            }
        }
    }

    /// Builds the frame starting at `pos`. Only called once [`scan`](Self::scan)
    /// has seen the whole frame, which also bounds the recursion depth.
    fn parse(&self, pos: &mut usize) -> Result<Frame, DecodeError> {
        let prefix = *self.buf.get(*pos).ok_or_else(truncated)?;
        let end = find_crlf(&self.buf, *pos + 1).ok_or_else(truncated)?;
        let body = &self.buf[*pos + 1..end];
        let next = end + 2;

        let frame = match prefix {
            b'+' => Frame::SimpleString(body.to_vec()),
            b'-' => Frame::Error(body.to_vec()),
            b':' => Frame::Integer(parse_int(body)?),
            b'$' => match bulk_len(body, self.max_frame_size)? {
                None => Frame::BulkString(None),
                Some(len) => {
                    let data = self.buf.get(next..next + len).ok_or_else(truncated)?;
                    *pos = next + len + 2;
                    return Ok(Frame::BulkString(Some(Bytes::copy_from_slice(data))));
                }
            },
            b'*' => match array_len(body, self.max_frame_size)? {
                None => Frame::Null,
                Some(len) => {
                    let mut cursor = next;
                    let mut items = Vec::with_capacity(len.min(1024));
                    for _ in 0..len {
                        items.push(self.parse(&mut cursor)?);
                    }
                    *pos = cursor;
                    return Ok(Frame::Array(items));
                }
            },
            other => {
                return Err(DecodeError::new(format!(
                    "unknown frame type: {}",
                    other as char
                )))
            }
        };

        *pos = next;
        Ok(frame)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

fn truncated() -> DecodeError {
    DecodeError::new("truncated frame")
}

fn find_crlf(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(2)
        .position(|window| window == b"\r\n")
        .map(|offset| from + offset)
}

/// Length of a bulk string header, `None` for the null bulk string.
fn bulk_len(body: &[u8], max_frame_size: usize) -> Result<Option<usize>, DecodeError> {
    let len = parse_int(body)?;
    if len == -1 {
        return Ok(None);
    }
    let len = usize::try_from(len)
        .map_err(|_| DecodeError::new(format!("invalid bulk length: {}", len)))?;
    if len > max_frame_size {
        return Err(DecodeError::new(
            "bulk string length exceeds maximum frame size",
        ));
    }
    Ok(Some(len))
}

/// Length of an array header, `None` for the null array.
fn array_len(body: &[u8], max_frame_size: usize) -> Result<Option<usize>, DecodeError> {
    let len = parse_int(body)?;
    if len == -1 {
        return Ok(None);
    }
    let len = usize::try_from(len)
        .map_err(|_| DecodeError::new(format!("invalid array length: {}", len)))?;
    // at least 4 bytes per element (":0\r\n")
    if len > max_frame_size / 4 {
        return Err(DecodeError::new("array length exceeds reasonable maximum"));
    }
    Ok(Some(len))
}

fn parse_int(body: &[u8]) -> Result<i64, DecodeError> {
    std::str::from_utf8(body)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            DecodeError::new(format!(
                "invalid integer: {}",
                String::from_utf8_lossy(body)
            ))
        })
}
