//! RESP codec.
//!
//! [`Encoder`] turns [`Frame`](crate::proto::frame::Frame) values into bytes,
//! [`Decoder`] turns a byte stream back into frames.

/// Decoder implementation.
pub mod decoder;
/// Encoder implementation.
pub mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;
