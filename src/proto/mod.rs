//! # Protocol
//!
//! RESP2 (Redis Serialization Protocol) support used by the client.
//!
//! ## Modules
//!
//! - [`codec`] - Encoder and decoder for RESP frames
//! - [`error`] - Driver level error types
//! - [`frame`] - Frame types representing RESP data structures

pub mod codec;
/// Error types.
pub mod error;
pub mod frame;

pub use error::{DecodeError, Error, Result};
