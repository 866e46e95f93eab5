//! Public error, result and argument types.

use crate::proto;

/// Error returned by every [`Client`](crate::Client) operation.
#[derive(Debug, thiserror::Error)]
pub enum RedisError {
    /// Root driver error: I/O, protocol, server reply or conversion failure.
    #[error("{0}")]
    RedisError(#[from] proto::Error),

    /// Description text of the error reason.
    #[error("{0}")]
    Description(&'static str),
}

/// Values that can be sent as a command argument.
///
/// Arguments are written in their [`ToString`] form.
pub trait RedisArg: Sized + ToString {}

impl RedisArg for &str {}
impl RedisArg for String {}

macro_rules! as_redis_arg {
    ($($t:ty),*) => {
        $(impl RedisArg for $t {})*
    };
}

as_redis_arg!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Pub/sub message delivered to [`Client::fetch_messages`](crate::Client::fetch_messages).
pub type Message = crate::core::message::Msg;

/// Redis result which either holds a value or a Redis error.
pub type RedisResult<T> = Result<T, RedisError>;

/// Holds empty result or error.
pub type RedisEmptyResult = RedisResult<()>;

/// Holds string result or error.
pub type RedisStringResult = RedisResult<String>;

/// Holds bool result or error.
pub type RedisBoolResult = RedisResult<bool>;

/// Controls a blocking [`Client::fetch_messages`](crate::Client::fetch_messages) loop.
///
/// The loop asks its poll callback for a fresh value before every wait.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interrupts {
    /// Ends the loop at the next poll.
    pub stop: bool,
    /// Longest time in milliseconds a single wait may block before polling
    /// again. `None` waits until a message arrives.
    pub next_polling_time: Option<u64>,
}

impl Interrupts {
    /// Returns a new instance: not stopped, no polling limit.
    pub fn new() -> Interrupts {
        Default::default()
    }
}
