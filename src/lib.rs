//! # simple-redis
//!
//! Simple and resilient blocking Redis client.
//!
//! The client opens its connection lazily, checks it before every command and
//! reconnects when it went away. Pub/sub subscriptions are recorded on the
//! client and replayed whenever the pub/sub connection has to be reopened.
//!
//! ## Features
//!
//! - `tls` - TLS connections for `rediss://` addresses
//!
//! ## Example
//!
//! ```no_run
//! fn main() -> Result<(), simple_redis::RedisError> {
//!     let mut client = simple_redis::create("redis://127.0.0.1:6379/")?;
//!
//!     client.set("my_key", "my_value")?;
//!     let value = client.get_string("my_key")?;
//!     println!("my_key = {}", value);
//!
//!     client.set("my_counter", 10)?;
//!     let counter: i64 = client.incr("my_counter")?;
//!     println!("my_counter = {}", counter);
//!
//!     client.quit()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pub/Sub
//!
//! ```no_run
//! use simple_redis::{Interrupts, Message};
//!
//! let mut client = simple_redis::create("redis://127.0.0.1:6379/").unwrap();
//! client.subscribe("important_notifications").unwrap();
//! client.psubscribe("*_notifications").unwrap();
//!
//! client
//!     .fetch_messages(
//!         &mut |message: Message| -> bool {
//!             let payload: String = message.get_payload().unwrap();
//!             println!("{}: {}", message.get_channel_name(), payload);
//!             false
//!         },
//!         &mut || -> Interrupts {
//!             Interrupts {
//!                 next_polling_time: Some(500),
//!                 ..Interrupts::new()
//!             }
//!         },
//!     )
//!     .unwrap();
//! ```

#![warn(missing_docs)]

pub(crate) mod core;
pub mod proto;
pub mod types;

pub use crate::core::{Client, ClientBuilder, FromRedisValue, Msg};
pub use crate::types::{
    Interrupts, Message, RedisArg, RedisBoolResult, RedisEmptyResult, RedisError, RedisResult,
    RedisStringResult,
};

/// Constructs a new Redis client from a connection string.
///
/// The format is `redis://[[username]:password@]host[:port][/db]`, or
/// `rediss://...` for TLS with the `tls` feature enabled. No connection is
/// opened until the first command.
///
/// # Example
///
/// ```
/// match simple_redis::create("redis://127.0.0.1:6379/") {
///     Ok(client) => println!("Created Redis Client"),
///     Err(error) => println!("Unable to create Redis client: {}", error),
/// }
/// ```
pub fn create(connection_string: &str) -> RedisResult<Client> {
    ClientBuilder::new().address(connection_string).build()
}
