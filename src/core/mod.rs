//! # Core
//!
//! The blocking [`Client`] and the connection layer underneath it.
//!
//! ## Modules
//!
//! - `builder` - Connection configuration and [`ClientBuilder`]
//! - `command` - Command frames and reply conversion
//! - `commands` - One method per Redis command
//! - `connection` - Frame I/O over a single socket
//! - `message` - Pub/sub messages
//! - `runtime` - The runtime blocking calls are driven on
//! - `subscriber` - Subscription membership and the pub/sub connection
//!

use std::str::FromStr;

use tracing::{debug, warn};

use crate::proto::frame::Frame;
use crate::proto::{Error, Result};
use crate::types::{
    Interrupts, Message, RedisBoolResult, RedisEmptyResult, RedisError, RedisResult,
    RedisStringResult,
};

pub(crate) mod builder;
pub(crate) mod command;
mod commands;
pub(crate) mod connection;
pub(crate) mod message;
mod runtime;
mod subscriber;

pub use builder::ClientBuilder;
pub use command::FromRedisValue;
pub use message::Msg;

use builder::ConnectionInfo;
use command::Cmd;
use connection::{Connection, Stream};
use runtime::BlockingRuntime;
use subscriber::Subscriber;

cfg_if::cfg_if! {
    if #[cfg(feature = "tls")] {
        mod tls;
        pub(crate) use tls::TlsConnectorInner;
    }
}

/// Blocking Redis client.
///
/// The client connects lazily: [`create`](crate::create) only validates the
/// connection string, and the first command opens the socket. Before every
/// command the existing connection is checked with `PING` and reopened if it
/// went away. Pub/sub uses a second connection owned by the client.
///
/// # Example
///
/// ```no_run
/// let mut client = simple_redis::create("redis://127.0.0.1:6379/").unwrap();
/// client.set("my_key", "my_value").unwrap();
/// let value = client.get_string("my_key").unwrap();
/// assert_eq!(value, "my_value");
/// ```
#[derive(Debug)]
pub struct Client {
    info: ConnectionInfo,
    connection: Option<Connection<Stream>>,
    subscriber: Subscriber,
    runtime: BlockingRuntime,
}

async fn ensure_connection<'a>(
    slot: &'a mut Option<Connection<Stream>>,
    info: &ConnectionInfo,
) -> Result<&'a mut Connection<Stream>> {
    let alive = match slot.as_mut() {
        Some(connection) => connection.ping().await.is_ok(),
        None => false,
    };

    if !alive {
        if slot.take().is_some() {
            warn!(addr = %info.addr(), "connection lost, reconnecting");
        }
        let connection = Connection::open(info).await?;
        return Ok(slot.insert(connection));
    }

    slot.as_mut()
        .ok_or_else(|| Error::protocol("connection unavailable"))
}

async fn run_command_on_connection(
    slot: &mut Option<Connection<Stream>>,
    info: &ConnectionInfo,
    cmd: Cmd,
) -> Result<Frame> {
    let connection = ensure_connection(slot, info).await?;
    match connection.execute(cmd).await {
        Ok(frame) => Ok(frame),
        Err(error) => {
            if error.is_connection_error() {
                warn!(%error, "dropping broken connection");
                *slot = None;
            }
            Err(error)
        }
    }
}

impl Client {
    pub(crate) fn with_connection_info(info: ConnectionInfo) -> RedisResult<Client> {
        let runtime = BlockingRuntime::new()?;

        debug!(?info, "client created");
        Ok(Client {
            info,
            connection: None,
            subscriber: Subscriber::new(),
            runtime,
        })
    }

    /// Returns true if the command connection is open and answers `PING`.
    pub fn is_connection_open(&mut self) -> bool {
        let Client {
            connection, runtime, ..
        } = self;

        let open = match connection.as_mut() {
            Some(connection) => runtime.block_on(connection.ping()).is_ok(),
            None => false,
        };
        if !open {
            *connection = None;
        }
        open
    }

    /// Closes the command connection and unsubscribes from all channels and
    /// patterns.
    ///
    /// The client stays usable: the next command opens a new connection.
    pub fn quit(&mut self) -> RedisEmptyResult {
        let result = if self.is_connection_open() {
            self.run_command_empty_response("QUIT", vec![])
        } else {
            Ok(())
        };
        self.connection = None;

        let unsubscribed = self.unsubscribe_all();
        result.and(unsubscribed)
    }

    /// Invokes the requested command with the provided arguments and converts
    /// the reply into `T`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # let mut client = simple_redis::create("redis://127.0.0.1:6379/").unwrap();
    /// let length: i64 = client.run_command("STRLEN", vec!["my_key"]).unwrap();
    /// ```
    pub fn run_command<T: FromRedisValue>(
        &mut self,
        command: &str,
        args: Vec<&str>,
    ) -> RedisResult<T> {
        let cmd = Cmd::from_parts(command, &args);
        let Client {
            info,
            connection,
            runtime,
            ..
        } = self;

        let reply = runtime.block_on(run_command_on_connection(connection, info, cmd))?;
        Ok(T::from_frame(reply)?)
    }

    /// Invokes the requested command and parses the string reply with
    /// [`FromStr`].
    pub fn run_command_from_string_response<T: FromStr>(
        &mut self,
        command: &str,
        args: Vec<&str>,
    ) -> RedisResult<T> {
        let value = self.run_command::<String>(command, args)?;
        T::from_str(&value).map_err(|_| RedisError::Description("Unable to parse output value."))
    }

    /// Invokes the requested command and ignores the reply.
    pub fn run_command_empty_response(
        &mut self,
        command: &str,
        args: Vec<&str>,
    ) -> RedisEmptyResult {
        self.run_command(command, args)
    }

    /// Invokes the requested command and returns the reply as a string.
    pub fn run_command_string_response(
        &mut self,
        command: &str,
        args: Vec<&str>,
    ) -> RedisStringResult {
        self.run_command(command, args)
    }

    /// Invokes the requested command and returns the reply as a boolean.
    pub fn run_command_bool_response(
        &mut self,
        command: &str,
        args: Vec<&str>,
    ) -> RedisBoolResult {
        self.run_command(command, args)
    }

    /// Subscribes to the provided channel.
    ///
    /// The subscription takes effect on the next
    /// [`fetch_messages`](Client::fetch_messages), or immediately when a
    /// fetch has already opened the pub/sub connection.
    pub fn subscribe(&mut self, channel: &str) -> RedisEmptyResult {
        self.subscriber.subscribe(&self.runtime, channel)
    }

    /// Subscribes to the provided channel pattern.
    pub fn psubscribe(&mut self, pattern: &str) -> RedisEmptyResult {
        self.subscriber.psubscribe(&self.runtime, pattern)
    }

    /// Returns true if subscribed to the provided channel.
    pub fn is_subscribed(&self, channel: &str) -> bool {
        self.subscriber.is_subscribed(channel)
    }

    /// Returns true if subscribed to the provided channel pattern.
    pub fn is_psubscribed(&self, pattern: &str) -> bool {
        self.subscriber.is_psubscribed(pattern)
    }

    /// Unsubscribes from the provided channel. Unknown channels are ignored.
    pub fn unsubscribe(&mut self, channel: &str) -> RedisEmptyResult {
        self.subscriber.unsubscribe(&self.runtime, channel)
    }

    /// Unsubscribes from the provided channel pattern.
    pub fn punsubscribe(&mut self, pattern: &str) -> RedisEmptyResult {
        self.subscriber.punsubscribe(&self.runtime, pattern)
    }

    /// Unsubscribes from all channels and patterns and closes the pub/sub
    /// connection.
    pub fn unsubscribe_all(&mut self) -> RedisEmptyResult {
        self.subscriber.unsubscribe_all()
    }

    /// Blocks and delivers messages from the subscribed channels and patterns.
    ///
    /// Before every wait `poll_interrupts` is called; the loop returns `Ok`
    /// once it reports `stop`, and a single wait lasts at most its
    /// `next_polling_time`. The loop also returns `Ok` when `on_message`
    /// returns `true`.
    ///
    /// # Errors
    ///
    /// Fails when nothing is subscribed, and on connection or protocol
    /// errors. After an error the pub/sub connection is closed; the next call
    /// reconnects and subscribes again.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # let mut client = simple_redis::create("redis://127.0.0.1:6379/").unwrap();
    /// client.subscribe("important_notifications").unwrap();
    /// client
    ///     .fetch_messages(
    ///         &mut |message: simple_redis::Message| -> bool {
    ///             let payload: String = message.get_payload().unwrap();
    ///             println!("Got message: {}", payload);
    ///             true
    ///         },
    ///         &mut || -> simple_redis::Interrupts { simple_redis::Interrupts::new() },
    ///     )
    ///     .unwrap();
    /// ```
    pub fn fetch_messages(
        &mut self,
        on_message: &mut dyn FnMut(Message) -> bool,
        poll_interrupts: &mut dyn FnMut() -> Interrupts,
    ) -> RedisEmptyResult {
        self.subscriber
            .fetch_messages(&self.runtime, &self.info, on_message, poll_interrupts)
    }
}
