use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::core::builder::ConnectionInfo;
use crate::core::command;
use crate::core::connection::{Connection, Stream};
use crate::core::runtime::BlockingRuntime;
use crate::core::message::Msg;
use crate::proto::frame::Frame;
use crate::proto::Result;
use crate::types::{Interrupts, Message, RedisEmptyResult, RedisError};

/// Channel and pattern membership plus the dedicated pub/sub connection.
///
/// Subscriptions made while no pub/sub connection is open are only recorded.
/// The connection is opened by [`fetch_messages`](Subscriber::fetch_messages),
/// which then subscribes to everything recorded so far; the same happens after
/// a connection failure.
#[derive(Debug, Default)]
pub(crate) struct Subscriber {
    subscriptions: HashSet<String>,
    psubscriptions: HashSet<String>,
    pubsub: Option<Connection<Stream>>,
}

impl Subscriber {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(
        &mut self,
        runtime: &BlockingRuntime,
        channel: &str,
    ) -> RedisEmptyResult {
        self.subscriptions.insert(channel.to_string());
        self.forward(runtime, "SUBSCRIBE", channel);
        Ok(())
    }

    pub(crate) fn psubscribe(
        &mut self,
        runtime: &BlockingRuntime,
        pattern: &str,
    ) -> RedisEmptyResult {
        self.psubscriptions.insert(pattern.to_string());
        self.forward(runtime, "PSUBSCRIBE", pattern);
        Ok(())
    }

    pub(crate) fn unsubscribe(
        &mut self,
        runtime: &BlockingRuntime,
        channel: &str,
    ) -> RedisEmptyResult {
        if self.subscriptions.remove(channel) {
            self.forward(runtime, "UNSUBSCRIBE", channel);
        }
        Ok(())
    }

    pub(crate) fn punsubscribe(
        &mut self,
        runtime: &BlockingRuntime,
        pattern: &str,
    ) -> RedisEmptyResult {
        if self.psubscriptions.remove(pattern) {
            self.forward(runtime, "PUNSUBSCRIBE", pattern);
        }
        Ok(())
    }

    pub(crate) fn unsubscribe_all(&mut self) -> RedisEmptyResult {
        self.subscriptions.clear();
        self.psubscriptions.clear();
        if self.pubsub.take().is_some() {
            debug!("pub/sub connection closed");
        }
        Ok(())
    }

    pub(crate) fn is_subscribed(&self, channel: &str) -> bool {
        self.subscriptions.contains(channel)
    }

    pub(crate) fn is_psubscribed(&self, pattern: &str) -> bool {
        self.psubscriptions.contains(pattern)
    }

    /// Sends a membership change on the live connection, if there is one.
    ///
    /// A failed write drops the connection; the recorded membership is
    /// replayed when the next fetch reconnects.
    fn forward(&mut self, runtime: &BlockingRuntime, name: &'static str, target: &str) {
        let Some(connection) = self.pubsub.as_mut() else {
            debug!(command = name, channel = %target, "pub/sub change recorded");
            return;
        };

        let target = target.to_string();
        let cmd = command::pubsub(name, [&target]);
        if let Err(error) = runtime.block_on(connection.send(cmd)) {
            warn!(command = name, %error, "pub/sub connection dropped");
            self.pubsub = None;
        }
    }

    #[instrument(skip_all, level = "debug")]
    pub(crate) fn fetch_messages(
        &mut self,
        runtime: &BlockingRuntime,
        info: &ConnectionInfo,
        on_message: &mut dyn FnMut(Message) -> bool,
        poll_interrupts: &mut dyn FnMut() -> Interrupts,
    ) -> RedisEmptyResult {
        if self.subscriptions.is_empty() && self.psubscriptions.is_empty() {
            return Err(RedisError::Description("No subscriptions defined."));
        }

        loop {
            let interrupts = poll_interrupts();
            if interrupts.stop {
                return Ok(());
            }

            let limit = interrupts.next_polling_time.map(Duration::from_millis);
            let message = match self.next_frame(runtime, info, limit) {
                Ok(Some(frame)) => Msg::from_frame(frame),
                Ok(None) => continue,
                Err(error) => Err(error),
            };

            let message = match message {
                Ok(Some(message)) => message,
                Ok(None) => continue,
                Err(error) => {
                    warn!(%error, "pub/sub connection dropped");
                    self.pubsub = None;
                    return Err(error.into());
                }
            };

            if !self.accepts(&message) {
                debug!(
                    channel = message.get_channel_name(),
                    "dropping message for stale subscription"
                );
                continue;
            }

            if on_message(message) {
                return Ok(());
            }
        }
    }

    fn accepts(&self, message: &Msg) -> bool {
        match message.pattern() {
            Some(pattern) => self.psubscriptions.contains(pattern),
            None => self.subscriptions.contains(message.get_channel_name()),
        }
    }

    /// Waits up to `limit` for the next frame, opening and subscribing the
    /// connection first when needed.
    fn next_frame(
        &mut self,
        runtime: &BlockingRuntime,
        info: &ConnectionInfo,
        limit: Option<Duration>,
    ) -> Result<Option<Frame>> {
        let Self {
            subscriptions,
            psubscriptions,
            pubsub,
        } = self;

        runtime.block_on(async {
            if pubsub.is_none() {
                *pubsub = Some(open_subscribed(info, subscriptions, psubscriptions).await?);
            }

            match pubsub.as_mut() {
                Some(connection) => connection.read_frame_within(limit).await,
                None => Ok(None),
            }
        })
    }
}

async fn open_subscribed(
    info: &ConnectionInfo,
    subscriptions: &HashSet<String>,
    psubscriptions: &HashSet<String>,
) -> Result<Connection<Stream>> {
    let mut connection = Connection::open(info).await?;
    if !subscriptions.is_empty() {
        connection
            .send(command::pubsub("SUBSCRIBE", subscriptions))
            .await?;
    }
    if !psubscriptions.is_empty() {
        connection
            .send(command::pubsub("PSUBSCRIBE", psubscriptions))
            .await?;
    }
    debug!(
        channels = subscriptions.len(),
        patterns = psubscriptions.len(),
        "pub/sub connection subscribed"
    );
    Ok(connection)
}
