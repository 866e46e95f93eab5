use std::str::FromStr;

use bytes::Bytes;

use crate::core::command::FromRedisValue;
use crate::proto::frame::Frame;
use crate::proto::{Error, Result};
use crate::types::{RedisError, RedisResult};

/// A message delivered on a subscribed channel or pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Msg {
    channel: String,
    payload: Bytes,
    pattern: Option<String>,
}

impl Msg {
    /// Creates a message as published on `channel`.
    pub fn new(channel: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
            pattern: None,
        }
    }

    /// Marks the message as received through a pattern subscription.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Interprets a frame read from a subscribed connection.
    ///
    /// Returns `Ok(None)` for subscription confirmations and keep-alive replies.
    pub(crate) fn from_frame(frame: Frame) -> Result<Option<Self>> {
        let items = match frame {
            Frame::Array(items) if !items.is_empty() => items,
            other => {
                return Err(Error::protocol(format!(
                    "invalid pub/sub message format: {:?}",
                    other
                )))
            }
        };

        let mut items = items.into_iter();
        let kind = items
            .next()
            .map(String::from_frame)
            .transpose()?
            .unwrap_or_default();

        match (kind.to_ascii_lowercase().as_str(), items.len()) {
            ("message", 2) => {
                let channel = next_item::<String>(&mut items)?;
                let payload = next_item::<Bytes>(&mut items)?;
                Ok(Some(Msg::new(channel, payload)))
            }
            ("pmessage", 3) => {
                let pattern = next_item::<String>(&mut items)?;
                let channel = next_item::<String>(&mut items)?;
                let payload = next_item::<Bytes>(&mut items)?;
                Ok(Some(Msg::new(channel, payload).with_pattern(pattern)))
            }
            ("subscribe" | "unsubscribe" | "psubscribe" | "punsubscribe" | "pong", _) => Ok(None),
            (kind, _) => Err(Error::protocol(format!(
                "unknown pub/sub message type: {}",
                kind
            ))),
        }
    }

    /// The channel the message was published on.
    pub fn get_channel_name(&self) -> &str {
        &self.channel
    }

    /// Parses the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RedisError::Description`] when the payload is not valid UTF-8
    /// or does not parse as `T`.
    pub fn get_payload<T: FromStr>(&self) -> RedisResult<T> {
        std::str::from_utf8(&self.payload)
            .ok()
            .and_then(|text| text.parse::<T>().ok())
            .ok_or(RedisError::Description("Unable to parse output value."))
    }

    /// The raw payload bytes.
    pub fn get_payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Whether the message was received through a pattern subscription.
    pub fn from_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// Parses the matching subscription pattern into `T`.
    pub fn get_pattern<T: FromStr>(&self) -> RedisResult<T> {
        let pattern = self.pattern.as_deref().ok_or(RedisError::Description(
            "Message was not received through a pattern subscription.",
        ))?;
        pattern
            .parse::<T>()
            .map_err(|_| RedisError::Description("Unable to parse output value."))
    }

    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

fn next_item<T: FromRedisValue>(items: &mut impl Iterator<Item = Frame>) -> Result<T> {
    let frame = items
        .next()
        .ok_or_else(|| Error::protocol("truncated pub/sub message"))?;
    T::from_frame(frame)
}
