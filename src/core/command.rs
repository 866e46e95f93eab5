use std::collections::HashMap;
use std::hash::Hash;

use bytes::Bytes;

use crate::proto::frame::Frame;
use crate::proto::{Error, Result};

/// A command ready to be sent to Redis.
///
/// Commands are built with [`Cmd::new`] and [`Cmd::arg`] and converted to a
/// RESP array of bulk strings with [`Cmd::into_frame`].
#[derive(Debug, Clone)]
pub struct Cmd {
    args: Vec<Bytes>,
}

impl Cmd {
    /// Creates a new command with the given name (e.g. "GET").
    #[inline]
    pub fn new(name: impl Into<Bytes>) -> Self {
        Self {
            args: vec![name.into()],
        }
    }

    /// Builds a command from borrowed name and arguments.
    pub fn from_parts(name: &str, args: &[&str]) -> Self {
        let mut cmd = Cmd::new(Bytes::copy_from_slice(name.as_bytes()));
        cmd.args.reserve(args.len());
        for arg in args {
            cmd = cmd.arg(Bytes::copy_from_slice(arg.as_bytes()));
        }
        cmd
    }

    /// Appends an argument to the command.
    #[inline]
    pub fn arg<T: Into<Bytes>>(mut self, arg: T) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The command name as sent on the wire.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.args[0]).into_owned()
    }

    /// Converts the command to a RESP Array frame.
    #[inline]
    pub fn into_frame(self) -> Frame {
        Frame::Array(
            self.args
                .into_iter()
                .map(|b| Frame::BulkString(Some(b)))
                .collect(),
        )
    }
}

/// Creates a PING command.
#[inline]
pub fn ping() -> Cmd {
    Cmd::new("PING")
}

/// Creates an AUTH command, with a username for ACL style authentication.
pub fn auth(username: Option<&str>, password: &str) -> Cmd {
    let cmd = Cmd::new("AUTH");
    let cmd = match username {
        Some(username) => cmd.arg(username.to_owned()),
        None => cmd,
    };
    cmd.arg(password.to_owned())
}

/// Creates a SELECT command.
#[inline]
pub fn select(db: u16) -> Cmd {
    Cmd::new("SELECT").arg(db.to_string())
}

/// Creates a CLIENT SETNAME command.
#[inline]
pub fn client_setname(name: &str) -> Cmd {
    Cmd::new("CLIENT").arg("SETNAME").arg(name.to_owned())
}

/// Creates a pub/sub membership command (SUBSCRIBE, PSUBSCRIBE, UNSUBSCRIBE, PUNSUBSCRIBE).
pub fn pubsub<'a>(name: &'static str, channels: impl IntoIterator<Item = &'a String>) -> Cmd {
    channels
        .into_iter()
        .fold(Cmd::new(name), |cmd, channel| cmd.arg(channel.clone()))
}

/// Turns a server error reply into an [`Error::Server`].
#[inline]
pub fn parse_frame_response(frame: Frame) -> Result<Frame> {
    match frame {
        Frame::Error(e) => Err(Error::server(&e)),
        _ => Ok(frame),
    }
}

/// Conversion of a reply [`Frame`] into a Rust value.
///
/// Used by [`Client::run_command`](crate::Client::run_command) to shape the
/// reply. Conversions fail with [`Error::TypeMismatch`] when the reply does not
/// fit the requested type.
pub trait FromRedisValue: Sized {
    /// Converts the frame into `Self`.
    fn from_frame(frame: Frame) -> Result<Self>;
}

fn mismatch<T>(expected: &str, frame: &Frame) -> Result<T> {
    Err(Error::type_mismatch(format!(
        "expected {}, got {}",
        expected,
        frame.kind()
    )))
}

impl FromRedisValue for () {
    fn from_frame(_frame: Frame) -> Result<Self> {
        Ok(())
    }
}

impl FromRedisValue for Frame {
    fn from_frame(frame: Frame) -> Result<Self> {
        Ok(frame)
    }
}

impl FromRedisValue for Bytes {
    fn from_frame(frame: Frame) -> Result<Self> {
        match frame {
            Frame::Integer(i) => Ok(Bytes::from(i.to_string())),
            other => {
                let kind = other.kind();
                other.into_bytes().ok_or_else(|| {
                    Error::type_mismatch(format!("expected bytes, got {}", kind))
                })
            }
        }
    }
}

impl FromRedisValue for String {
    fn from_frame(frame: Frame) -> Result<Self> {
        match frame {
            Frame::Integer(i) => Ok(i.to_string()),
            Frame::SimpleString(s) => String::from_utf8(s)
                .map_err(|_| Error::type_mismatch("reply is not valid UTF-8")),
            Frame::BulkString(Some(b)) => String::from_utf8(b.to_vec())
                .map_err(|_| Error::type_mismatch("reply is not valid UTF-8")),
            _ => mismatch("string", &frame),
        }
    }
}

impl FromRedisValue for bool {
    fn from_frame(frame: Frame) -> Result<Self> {
        match frame {
            Frame::Integer(i) => Ok(i != 0),
            Frame::SimpleString(ref s) if s == b"OK" => Ok(true),
            Frame::BulkString(Some(ref b)) if b.as_ref() == b"1" => Ok(true),
            Frame::BulkString(Some(ref b)) if b.as_ref() == b"0" => Ok(false),
            Frame::BulkString(None) | Frame::Null => Ok(false),
            _ => mismatch("boolean", &frame),
        }
    }
}

macro_rules! from_redis_value_integer {
    ($($t:ty),*) => {
        $(
            impl FromRedisValue for $t {
                fn from_frame(frame: Frame) -> Result<Self> {
                    match frame {
                        Frame::Integer(i) => <$t>::try_from(i).map_err(|_| {
                            Error::type_mismatch(format!("{} out of range for {}", i, stringify!($t)))
                        }),
                        Frame::SimpleString(_) | Frame::BulkString(Some(_)) => {
                            let text = String::from_frame(frame)?;
                            text.parse::<$t>().map_err(|_| {
                                Error::type_mismatch(format!("invalid {}: {}", stringify!($t), text))
                            })
                        }
                        _ => mismatch(stringify!($t), &frame),
                    }
                }
            }
        )*
    };
}

from_redis_value_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! from_redis_value_float {
    ($($t:ty),*) => {
        $(
            impl FromRedisValue for $t {
                fn from_frame(frame: Frame) -> Result<Self> {
                    match frame {
                        Frame::Integer(i) => Ok(i as $t),
                        Frame::SimpleString(_) | Frame::BulkString(Some(_)) => {
                            let text = String::from_frame(frame)?;
                            text.parse::<$t>().map_err(|_| {
                                Error::type_mismatch(format!("invalid float value: {}", text))
                            })
                        }
                        _ => mismatch("float", &frame),
                    }
                }
            }
        )*
    };
}

from_redis_value_float!(f32, f64);

impl<T: FromRedisValue> FromRedisValue for Option<T> {
    fn from_frame(frame: Frame) -> Result<Self> {
        if frame.is_null() {
            Ok(None)
        } else {
            T::from_frame(frame).map(Some)
        }
    }
}

impl<T: FromRedisValue> FromRedisValue for Vec<T> {
    fn from_frame(frame: Frame) -> Result<Self> {
        match frame {
            Frame::Array(items) => items.into_iter().map(T::from_frame).collect(),
            Frame::Null => Ok(Vec::new()),
            _ => mismatch("array", &frame),
        }
    }
}

impl<K, V> FromRedisValue for HashMap<K, V>
where
    K: FromRedisValue + Eq + Hash,
    V: FromRedisValue,
{
    fn from_frame(frame: Frame) -> Result<Self> {
        match frame {
            Frame::Array(items) => {
                if items.len() % 2 != 0 {
                    return Err(Error::type_mismatch(
                        "map reply must have an even number of elements",
                    ));
                }
                let mut map = HashMap::with_capacity(items.len() / 2);
                let mut iter = items.into_iter();
                while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                    map.insert(K::from_frame(key)?, V::from_frame(value)?);
                }
                Ok(map)
            }
            Frame::Null => Ok(HashMap::new()),
            _ => mismatch("map", &frame),
        }
    }
}
