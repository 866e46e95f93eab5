use std::fmt;
use std::time::Duration;

use crate::proto::Error;
use crate::types::RedisResult;
use crate::Client;

const DEFAULT_PORT: u16 = 6379;

/// Everything needed to open a connection to one Redis server.
#[derive(Clone, Default, PartialEq)]
pub(crate) struct ConnectionInfo {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) tls: bool,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) database: Option<u16>,
    pub(crate) client_name: Option<String>,
    pub(crate) connection_timeout: Option<Duration>,
    pub(crate) read_timeout: Option<Duration>,
    pub(crate) write_timeout: Option<Duration>,
}

impl ConnectionInfo {
    /// Parses `redis://[[username]:password@]host[:port][/db]` (or `rediss://`).
    pub(crate) fn parse(address: &str) -> Result<Self, Error> {
        let parsed = url::Url::parse(address)
            .map_err(|e| Error::invalid_argument(format!("invalid address format: {}", e)))?;

        let tls = match parsed.scheme() {
            "redis" => false,
            "rediss" => true,
            _ => {
                return Err(Error::invalid_argument(
                    "invalid scheme, expected redis:// or rediss://",
                ))
            }
        };

        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| Error::invalid_argument("missing host in address"))?;
        let host = host.trim_start_matches('[').trim_end_matches(']').to_string();

        let username = decode_credential(parsed.username())?;
        let password = decode_credential(parsed.password().unwrap_or_default())?;

        let database = match parsed.path().trim_matches('/') {
            "" => None,
            db => Some(db.parse::<u16>().map_err(|_| {
                Error::invalid_argument(format!("invalid database index: {}", db))
            })?),
        };

        Ok(Self {
            host,
            port: parsed.port().unwrap_or(DEFAULT_PORT),
            tls,
            username,
            password,
            database,
            ..Self::default()
        })
    }

    /// `host:port` for socket connects.
    pub(crate) fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Userinfo in a URL is percent-encoded; an empty value counts as absent.
fn decode_credential(raw: &str) -> Result<Option<String>, Error> {
    if raw.is_empty() {
        return Ok(None);
    }
    let decoded = urlencoding::decode(raw)
        .map_err(|_| Error::invalid_argument("credentials in address are not valid UTF-8"))?;
    Ok(Some(decoded.into_owned()))
}

impl fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("client_name", &self.client_name)
            .field("connection_timeout", &self.connection_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .finish()
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// Values set on the builder override the matching parts of the address.
/// Building never touches the network; the connection is opened by the first
/// command.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use simple_redis::ClientBuilder;
///
/// let mut client = ClientBuilder::new()
///     .address("redis://localhost:6379")
///     .password("secret")
///     .database(2)
///     .read_timeout(Some(Duration::from_secs(5)))
///     .build()
///     .unwrap();
/// client.set("key", "value").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    address: Option<String>,
    password: Option<String>,
    username: Option<String>,
    database: Option<u16>,
    client_name: Option<String>,
    connection_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    tls: bool,
}

impl ClientBuilder {
    /// Creates a new [`ClientBuilder`] instance.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Redis server address.
    ///
    /// # Arguments
    ///
    /// * `address` - Redis address in format `redis://host:port` or `rediss://host:port` for TLS
    #[inline]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the password for authentication.
    #[inline]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the username for ACL authentication.
    #[inline]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the Redis database number to select after connecting.
    #[inline]
    pub fn database(mut self, database: u16) -> Self {
        self.database = Some(database);
        self
    }

    /// Sets the client connection name displayed in `CLIENT LIST`.
    #[inline]
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Sets the maximum time to wait for the TCP (and TLS) handshake.
    #[inline]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    /// Sets the read timeout for command replies. `None` means no timeout.
    ///
    /// Does not apply to [`Client::fetch_messages`], which is bounded by
    /// [`Interrupts`](crate::Interrupts) instead.
    #[inline]
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the write timeout for commands. `None` means no timeout.
    #[inline]
    pub fn write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Enables TLS even when the address uses the `redis://` scheme.
    #[inline]
    pub fn tls(mut self, enabled: bool) -> Self {
        self.tls = enabled;
        self
    }

    fn into_connection_info(self) -> Result<ConnectionInfo, Error> {
        let address = self
            .address
            .ok_or_else(|| Error::invalid_argument("address is required"))?;

        let mut info = ConnectionInfo::parse(&address)?;
        info.tls |= self.tls;
        if self.username.is_some() {
            info.username = self.username;
        }
        if self.password.is_some() {
            info.password = self.password;
        }
        if self.database.is_some() {
            info.database = self.database;
        }
        info.client_name = self.client_name;
        info.connection_timeout = self.connection_timeout;
        info.read_timeout = self.read_timeout;
        info.write_timeout = self.write_timeout;

        if info.tls && !cfg!(feature = "tls") {
            return Err(Error::invalid_argument(
                "TLS connections require the `tls` feature",
            ));
        }

        Ok(info)
    }

    /// Builds the [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidArgument`](crate::proto::Error::InvalidArgument) error
    /// if the address is missing or malformed.
    pub fn build(self) -> RedisResult<Client> {
        let info = self.into_connection_info()?;
        Client::with_connection_info(info)
    }
}
