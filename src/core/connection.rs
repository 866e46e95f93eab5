use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use crate::core::builder::ConnectionInfo;
use crate::core::command::{self, Cmd};
use crate::proto::codec::{Decoder, Encoder};
use crate::proto::frame::Frame;
use crate::proto::{Error, Result};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// The socket behind a [`Connection`]: plain TCP or, with the `tls` feature, TLS over TCP.
pub(crate) enum Stream {
    Tcp(TcpStream),
    #[cfg(feature = "tls")]
    Tls(Box<tokio_rustls::client::TlsStream<TcpStream>>),
}

impl Stream {
    async fn connect(info: &ConnectionInfo) -> Result<Self> {
        let tcp = TcpStream::connect(info.addr()).await?;
        tcp.set_nodelay(true)?;

        #[cfg(feature = "tls")]
        if info.tls {
            let connector = crate::core::TlsConnectorInner::new()?;
            let stream = connector.connect(&info.host, tcp).await?;
            return Ok(Stream::Tls(Box::new(stream)));
        }

        Ok(Stream::Tcp(tcp))
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Tcp(tcp) => f.debug_tuple("Tcp").field(tcp).finish(),
            #[cfg(feature = "tls")]
            Stream::Tls(_) => f.write_str("Tls"),
        }
    }
}

impl AsyncRead for Stream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Tcp(tcp) => Pin::new(tcp).poll_read(cx, buf),
            #[cfg(feature = "tls")]
            Stream::Tls(tls) => Pin::new(tls.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Stream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Stream::Tcp(tcp) => Pin::new(tcp).poll_write(cx, buf),
            #[cfg(feature = "tls")]
            Stream::Tls(tls) => Pin::new(tls.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Tcp(tcp) => Pin::new(tcp).poll_flush(cx),
            #[cfg(feature = "tls")]
            Stream::Tls(tls) => Pin::new(tls.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Tcp(tcp) => Pin::new(tcp).poll_shutdown(cx),
            #[cfg(feature = "tls")]
            Stream::Tls(tls) => Pin::new(tls.as_mut()).poll_shutdown(cx),
        }
    }
}

/// A connection to a Redis server.
///
/// Wraps an underlying stream and handles RESP frame encoding and decoding,
/// applying the configured read and write timeouts.
pub(crate) struct Connection<S = Stream> {
    stream: S,
    decoder: Decoder,
    encoder: Encoder,
    read_buf: Box<[u8]>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl Connection<Stream> {
    /// Opens a connection and runs the AUTH / SELECT / CLIENT SETNAME handshake.
    #[instrument(skip(info), fields(addr = %info.addr()), level = "debug")]
    pub(crate) async fn open(info: &ConnectionInfo) -> Result<Self> {
        let stream = match info.connection_timeout {
            Some(limit) => tokio::time::timeout(limit, Stream::connect(info))
                .await
                .map_err(|_| Error::Timeout)??,
            None => Stream::connect(info).await?,
        };

        let mut connection =
            Connection::new(stream).with_timeouts(info.read_timeout, info.write_timeout);

        if let Some(password) = &info.password {
            let auth = command::auth(info.username.as_deref(), password);
            if let Frame::Error(message) = connection.request(auth.into_frame()).await? {
                return Err(Error::Auth {
                    message: String::from_utf8_lossy(&message).into_owned(),
                });
            }
        }

        if let Some(db) = info.database {
            connection.execute(command::select(db)).await?;
        }

        if let Some(name) = &info.client_name {
            connection.execute(command::client_setname(name)).await?;
        }

        debug!("connection established");
        Ok(connection)
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection with no timeouts configured.
    pub(crate) fn new(stream: S) -> Self {
        Self {
            stream,
            decoder: Decoder::new(),
            encoder: Encoder::new(),
            read_buf: vec![0u8; READ_BUFFER_SIZE].into_boxed_slice(),
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// Configures read and write timeouts for this connection.
    pub(crate) fn with_timeouts(
        mut self,
        read_timeout: Option<Duration>,
        write_timeout: Option<Duration>,
    ) -> Self {
        self.read_timeout = read_timeout;
        self.write_timeout = write_timeout;
        self
    }

    /// Encodes the frame and writes it to the stream.
    pub(crate) async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.encoder.encode(frame);
        let data = self.encoder.take();
        let stream = &mut self.stream;
        let write = async move {
            stream.write_all(&data).await?;
            stream.flush().await
        };

        match self.write_timeout {
            Some(limit) => tokio::time::timeout(limit, write)
                .await
                .map_err(|_| Error::Timeout)??,
            None => write.await?,
        }
        Ok(())
    }

    /// Reads the next frame, failing with [`Error::Timeout`] once the read
    /// timeout elapses.
    pub(crate) async fn read_frame(&mut self) -> Result<Frame> {
        let limit = self.read_timeout;
        self.read_frame_within(limit).await?.ok_or(Error::Timeout)
    }

    /// Reads the next frame, waiting at most `limit` (forever when `None`).
    ///
    /// Returns `Ok(None)` when the limit elapses. Bytes already received are
    /// kept in the decoder, so the call can simply be repeated.
    pub(crate) async fn read_frame_within(
        &mut self,
        limit: Option<Duration>,
    ) -> Result<Option<Frame>> {
        match limit {
            Some(limit) => match tokio::time::timeout(limit, self.next_frame()).await {
                Ok(frame) => frame.map(Some),
                Err(_) => Ok(None),
            },
            None => self.next_frame().await.map(Some),
        }
    }

    async fn next_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = self.decoder.decode()? {
                return Ok(frame);
            }

            // cancel safe: bytes are only appended once a read completes
            let n = self.stream.read(&mut self.read_buf).await?;
            if n == 0 {
                return Err(Error::protocol("connection closed"));
            }
            self.decoder.append(&self.read_buf[..n]);
        }
    }

    /// Writes a frame and reads the reply, without interpreting it.
    pub(crate) async fn request(&mut self, frame: Frame) -> Result<Frame> {
        self.write_frame(&frame).await?;
        self.read_frame().await
    }

    /// Sends the command and returns its reply, turning error replies into
    /// [`Error::Server`].
    pub(crate) async fn execute(&mut self, cmd: Cmd) -> Result<Frame> {
        debug!(command = %cmd.name(), "sending command");
        let reply = self.request(cmd.into_frame()).await?;
        command::parse_frame_response(reply)
    }

    /// Sends the command without waiting for a reply.
    pub(crate) async fn send(&mut self, cmd: Cmd) -> Result<()> {
        debug!(command = %cmd.name(), "sending command without reply");
        self.write_frame(&cmd.into_frame()).await
    }

    /// Checks that the server still answers.
    pub(crate) async fn ping(&mut self) -> Result<()> {
        self.execute(command::ping()).await.map(|_| ())
    }
}

impl<S> fmt::Debug for Connection<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("stream", &self.stream)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .finish()
    }
}
