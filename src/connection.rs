// ABOUTME: Provides connection management for SMPP protocol communication over any async byte stream
// ABOUTME: Splits the stream into a framing reader with an idle timeout and a shared buffered writer

use crate::codec::{MAX_PDU_SIZE, PduHeader};
use bytes::{Bytes, BytesMut};
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Transport level failures. All of them are fatal to the session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The declared command_length cannot be trusted, so the PDU boundary is lost.
    #[error("Invalid command_length {length}, must be {min}-{max}")]
    InvalidLength { length: u32, min: u32, max: u32 },

    #[error("connection reset by peer")]
    ResetByPeer,

    /// The peer stopped draining its socket and the write could not finish.
    #[error("write did not complete within {0:?}")]
    WriteTimeout(Duration),
}

/// One step of the read loop.
#[derive(Debug)]
pub enum ReadEvent {
    /// A complete PDU, exactly `command_length` bytes long
    Pdu(Bytes),
    /// Nothing arrived within the idle window
    Idle,
    /// The peer closed the stream cleanly between PDUs
    Eof,
}

/// An SMPP transport: a byte stream plus the peer it talks to.
///
/// This does not track session state; it only moves whole PDUs. Use
/// `into_split` to hand the read half to a reader task while the write half
/// is shared by every sender.
pub struct Connection {
    reader: BoxedReader,
    writer: BoxedWriter,
    peer_addr: Option<SocketAddr>,
    max_pdu_size: u32,
}

impl Connection {
    /// Wrap any bidirectional stream, e.g. a `TcpStream` or an in-memory duplex pipe.
    pub fn new<S>(stream: S, peer_addr: Option<SocketAddr>) -> Connection
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        Connection {
            reader: Box::new(reader),
            writer: Box::new(writer),
            peer_addr,
            max_pdu_size: MAX_PDU_SIZE,
        }
    }

    pub fn from_tcp(socket: TcpStream) -> Connection {
        let peer_addr = socket.peer_addr().ok();
        if let Err(err) = socket.set_nodelay(true) {
            tracing::debug!(%err, "could not set TCP_NODELAY");
        }
        Connection::new(socket, peer_addr)
    }

    pub async fn connect(addr: impl ToSocketAddrs) -> io::Result<Connection> {
        let socket = TcpStream::connect(addr).await?;
        Ok(Connection::from_tcp(socket))
    }

    pub fn with_max_pdu_size(mut self, max_pdu_size: u32) -> Connection {
        self.max_pdu_size = max_pdu_size.max(PduHeader::SIZE as u32);
        self
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    pub fn into_split(self) -> (PduReader, PduWriter) {
        let reader = PduReader {
            stream: self.reader,
            // Default to a 4KB read buffer
            buffer: BytesMut::with_capacity(4 * 1024),
            max_pdu_size: self.max_pdu_size,
        };
        let writer = PduWriter {
            stream: Mutex::new(BufWriter::new(self.writer)),
            bytes_written: AtomicU64::new(0),
            peer_addr: self.peer_addr,
        };
        (reader, writer)
    }
}

/// Read half: turns the byte stream into whole PDUs.
pub struct PduReader {
    stream: BoxedReader,
    buffer: BytesMut,
    max_pdu_size: u32,
}

impl PduReader {
    /// Read one PDU, giving up after `idle` without any inbound bytes.
    ///
    /// Partial data stays buffered across an idle return, so a slow peer
    /// does not corrupt framing.
    pub async fn read_pdu(&mut self, idle: Duration) -> Result<ReadEvent, ConnectionError> {
        loop {
            if let Some(pdu) = self.parse_pdu()? {
                return Ok(ReadEvent::Pdu(pdu));
            }

            match tokio::time::timeout(idle, self.stream.read_buf(&mut self.buffer)).await {
                Err(_elapsed) => return Ok(ReadEvent::Idle),
                Ok(Ok(0)) => {
                    // The remote closed the connection. For this to be a clean
                    // shutdown, there should be no data in the read buffer.
                    return if self.buffer.is_empty() {
                        Ok(ReadEvent::Eof)
                    } else {
                        Err(ConnectionError::ResetByPeer)
                    };
                }
                Ok(Ok(_)) => continue,
                Ok(Err(err)) => return Err(err.into()),
            }
        }
    }

    /// Split one complete PDU off the buffer if enough data is there.
    fn parse_pdu(&mut self) -> Result<Option<Bytes>, ConnectionError> {
        if self.buffer.len() < 4 {
            return Ok(None);
        }

        let length = u32::from_be_bytes([
            self.buffer[0],
            self.buffer[1],
            self.buffer[2],
            self.buffer[3],
        ]);
        if length < PduHeader::SIZE as u32 || length > self.max_pdu_size {
            return Err(ConnectionError::InvalidLength {
                length,
                min: PduHeader::SIZE as u32,
                max: self.max_pdu_size,
            });
        }

        if self.buffer.len() < length as usize {
            self.buffer.reserve(length as usize - self.buffer.len());
            return Ok(None);
        }
        Ok(Some(self.buffer.split_to(length as usize).freeze()))
    }
}

/// Write half, shared by every task that sends PDUs.
pub struct PduWriter {
    stream: Mutex<BufWriter<BoxedWriter>>,
    bytes_written: AtomicU64,
    peer_addr: Option<SocketAddr>,
}

impl PduWriter {
    /// Write one encoded PDU and flush it, giving up after `deadline`.
    ///
    /// The deadline covers waiting for the lock as well, so one stalled
    /// writer cannot park every other sender behind it.
    pub async fn write_pdu(&self, pdu: &[u8], deadline: Duration) -> Result<(), ConnectionError> {
        let write = async {
            let mut stream = self.stream.lock().await;
            stream.write_all(pdu).await?;
            stream.flush().await
        };
        match tokio::time::timeout(deadline, write).await {
            Ok(result) => result?,
            Err(_elapsed) => return Err(ConnectionError::WriteTimeout(deadline)),
        }
        self.bytes_written.fetch_add(pdu.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    /// Total bytes written since the connection was opened.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    /// Flush and close the write half. Bytes still buffered for a peer that
    /// stopped reading are abandoned after `deadline`.
    pub async fn shutdown(&self, deadline: Duration) -> Result<(), ConnectionError> {
        let shutdown = async {
            let mut stream = self.stream.lock().await;
            stream.shutdown().await
        };
        match tokio::time::timeout(deadline, shutdown).await {
            Ok(result) => Ok(result?),
            Err(_elapsed) => Err(ConnectionError::WriteTimeout(deadline)),
        }
    }
}
