//! The packet I/O path: one UDP socket per run, either marking and sending
//! a bounded train of datagrams or listening for them indefinitely.

use std::{
  fmt, io,
  net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket},
  thread,
  time::Duration,
};

use chrono::Local;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::{config::RunConfig, logfile::MessageLog};

/// File that sent payload lines are appended to when logging is enabled.
pub const SENT_LOG_FILE: &str = "dscp_sent_messages.txt";
/// File that received messages are appended to when logging is enabled.
pub const RECEIVED_LOG_FILE: &str = "udp_rcv_message.txt";

/// Largest datagram the listener will read in one call.
const RECV_BUFFER_SIZE: usize = 1024;

/// Encodes a DSCP value as the legacy type-of-service byte: DSCP occupies
/// the upper six bits, the two ECN bits stay zero.
pub fn tos_byte(dscp: u8) -> u32 {
  (dscp as u32) << 2
}

fn timestamp() -> String {
  Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Local hostname for inclusion in sent payloads. A host that cannot report
/// its own name still gets to send.
fn local_hostname() -> String {
  match hostname::get() {
    Ok(name) => name.to_string_lossy().to_string(),
    Err(_) => String::from("hostname_undefined"),
  }
}

/// Sends `config.count` datagrams to the configured target, with the IP
/// type-of-service option applied before the first send.
///
/// Each payload is `"<timestamp>; <hostname>; DSCP: <value>"`. When logging
/// is enabled the same line is appended to [`SENT_LOG_FILE`]. The
/// configured delay runs after every send, the last included.
pub fn send_messages(config: &RunConfig) -> Result<(), Error> {
  let Some(target) = config.target.as_deref() else {
    return Err(Error::NoTarget);
  };
  let address: Ipv4Addr = target.parse().map_err(|_| Error::NoTarget)?;
  let destination =
    SockAddr::from(SocketAddr::V4(SocketAddrV4::new(address, config.port)));

  let host = local_hostname();

  let mut log = if config.log {
    Some(MessageLog::append_to(SENT_LOG_FILE).map_err(Error::Log)?)
  } else {
    None
  };

  let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
    .map_err(Error::Send)?;
  socket.set_tos_v4(tos_byte(config.dscp)).map_err(Error::Send)?;

  for _ in 0..config.count {
    let message = format!("{}; {host}; DSCP: {}", timestamp(), config.dscp);
    socket
      .send_to(message.as_bytes(), &destination)
      .map_err(Error::Send)?;
    println!("Sent message to {target}:{}: \"{message}.\"", config.port);

    if let Some(log) = log.as_mut() {
      log.append(&message).map_err(Error::Log)?;
    }

    if config.interval_seconds > 0 {
      thread::sleep(Duration::from_secs(u64::from(config.interval_seconds)));
    }
  }

  Ok(())
}

/// Receiving side of a test run: one bound UDP socket and the optional
/// message log, both held for the lifetime of the run.
pub struct Listener {
  socket: UdpSocket,
  log: Option<MessageLog>,
}

impl Listener {
  /// Binds the wildcard address on the configured port, announces the
  /// listener, and opens the message log when logging is enabled.
  pub fn bind(config: &RunConfig) -> Result<Self, Error> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, config.port))
      .map_err(Error::Bind)?;

    println!("UDP listener for DSCP test invoked at {}.", timestamp());
    println!("Listening for traffic on UDP port {}.\n", config.port);

    let log = if config.log {
      let log = MessageLog::append_to(RECEIVED_LOG_FILE).map_err(Error::Log)?;
      println!("UDP messages written to file: {RECEIVED_LOG_FILE}.\n");
      Some(log)
    } else {
      None
    };

    Ok(Self { socket, log })
  }

  /// Blocks until one datagram arrives, prints it, and appends it to the
  /// message log when logging is enabled. Returns the decoded text.
  pub fn receive_one(&mut self) -> Result<String, Error> {
    let mut buffer = [0; RECV_BUFFER_SIZE];
    let (size, _) = self.socket.recv_from(&mut buffer).map_err(Error::Receive)?;

    let text = String::from_utf8_lossy(&buffer[..size]).to_string();
    let received_at = timestamp();
    println!("{received_at}, received UDP message: \"{text}\"");

    if let Some(log) = self.log.as_mut() {
      log
        .append(&format!("{received_at}: {text}"))
        .map_err(Error::Log)?;
    }

    Ok(text)
  }

  /// Receives until an error ends the loop. There is no normal exit;
  /// interruption is handled by the process-level signal handler.
  pub fn run(&mut self) -> Result<(), Error> {
    loop {
      self.receive_one()?;
    }
  }
}

/// Binds a listener for the configured port and receives indefinitely.
pub fn receive_messages(config: &RunConfig) -> Result<(), Error> {
  let mut listener = Listener::bind(config)?;
  listener.run()
}

#[derive(Debug)]
pub enum Error {
  /// Sender mode was started without a usable target address.
  NoTarget,
  /// The listener socket could not be created or bound. Kept separate from
  /// `Receive` so the caller can report bind failures distinctly.
  Bind(io::Error),
  /// The receive loop failed after the socket was bound.
  Receive(io::Error),
  /// Socket creation, option setting, or sending failed.
  Send(io::Error),
  /// The message log could not be opened or written.
  Log(io::Error),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NoTarget => write!(f, "no usable target address"),
      Self::Bind(e) | Self::Receive(e) | Self::Send(e) => write!(f, "{e}"),
      Self::Log(e) => write!(f, "message log: {e}"),
    }
  }
}
