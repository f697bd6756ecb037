use clap::{ArgAction, Parser};
use jeflog::fail;
use std::process;

use dscptest::{
  config::{self, RawArgs},
  transport::{self, Error},
};

/// Command-line switches. Numeric switches deliberately carry no clap-side
/// defaults: absence is handed to the normalizer, which owns the defaulting
/// policy and the warnings that go with it.
#[derive(Parser, Debug)]
#[command(
  name = "dscptest",
  version,
  about = "DSCP test tool.",
  after_help = "\x1b[91mNo guarantees. Use at your own risk.\x1b[0m",
  disable_version_flag = true
)]
struct Args {
  /// Target/destination IP host for sent messages.
  #[arg(short = 't')]
  target: Option<String>,

  /// UDP unprivileged port (default 5060).
  #[arg(short = 'p')]
  port: Option<i64>,

  /// Number of packets to send to the destination (default 5).
  #[arg(short = 'c')]
  count: Option<i64>,

  /// DSCP priority value, range 0-63 (default 46).
  #[arg(short = 'd')]
  dscp: Option<i64>,

  /// Delay in seconds between messages, 0 for no delay (default 1).
  #[arg(short = 'i')]
  interval: Option<i64>,

  /// Receive data instead of sending.
  #[arg(short = 'r')]
  receiver: bool,

  /// Log sent or received messages for troubleshooting.
  #[arg(short = 'l')]
  log: bool,

  /// Print version information.
  #[arg(short = 'v', long = "version", action = ArgAction::Version)]
  version: Option<bool>,
}

impl Args {
  fn into_raw(self) -> RawArgs {
    RawArgs {
      receiver: self.receiver,
      target: self.target,
      port: self.port,
      count: self.count,
      interval: self.interval,
      dscp: self.dscp,
      log: self.log,
    }
  }
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  let config = config::normalize(args.into_raw());

  if config.receiver {
    // recv_from blocks with no timeout, so this handler is the loop's only
    // exit. Log lines hit the disk unbuffered; none are lost here.
    ctrlc::set_handler(|| process::exit(0))?;

    if let Err(error) = transport::receive_messages(&config) {
      match error {
        Error::Bind(_) => {
          fail!("Script could not create listener socket ({error}).")
        }
        _ => fail!("Script exited due to an unexpected error ({error})."),
      }
      process::exit(1);
    }
  } else {
    if config.target.is_none() {
      // normalization already said what was wrong with the target
      process::exit(1);
    }

    if let Err(error) = transport::send_messages(&config) {
      fail!("Failed to send message ({error}).");
      process::exit(1);
    }
  }

  Ok(())
}
