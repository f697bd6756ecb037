//! Diagnostic tool for checking that network equipment honors IP-layer
//! DSCP marking: sends UDP datagrams with a configured DSCP value, or
//! listens for them on the far side.

pub mod config;
pub mod logfile;
pub mod transport;
pub mod validation;
