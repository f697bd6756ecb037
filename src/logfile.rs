//! Append-only message logs for troubleshooting runs.

use std::{
  fs::{File, OpenOptions},
  io::{self, Write},
  path::Path,
};

/// Plain-text message log, opened once per run in append mode.
///
/// Records go to the file one line at a time with no userspace buffering,
/// so every line that was reported as written is on disk even if the
/// process is terminated without unwinding. Files are never rotated or
/// truncated.
pub struct MessageLog {
  file: File,
}

impl MessageLog {
  /// Opens `path` for appending, creating the file if it does not exist.
  pub fn append_to(path: impl AsRef<Path>) -> io::Result<Self> {
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    Ok(Self { file })
  }

  /// Writes one record as a single line.
  pub fn append(&mut self, line: &str) -> io::Result<()> {
    writeln!(self.file, "{line}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::{env, fs, path::PathBuf, process};

  fn scratch_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("dscptest_{}_{name}.txt", process::id()))
  }

  #[test]
  fn appended_lines_survive_drop() {
    let path = scratch_path("drop");
    let _ = fs::remove_file(&path);

    let mut log = MessageLog::append_to(&path).unwrap();
    log.append("first line").unwrap();
    log.append("second line").unwrap();
    drop(log);

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "first line\nsecond line\n");

    fs::remove_file(&path).unwrap();
  }

  #[test]
  fn reopening_appends_instead_of_truncating() {
    let path = scratch_path("reopen");
    let _ = fs::remove_file(&path);

    let mut log = MessageLog::append_to(&path).unwrap();
    log.append("run one").unwrap();
    drop(log);

    let mut log = MessageLog::append_to(&path).unwrap();
    log.append("run two").unwrap();
    drop(log);

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "run one\nrun two\n");

    fs::remove_file(&path).unwrap();
  }
}
