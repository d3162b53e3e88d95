//! Fingerprints of generated output.
//!
//! The generator is deterministic, so the SHA-256 of the emitted Makefile
//! identifies a plan: two runs over an unchanged tree report the same value.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of the short form printed by the CLI.
pub const SHORT_HASH_LEN: usize = 12;

/// A full 64-character lowercase hex SHA-256.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
  pub fn short(&self) -> &str {
    &self.0[..self.0.len().min(SHORT_HASH_LEN)]
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}

/// A writer that hashes everything successfully written through it.
pub struct HashingWriter<W> {
  inner: W,
  hasher: Sha256,
  written: u64,
}

impl<W: Write> HashingWriter<W> {
  pub fn new(inner: W) -> Self {
    Self {
      inner,
      hasher: Sha256::new(),
      written: 0,
    }
  }

  /// Bytes accepted so far.
  pub fn bytes_written(&self) -> u64 {
    self.written
  }

  /// Return the inner writer and the hash of everything written.
  pub fn finish(self) -> (W, ContentHash) {
    (self.inner, ContentHash(hex::encode(self.hasher.finalize())))
  }
}

impl<W: Write> Write for HashingWriter<W> {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    let n = self.inner.write(buf)?;
    self.hasher.update(&buf[..n]);
    self.written += n as u64;
    Ok(n)
  }

  fn flush(&mut self) -> io::Result<()> {
    self.inner.flush()
  }
}
