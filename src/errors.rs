use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The different kinds of errors the library can return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
  /// `InvalidConfig` errors occur before any compression work happens,
  /// indicating the configuration violates a documented bound (e.g.
  /// `min_len < 2` or `max_len < min_len`).
  InvalidConfig,
  /// `ReservedTokenInInput` errors indicate the input sequence contains an
  /// id from the engine-reserved range. Tokenizers are contractually
  /// required never to emit such ids.
  ReservedTokenInInput,
  /// `CapacityExceeded` errors occur during dictionary construction,
  /// indicating the configured meta-token pool was exhausted.
  CapacityExceeded,
  /// `MalformedCompressedStream` errors occur during decompression,
  /// indicating the provided stream is inconsistent or violates the toco
  /// format: missing delimiters, unknown or duplicate meta references,
  /// cyclic dictionary entries, or inconsistent length markers.
  MalformedCompressedStream,
  /// `VerificationFailed` errors indicate a round-trip check did not
  /// reproduce the original input. This is a correctness bug, never a
  /// recoverable condition.
  VerificationFailed,
  /// `Timeout` errors occur when a configured deadline elapses between
  /// compression stages.
  Timeout,
}

/// The error type used in results for all `toco` functionality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocoError {
  pub kind: ErrorKind,
  pub message: String,
}

impl TocoError {
  pub(crate) fn new<S: AsRef<str>>(kind: ErrorKind, message: S) -> Self {
    TocoError {
      kind,
      message: message.as_ref().to_string(),
    }
  }

  pub(crate) fn invalid_config<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::InvalidConfig, message)
  }

  pub(crate) fn reserved_token<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::ReservedTokenInInput, message)
  }

  pub(crate) fn capacity_exceeded<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::CapacityExceeded, message)
  }

  pub(crate) fn malformed<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::MalformedCompressedStream, message)
  }

  pub(crate) fn verification_failed<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::VerificationFailed, message)
  }

  pub(crate) fn timeout<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::Timeout, message)
  }
}

impl Display for TocoError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "toco {:?} error: {}",
      self.kind, &self.message
    )
  }
}

impl Error for TocoError {}

pub type TocoResult<T> = Result<T, TocoError>;
