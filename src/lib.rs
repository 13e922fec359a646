#![doc = include_str!("../README.md")]
//! # API Notes
//!
//! * Compression is a pure function of `(tokens, config)`: no I/O, no shared
//! state, deterministic output.
//! * The config used for compression must also be supplied for
//! decompression — the parser needs to know whether length markers were
//! embedded in dictionary entries.
//! * Input ids must stay below [`RESERVED_BASE`]; anything at or above it is
//! rejected with a `ReservedTokenInInput` error.

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
struct ReadmeDoctest;

pub use candidate::Candidate;
pub use compressor::Compressor;
pub use config::{CompressorConfig, DiscoveryMode, SelectionMode};
pub use constants::{Token, DICT_END, DICT_START, RESERVED_BASE, STATIC_DICT_MARKER};
pub use decompressor::Decompressor;
pub use dictionary::{DictEntry, Dictionary};
pub use priority::PriorityProvider;
pub use result::{CompressionMetrics, CompressionResult, StageTimings};
pub use simple::{compress, decompress, discover_patterns, verify};
pub use static_dict::StaticDictionary;

/// the reserved token-space layout and engine defaults
pub mod constants;
pub mod errors;

mod candidate;
mod compressor;
mod config;
mod cost;
mod decompressor;
mod dictionary;
mod discovery;
mod priority;
mod result;
mod selection;
mod simple;
mod static_dict;
mod subsumption;
mod suffix_array;
mod wire;

#[cfg(test)]
mod tests;
