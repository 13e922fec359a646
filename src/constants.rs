/// A token: an opaque identifier from an external tokenizer, or one of the
/// engine-reserved ids at or above [`RESERVED_BASE`].
///
/// Tokenizer ids must fit in 32 bits; the upper half of the `u64` space is
/// reserved so that delimiters, length markers, and meta-tokens can never
/// collide with tokenizer output.
pub type Token = u64;

// reserved token space
pub const RESERVED_BASE: Token = 1 << 32;
pub const DICT_START: Token = RESERVED_BASE;
pub const DICT_END: Token = RESERVED_BASE + 1;
pub const STATIC_DICT_MARKER: Token = RESERVED_BASE + 2;
pub const LEN_MARKER_BASE: Token = RESERVED_BASE + 16;
pub const META_BASE: Token = RESERVED_BASE + 4096;

// cutoffs and legal parameter values
pub const MAX_LEN_MARKER: usize = (META_BASE - LEN_MARKER_BASE) as usize - 1;
pub const MAX_META_POOL_SIZE: usize = 1 << 20;
pub const MAX_REFINEMENT_ITERS: usize = 4;
pub const BPE_MERGE_LIMIT: usize = 512;

// defaults
pub const DEFAULT_MIN_LEN: usize = 2;
pub const DEFAULT_MAX_LEN: usize = 8;
pub const DEFAULT_BEAM_WIDTH: usize = 8;
pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_MIN_IMPROVEMENT: f64 = 0.02;
pub const DEFAULT_META_POOL_SIZE: usize = 500;

// selection tuning
pub const PRIORITY_DENSITY_COEFF: f64 = 0.1;

#[inline]
pub fn is_reserved(token: Token) -> bool {
  token >= RESERVED_BASE
}

#[inline]
pub fn is_meta(token: Token) -> bool {
  token >= META_BASE
}

#[inline]
pub fn is_len_marker(token: Token) -> bool {
  (LEN_MARKER_BASE..META_BASE).contains(&token)
}

/// The reserved id for the length marker `LEN(len)`.
///
/// `len` must not exceed [`MAX_LEN_MARKER`]; config validation enforces this
/// before any marker is emitted.
#[inline]
pub fn len_marker(len: usize) -> Token {
  LEN_MARKER_BASE + len as Token
}

#[inline]
pub fn len_marker_value(token: Token) -> usize {
  (token - LEN_MARKER_BASE) as usize
}

/// The reserved id for the `idx`th meta-token `M_idx`.
#[inline]
pub fn meta_token(idx: usize) -> Token {
  META_BASE + idx as Token
}

#[inline]
pub fn meta_index(token: Token) -> usize {
  (token - META_BASE) as usize
}
