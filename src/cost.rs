//! The compressibility inequality and savings accounting.
//!
//! A pattern of length `len` replaced at `count` non-overlapping positions
//! removes `count * len` tokens from the body, adds `count` meta-token
//! references back, and adds a dictionary entry of `1 + len + overhead`
//! tokens (`overhead` is 1 when length markers are enabled, else 0). It
//! strictly saves tokens iff `len * count > 1 + len + count + overhead`.

/// Minimum occurrence count for a pattern of length `len` to save tokens.
pub(crate) fn min_occurrences(len: usize, overhead: usize) -> usize {
  debug_assert!(len >= 2);
  (2 + len + overhead).div_ceil(len - 1)
}

/// Whether replacing `count` occurrences of a length-`len` pattern strictly
/// reduces total length.
pub(crate) fn is_compressible(len: usize, count: usize, overhead: usize) -> bool {
  len * count > 1 + len + count + overhead
}

/// Net tokens saved by replacing `count` occurrences of a length-`len`
/// pattern, ignoring the fixed `DICT_START`/`DICT_END` framing.
pub(crate) fn pattern_savings(len: usize, count: usize, overhead: usize) -> i64 {
  count as i64 * (len as i64 - 1) - (1 + len + overhead) as i64
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_min_occurrences_matches_inequality() {
    for len in 2..20 {
      for overhead in [0, 1] {
        let c_min = min_occurrences(len, overhead);
        assert!(is_compressible(len, c_min, overhead));
        assert!(!is_compressible(len, c_min - 1, overhead));
      }
    }
  }

  #[test]
  fn test_known_thresholds() {
    // with markers: pairs need 5 occurrences, triples 3, length 8 just 2
    assert_eq!(min_occurrences(2, 1), 5);
    assert_eq!(min_occurrences(3, 1), 3);
    assert_eq!(min_occurrences(8, 1), 2);
    // without markers the thresholds relax slightly
    assert_eq!(min_occurrences(2, 0), 4);
    assert_eq!(min_occurrences(3, 0), 3);
  }

  #[test]
  fn test_savings_sign_agrees_with_inequality() {
    for len in 2..12 {
      for count in 2..12 {
        for overhead in [0, 1] {
          assert_eq!(
            pattern_savings(len, count, overhead) > 0,
            is_compressible(len, count, overhead),
          );
        }
      }
    }
  }
}
