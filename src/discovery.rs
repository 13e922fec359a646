//! Candidate pattern discovery.
//!
//! Three strategies share one output contract: each candidate carries a
//! subsequence within the configured length bounds and a maximal
//! non-overlapping set of start positions that already passes the
//! compressibility pre-filter. Duplicate subsequences (within a strategy or
//! across warm-start seeds) are merged by position union before the final
//! sweep.

use std::collections::HashMap;

use crate::candidate::Candidate;
use crate::config::{CompressorConfig, DiscoveryMode};
use crate::constants::{Token, BPE_MERGE_LIMIT};
use crate::cost;
use crate::suffix_array;

/// Left-to-right greedy sweep: keeps a maximal subset of ascending
/// `positions` whose length-`len` ranges do not overlap.
pub(crate) fn non_overlap_sweep(positions: &[usize], len: usize) -> Vec<usize> {
  let mut accepted = Vec::with_capacity(positions.len());
  let mut next_free = 0usize;
  for &p in positions {
    if p >= next_free {
      accepted.push(p);
      next_free = p + len;
    }
  }
  accepted
}

pub(crate) fn discover(
  tokens: &[Token],
  config: &CompressorConfig,
  warm_start: &[Vec<Token>],
) -> Vec<Candidate> {
  let mut raw: HashMap<Vec<Token>, Vec<usize>> = HashMap::new();
  let mut add = |sub: Vec<Token>, positions: &[usize]| {
    raw.entry(sub).or_default().extend_from_slice(positions);
  };

  match config.discovery {
    DiscoveryMode::SuffixArray => {
      for iv in suffix_array::lcp_intervals(tokens, config.min_len, config.max_len) {
        let p0 = iv.positions[0];
        add(tokens[p0..p0 + iv.lcp].to_vec(), &iv.positions);
      }
    }
    DiscoveryMode::SlidingWindow => {
      sliding_window(tokens, config.min_len, config.max_len, &mut add);
    }
    DiscoveryMode::Bpe => {
      for (sub, positions) in bpe_merges(tokens, config.max_len, config.marker_overhead()) {
        add(sub, &positions);
      }
    }
  }

  for sub in warm_start {
    if sub.len() < config.min_len || sub.len() > config.max_len {
      continue;
    }
    let positions = scan_occurrences(tokens, sub);
    if positions.len() >= 2 {
      add(sub.clone(), &positions);
    }
  }

  let overhead = config.marker_overhead();
  let mut candidates: Vec<Candidate> = raw
    .into_iter()
    .filter_map(|(sub, mut positions)| {
      positions.sort_unstable();
      positions.dedup();
      let accepted = non_overlap_sweep(&positions, sub.len());
      if sub.len() >= config.min_len
        && accepted.len() >= cost::min_occurrences(sub.len(), overhead)
      {
        Some(Candidate::new(sub, accepted))
      } else {
        None
      }
    })
    .collect();

  // deterministic output order regardless of hash-map iteration
  candidates.sort_unstable_by(|a, b| {
    (a.positions[0], a.len(), &a.sub).cmp(&(b.positions[0], b.len(), &b.sub))
  });
  candidates
}

/// Every start offset at which `sub` occurs in `tokens`, overlapping
/// occurrences included.
fn scan_occurrences(tokens: &[Token], sub: &[Token]) -> Vec<usize> {
  if sub.is_empty() || tokens.len() < sub.len() {
    return Vec::new();
  }
  (0..=tokens.len() - sub.len())
    .filter(|&p| &tokens[p..p + sub.len()] == sub)
    .collect()
}

fn sliding_window<F: FnMut(Vec<Token>, &[usize])>(
  tokens: &[Token],
  min_len: usize,
  max_len: usize,
  add: &mut F,
) {
  for len in min_len..=max_len.min(tokens.len() / 2) {
    let mut groups: HashMap<&[Token], Vec<usize>> = HashMap::new();
    for p in 0..=tokens.len() - len {
      groups.entry(&tokens[p..p + len]).or_default().push(p);
    }
    for (window, positions) in groups {
      if positions.len() >= 2 {
        add(window.to_vec(), &positions);
      }
    }
  }
}

/// BPE-style discovery: repeatedly merge the adjacent pair of symbols whose
/// merged pattern promises the largest saving, treating each merged pair as a
/// new symbol, until no merge is net-beneficial or the iteration cap is hit.
fn bpe_merges(
  tokens: &[Token],
  max_len: usize,
  overhead: usize,
) -> Vec<(Vec<Token>, Vec<usize>)> {
  struct Kind {
    len: usize,
    sub: Vec<Token>,
  }

  let mut kinds: Vec<Kind> = Vec::new();
  let mut kind_of_token: HashMap<Token, usize> = HashMap::new();
  // (kind, start offset in `tokens`)
  let mut seq: Vec<(usize, usize)> = Vec::with_capacity(tokens.len());
  for (i, &t) in tokens.iter().enumerate() {
    let kind = *kind_of_token.entry(t).or_insert_with(|| {
      kinds.push(Kind {
        len: 1,
        sub: vec![t],
      });
      kinds.len() - 1
    });
    seq.push((kind, i));
  }
  let n_base_kinds = kinds.len();

  for _ in 0..BPE_MERGE_LIMIT {
    // non-overlapping adjacent-pair counts, tracked per pair key
    let mut counts: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    for i in 0..seq.len().saturating_sub(1) {
      let (a, b) = (seq[i].0, seq[i + 1].0);
      if kinds[a].len + kinds[b].len > max_len {
        continue;
      }
      let entry = counts.entry((a, b)).or_insert((0, 0));
      if i >= entry.1 {
        entry.0 += 1;
        entry.1 = i + 2;
      }
    }

    let mut best: Option<((usize, usize), usize, i64)> = None;
    for (&(a, b), &(count, _)) in &counts {
      let merged_len = kinds[a].len + kinds[b].len;
      let saving = cost::pattern_savings(merged_len, count, overhead);
      if saving <= 0 {
        continue;
      }
      let better = match &best {
        None => true,
        Some((best_pair, _, best_saving)) => {
          saving > *best_saving
            || (saving == *best_saving
              && (kinds[a].sub.clone(), kinds[b].sub.clone())
                < (
                  kinds[best_pair.0].sub.clone(),
                  kinds[best_pair.1].sub.clone(),
                ))
        }
      };
      if better {
        best = Some(((a, b), count, saving));
      }
    }

    let Some(((a, b), _, _)) = best else {
      break;
    };

    let merged_sub: Vec<Token> = kinds[a]
      .sub
      .iter()
      .chain(kinds[b].sub.iter())
      .copied()
      .collect();
    kinds.push(Kind {
      len: merged_sub.len(),
      sub: merged_sub,
    });
    let merged = kinds.len() - 1;

    let mut next_seq = Vec::with_capacity(seq.len());
    let mut i = 0;
    while i < seq.len() {
      if i + 1 < seq.len() && seq[i].0 == a && seq[i + 1].0 == b {
        next_seq.push((merged, seq[i].1));
        i += 2;
      } else {
        next_seq.push(seq[i]);
        i += 1;
      }
    }
    seq = next_seq;
  }

  let mut positions_by_kind: HashMap<usize, Vec<usize>> = HashMap::new();
  for &(kind, start) in &seq {
    if kind >= n_base_kinds {
      positions_by_kind.entry(kind).or_default().push(start);
    }
  }
  positions_by_kind
    .into_iter()
    .map(|(kind, positions)| (kinds[kind].sub.clone(), positions))
    .collect()
}
