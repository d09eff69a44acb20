//! Block-level structural diff between an archived page and its live version
//!
//! The archive snapshot is the *reference* and the live page the *candidate*.
//! Counting follows the archive-as-baseline convention and reads backwards
//! on purpose:
//!
//! - blocks only on the live side (`insert`) count as **deletions**
//! - blocks only on the archive side (`delete`) count as **additions**
//! - `replace` spans count as **inline changes**, by the longer side
//!
//! Reports produced with earlier versions of the tool use these labels, so
//! they must not be swapped.

use crate::blocks::{extract_blocks, Block};
use crate::matcher::{opcodes, OpTag, Opcode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Change counts for one reference/candidate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub inline_changes: usize,
    /// Distinct blocks across both sequences
    pub union_size: usize,
    /// Unrounded percentage of changed blocks
    pub percentage: f64,
}

impl DiffStats {
    pub fn total_changes(&self) -> usize {
        self.additions + self.deletions + self.inline_changes
    }
}

/// Fold opcodes into counts, without the percentage
pub fn classify_opcodes(ops: &[Opcode]) -> (usize, usize, usize) {
    let (mut additions, mut deletions, mut inline_changes) = (0, 0, 0);
    for op in ops {
        match op.tag {
            OpTag::Insert => deletions += op.b_len(),
            OpTag::Delete => additions += op.a_len(),
            OpTag::Replace => inline_changes += op.a_len().max(op.b_len()),
            OpTag::Equal => {}
        }
    }
    (additions, deletions, inline_changes)
}

/// Count of distinct blocks appearing in either sequence
pub fn union_size(reference: &[Block], candidate: &[Block]) -> usize {
    reference
        .iter()
        .chain(candidate)
        .collect::<HashSet<_>>()
        .len()
}

/// `total / union * 100`, or 0 when there is nothing to compare
pub fn change_percentage(total_changes: usize, union_size: usize) -> f64 {
    if union_size == 0 {
        return 0.0;
    }
    total_changes as f64 / union_size as f64 * 100.0
}

/// Diff two block sequences given precomputed opcodes
pub fn stats_from_opcodes(reference: &[Block], candidate: &[Block], ops: &[Opcode]) -> DiffStats {
    let (additions, deletions, inline_changes) = classify_opcodes(ops);
    let union_size = union_size(reference, candidate);
    let percentage = change_percentage(additions + deletions + inline_changes, union_size);

    DiffStats {
        additions,
        deletions,
        inline_changes,
        union_size,
        percentage,
    }
}

/// Diff two block sequences
pub fn diff_blocks(reference: &[Block], candidate: &[Block]) -> DiffStats {
    let ops = opcodes(reference, candidate);
    stats_from_opcodes(reference, candidate, &ops)
}

/// Everything computed while comparing two documents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub reference: Vec<Block>,
    pub candidate: Vec<Block>,
    pub opcodes: Vec<Opcode>,
    pub stats: DiffStats,
}

impl Comparison {
    pub fn from_documents(reference: &str, candidate: &str) -> Self {
        let reference = extract_blocks(reference);
        let candidate = extract_blocks(candidate);
        let opcodes = opcodes(&reference, &candidate);
        let stats = stats_from_opcodes(&reference, &candidate, &opcodes);

        Self {
            reference,
            candidate,
            opcodes,
            stats,
        }
    }

    /// Blocks covered by an opcode on each side
    pub fn spans(&self, op: &Opcode) -> (&[Block], &[Block]) {
        (
            &self.reference[op.i1..op.i2],
            &self.candidate[op.j1..op.j2],
        )
    }
}

/// Extract and diff two documents.
///
/// Returns `None` when either document is unavailable, meaning the pair
/// should be skipped rather than reported.
pub fn compare_documents(reference: Option<&str>, candidate: Option<&str>) -> Option<DiffStats> {
    let (reference, candidate) = (reference?, candidate?);
    Some(Comparison::from_documents(reference, candidate).stats)
}
