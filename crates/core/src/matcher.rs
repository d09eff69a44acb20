//! Sequence alignment producing edit opcodes
//!
//! Implements the Ratcliff/Obershelp "gestalt" matcher: find the longest
//! contiguous matching run, then recurse on the pieces to its left and right.
//! The matching runs are turned into a list of opcodes that covers both
//! sequences end to end.
//!
//! When the second sequence has 200 or more elements, elements that occur in
//! more than 1% of its positions (plus one) are treated as "popular" and are
//! not used to seed a match. They can still extend a match that was seeded
//! elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Minimum length of `b` before popular elements are ignored as match seeds
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

impl fmt::Display for OpTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpTag::Equal => "equal",
            OpTag::Insert => "insert",
            OpTag::Delete => "delete",
            OpTag::Replace => "replace",
        };
        f.write_str(name)
    }
}

/// One alignment step: `a[i1..i2]` relates to `b[j1..j2]` as described by `tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl Opcode {
    pub fn new(tag: OpTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self {
            tag,
            i1,
            i2,
            j1,
            j2,
        }
    }

    pub fn a_len(&self) -> usize {
        self.i2 - self.i1
    }

    pub fn b_len(&self) -> usize {
        self.j2 - self.j1
    }
}

/// A matching run: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of every non-popular element of `b`, ascending
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            let popular: HashSet<&'a T> = b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > ntest)
                .map(|(elt, _)| *elt)
                .collect();
            b2j.retain(|elt, _| !popular.contains(elt));
        }

        Self { a, b, b2j }
    }

    /// Longest matching run within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties resolve to the run starting earliest in `a`, then earliest in `b`.
    /// Returns a zero-size match at `(alo, blo)` when nothing matches.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, elt) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(elt) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements never seed a match but may widen one
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        Match {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    /// All matching runs, sorted, with adjacent runs merged, terminated by a
    /// sentinel `(a.len(), b.len(), 0)`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut found = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            found.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        found.sort();

        let mut merged = Vec::with_capacity(found.len() + 1);
        let mut current = Match {
            a: 0,
            b: 0,
            size: 0,
        };
        for m in found {
            if current.a + current.size == m.a && current.b + current.size == m.b {
                current.size += m.size;
            } else {
                if current.size > 0 {
                    merged.push(current);
                }
                current = m;
            }
        }
        if current.size > 0 {
            merged.push(current);
        }
        merged.push(Match {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }

    /// Opcodes turning `a` into `b`
    pub fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut ops = Vec::new();

        for m in self.matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode::new(tag, i, m.a, j, m.b));
            }
            i = m.a + m.size;
            j = m.b + m.size;
            if m.size > 0 {
                ops.push(Opcode::new(OpTag::Equal, m.a, i, m.b, j));
            }
        }

        ops
    }
}

/// Convenience wrapper around [`SequenceMatcher::opcodes`]
pub fn opcodes<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Opcode> {
    SequenceMatcher::new(a, b).opcodes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn tags(ops: &[Opcode]) -> Vec<OpTag> {
        ops.iter().map(|op| op.tag).collect()
    }

    /// Opcodes must tile both sequences without gaps or overlaps
    fn assert_covers(ops: &[Opcode], la: usize, lb: usize) {
        let (mut i, mut j) = (0, 0);
        for op in ops {
            assert_eq!(op.i1, i);
            assert_eq!(op.j1, j);
            i = op.i2;
            j = op.j2;
        }
        assert_eq!((i, j), (la, lb));
    }

    // ============================================================================
    // find_longest_match tests
    // ============================================================================

    #[test]
    fn test_find_longest_match_basic() {
        let a = chars(" abcd");
        let b = chars("abcd abcd");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 5, 0, 9);
        assert_eq!(m, Match { a: 0, b: 4, size: 5 });
    }

    #[test]
    fn test_find_longest_match_prefers_earliest() {
        let a = chars("ab");
        let b = chars("abab");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 2, 0, 4);
        assert_eq!(m, Match { a: 0, b: 0, size: 2 });
    }

    #[test]
    fn test_find_longest_match_none() {
        let a = chars("abc");
        let b = chars("xyz");
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, 3, 0, 3);
        assert_eq!(m, Match { a: 0, b: 0, size: 0 });
    }

    // ============================================================================
    // matching_blocks tests
    // ============================================================================

    #[test]
    fn test_matching_blocks() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        assert_eq!(
            blocks,
            vec![
                Match { a: 0, b: 0, size: 2 },
                Match { a: 3, b: 2, size: 2 },
                Match { a: 5, b: 4, size: 0 },
            ]
        );
    }

    // ============================================================================
    // opcodes tests
    // ============================================================================

    #[test]
    fn test_opcodes_classic_example() {
        let a = chars("qabxcd");
        let b = chars("abycdf");
        let ops = opcodes(&a, &b);
        assert_eq!(
            ops,
            vec![
                Opcode::new(OpTag::Delete, 0, 1, 0, 0),
                Opcode::new(OpTag::Equal, 1, 3, 0, 2),
                Opcode::new(OpTag::Replace, 3, 4, 2, 3),
                Opcode::new(OpTag::Equal, 4, 6, 3, 5),
                Opcode::new(OpTag::Insert, 6, 6, 5, 6),
            ]
        );
        assert_covers(&ops, a.len(), b.len());
    }

    #[test]
    fn test_opcodes_identical() {
        let a = chars("same");
        let ops = opcodes(&a, &a);
        assert_eq!(ops, vec![Opcode::new(OpTag::Equal, 0, 4, 0, 4)]);
    }

    #[test]
    fn test_opcodes_both_empty() {
        let empty: Vec<char> = Vec::new();
        assert!(opcodes(&empty, &empty).is_empty());
    }

    #[test]
    fn test_opcodes_one_side_empty() {
        let empty: Vec<char> = Vec::new();
        let b = chars("abc");
        assert_eq!(opcodes(&empty, &b), vec![Opcode::new(OpTag::Insert, 0, 0, 0, 3)]);
        assert_eq!(opcodes(&b, &empty), vec![Opcode::new(OpTag::Delete, 0, 3, 0, 0)]);
    }

    #[test]
    fn test_opcodes_disjoint_is_single_replace() {
        let a = chars("abc");
        let b = chars("xy");
        assert_eq!(opcodes(&a, &b), vec![Opcode::new(OpTag::Replace, 0, 3, 0, 2)]);
    }

    #[test]
    fn test_opcodes_popular_elements_do_not_seed_matches() {
        // 'x' fills every position of b, so it is popular and cannot seed a match
        let a = vec!['y', 'x', 'x'];
        let b = vec!['x'; 250];
        let ops = opcodes(&a, &b);
        assert_eq!(tags(&ops), vec![OpTag::Replace]);
        assert_covers(&ops, a.len(), b.len());
    }

    #[test]
    fn test_opcodes_popular_elements_extend_seeded_matches() {
        let mut a: Vec<u32> = vec![0; 3];
        a.push(1);
        let mut b: Vec<u32> = vec![0; 249];
        b.push(1);
        // 1 seeds the match, then the run widens backwards over popular 0s
        let ops = opcodes(&a, &b);
        assert_eq!(
            ops,
            vec![
                Opcode::new(OpTag::Insert, 0, 0, 0, 246),
                Opcode::new(OpTag::Equal, 0, 4, 246, 250),
            ]
        );
    }

    #[test]
    fn test_opcode_lengths() {
        let op = Opcode::new(OpTag::Replace, 2, 5, 1, 2);
        assert_eq!(op.a_len(), 3);
        assert_eq!(op.b_len(), 1);
    }
}
