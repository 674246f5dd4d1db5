//! Ratcliff/Obershelp similarity for fuzzy file-name matching.

use std::collections::HashMap;

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        for &j in b2j.get(c).map(Vec::as_slice).unwrap_or_default() {
            if j < blo {
                continue;
            }
            if j >= bhi {
                break;
            }
            let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
            next.insert(j, k);
            if k > best_len {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_len = k;
            }
        }
        j2len = next;
    }

    (best_i, best_j, best_len)
}

/// Total size of the recursively found matching blocks.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, &b2j, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Similarity in `[0, 1]`: twice the matched characters over the total length.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let len = a.len() + b.len();
    if len == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / len as f64
}

/// Best candidate scoring at least `cutoff` against `word`.
///
/// Equal scores prefer the lexicographically greatest candidate.
pub fn close_match<'a, I>(word: &str, candidates: I, cutoff: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .map(|candidate| (ratio(candidate, word), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .max_by(|(sa, ca), (sb, cb)| sa.total_cmp(sb).then_with(|| ca.cmp(cb)))
        .map(|(_, candidate)| candidate)
}
