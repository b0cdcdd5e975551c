/// Computes the Ratcliff/Obershelp similarity of two strings as `2 * M / T`,
/// where `M` is the number of characters in matching blocks and `T` the total
/// character count of both strings. Returns 1.0 when both are empty.
///
/// The block count is taken as the larger of both argument orders, so
/// `similarity(a, b) == similarity(b, a)`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matching_chars(&a, &b).max(matching_chars(&b, &a));
    2.0 * matched as f64 / total as f64
}

/// Sums the lengths of the matching blocks found by repeatedly taking the
/// longest common substring and recursing on both sides of it.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }

        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Finds the longest block `a[i..i+size] == b[j..j+size]` inside the given
/// windows. Ties resolve to the earliest start in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    let width = bhi.saturating_sub(blo) + 1;
    // previous[x + 1] is the length of the common suffix ending at a[i], b[blo + x]
    let mut previous = vec![0usize; width];

    for i in alo..ahi {
        let mut current = vec![0usize; width];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let size = previous[j - blo] + 1;
            current[j - blo + 1] = size;
            if size > best.2 {
                best = (i + 1 - size, j + 1 - size, size);
            }
        }
        previous = current;
    }

    best
}
