/// Levenshtein edit distance between two callsigns.
///
/// Callsigns are ASCII, so this compares bytes and keeps two rows of the
/// distance table, sized by the shorter input.
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let (long, short) = if a.len() < b.len() {
        (b.as_bytes(), a.as_bytes())
    } else {
        (a.as_bytes(), b.as_bytes())
    };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// True when both callsigns are identical or within `max_distance` edits.
pub fn similar(a: &str, b: &str, max_distance: usize) -> bool {
    a == b || edit_distance(a, b) <= max_distance
}
