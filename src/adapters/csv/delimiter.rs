//! Delimiter inference for a single sample line.
//!
//! `csv` readers need the delimiter up front, so it is guessed from the first
//! line: every candidate splits the line with a quote-aware scan and the one
//! yielding the most fields wins.

/// Candidates tried when none are configured, in priority order.
pub const DEFAULT_DELIMITERS: [char; 5] = [',', ';', '\t', '|', ':'];

/// Counts the fields `delimiter` would split `line` into.
///
/// A `"` opens an enclosure, and the next `"` closes it and ends the field.
/// Delimiters inside an enclosure are plain characters. The remaining buffer
/// always counts as the last field.
pub fn count_fields(line: &str, delimiter: char) -> usize {
    let mut in_enclosure = false;
    let mut fields = 0;

    for c in line.chars() {
        if c == '"' {
            if in_enclosure {
                fields += 1;
            }
            in_enclosure = !in_enclosure;
            continue;
        }

        if c == delimiter && !in_enclosure {
            fields += 1;
        }
    }

    fields + 1
}

/// Returns the candidate producing the most fields for `line`.
///
/// Ties go to the earliest candidate. An empty candidate list falls back to
/// the first default delimiter.
pub fn detect(line: &str, candidates: &[char]) -> char {
    let mut best: Option<(char, usize)> = None;

    for &candidate in candidates {
        let count = count_fields(line, candidate);
        tracing::trace!(delimiter = ?candidate, count, "delimiter candidate");

        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((candidate, count)),
        }
    }

    best.map(|(delimiter, _)| delimiter)
        .unwrap_or(DEFAULT_DELIMITERS[0])
}

/// Detects the delimiter of a whole source from its first physical line.
pub fn detect_in_source(source: &str, candidates: &[char]) -> char {
    match source.lines().next() {
        Some(line) if !line.is_empty() => detect(line, candidates),
        _ => candidates.first().copied().unwrap_or(DEFAULT_DELIMITERS[0]),
    }
}
