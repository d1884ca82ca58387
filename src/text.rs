use std::collections::HashSet;

/// Normalize text for comparison: lowercase, replace anything outside
/// `[a-z0-9' ]` with a space, collapse whitespace runs, trim ends.
/// Idempotent and locale-independent.
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for c in lowered.chars() {
        if matches!(c, 'a'..='z' | '0'..='9' | '\'') {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Token set of the normalized form: maximal `[a-z0-9']+` runs.
pub fn token_set(s: &str) -> HashSet<String> {
    normalize(s)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Split raw lyric text into lines, trimming trailing whitespace only.
/// Blank lines are intentional pauses and are preserved.
pub fn split_lyric_lines(raw: &str) -> Vec<String> {
    raw.lines().map(|ln| ln.trim_end().to_string()).collect()
}

/// Rough word count the lyrics imply, summed over non-blank lines.
/// Used by the transcription-retry heuristic.
pub fn estimated_lyric_words(lines: &[String]) -> usize {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| normalize(line).split_whitespace().count())
        .sum()
}
