use crate::text::{normalize, token_set};

const CHAR_WEIGHT: f64 = 0.5;
const TOKEN_WEIGHT: f64 = 0.5;

/// Scores how well a candidate transcript chunk matches a lyric line.
/// Implementations must be deterministic and return values in `[0, 1]`.
pub trait LineScorer: Send + Sync {
    fn score(&self, candidate: &str, line: &str) -> f64;
}

/// Default scorer blending character-level similarity with token-set overlap.
///
/// Character similarity tolerates ASR misspellings and partial words; token
/// overlap tolerates reordering and inserted or dropped filler words. Neither
/// alone is robust to both failure modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridScorer;

impl LineScorer for HybridScorer {
    fn score(&self, candidate: &str, line: &str) -> f64 {
        hybrid_score(candidate, line)
    }
}

/// `0.5 * char_sim + 0.5 * token_jaccard` over normalized inputs.
/// Returns 0.0 when either input normalizes to the empty string.
pub fn hybrid_score(a: &str, b: &str) -> f64 {
    let a_n = normalize(a);
    let b_n = normalize(b);
    if a_n.is_empty() || b_n.is_empty() {
        return 0.0;
    }

    let char_sim = strsim::normalized_levenshtein(&a_n, &b_n);

    let a_tokens = token_set(&a_n);
    let b_tokens = token_set(&b_n);
    let union = a_tokens.union(&b_tokens).count();
    let token_sim = if union == 0 {
        0.0
    } else {
        a_tokens.intersection(&b_tokens).count() as f64 / union as f64
    };

    CHAR_WEIGHT * char_sim + TOKEN_WEIGHT * token_sim
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert!((hybrid_score("hello world", "hello world") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_after_normalization_scores_zero() {
        assert_eq!(hybrid_score("", "hello"), 0.0);
        assert_eq!(hybrid_score("hello", ""), 0.0);
        assert_eq!(hybrid_score("!!!", "hello"), 0.0);
    }

    #[test]
    fn normalization_applied_before_scoring() {
        assert!((hybrid_score("HELLO, WORLD!", "hello world") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn score_stays_in_unit_range() {
        for (a, b) in [
            ("abc", "xyz"),
            ("the quick brown fox", "fox brown quick the"),
            ("a", "a very long unrelated sentence with many words"),
        ] {
            let s = hybrid_score(a, b);
            assert!((0.0..=1.0).contains(&s), "score {s} out of range for {a:?} vs {b:?}");
        }
    }

    #[test]
    fn tolerates_misspellings() {
        // Character similarity carries the score when ASR garbles a word.
        let garbled = hybrid_score("hello wurld", "hello world");
        let unrelated = hybrid_score("something else", "hello world");
        assert!(garbled > 0.6);
        assert!(garbled > unrelated);
    }

    #[test]
    fn tolerates_reordering() {
        // Token overlap carries the score when words come back shuffled.
        let shuffled = hybrid_score("world hello", "hello world");
        assert!(shuffled > 0.5);
    }

    #[test]
    fn deterministic() {
        let a = hybrid_score("some lyric line", "sum lirik line");
        let b = hybrid_score("some lyric line", "sum lirik line");
        assert_eq!(a, b);
    }
}
