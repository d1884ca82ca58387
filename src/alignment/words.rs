use crate::config::WordAlignConfig;
use crate::score::LineScorer;
use crate::text::normalize;
use crate::types::{MatchSpan, Word};

/// Once the best held score reaches this, the outer start scan may stop after
/// drifting `early_break` tokens past the cursor.
const EARLY_BREAK_HOLD_SCORE: f64 = 0.60;

/// Greedy local-search alignment of lyric lines to contiguous runs of ASR
/// words. Returns one span and one score per input line, in line order,
/// for any input including an empty word list.
///
/// A cursor into the normalized word-token stream is threaded across lines:
/// each non-blank line searches a local window of candidate starts around it,
/// commits the best-scoring run when confident, and otherwise consumes a
/// minimal fallback run so later lines never collapse onto the same early
/// words. Blank lines emit a zero-length span and hold the cursor.
pub fn align_lines_to_words(
    words: &[Word],
    lines: &[String],
    scorer: &dyn LineScorer,
    config: &WordAlignConfig,
) -> (Vec<MatchSpan>, Vec<f64>) {
    // Tokenize once; words that normalize to nothing carry no signal.
    let asr_tokens: Vec<String> = words
        .iter()
        .map(|w| normalize(&w.text))
        .filter(|t| !t.is_empty())
        .collect();
    let n = asr_tokens.len();

    let mut spans: Vec<MatchSpan> = Vec::with_capacity(lines.len());
    let mut scores: Vec<f64> = Vec::with_capacity(lines.len());

    if n == 0 {
        // Nothing to align against: degrade to zero-length stubs.
        for line_index in 0..lines.len() {
            spans.push(MatchSpan {
                line_index,
                start_word: 0,
                end_word: 0,
                score: 0.0,
            });
            scores.push(0.0);
        }
        return (spans, scores);
    }

    let mut cursor = 0usize;
    let mut exhausted = false;

    for (line_index, raw_line) in lines.iter().enumerate() {
        if exhausted {
            spans.push(MatchSpan {
                line_index,
                start_word: cursor,
                end_word: cursor,
                score: 0.0,
            });
            scores.push(0.0);
            continue;
        }

        let norm_line = normalize(raw_line);

        // Blank line: intentional pause. Zero-length span, cursor held.
        if norm_line.is_empty() {
            spans.push(MatchSpan {
                line_index,
                start_word: cursor,
                end_word: cursor,
                score: 1.0,
            });
            scores.push(1.0);
            continue;
        }

        let target_len = norm_line.split_whitespace().count().max(config.min_window);

        let start_lo = cursor.saturating_sub(config.backtrack);
        let start_hi = (cursor + config.lookahead).min(n - 1);

        let mut best_score = -1.0f64;
        let mut best_start = cursor;
        let mut best_end = cursor;

        for start in start_lo..=start_hi {
            if start > cursor
                && start - cursor > config.early_break
                && best_score >= EARLY_BREAK_HOLD_SCORE
            {
                break;
            }

            let win_min = config.min_window.max(target_len.saturating_sub(3));
            let win_max = (target_len + config.max_window_extra).min(n - start);

            // Extend the candidate window rightward, re-joining incrementally.
            let mut joined = String::new();
            for win in win_min..=win_max {
                let end = start + win;
                if joined.is_empty() {
                    joined = asr_tokens[start..end].join(" ");
                } else {
                    joined.push(' ');
                    joined.push_str(&asr_tokens[end - 1]);
                }

                let base = scorer.score(&joined, &norm_line);
                let dist = start.abs_diff(cursor) as f64;
                let score = base - config.jump_penalty * dist;

                if score > best_score {
                    best_score = score;
                    best_start = start;
                    best_end = end;
                }

                if base >= config.strong_thresh && start >= cursor {
                    break;
                }
            }
        }

        if best_score >= config.accept_thresh {
            if best_end <= best_start {
                best_end = (best_start + config.min_window.max(1)).min(n);
            }
            spans.push(MatchSpan {
                line_index,
                start_word: best_start,
                end_word: best_end,
                score: best_score,
            });
            scores.push(best_score);
            cursor = best_end;
            if cursor >= n {
                tracing::debug!(
                    line = line_index,
                    "word stream exhausted; remaining lines get stub spans"
                );
                exhausted = true;
            }
        } else {
            // Low confidence: consume a minimal run anyway so the cursor
            // keeps moving forward.
            let fallback_win = config.min_window.max(1);
            let end_word = (cursor + fallback_win).min(n);
            let score = best_score.max(0.0);
            tracing::debug!(
                line = line_index,
                cursor,
                best_score = format!("{best_score:.3}"),
                "low-confidence fallback span"
            );
            spans.push(MatchSpan {
                line_index,
                start_word: cursor,
                end_word,
                score,
            });
            scores.push(score);
            cursor = end_word;
        }
    }

    debug_assert_eq!(spans.len(), lines.len());
    debug_assert_eq!(scores.len(), lines.len());
    (spans, scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::HybridScorer;

    fn make_words(tokens: &[&str]) -> Vec<Word> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, t)| Word {
                text: t.to_string(),
                start: i as f64 * 0.5,
                end: (i + 1) as f64 * 0.5,
            })
            .collect()
    }

    fn make_lines(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn align(words: &[Word], lines: &[String]) -> (Vec<MatchSpan>, Vec<f64>) {
        align_lines_to_words(words, lines, &HybridScorer, &WordAlignConfig::default())
    }

    #[test]
    fn exact_match_covers_both_words() {
        let words = make_words(&["hello", "world"]);
        let lines = make_lines(&["hello world"]);
        let (spans, scores) = align(&words, &lines);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start_word, 0);
        assert_eq!(spans[0].end_word, 2);
        assert!(scores[0] > 0.95);
    }

    #[test]
    fn empty_word_list_yields_zero_length_stubs() {
        let lines = make_lines(&["one", "two"]);
        let (spans, scores) = align(&[], &lines);
        assert_eq!(spans.len(), 2);
        for span in &spans {
            assert_eq!(span.start_word, 0);
            assert_eq!(span.end_word, 0);
            assert_eq!(span.score, 0.0);
        }
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn blank_line_scores_one_and_holds_cursor() {
        let words = make_words(&["hello", "world", "again", "today"]);
        let lines = make_lines(&["hello world", "", "again today"]);
        let (spans, scores) = align(&words, &lines);
        assert_eq!(spans.len(), 3);
        assert_eq!(scores[1], 1.0);
        assert_eq!(spans[1].start_word, spans[1].end_word);
        // The pause did not consume words: line 3 starts where line 1 ended.
        assert_eq!(spans[1].start_word, spans[0].end_word);
        assert_eq!(spans[2].start_word, spans[0].end_word);
    }

    #[test]
    fn one_span_per_line_even_with_garbage_input() {
        let words = make_words(&["zzz", "qqq", "xxx"]);
        let lines = make_lines(&["completely different words", "nothing matches here", "still going", "more lines", "than words"]);
        let (spans, scores) = align(&words, &lines);
        assert_eq!(spans.len(), lines.len());
        assert_eq!(scores.len(), lines.len());
        for (i, span) in spans.iter().enumerate() {
            assert_eq!(span.line_index, i);
        }
    }

    #[test]
    fn rejection_still_advances_cursor() {
        let words = make_words(&["aaa", "bbb", "ccc", "ddd", "eee", "fff"]);
        let lines = make_lines(&["unrelated one", "unrelated two"]);
        let (spans, _) = align(&words, &lines);
        // Each rejected line consumes min_window words rather than stalling.
        assert_eq!(spans[0].start_word, 0);
        assert_eq!(spans[0].end_word, 2);
        assert_eq!(spans[1].start_word, 2);
        assert_eq!(spans[1].end_word, 4);
    }

    #[test]
    fn exhausted_words_stub_remaining_lines() {
        let words = make_words(&["hello", "world"]);
        let lines = make_lines(&["hello world", "second line", "third line"]);
        let (spans, scores) = align(&words, &lines);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].end_word, 2);
        for span in &spans[1..] {
            assert_eq!(span.start_word, span.end_word);
            assert_eq!(span.score, 0.0);
        }
        assert_eq!(&scores[1..], &[0.0, 0.0]);
    }

    #[test]
    fn spans_move_forward_through_the_song() {
        let words = make_words(&[
            "the", "sun", "goes", "down", "tonight", "we", "ride", "until", "the", "light",
        ]);
        let lines = make_lines(&["the sun goes down tonight", "we ride until the light"]);
        let (spans, scores) = align(&words, &lines);
        assert!(scores[0] > 0.9);
        assert!(scores[1] > 0.9);
        assert_eq!(spans[0].start_word, 0);
        assert!(spans[1].start_word >= spans[0].end_word);
        assert_eq!(spans[1].end_word, 10);
    }

    #[test]
    fn tolerates_inserted_filler_words() {
        let words = make_words(&[
            "uh", "the", "sun", "goes", "down", "yeah", "we", "ride", "again",
        ]);
        let lines = make_lines(&["the sun goes down", "we ride again"]);
        let (spans, scores) = align(&words, &lines);
        assert!(scores[0] >= 0.55, "score {} too low", scores[0]);
        assert!(scores[1] >= 0.55, "score {} too low", scores[1]);
        assert!(spans[1].start_word >= spans[0].end_word);
    }

    #[test]
    fn deterministic_across_runs() {
        let words = make_words(&["some", "words", "to", "align", "here"]);
        let lines = make_lines(&["some words", "to align here"]);
        let first = align(&words, &lines);
        let second = align(&words, &lines);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }
}
