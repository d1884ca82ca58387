use crate::config::TimelineConfig;
use crate::types::{MatchSpan, TimedLine, Word};

const SPREAD_MIN_LINE_S: f64 = 0.5;
const SPREAD_GAP_S: f64 = 0.1;

/// Convert word-span matches into concrete times. One timed line per span,
/// monotonic and clamped to `[0, total_duration]`; the total duration is the
/// last word's end time.
///
/// Every line's start and end derive from the previous line's end plus the
/// minimum gap, never independently, which is what keeps the timeline
/// monotonic even through stub spans.
pub fn word_spans_to_timed_lines(
    words: &[Word],
    lines: &[String],
    spans: &[MatchSpan],
    config: &TimelineConfig,
) -> Vec<TimedLine> {
    if words.is_empty() {
        return spread_uniformly(lines, config);
    }

    let word_starts: Vec<f64> = words.iter().map(|w| w.start.max(0.0)).collect();
    let word_ends: Vec<f64> = words.iter().map(|w| w.end.max(0.0)).collect();
    let total_dur = word_ends.last().copied().unwrap_or(0.0);
    let n = words.len();

    let mut out: Vec<TimedLine> = Vec::with_capacity(spans.len());
    let mut last_end_time = 0.0f64;

    for span in spans {
        let text = lines.get(span.line_index).cloned().unwrap_or_default();

        let s = span.start_word.min(n);
        let e = span.end_word.min(n);

        let (mut start_time, mut end_time) = if s < n {
            if e <= s {
                // Zero-length span: anchor to the word's start time, then
                // force a readable minimum duration.
                let anchor = word_starts[s];
                let start = (anchor - config.pad_s).max(last_end_time + config.min_gap_s);
                let end = (start + config.min_dur_s).max(start + config.min_gap_s);
                (start, end)
            } else {
                let start =
                    (word_starts[s] - config.pad_s).max(last_end_time + config.min_gap_s);
                let end = (word_ends[e - 1] + config.pad_s).max(start + config.min_dur_s);
                (start, end)
            }
        } else {
            // Span points past the last word: stub after the previous line.
            let start = (last_end_time + config.min_gap_s).max(0.0);
            let end = start + config.min_dur_s.max(config.min_gap_s);
            (start, end)
        };

        // Clamp within track bounds, keep end past start.
        start_time = start_time.min((total_dur - config.min_gap_s).max(0.0));
        end_time = end_time
            .max(start_time + config.min_gap_s)
            .min(total_dur)
            .max(start_time);

        out.push(TimedLine {
            line_index: span.line_index,
            start: start_time,
            end: end_time,
            text,
        });
        last_end_time = end_time;
    }

    out
}

/// No words at all: spread lines evenly from t=0 so the caller still gets a
/// usable timeline.
fn spread_uniformly(lines: &[String], config: &TimelineConfig) -> Vec<TimedLine> {
    let mut t = 0.0f64;
    let mut out = Vec::with_capacity(lines.len());
    for (line_index, line) in lines.iter().enumerate() {
        let end = t + config.min_dur_s.max(SPREAD_MIN_LINE_S);
        out.push(TimedLine {
            line_index,
            start: t,
            end,
            text: line.clone(),
        });
        t = end + SPREAD_GAP_S;
    }
    out
}
