use crate::config::SegmentAlignConfig;
use crate::score::LineScorer;
use crate::text::normalize;
use crate::types::{Segment, TimedLine};

/// Jump distances beyond this contribute no additional penalty, so a clearly
/// better far match can still win.
const MAX_PENALIZED_JUMP: usize = 10;

/// Estimated seconds per lyric word when spreading lines with no segments.
const SPREAD_SECONDS_PER_WORD: f64 = 0.25;
const SPREAD_MIN_LINE_S: f64 = 0.5;
const SPREAD_GAP_S: f64 = 0.1;

/// Align each lyric line to the best-matching segment or short run of merged
/// segments, producing timed lines directly; segment text already carries a
/// usable time range. One output per input line, in line order.
pub fn align_lines_to_segments(
    segments: &[Segment],
    lines: &[String],
    scorer: &dyn LineScorer,
    config: &SegmentAlignConfig,
) -> Vec<TimedLine> {
    if segments.is_empty() {
        return spread_uniformly(lines);
    }

    let n = segments.len();
    let total = segments[n - 1].end.max(0.0);

    let mut out: Vec<TimedLine> = Vec::with_capacity(lines.len());
    let mut cursor = 0usize;
    let mut last_end = 0.0f64;

    for (line_index, raw_line) in lines.iter().enumerate() {
        let norm_line = normalize(raw_line);

        // Blank line: keep a tiny beat right after the previous line.
        if norm_line.is_empty() {
            let (start, end) = stub_after(last_end, total, config);
            out.push(TimedLine {
                line_index,
                start,
                end,
                text: raw_line.clone(),
            });
            last_end = end;
            continue;
        }

        let lo = cursor.saturating_sub(config.window_back);
        let hi = (cursor + config.window_ahead).min(n - 1);

        // (score, j0, j1, start, end)
        let mut best: Option<(f64, usize, usize, f64, f64)> = None;

        for j0 in lo..=hi {
            let j1_limit = (j0 + config.max_merge - 1).min(n - 1);
            let mut joined = segments[j0].text.clone();
            for j1 in j0..=j1_limit {
                if j1 > j0 {
                    joined.push(' ');
                    joined.push_str(&segments[j1].text);
                }

                let base = scorer.score(&joined, &norm_line);
                let dist = j0.abs_diff(cursor).min(MAX_PENALIZED_JUMP) as f64;
                let score = base - config.jump_penalty * dist;

                if best.map_or(true, |b| score > b.0) {
                    // Proposed time span is the union of segments[j0..=j1],
                    // padded, kept after the previous line and inside the track.
                    let start = (segments[j0].start - config.pad_s)
                        .max(last_end + config.min_gap_s)
                        .min((total - config.min_gap_s).max(0.0));
                    let end = (segments[j1].end + config.pad_s)
                        .max(start + config.min_gap_s)
                        .min(total)
                        .max(start);
                    best = Some((score, j0, j1, start, end));
                }

                if base >= config.strong_thresh && j0 >= cursor {
                    break;
                }
            }
        }

        match best {
            Some((score, _, j1, start, end)) if score >= config.accept_thresh => {
                out.push(TimedLine {
                    line_index,
                    start,
                    end,
                    text: raw_line.clone(),
                });
                last_end = end;
                cursor = (j1 + 1).min(n - 1);
            }
            _ => {
                // Low confidence: tiny stub after the previous line, cursor
                // held so future matches are not dragged backward.
                tracing::debug!(line = line_index, cursor, "low-confidence segment stub");
                let (start, end) = stub_after(last_end, total, config);
                out.push(TimedLine {
                    line_index,
                    start,
                    end,
                    text: raw_line.clone(),
                });
                last_end = end;
            }
        }
    }

    debug_assert_eq!(out.len(), lines.len());
    out
}

fn stub_after(last_end: f64, total: f64, config: &SegmentAlignConfig) -> (f64, f64) {
    let start = (last_end + config.min_gap_s).min(total);
    let end = (start + config.min_gap_s.max(config.pad_s * 2.0))
        .min(total)
        .max(start);
    (start, end)
}

/// No segments at all: spread lines by rough word count so the caller still
/// gets a usable timeline.
fn spread_uniformly(lines: &[String]) -> Vec<TimedLine> {
    let mut t = 0.0f64;
    let mut out = Vec::with_capacity(lines.len());
    for (line_index, line) in lines.iter().enumerate() {
        let word_count = normalize(line).split_whitespace().count();
        let dur = (word_count as f64 * SPREAD_SECONDS_PER_WORD).max(SPREAD_MIN_LINE_S);
        out.push(TimedLine {
            line_index,
            start: t,
            end: t + dur,
            text: line.clone(),
        });
        t += dur + SPREAD_GAP_S;
    }
    out
}
