use std::collections::HashSet;

use crate::config::QualityConfig;
use crate::text::estimated_lyric_words;
use crate::transcript::Transcript;
use crate::types::TimedLine;

// Word-vs-segment fallback thresholds. These are structural signals, not
// tunables: they detect a desynchronized word alignment regardless of how the
// aligner itself was configured.
const LOW_SCORE_THRESH: f64 = 0.45;
const LOW_SCORE_FRACTION: f64 = 0.5;
const TAIL_START_FRACTION: f64 = 0.8;
const LATE_START_FRACTION: f64 = 0.8;

// Piled-up timeline detection.
const PILEUP_SHORT_DUR_S: f64 = 0.25;
const PILEUP_SHORT_FRACTION: f64 = 0.2;
const PILEUP_DISTINCT_FRACTION: f64 = 0.5;

/// Whether a first transcription pass looks weak enough to retry with voice
/// activity detection disabled. Catches both "ASR stopped early" (low
/// coverage) and "ASR recognized far fewer tokens than the lyrics imply".
pub fn needs_vad_retry(
    transcript: &Transcript,
    lines: &[String],
    config: &QualityConfig,
) -> bool {
    if transcript.total_duration <= 0.0 {
        return true;
    }
    let coverage = transcript.last_segment_end() / transcript.total_duration;
    let est_words = estimated_lyric_words(lines);
    let token_ratio = if est_words == 0 {
        0.0
    } else {
        transcript.words.len() as f64 / est_words as f64
    };

    let retry = coverage < config.coverage_floor || token_ratio < config.token_ratio_floor;
    if retry {
        tracing::info!(
            coverage = format!("{coverage:.2}"),
            token_ratio = format!("{token_ratio:.2}"),
            "first transcription pass looks weak; retry without VAD advised"
        );
    }
    retry
}

/// A retry pass is only kept when it strictly improves on the first:
/// more recognized words, or a later last-segment end.
pub fn retry_improves(first: &Transcript, retry: &Transcript) -> bool {
    retry.words.len() > first.words.len()
        || retry.last_segment_end() > first.last_segment_end()
}

/// Whether a word-level alignment has desynchronized badly enough that the
/// segment-level aligner should be used instead: more than half of all lines
/// scored low, or lines in the final stretch of the timeline piled up after
/// most of the track ("late pile-up", common when ASR drops large chunks of
/// audio).
pub fn should_fall_back_to_segments(
    scores: &[f64],
    timeline: &[TimedLine],
    total_duration: f64,
) -> bool {
    let low = scores.iter().filter(|&&s| s < LOW_SCORE_THRESH).count();

    let mut late = 0usize;
    if total_duration > 0.0 && !timeline.is_empty() {
        let tail_start = (timeline.len() as f64 * TAIL_START_FRACTION) as usize;
        late = timeline[tail_start.min(timeline.len())..]
            .iter()
            .filter(|tl| tl.start > total_duration * LATE_START_FRACTION)
            .count();
    }

    let fall_back = low as f64 > scores.len() as f64 * LOW_SCORE_FRACTION
        || late > 2.max(timeline.len() / 5);
    if fall_back {
        tracing::warn!(
            low_lines = low,
            late_lines = late,
            total_lines = scores.len(),
            "word alignment looked poor; segment-level fallback advised"
        );
    }
    fall_back
}

/// Structural degeneracy check on a finished timeline: too many very short
/// lines, or too few distinct start times (many lines stacked on the same
/// instant).
pub fn looks_piled_up(timeline: &[TimedLine]) -> bool {
    if timeline.is_empty() {
        return true;
    }
    let n = timeline.len() as f64;
    let short = timeline
        .iter()
        .filter(|tl| tl.duration() < PILEUP_SHORT_DUR_S)
        .count();
    // Starts bucketed to 10ms.
    let distinct_starts: HashSet<i64> = timeline
        .iter()
        .map(|tl| (tl.start * 100.0).round() as i64)
        .collect();

    short as f64 > PILEUP_SHORT_FRACTION * n
        || (distinct_starts.len() as f64) < PILEUP_DISTINCT_FRACTION * n
}
