mod quality;
mod segments;
mod timeline;
mod words;

pub use quality::{looks_piled_up, needs_vad_retry, retry_improves, should_fall_back_to_segments};
pub use segments::align_lines_to_segments;
pub use timeline::word_spans_to_timed_lines;
pub use words::align_lines_to_words;

use crate::config::{AlignMode, SegmentAlignConfig, TimelineConfig, WordAlignConfig};
use crate::error::AlignError;
use crate::score::{HybridScorer, LineScorer};
use crate::transcript::Transcript;
use crate::types::{MatchSpan, TimedLine};

/// Result of one alignment run. Quality is surfaced as data (spans and
/// scores), never as errors: every input degrades to some usable timeline.
#[derive(Debug, Clone)]
pub struct AlignmentOutcome {
    pub timeline: Vec<TimedLine>,
    /// Word spans, empty when the segment aligner produced the timeline.
    pub spans: Vec<MatchSpan>,
    /// Per-line word-aligner confidence, empty when the segment aligner
    /// produced the timeline.
    pub scores: Vec<f64>,
    /// Granularity that actually produced the timeline.
    pub mode_used: AlignMode,
}

pub struct LyricAligner {
    mode: AlignMode,
    word_config: WordAlignConfig,
    segment_config: SegmentAlignConfig,
    timeline_config: TimelineConfig,
    scorer: Box<dyn LineScorer>,
}

pub struct LyricAlignerBuilder {
    mode: AlignMode,
    word_config: WordAlignConfig,
    segment_config: SegmentAlignConfig,
    timeline_config: TimelineConfig,
    scorer: Option<Box<dyn LineScorer>>,
}

impl Default for LyricAlignerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricAlignerBuilder {
    pub fn new() -> Self {
        Self {
            mode: AlignMode::Auto,
            word_config: WordAlignConfig::default(),
            segment_config: SegmentAlignConfig::default(),
            timeline_config: TimelineConfig::default(),
            scorer: None,
        }
    }

    pub fn with_mode(mut self, mode: AlignMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_word_config(mut self, word_config: WordAlignConfig) -> Self {
        self.word_config = word_config;
        self
    }

    pub fn with_segment_config(mut self, segment_config: SegmentAlignConfig) -> Self {
        self.segment_config = segment_config;
        self
    }

    pub fn with_timeline_config(mut self, timeline_config: TimelineConfig) -> Self {
        self.timeline_config = timeline_config;
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn LineScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn build(self) -> Result<LyricAligner, AlignError> {
        self.word_config.validate()?;
        self.segment_config.validate()?;
        self.timeline_config.validate()?;

        Ok(LyricAligner {
            mode: self.mode,
            word_config: self.word_config,
            segment_config: self.segment_config,
            timeline_config: self.timeline_config,
            scorer: self.scorer.unwrap_or_else(|| Box::new(HybridScorer)),
        })
    }
}

impl LyricAligner {
    /// Align lyric lines against one transcription pass. Pure and
    /// deterministic; never fails, even on empty inputs. The output always
    /// carries exactly one timed line per input line.
    pub fn align(&self, transcript: &Transcript, lines: &[String]) -> AlignmentOutcome {
        match self.mode {
            AlignMode::Words => self.align_words(transcript, lines),
            AlignMode::Segments => self.align_segments(transcript, lines),
            AlignMode::Auto => {
                let outcome = self.align_words(transcript, lines);
                if should_fall_back_to_segments(
                    &outcome.scores,
                    &outcome.timeline,
                    transcript.total_duration,
                ) {
                    return self.align_segments(transcript, lines);
                }
                outcome
            }
        }
    }

    fn align_words(&self, transcript: &Transcript, lines: &[String]) -> AlignmentOutcome {
        let (spans, scores) = align_lines_to_words(
            &transcript.words,
            lines,
            self.scorer.as_ref(),
            &self.word_config,
        );
        let timeline =
            word_spans_to_timed_lines(&transcript.words, lines, &spans, &self.timeline_config);
        AlignmentOutcome {
            timeline,
            spans,
            scores,
            mode_used: AlignMode::Words,
        }
    }

    fn align_segments(&self, transcript: &Transcript, lines: &[String]) -> AlignmentOutcome {
        let timeline = align_lines_to_segments(
            &transcript.segments,
            lines,
            self.scorer.as_ref(),
            &self.segment_config,
        );
        AlignmentOutcome {
            timeline,
            spans: Vec::new(),
            scores: Vec::new(),
            mode_used: AlignMode::Segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Segment, Word};

    fn word(text: &str, start: f64, end: f64) -> Word {
        Word {
            text: text.to_string(),
            start,
            end,
        }
    }

    fn segment(text: &str, start: f64, end: f64) -> Segment {
        Segment {
            text: text.to_string(),
            start,
            end,
        }
    }

    fn lines(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn auto_mode_keeps_good_word_alignment() {
        let transcript = Transcript::from_parts(
            vec![
                word("hello", 0.0, 0.5),
                word("world", 0.5, 1.0),
                word("second", 1.5, 2.0),
                word("line", 2.0, 2.5),
            ],
            vec![segment("hello world second line", 0.0, 2.5)],
        );
        let aligner = LyricAlignerBuilder::new().build().expect("valid defaults");
        let outcome = aligner.align(&transcript, &lines(&["hello world", "second line"]));
        assert_eq!(outcome.mode_used, AlignMode::Words);
        assert_eq!(outcome.timeline.len(), 2);
        assert_eq!(outcome.spans.len(), 2);
        assert!(outcome.scores.iter().all(|&s| s > 0.9));
    }

    #[test]
    fn auto_mode_falls_back_on_poor_word_scores() {
        // Words have nothing to do with the lyrics, but segments do.
        let transcript = Transcript::from_parts(
            vec![
                word("na", 0.0, 0.4),
                word("na", 0.4, 0.8),
                word("na", 0.8, 1.2),
                word("na", 1.2, 1.6),
            ],
            vec![
                segment("real first line", 0.0, 2.0),
                segment("real second line", 2.0, 4.0),
            ],
        );
        let aligner = LyricAlignerBuilder::new().build().expect("valid defaults");
        let outcome = aligner.align(
            &transcript,
            &lines(&["real first line", "real second line"]),
        );
        assert_eq!(outcome.mode_used, AlignMode::Segments);
        assert_eq!(outcome.timeline.len(), 2);
        assert!(outcome.spans.is_empty());
    }

    #[test]
    fn explicit_segment_mode_skips_words() {
        let transcript = Transcript::from_parts(
            vec![word("hello", 0.0, 0.5), word("world", 0.5, 1.0)],
            vec![segment("hello world", 0.0, 1.0)],
        );
        let aligner = LyricAlignerBuilder::new()
            .with_mode(AlignMode::Segments)
            .build()
            .expect("valid defaults");
        let outcome = aligner.align(&transcript, &lines(&["hello world"]));
        assert_eq!(outcome.mode_used, AlignMode::Segments);
        assert!(outcome.scores.is_empty());
    }

    #[test]
    fn invalid_config_rejected_at_build() {
        let result = LyricAlignerBuilder::new()
            .with_word_config(WordAlignConfig {
                min_window: 0,
                ..WordAlignConfig::default()
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn empty_everything_still_produces_full_timeline() {
        let transcript = Transcript::default();
        let aligner = LyricAlignerBuilder::new().build().expect("valid defaults");
        let outcome = aligner.align(&transcript, &lines(&["one", "", "three"]));
        assert_eq!(outcome.timeline.len(), 3);
        for tl in &outcome.timeline {
            assert!(tl.end >= tl.start);
        }
    }
}
