pub mod alignment;
pub mod config;
pub mod error;
pub mod score;
pub mod text;
pub mod transcript;
pub mod types;

pub use alignment::{
    align_lines_to_segments, align_lines_to_words, looks_piled_up, needs_vad_retry,
    retry_improves, should_fall_back_to_segments, word_spans_to_timed_lines, AlignmentOutcome,
    LyricAligner, LyricAlignerBuilder,
};
pub use config::{AlignMode, QualityConfig, SegmentAlignConfig, TimelineConfig, WordAlignConfig};
pub use error::AlignError;
pub use score::{hybrid_score, HybridScorer, LineScorer};
pub use transcript::Transcript;
pub use types::{MatchSpan, Segment, TimedLine, Word};
