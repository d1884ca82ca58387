use serde::{Deserialize, Serialize};

/// One ASR-recognized token with its time interval in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// One ASR utterance spanning possibly many words. Coarser than [`Word`];
/// the two are alternative inputs selected by alignment mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Word-index range `[start_word, end_word)` in the global word list matched
/// to one lyric line, with a confidence score in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSpan {
    pub line_index: usize,
    pub start_word: usize,
    pub end_word: usize,
    pub score: f64,
}

/// Final output unit: one lyric line with concrete on-screen times.
///
/// Across a whole timeline, `start` and `end` are non-decreasing with
/// increasing `line_index`, `end >= start`, and all times fall within
/// `[0, total_duration]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedLine {
    pub line_index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TimedLine {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}
