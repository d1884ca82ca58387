use std::path::Path;

use serde::Deserialize;

use crate::error::AlignError;
use crate::types::{Segment, Word};

/// Output of one external transcription pass: the word and segment streams
/// plus the detected total duration in seconds. Inputs to an alignment run;
/// immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub words: Vec<Word>,
    pub segments: Vec<Segment>,
    pub total_duration: f64,
}

#[derive(Debug, Deserialize)]
struct RawTranscript {
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    #[serde(default)]
    text: String,
    start: Option<f64>,
    end: Option<f64>,
    #[serde(default)]
    words: Vec<RawWord>,
}

#[derive(Debug, Deserialize)]
struct RawWord {
    #[serde(default)]
    word: String,
    start: Option<f64>,
    end: Option<f64>,
}

impl Transcript {
    /// Builds a transcript from already-decoded streams, repairing any
    /// contract violations (negative times, inverted intervals) by clamping.
    pub fn from_parts(words: Vec<Word>, segments: Vec<Segment>) -> Self {
        let words: Vec<Word> = words
            .into_iter()
            .map(|w| {
                let (start, end) = clamp_interval(w.start, w.end);
                Word { start, end, ..w }
            })
            .collect();
        let segments: Vec<Segment> = segments
            .into_iter()
            .map(|s| {
                let (start, end) = clamp_interval(s.start, s.end);
                Segment { start, end, ..s }
            })
            .collect();
        let total_duration = detect_total_duration(&words, &segments);
        Self {
            words,
            segments,
            total_duration,
        }
    }

    /// Parses the JSON shape produced by WhisperX-style engines: a list of
    /// segments, each optionally carrying word-level timings. Missing or null
    /// times default to 0 and empty word tokens are skipped.
    pub fn from_json_str(data: &str) -> Result<Self, AlignError> {
        let raw: RawTranscript = serde_json::from_str(data)
            .map_err(|e| AlignError::json("parse transcript json", e))?;

        let mut words = Vec::new();
        let mut segments = Vec::with_capacity(raw.segments.len());
        for seg in raw.segments {
            for w in &seg.words {
                let token = w.word.trim();
                if token.is_empty() {
                    continue;
                }
                words.push(Word {
                    text: token.to_string(),
                    start: w.start.unwrap_or(0.0),
                    end: w.end.unwrap_or(0.0),
                });
            }
            segments.push(Segment {
                text: seg.text,
                start: seg.start.unwrap_or(0.0),
                end: seg.end.unwrap_or(0.0),
            });
        }

        Ok(Self::from_parts(words, segments))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AlignError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignError::io("read transcript json", e))?;
        Self::from_json_str(&data)
    }

    pub fn last_segment_end(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.end)
    }
}

fn clamp_interval(start: f64, end: f64) -> (f64, f64) {
    let start = if start.is_finite() { start.max(0.0) } else { 0.0 };
    let end = if end.is_finite() { end.max(start) } else { start };
    (start, end)
}

/// Max segment end, falling back to max word end when there are no segments.
fn detect_total_duration(words: &[Word], segments: &[Segment]) -> f64 {
    let seg_max = segments.iter().map(|s| s.end).fold(0.0f64, f64::max);
    if seg_max > 0.0 {
        return seg_max;
    }
    words.iter().map(|w| w.end).fold(0.0f64, f64::max)
}
