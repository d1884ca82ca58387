use crate::error::AlignError;

/// Alignment granularity requested by the caller. `Auto` runs the word-level
/// aligner first and falls back to segments when its output looks
/// desynchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignMode {
    Words,
    Segments,
    #[default]
    Auto,
}

/// Tuning for the greedy word-level aligner.
#[derive(Debug, Clone)]
pub struct WordAlignConfig {
    /// Minimum candidate window length in words.
    pub min_window: usize,
    /// Extra words tried beyond the line's own word count.
    pub max_window_extra: usize,
    /// Stop scanning starts further than this past the cursor once a decent
    /// best is already held.
    pub early_break: usize,
    /// How far behind the cursor candidate starts may begin.
    pub backtrack: usize,
    /// How far ahead of the cursor candidate starts may begin.
    pub lookahead: usize,
    /// Score penalty per word of distance between a candidate start and the
    /// cursor, to favor local in-order matches.
    pub jump_penalty: f64,
    /// Minimum score to commit a span.
    pub accept_thresh: f64,
    /// Stop extending a window early once the unpenalized score reaches this.
    pub strong_thresh: f64,
}

impl Default for WordAlignConfig {
    fn default() -> Self {
        Self {
            min_window: 2,
            max_window_extra: 6,
            early_break: 60,
            backtrack: 3,
            lookahead: 30,
            jump_penalty: 0.002,
            accept_thresh: 0.55,
            strong_thresh: 0.78,
        }
    }
}

impl WordAlignConfig {
    pub fn validate(&self) -> Result<(), AlignError> {
        if self.min_window == 0 {
            return Err(AlignError::invalid_config("min_window must be at least 1"));
        }
        validate_unit_range("accept_thresh", self.accept_thresh)?;
        validate_unit_range("strong_thresh", self.strong_thresh)?;
        validate_non_negative("jump_penalty", self.jump_penalty)?;
        Ok(())
    }
}

/// Tuning for the segment-level aligner.
#[derive(Debug, Clone)]
pub struct SegmentAlignConfig {
    pub pad_s: f64,
    pub min_gap_s: f64,
    /// How far behind the cursor candidate segment starts may begin.
    pub window_back: usize,
    /// How far ahead of the cursor candidate segment starts may begin.
    pub window_ahead: usize,
    /// Maximum consecutive segments merged into one candidate.
    pub max_merge: usize,
    /// Score penalty per segment of distance from the cursor, capped at 10.
    pub jump_penalty: f64,
    pub accept_thresh: f64,
    pub strong_thresh: f64,
}

impl Default for SegmentAlignConfig {
    fn default() -> Self {
        Self {
            pad_s: 0.02,
            min_gap_s: 0.08,
            window_back: 2,
            window_ahead: 6,
            max_merge: 3,
            jump_penalty: 0.04,
            accept_thresh: 0.55,
            strong_thresh: 0.78,
        }
    }
}

impl SegmentAlignConfig {
    pub fn validate(&self) -> Result<(), AlignError> {
        if self.max_merge == 0 {
            return Err(AlignError::invalid_config("max_merge must be at least 1"));
        }
        validate_non_negative("pad_s", self.pad_s)?;
        validate_non_negative("min_gap_s", self.min_gap_s)?;
        validate_non_negative("jump_penalty", self.jump_penalty)?;
        validate_unit_range("accept_thresh", self.accept_thresh)?;
        validate_unit_range("strong_thresh", self.strong_thresh)?;
        Ok(())
    }
}

/// Tuning for materializing word spans into concrete times.
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    /// Padding subtracted before a span's first word and added after its last.
    pub pad_s: f64,
    /// Minimum gap kept between consecutive lines.
    pub min_gap_s: f64,
    /// Minimum on-screen duration per line, for readability.
    pub min_dur_s: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pad_s: 0.02,
            min_gap_s: 0.08,
            min_dur_s: 0.75,
        }
    }
}

impl TimelineConfig {
    pub fn validate(&self) -> Result<(), AlignError> {
        validate_non_negative("pad_s", self.pad_s)?;
        validate_non_negative("min_gap_s", self.min_gap_s)?;
        validate_non_negative("min_dur_s", self.min_dur_s)?;
        Ok(())
    }
}

/// Thresholds for the transcription-retry heuristic.
#[derive(Debug, Clone)]
pub struct QualityConfig {
    /// Retry when `last_segment_end / total_duration` falls below this.
    pub coverage_floor: f64,
    /// Retry when `recognized_words / estimated_lyric_words` falls below this.
    pub token_ratio_floor: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            coverage_floor: 0.65,
            token_ratio_floor: 0.35,
        }
    }
}

impl QualityConfig {
    pub fn validate(&self) -> Result<(), AlignError> {
        validate_unit_range("coverage_floor", self.coverage_floor)?;
        validate_unit_range("token_ratio_floor", self.token_ratio_floor)?;
        Ok(())
    }
}

fn validate_unit_range(name: &str, value: f64) -> Result<(), AlignError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AlignError::invalid_config(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn validate_non_negative(name: &str, value: f64) -> Result<(), AlignError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AlignError::invalid_config(format!(
            "{name} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_align_defaults() {
        let config = WordAlignConfig::default();
        assert_eq!(config.min_window, 2);
        assert_eq!(config.backtrack, 3);
        assert_eq!(config.lookahead, 30);
        assert!((config.accept_thresh - 0.55).abs() < 1e-12);
        assert!((config.strong_thresh - 0.78).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn segment_align_defaults() {
        let config = SegmentAlignConfig::default();
        assert_eq!(config.window_back, 2);
        assert_eq!(config.window_ahead, 6);
        assert_eq!(config.max_merge, 3);
        assert!((config.jump_penalty - 0.04).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn timeline_defaults() {
        let config = TimelineConfig::default();
        assert!((config.min_dur_s - 0.75).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_min_window_rejected() {
        let config = WordAlignConfig {
            min_window: 0,
            ..WordAlignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let config = WordAlignConfig {
            accept_thresh: 1.5,
            ..WordAlignConfig::default()
        };
        assert!(config.validate().is_err());

        let config = QualityConfig {
            coverage_floor: -0.1,
            ..QualityConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_padding_rejected() {
        let config = TimelineConfig {
            pad_s: -0.5,
            ..TimelineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SegmentAlignConfig {
            min_gap_s: f64::NAN,
            ..SegmentAlignConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
