//! Completeness scoring for a clip's content.
//!
//! A score out of 100 built from four signals, banded for display. Read-only
//! and advisory: nothing in the pipeline gates on it.

use serde::Serialize;

/// Points for each signal
const HTML_WEIGHT: u8 = 30;
const TEXT_WEIGHT: u8 = 25;
const TITLE_WEIGHT: u8 = 15;
const TRANSLATION_WEIGHT: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityBand {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => QualityBand::Excellent,
            65..=84 => QualityBand::Good,
            40..=64 => QualityBand::Fair,
            _ => QualityBand::Poor,
        }
    }
}

/// What was observed about a clip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualitySignals {
    pub has_html: bool,
    pub has_text: bool,
    pub has_title: bool,
    /// The full pipeline produced usable output from the HTML
    pub translation_ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityAssessment {
    pub score: u8,
    pub band: QualityBand,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl QualityAssessment {
    #[must_use]
    pub fn from_signals(signals: QualitySignals) -> Self {
        let mut score = 0u8;
        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        if signals.has_html {
            score += HTML_WEIGHT;
        } else {
            issues.push("No HTML content captured".to_string());
            suggestions.push("Re-capture the clip to keep its formatting".to_string());
        }

        if signals.has_text {
            score += TEXT_WEIGHT;
        } else {
            issues.push("No plain-text content".to_string());
            suggestions.push("Store a plain-text copy so the clip stays searchable".to_string());
        }

        if signals.has_title {
            score += TITLE_WEIGHT;
        } else {
            issues.push("Missing title".to_string());
            suggestions.push("Add a descriptive title".to_string());
        }

        if signals.translation_ok {
            score += TRANSLATION_WEIGHT;
        } else if signals.has_html {
            issues.push("HTML content could not be processed".to_string());
            suggestions.push(
                "The captured HTML may be malformed or contain only unsafe elements; \
                 re-capture or edit the clip"
                    .to_string(),
            );
        }

        Self {
            score,
            band: QualityBand::from_score(score),
            issues,
            suggestions,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}
