//! Two-signal sentiment scoring.
//!
//! Signal A (`VaderSignal`) is tuned for short informal text and supplies a
//! compound polarity; signal B (`PatternSignal`) is a general lexicon that
//! also reports subjectivity. They are fused as `0.7 * A + 0.3 * B` and
//! labelled with a ±0.05 dead zone around zero.

pub mod lexicon;
pub mod vader;

pub use lexicon::PatternSignal;
pub use vader::VaderSignal;

use crate::entities::SentimentLabel;
use crate::errors::SignalError;
use serde::Serialize;
use tracing::warn;

const PRIMARY_WEIGHT: f64 = 0.7;
const SECONDARY_WEIGHT: f64 = 0.3;
const LABEL_THRESHOLD: f64 = 0.05;

/// One signal's view of a text. Polarity is in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalReading {
    pub polarity: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub subjectivity: f64,
}

impl SignalReading {
    /// Fully neutral reading used when a signal fails.
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            subjectivity: 0.0,
        }
    }
}

pub trait PolaritySignal: Send + Sync {
    fn name(&self) -> &'static str;

    fn read(&self, text: &str) -> Result<SignalReading, SignalError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Fused polarity, rounded to three places.
    pub score: f64,
    pub confidence: f64,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
            confidence: 0.0,
        }
    }
}

/// `SentimentResult` plus the raw readings it was fused from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetailedSentiment {
    pub result: SentimentResult,
    pub primary: SignalReading,
    pub secondary: SignalReading,
}

pub struct SentimentFuser {
    primary: Box<dyn PolaritySignal>,
    secondary: Box<dyn PolaritySignal>,
}

impl Default for SentimentFuser {
    fn default() -> Self {
        Self::new(Box::new(VaderSignal), Box::new(PatternSignal::default()))
    }
}

impl SentimentFuser {
    pub fn new(primary: Box<dyn PolaritySignal>, secondary: Box<dyn PolaritySignal>) -> Self {
        Self { primary, secondary }
    }

    pub fn score(&self, text: &str) -> SentimentResult {
        self.score_detailed(text).result
    }

    pub fn score_detailed(&self, text: &str) -> DetailedSentiment {
        let text = text.trim();
        if text.is_empty() {
            return DetailedSentiment {
                result: SentimentResult::neutral(),
                primary: SignalReading::neutral(),
                secondary: SignalReading::neutral(),
            };
        }

        let primary = read_or_neutral(self.primary.as_ref(), text);
        let secondary = read_or_neutral(self.secondary.as_ref(), text);

        DetailedSentiment {
            result: fuse(primary.polarity, secondary.polarity),
            primary,
            secondary,
        }
    }

    /// Score many texts, preserving order.
    pub fn score_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SentimentResult> {
        texts.iter().map(|t| self.score(t.as_ref())).collect()
    }
}

fn read_or_neutral(signal: &dyn PolaritySignal, text: &str) -> SignalReading {
    match signal.read(text) {
        Ok(reading) => reading,
        Err(e) => {
            warn!(signal = signal.name(), "sentiment signal degraded to neutral: {}", e);
            SignalReading::neutral()
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Label on the unrounded value; round score and confidence afterwards.
fn fuse(primary: f64, secondary: f64) -> SentimentResult {
    let combined = PRIMARY_WEIGHT * primary + SECONDARY_WEIGHT * secondary;

    let label = if combined >= LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if combined <= -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    SentimentResult {
        label,
        score: round3(combined.clamp(-1.0, 1.0)),
        confidence: round3(combined.abs().min(1.0)),
    }
}
