use crate::errors::SignalError;
use crate::sentiment::{PolaritySignal, SignalReading};
use std::panic::{self, AssertUnwindSafe};
use vader_sentiment::SentimentIntensityAnalyzer;

/// VADER compound polarity. The analyzer borrows a process-wide lexicon, so
/// constructing one per call costs nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderSignal;

impl PolaritySignal for VaderSignal {
    fn name(&self) -> &'static str {
        "vader"
    }

    fn read(&self, text: &str) -> Result<SignalReading, SignalError> {
        let scores = panic::catch_unwind(AssertUnwindSafe(|| {
            let analyzer = SentimentIntensityAnalyzer::new();
            let scores = analyzer.polarity_scores(text);
            let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);
            (get("compound"), get("pos"), get("neg"), get("neu"))
        }))
        .map_err(|_| SignalError::Failed {
            signal: "vader",
            reason: "analyzer panicked".to_string(),
        })?;

        let (compound, positive, negative, neutral) = scores;
        if !compound.is_finite() {
            return Err(SignalError::Failed {
                signal: "vader",
                reason: format!("non-finite compound score {compound}"),
            });
        }

        Ok(SignalReading {
            polarity: compound.clamp(-1.0, 1.0),
            positive,
            negative,
            neutral,
            subjectivity: 0.0,
        })
    }
}
