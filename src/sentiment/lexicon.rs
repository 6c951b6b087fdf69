//! General-purpose polarity/subjectivity lexicon.
//!
//! Each matched word contributes a polarity in [-1, 1] and a subjectivity in
//! [0, 1]. A preceding intensifier scales the next match; a preceding
//! negation multiplies its polarity by -0.5. The reading is the mean over
//! matched words, so text with no matches is neutral and fully objective.

use crate::errors::SignalError;
use crate::sentiment::{PolaritySignal, SignalReading};
use std::collections::HashMap;

const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, Copy)]
struct Entry {
    polarity: f64,
    subjectivity: f64,
}

const ENTRIES: &[(&str, f64, f64)] = &[
    // positive
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("wonderful", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("happy", 0.8, 1.0),
    ("hope", 0.4, 0.5),
    ("hopeful", 0.5, 0.6),
    ("success", 0.6, 0.5),
    ("successful", 0.75, 0.95),
    ("win", 0.8, 0.4),
    ("wins", 0.8, 0.4),
    ("won", 0.7, 0.4),
    ("victory", 0.7, 0.3),
    ("celebrate", 0.6, 0.5),
    ("breakthrough", 0.6, 0.4),
    ("growth", 0.4, 0.2),
    ("gain", 0.4, 0.3),
    ("gains", 0.4, 0.3),
    ("rise", 0.3, 0.2),
    ("surge", 0.5, 0.4),
    ("strong", 0.43, 0.73),
    ("improve", 0.5, 0.4),
    ("improved", 0.5, 0.4),
    ("recovery", 0.4, 0.3),
    ("safe", 0.5, 0.5),
    ("healthy", 0.5, 0.5),
    ("record", 0.3, 0.2),
    ("approve", 0.4, 0.4),
    ("approves", 0.4, 0.4),
    ("praise", 0.6, 0.6),
    ("positive", 0.23, 0.55),
    ("peace", 0.5, 0.4),
    ("rescue", 0.4, 0.3),
    ("innovative", 0.5, 0.6),
    ("boost", 0.4, 0.4),
    // negative
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("sad", -0.5, 1.0),
    ("fear", -0.5, 0.6),
    ("fears", -0.5, 0.6),
    ("crisis", -0.6, 0.5),
    ("crash", -0.6, 0.4),
    ("dead", -0.2, 0.4),
    ("death", -0.5, 0.4),
    ("deaths", -0.5, 0.4),
    ("killed", -0.6, 0.4),
    ("injured", -0.5, 0.4),
    ("attack", -0.6, 0.4),
    ("war", -0.6, 0.4),
    ("violence", -0.7, 0.5),
    ("disaster", -0.8, 0.5),
    ("flood", -0.4, 0.3),
    ("floods", -0.4, 0.3),
    ("loss", -0.4, 0.3),
    ("losses", -0.4, 0.3),
    ("fall", -0.2, 0.2),
    ("falls", -0.2, 0.2),
    ("tumble", -0.4, 0.3),
    ("plunge", -0.5, 0.4),
    ("decline", -0.3, 0.2),
    ("weak", -0.38, 0.63),
    ("fail", -0.5, 0.4),
    ("failed", -0.5, 0.4),
    ("failure", -0.6, 0.5),
    ("problem", -0.3, 0.4),
    ("risk", -0.3, 0.4),
    ("warning", -0.4, 0.4),
    ("inflation", -0.2, 0.2),
    ("scandal", -0.6, 0.6),
    ("fraud", -0.8, 0.6),
    ("angry", -0.5, 1.0),
    ("outbreak", -0.5, 0.3),
    ("threat", -0.5, 0.4),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("really", 1.2),
    ("incredibly", 1.5),
    ("deeply", 1.3),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "cannot", "cant", "can't", "don't", "dont",
    "doesn't", "doesnt", "didn't", "didnt", "won't", "wont", "isn't", "isnt", "aren't",
    "arent", "wasn't", "wasnt", "without", "hardly",
];

pub struct PatternSignal {
    words: HashMap<&'static str, Entry>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for PatternSignal {
    fn default() -> Self {
        Self {
            words: ENTRIES
                .iter()
                .map(|&(word, polarity, subjectivity)| {
                    (
                        word,
                        Entry {
                            polarity,
                            subjectivity,
                        },
                    )
                })
                .collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

impl PatternSignal {
    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }
}

impl PolaritySignal for PatternSignal {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn read(&self, text: &str) -> Result<SignalReading, SignalError> {
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut matched = 0usize;
        let mut positive = 0usize;
        let mut negative = 0usize;

        let mut negate = false;
        let mut intensity = 1.0;

        for token in Self::tokens(text) {
            if NEGATIONS.contains(&token.as_str()) {
                negate = true;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(token.as_str()) {
                intensity = factor;
                continue;
            }

            if let Some(entry) = self.words.get(token.as_str()) {
                let mut polarity = (entry.polarity * intensity).clamp(-1.0, 1.0);
                if negate {
                    polarity *= NEGATION_FACTOR;
                }
                let subjectivity = (entry.subjectivity * intensity).min(1.0);

                polarity_sum += polarity;
                subjectivity_sum += subjectivity;
                matched += 1;
                if polarity > 0.0 {
                    positive += 1;
                } else if polarity < 0.0 {
                    negative += 1;
                }
            }

            negate = false;
            intensity = 1.0;
        }

        if matched == 0 {
            return Ok(SignalReading::neutral());
        }

        let n = matched as f64;
        Ok(SignalReading {
            polarity: (polarity_sum / n).clamp(-1.0, 1.0),
            positive: positive as f64 / n,
            negative: negative as f64 / n,
            neutral: (matched - positive - negative) as f64 / n,
            subjectivity: (subjectivity_sum / n).clamp(0.0, 1.0),
        })
    }
}
