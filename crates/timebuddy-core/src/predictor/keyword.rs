//! Bag-of-words model over task names.
//!
//! Priority is a multinomial naive Bayes classifier with add-one smoothing.
//! Duration averages per-token means, each shrunk toward the global mean so
//! that rarely seen words cannot swing the estimate far.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Prediction, MIN_PREDICTED_MINUTES};
use crate::task::Priority;

/// Weight of the global mean when shrinking a token's mean duration.
const DURATION_SHRINKAGE: f64 = 1.0;

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at", "be", "been",
    "before", "being", "but", "by", "can", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "him", "his", "how", "if", "in", "into", "is", "it", "its", "me", "my", "no", "not",
    "of", "off", "on", "once", "or", "our", "out", "over", "she", "so", "some", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "to", "too", "up", "us",
    "very", "was", "we", "were", "what", "when", "which", "while", "who", "will", "with", "you",
    "your",
];

/// Lower-cased word tokens of at least two characters, minus stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 2)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct TokenStats {
    /// Occurrences per priority, indexed by `Priority::rank`
    priority_counts: [u64; 3],
    /// Documents containing the token
    documents: u64,
    /// Sum of durations of those documents (minutes)
    duration_total: f64,
}

/// Trained model; serialized as JSON in the data directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordModel {
    samples: u64,
    class_documents: [u64; 3],
    class_tokens: [u64; 3],
    mean_duration: f64,
    tokens: BTreeMap<String, TokenStats>,
}

impl KeywordModel {
    /// Fit from `(name, priority, minutes)` samples.
    pub fn fit<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Priority, u32)>,
    {
        let mut model = Self::default();
        let mut duration_sum = 0.0;

        for (name, priority, minutes) in samples {
            let class = priority.rank() as usize;
            model.samples += 1;
            model.class_documents[class] += 1;
            duration_sum += f64::from(minutes);

            let mut words = tokenize(name);
            for word in &words {
                model.tokens.entry(word.clone()).or_default().priority_counts[class] += 1;
                model.class_tokens[class] += 1;
            }
            words.sort();
            words.dedup();
            for word in words {
                let stats = model.tokens.entry(word).or_default();
                stats.documents += 1;
                stats.duration_total += f64::from(minutes);
            }
        }

        if model.samples > 0 {
            model.mean_duration = duration_sum / model.samples as f64;
        }
        model
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn predict(&self, task_name: &str) -> Prediction {
        if self.samples == 0 {
            return Prediction::default();
        }
        let known: Vec<&TokenStats> = tokenize(task_name)
            .iter()
            .filter_map(|w| self.tokens.get(w))
            .collect();

        Prediction {
            priority: self.predict_priority(&known),
            duration_minutes: self.predict_duration(&known),
        }
    }

    fn predict_priority(&self, known: &[&TokenStats]) -> Priority {
        let vocabulary = self.tokens.len() as f64;
        let mut best: Option<(Priority, f64)> = None;

        for priority in Priority::ALL {
            let class = priority.rank() as usize;
            if self.class_documents[class] == 0 {
                continue;
            }
            let prior = (self.class_documents[class] as f64 / self.samples as f64).ln();
            let denominator = self.class_tokens[class] as f64 + vocabulary;
            let likelihood: f64 = known
                .iter()
                .map(|t| ((t.priority_counts[class] as f64 + 1.0) / denominator).ln())
                .sum();
            let log_posterior = prior + likelihood;
            if best.map_or(true, |(_, b)| log_posterior > b) {
                best = Some((priority, log_posterior));
            }
        }

        best.map(|(p, _)| p).unwrap_or_default()
    }

    fn predict_duration(&self, known: &[&TokenStats]) -> u32 {
        let estimate = if known.is_empty() {
            self.mean_duration
        } else {
            let shrunk: f64 = known
                .iter()
                .map(|t| {
                    (t.duration_total + DURATION_SHRINKAGE * self.mean_duration)
                        / (t.documents as f64 + DURATION_SHRINKAGE)
                })
                .sum();
            shrunk / known.len() as f64
        };
        (estimate.round().max(0.0) as u32).max(MIN_PREDICTED_MINUTES)
    }
}
