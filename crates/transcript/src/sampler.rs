use ingest::FrequencyTable;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::HashSet;

use crate::error::{Result, TranscriptError};

/// Probability that a record receives a negative (unanswerable) question.
pub const DEFAULT_NEGATIVE_PROBABILITY: f64 = 0.7;

/// Picks entity types absent from a record, weighted by corpus frequency.
#[derive(Debug, Clone, Copy)]
pub struct NegativeSampler<'a> {
    table: &'a FrequencyTable,
    probability: f64,
}

impl<'a> NegativeSampler<'a> {
    pub fn new(table: &'a FrequencyTable, probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(TranscriptError::InvalidProbability(probability));
        }
        Ok(Self { table, probability })
    }

    pub fn with_default_probability(table: &'a FrequencyTable) -> Self {
        Self {
            table,
            probability: DEFAULT_NEGATIVE_PROBABILITY,
        }
    }

    /// Coin flip deciding whether this record gets a negative pair.
    pub fn should_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.r#gen::<f64>() < self.probability
    }

    /// Draw one type outside `used`, weighted by count over the complement only.
    ///
    /// Fails with `SamplingExhausted` when no type outside `used` has a
    /// positive count.
    pub fn draw<'u, R: Rng + ?Sized>(
        &self,
        used: impl IntoIterator<Item = &'u str>,
        rng: &mut R,
    ) -> Result<&'a str> {
        let used: HashSet<&str> = used.into_iter().collect();

        let (candidates, weights): (Vec<&'a str>, Vec<u64>) = self
            .table
            .iter()
            .filter(|(entity_type, count)| *count > 0 && !used.contains(entity_type))
            .unzip();

        let exhausted = || {
            let mut used: Vec<String> = used.iter().map(|t| t.to_string()).collect();
            used.sort();
            TranscriptError::SamplingExhausted { used }
        };

        if candidates.is_empty() {
            return Err(exhausted());
        }
        let dist = WeightedIndex::new(&weights).map_err(|_| exhausted())?;

        Ok(candidates[dist.sample(rng)])
    }

    /// Coin flip, then draw. `Ok(None)` when the coin says no negative.
    pub fn sample<'u, R: Rng + ?Sized>(
        &self,
        used: impl IntoIterator<Item = &'u str>,
        rng: &mut R,
    ) -> Result<Option<&'a str>> {
        if !self.should_sample(rng) {
            return Ok(None);
        }
        self.draw(used, rng).map(Some)
    }
}
