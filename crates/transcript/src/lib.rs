pub mod answer;
pub mod error;
pub mod prompt;
pub mod sampler;
pub mod schema;

pub use answer::{format_answer, EMPTY_ANSWER};
pub use error::{Result, TranscriptError};
pub use prompt::{Language, PromptSet};
pub use sampler::{NegativeSampler, DEFAULT_NEGATIVE_PROBABILITY};
pub use schema::{ConversationTranscript, Speaker, Turn};

use ingest::{FrequencyTable, RawRecord};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do when a record already covers every weighted entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    #[default]
    Fail,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegativeOutcome {
    Disabled,
    NotDrawn,
    Added(String),
    /// Drawn by the coin flip but no unused type was available
    Skipped,
}

pub struct TranscriptBuilder<'a> {
    prompts: &'a PromptSet,
    sampler: Option<NegativeSampler<'a>>,
    on_exhausted: ExhaustionPolicy,
}

impl<'a> TranscriptBuilder<'a> {
    pub fn new(prompts: &'a PromptSet) -> Self {
        Self {
            prompts,
            sampler: None,
            on_exhausted: ExhaustionPolicy::Fail,
        }
    }

    pub fn with_negative_sampling(mut self, sampler: NegativeSampler<'a>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn on_exhausted(mut self, policy: ExhaustionPolicy) -> Self {
        self.on_exhausted = policy;
        self
    }

    /// Convert one record into a transcript.
    pub fn convert<R: Rng + ?Sized>(
        &self,
        record: &RawRecord,
        rng: &mut R,
    ) -> Result<ConversationTranscript> {
        self.convert_with_outcome(record, rng)
            .map(|(transcript, _)| transcript)
    }

    /// Like `convert`, also reporting what happened to the negative pair.
    pub fn convert_with_outcome<R: Rng + ?Sized>(
        &self,
        record: &RawRecord,
        rng: &mut R,
    ) -> Result<(ConversationTranscript, NegativeOutcome)> {
        let mut transcript = ConversationTranscript::new();
        transcript.push_exchange(self.prompts.text_intro(&record.text), &self.prompts.ack_text);

        for entity in &record.entities {
            transcript.push_exchange(
                self.prompts.question(&entity.entity_type),
                format_answer(&entity.values)?,
            );
        }

        let Some(sampler) = &self.sampler else {
            return Ok((transcript, NegativeOutcome::Disabled));
        };

        let outcome = match sampler.sample(record.entity_types(), rng) {
            Ok(None) => NegativeOutcome::NotDrawn,
            Ok(Some(negative)) => {
                transcript.push_exchange(self.prompts.question(negative), EMPTY_ANSWER);
                NegativeOutcome::Added(negative.to_string())
            }
            Err(TranscriptError::SamplingExhausted { used })
                if self.on_exhausted == ExhaustionPolicy::Skip =>
            {
                warn!(used = ?used, "No unused entity type left for a negative question, skipping");
                NegativeOutcome::Skipped
            }
            Err(e) => return Err(e),
        };

        Ok((transcript, outcome))
    }
}

/// Convert with the default negative-sampling probability, failing on exhaustion.
pub fn convert<R: Rng + ?Sized>(
    record: &RawRecord,
    prompts: &PromptSet,
    table: Option<&FrequencyTable>,
    rng: &mut R,
) -> Result<ConversationTranscript> {
    let mut builder = TranscriptBuilder::new(prompts);
    if let Some(table) = table {
        builder = builder.with_negative_sampling(NegativeSampler::with_default_probability(table));
    }
    builder.convert(record, rng)
}

/// Transcript for a single question whose answer is left for generation.
pub fn inference_transcript(text: &str, entity_type: &str, prompts: &PromptSet) -> ConversationTranscript {
    let mut transcript = ConversationTranscript::new();
    transcript.push_exchange(prompts.text_intro(text), &prompts.ack_text);
    transcript.push_open_question(prompts.question(entity_type));
    transcript
}
