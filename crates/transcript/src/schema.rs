use serde::{Deserialize, Serialize};

use crate::answer::to_spaced_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "human")]
    Human,
    #[serde(rename = "gpt")]
    Assistant,
}

impl Speaker {
    /// Speaker of the turn at `position`, counting from the opening Human turn.
    pub fn at(position: usize) -> Self {
        if position % 2 == 0 {
            Speaker::Human
        } else {
            Speaker::Assistant
        }
    }
}

/// A single turn. `value` is `None` only for a turn left for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(rename = "from")]
    pub speaker: Speaker,
    pub value: Option<String>,
}

impl Turn {
    pub fn human(value: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Human,
            value: Some(value.into()),
        }
    }

    pub fn assistant(value: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            value: Some(value.into()),
        }
    }

    pub fn pending_assistant() -> Self {
        Self {
            speaker: Speaker::Assistant,
            value: None,
        }
    }
}

/// Serialized as a bare JSON array of turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationTranscript {
    turns: Vec<Turn>,
}

impl ConversationTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question/answer pair.
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn::human(question));
        self.turns.push(Turn::assistant(answer));
    }

    /// Append a question whose answer is left unset.
    pub fn push_open_question(&mut self, question: impl Into<String>) {
        self.turns.push(Turn::human(question));
        self.turns.push(Turn::pending_assistant());
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn is_alternating(&self) -> bool {
        self.turns
            .iter()
            .enumerate()
            .all(|(i, turn)| turn.speaker == Speaker::at(i))
    }

    /// One output line: `[{"from": "human", "value": "..."}, ...]`, non-ASCII literal.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        to_spaced_json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let mut transcript = ConversationTranscript::new();
        transcript.push_exchange("Текст: Привет", "Я прочитала текст.");

        let json = transcript.to_json_line().unwrap();
        assert_eq!(
            json,
            r#"[{"from": "human", "value": "Текст: Привет"}, {"from": "gpt", "value": "Я прочитала текст."}]"#
        );
    }

    #[test]
    fn test_pending_turn_serializes_null() {
        let mut transcript = ConversationTranscript::new();
        transcript.push_open_question("Q?");
        let json = transcript.to_json_line().unwrap();
        assert!(json.ends_with(r#"{"from": "gpt", "value": null}]"#));
    }

    #[test]
    fn test_alternation() {
        let mut transcript = ConversationTranscript::new();
        transcript.push_exchange("a", "b");
        transcript.push_open_question("c");
        assert!(transcript.is_alternating());
        assert_eq!(transcript.len(), 4);
    }
}
