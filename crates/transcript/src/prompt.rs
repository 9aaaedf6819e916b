use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TranscriptError;

/// Placeholder substituted with the entity type in `question_template`.
pub const ENTITY_PLACEHOLDER: &str = "{entity}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Ru,
}

impl Language {
    pub fn prompts(self) -> PromptSet {
        match self {
            Language::En => PromptSet::english(),
            Language::Ru => PromptSet::russian(),
        }
    }
}

impl FromStr for Language {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            _ => Err(TranscriptError::UnknownLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Ru => write!(f, "ru"),
        }
    }
}

/// Wording of one language variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    pub text_label: String,
    pub ack_text: String,
    pub question_template: String,
    /// Conversation template used when rendering for inference
    pub template_name: String,
}

impl PromptSet {
    pub fn english() -> Self {
        Self {
            text_label: "Text".to_string(),
            ack_text: "I've read this text.".to_string(),
            question_template: "What describes {entity} in the text?".to_string(),
            template_name: "ie_as_qa".to_string(),
        }
    }

    pub fn russian() -> Self {
        Self {
            text_label: "Текст".to_string(),
            ack_text: "Я прочитала текст.".to_string(),
            question_template: r#"Что описывает "{entity}" в тексте?"#.to_string(),
            template_name: "ie_as_qa_ru".to_string(),
        }
    }

    pub fn text_intro(&self, text: &str) -> String {
        format!("{}: {}", self.text_label, text)
    }

    pub fn question(&self, entity_type: &str) -> String {
        self.question_template.replace(ENTITY_PLACEHOLDER, entity_type)
    }
}
