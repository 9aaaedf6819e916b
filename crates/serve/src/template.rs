use transcript::{ConversationTranscript, Speaker};

use crate::error::{Result, ServeError};

/// Marker preceding every assistant reply in a rendered prompt.
pub const ASSISTANT_MARKER: &str = "ASSISTANT:";

/// A named conversation layout.
///
/// Turns are rendered as `ROLE: content` followed by a separator that
/// alternates between `sep` (after user turns) and `sep2` (after assistant
/// turns). A turn without content renders as a bare `ROLE:` so generation
/// continues from there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTemplate {
    pub name: &'static str,
    pub system_message: &'static str,
    pub user_role: &'static str,
    pub assistant_role: &'static str,
    pub sep: &'static str,
    pub sep2: &'static str,
}

const IE_AS_QA: ConversationTemplate = ConversationTemplate {
    name: "ie_as_qa",
    system_message: "A virtual assistant answers questions from a user based on the provided text.",
    user_role: "USER",
    assistant_role: "ASSISTANT",
    sep: " ",
    sep2: "</s>",
};

const IE_AS_QA_RU: ConversationTemplate = ConversationTemplate {
    name: "ie_as_qa_ru",
    system_message: "Виртуальный ассистент отвечает на вопросы пользователя на основе предоставленного текста.",
    user_role: "USER",
    assistant_role: "ASSISTANT",
    sep: " ",
    sep2: "</s>",
};

pub const TEMPLATES: &[ConversationTemplate] = &[IE_AS_QA, IE_AS_QA_RU];

pub fn get_template(name: &str) -> Result<&'static ConversationTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| ServeError::UnknownTemplate(name.to_string()))
}

impl ConversationTemplate {
    pub fn render(&self, transcript: &ConversationTranscript) -> String {
        let mut prompt = String::with_capacity(256);
        prompt.push_str(self.system_message);
        prompt.push_str(self.sep);

        for turn in transcript.turns() {
            let (role, sep) = match turn.speaker {
                Speaker::Human => (self.user_role, self.sep),
                Speaker::Assistant => (self.assistant_role, self.sep2),
            };
            match turn.value.as_deref() {
                Some(content) if !content.is_empty() => {
                    prompt.push_str(role);
                    prompt.push_str(": ");
                    prompt.push_str(content);
                    prompt.push_str(sep);
                }
                _ => {
                    prompt.push_str(role);
                    prompt.push(':');
                }
            }
        }

        prompt
    }
}

/// Render `transcript` with the template registered under `template_name`.
pub fn render_prompt(transcript: &ConversationTranscript, template_name: &str) -> Result<String> {
    Ok(get_template(template_name)?.render(transcript))
}

/// Text after the last assistant marker, trimmed.
pub fn extract_response(generated: &str) -> &str {
    generated
        .rsplit(ASSISTANT_MARKER)
        .next()
        .unwrap_or(generated)
        .trim()
}
