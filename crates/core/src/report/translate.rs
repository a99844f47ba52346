use crate::domain::language::Language;
use crate::llm::{CompletionRequest, TextSynthesizer};
use crate::report::prompts;

pub const RECOGNIZED_REFERENCE_HEADERS: [&str; 4] = [
    "## 📚 Sources",
    "## 📚 References",
    "## Sources",
    "## References",
];

const TRANSLATION_MAX_TOKENS: u32 = 3200;
const TRANSLATION_TEMPERATURE: f32 = 0.3;

// The first recognized header present wins.
pub fn split_references(body: &str) -> (&str, Option<&str>) {
    RECOGNIZED_REFERENCE_HEADERS
        .iter()
        .find_map(|header| body.find(header))
        .map(|pos| (body[..pos].trim(), Some(&body[pos..])))
        .unwrap_or((body, None))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Unchanged(String),
    Translated(String),
    Degraded { text: String, error: String },
}

impl Rendered {
    pub fn text(&self) -> &str {
        match self {
            Self::Unchanged(text) | Self::Translated(text) | Self::Degraded { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Unchanged(text) | Self::Translated(text) | Self::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

pub struct LanguageRenderer<'a> {
    synthesizer: &'a dyn TextSynthesizer,
}

impl<'a> LanguageRenderer<'a> {
    pub fn new(synthesizer: &'a dyn TextSynthesizer) -> Self {
        Self { synthesizer }
    }

    pub async fn render(&self, body: &str, target: Language) -> Rendered {
        if target.is_source() {
            return Rendered::Unchanged(body.to_string());
        }

        let (main, references) = split_references(body);
        if references.is_none() {
            tracing::debug!(language = %target, "no reference section found; translating whole body");
        }
        if main.is_empty() {
            return Rendered::Unchanged(body.to_string());
        }

        let req = CompletionRequest::new(prompts::translation_system_prompt(target), main)
            .max_tokens(TRANSLATION_MAX_TOKENS)
            .temperature(TRANSLATION_TEMPERATURE);

        match self.synthesizer.complete(req).await {
            Ok(translated) => {
                let translated = translated.trim();
                Rendered::Translated(match references {
                    Some(refs) => format!("{translated}\n\n{refs}"),
                    None => translated.to_string(),
                })
            }
            Err(err) => {
                tracing::warn!(
                    language = %target,
                    provider = ?self.synthesizer.provider(),
                    error = %err,
                    "translation failed; returning original report"
                );
                let error = err.to_string();
                Rendered::Degraded {
                    text: format!("Translation error: {error}\n\n--- Original Report ---\n{body}"),
                    error,
                }
            }
        }
    }
}
