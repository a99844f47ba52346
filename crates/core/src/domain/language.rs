use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Thai,
    #[serde(rename = "Simplified Chinese")]
    SimplifiedChinese,
    #[serde(rename = "Traditional Chinese")]
    TraditionalChinese,
    Vietnamese,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Thai,
        Language::SimplifiedChinese,
        Language::TraditionalChinese,
        Language::Vietnamese,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Thai => "Thai",
            Language::SimplifiedChinese => "Simplified Chinese",
            Language::TraditionalChinese => "Traditional Chinese",
            Language::Vietnamese => "Vietnamese",
        }
    }

    pub fn is_source(self) -> bool {
        self == Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        let lang = match key.as_str() {
            "english" | "en" => Language::English,
            "thai" | "th" => Language::Thai,
            "simplified chinese" | "zh hans" | "zh cn" => Language::SimplifiedChinese,
            "traditional chinese" | "zh hant" | "zh tw" => Language::TraditionalChinese,
            "vietnamese" | "vi" => Language::Vietnamese,
            _ => anyhow::bail!(
                "unsupported language {s:?} (expected one of: {})",
                Language::ALL.map(Language::display_name).join(", ")
            ),
        };
        Ok(lang)
    }
}
