use crate::domain::language::Language;
use crate::domain::news::NewsRecord;
use crate::time::period::ReportPeriod;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const NO_SOURCES: &str = "No sources available.";
const UNTITLED: &str = "No title";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked {
    pub index: usize,
    pub importance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub number: usize,
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.title.trim().is_empty() {
            UNTITLED
        } else {
            self.title.as_str()
        };
        match &self.url {
            Some(url) => write!(f, "{}. {} - [Source]({})", self.number, title, url),
            None => write!(f, "{}. {}", self.number, title),
        }
    }
}

// Records are stored once; themes hold indices into `survivors`.
#[derive(Debug, Clone)]
pub struct Digest {
    survivors: Vec<NewsRecord>,
    themes: BTreeMap<String, Vec<Ranked>>,
    // Each survivor under its primary theme only.
    placements: BTreeMap<String, Vec<Ranked>>,
    references: Vec<Reference>,
}

impl Digest {
    pub(crate) fn new(
        survivors: Vec<NewsRecord>,
        themes: BTreeMap<String, Vec<Ranked>>,
        placements: BTreeMap<String, Vec<Ranked>>,
        references: Vec<Reference>,
    ) -> Self {
        Self {
            survivors,
            themes,
            placements,
            references,
        }
    }

    pub fn survivors(&self) -> &[NewsRecord] {
        &self.survivors
    }

    pub fn theme_names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    pub fn theme(&self, name: &str) -> Vec<(&NewsRecord, u32)> {
        self.themes
            .get(name)
            .map(|ranked| {
                ranked
                    .iter()
                    .filter_map(|r| self.survivors.get(r.index).map(|rec| (rec, r.importance)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn placed(&self, name: &str) -> &[Ranked] {
        self.placements.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn reference_block(&self) -> String {
        if self.references.is_empty() {
            return NO_SOURCES.to_string();
        }
        self.references
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisPayload {
    pub system: String,
    pub user: String,
}

// reference_block never goes into payload; it is appended after synthesis.
#[derive(Debug, Clone)]
pub struct Brief {
    pub period: ReportPeriod,
    pub market_narrative: String,
    pub theme_digest: Digest,
    pub theme_block: String,
    pub reference_block: String,
    pub language: Language,
    pub payload: SynthesisPayload,
}
