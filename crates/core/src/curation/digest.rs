use crate::curation::importance::ImportanceRanker;
use crate::curation::quality::QualityFilter;
use crate::curation::rules::CurationRules;
use crate::curation::theme::ThemeClassifier;
use crate::domain::brief::{Digest, Ranked, Reference};
use crate::domain::news::NewsRecord;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone)]
pub struct Curator<'a> {
    rules: &'a CurationRules,
    now: DateTime<Utc>,
}

impl<'a> Curator<'a> {
    pub fn new(rules: &'a CurationRules, now: DateTime<Utc>) -> Self {
        Self { rules, now }
    }

    // Themes nobody matched are absent, except the fallback theme. Placements put every
    // survivor under its primary theme and are capped separately from `top_n_per_theme`.
    pub fn curate(&self, records: Vec<NewsRecord>, top_n_per_theme: usize) -> Digest {
        let quality = QualityFilter::new(&self.rules.quality);
        let total = records.len();
        let survivors: Vec<NewsRecord> = records
            .into_iter()
            .filter(|record| {
                let score = quality.score(record);
                let keep = score >= quality.threshold();
                if !keep {
                    tracing::debug!(id = %record.id, score, title = %record.title, "rejected by quality filter");
                }
                keep
            })
            .collect();

        let classifier = ThemeClassifier::new(&self.rules.themes);
        let mut members: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, record) in survivors.iter().enumerate() {
            for theme in classifier.matches(record) {
                members.entry(theme).or_default().push(idx);
            }
        }

        let mut primaries: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, record) in survivors.iter().enumerate() {
            primaries
                .entry(classifier.primary(record))
                .or_default()
                .push(idx);
        }

        let ranker = ImportanceRanker::new(&self.rules.importance, self.now);
        let rank = |groups: BTreeMap<&str, Vec<usize>>, limit: usize| {
            let mut ranked: BTreeMap<String, Vec<Ranked>> = BTreeMap::new();
            for (theme, indices) in groups {
                let top = ranker.top_n(indices.iter().map(|&idx| (idx, &survivors[idx])), limit);
                if top.is_empty() {
                    continue;
                }
                ranked.insert(
                    theme.to_string(),
                    top.into_iter()
                        .map(|(index, importance)| Ranked { index, importance })
                        .collect(),
                );
            }
            ranked
        };
        let mut themes = rank(members, top_n_per_theme);
        themes
            .entry(classifier.fallback().to_string())
            .or_default();
        let placements = rank(primaries, self.rules.digest.max_records_per_theme_in_brief);

        let references = build_references(&survivors, self.rules.digest.max_references);

        tracing::info!(
            total,
            survivors = survivors.len(),
            rejected = total - survivors.len(),
            themes = themes.len(),
            references = references.len(),
            "curated news batch"
        );

        Digest::new(survivors, themes, placements, references)
    }
}

// Identity is `id`, then URL, then title.
fn build_references(survivors: &[NewsRecord], max: usize) -> Vec<Reference> {
    let mut ordered: Vec<&NewsRecord> = survivors.iter().collect();
    ordered.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let mut seen = HashSet::new();
    ordered
        .into_iter()
        .filter(|record| seen.insert(identity(*record)))
        .take(max)
        .enumerate()
        .map(|(i, record)| Reference {
            number: i + 1,
            id: record.id.clone(),
            title: record.title.clone(),
            url: Some(record.source_url.trim())
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            published_at: record.published_at,
        })
        .collect()
}

fn identity(record: &NewsRecord) -> (u8, &str) {
    if !record.id.is_empty() {
        (0, record.id.as_str())
    } else if !record.source_url.is_empty() {
        (1, record.source_url.as_str())
    } else {
        (2, record.title.as_str())
    }
}
