use crate::curation::rules::ImportanceRules;
use crate::domain::news::NewsRecord;
use chrono::{DateTime, Utc};

pub type ImportanceScore = u32;

#[derive(Debug, Clone)]
pub struct ImportanceRanker<'a> {
    rules: &'a ImportanceRules,
    now: DateTime<Utc>,
}

impl<'a> ImportanceRanker<'a> {
    pub fn new(rules: &'a ImportanceRules, now: DateTime<Utc>) -> Self {
        Self { rules, now }
    }

    pub fn importance(&self, record: &NewsRecord) -> ImportanceScore {
        let rules = self.rules;
        let text = record.search_text();

        let mut score: u32 = 0;
        score += phrase_points(rules.companies.weight, rules.companies.hits(&text));
        score += phrase_points(rules.impact_words.weight, rules.impact_words.hits(&text));
        score += phrase_points(rules.urgency_words.weight, rules.urgency_words.hits(&text));
        score += rules.premium_source_bonus;

        if rules.region_keywords.any_in(&text) {
            score += rules.region_keywords.weight.max(0) as u32;
        }

        let tickers = u32::try_from(record.tickers.len()).unwrap_or(u32::MAX);
        score += tickers.saturating_mul(rules.ticker_weight).min(rules.ticker_cap);

        score += self.recency_bonus(record);

        let body_chars = record.body.chars().count();
        score += rules
            .body_length
            .iter()
            .filter(|tier| body_chars > tier.min_chars)
            .map(|tier| tier.bonus)
            .sum::<u32>();

        score
    }

    fn recency_bonus(&self, record: &NewsRecord) -> u32 {
        let Some(published_at) = record.published_at else {
            return 0;
        };
        let age_hours = (self.now - published_at).num_hours();
        self.rules
            .recency
            .iter()
            .find(|tier| age_hours < tier.max_age_hours)
            .map(|tier| tier.bonus)
            .unwrap_or(0)
    }

    // Stable: equal scores keep their input order.
    pub fn top_n<'r, I>(&self, candidates: I, top_n: usize) -> Vec<(usize, ImportanceScore)>
    where
        I: IntoIterator<Item = (usize, &'r NewsRecord)>,
    {
        let mut scored: Vec<(usize, ImportanceScore)> = candidates
            .into_iter()
            .map(|(idx, record)| (idx, self.importance(record)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(top_n);
        scored
    }
}

fn phrase_points(weight: i32, hits: usize) -> u32 {
    let hits = u32::try_from(hits).unwrap_or(u32::MAX);
    (weight.max(0) as u32).saturating_mul(hits)
}
