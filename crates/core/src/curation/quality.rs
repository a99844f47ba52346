use crate::curation::rules::QualityRules;
use crate::domain::news::NewsRecord;

pub type QualityScore = u8;

#[derive(Debug, Clone)]
pub struct QualityFilter<'a> {
    rules: &'a QualityRules,
}

impl<'a> QualityFilter<'a> {
    pub fn new(rules: &'a QualityRules) -> Self {
        Self { rules }
    }

    pub fn threshold(&self) -> QualityScore {
        self.rules.threshold
    }

    pub fn score(&self, record: &NewsRecord) -> QualityScore {
        let rules = self.rules;
        let title = record.title.to_lowercase();

        if rules
            .disqualifiers
            .iter()
            .any(|p| !p.is_empty() && title.contains(p.as_str()))
        {
            return 0;
        }

        let title_and_teaser = format!("{title}\n{}", record.teaser.to_lowercase());

        let mut score = rules.base_score;
        score += rules.major_penalties.total(&title);
        score += rules.medium_penalties.total(&title);
        score += rules.minor_penalties.total(&title);
        score += rules.high_value_terms.total(&title_and_teaser);
        score += rules.medium_value_terms.total(&title_and_teaser);

        if !record.tickers.is_empty() {
            score += rules.ticker_bonus;
        }
        if rules.major_companies.any_in(&title) {
            score += rules.major_companies.weight;
        }
        if record.title.chars().count() >= rules.long_title_chars {
            score += rules.long_title_bonus;
        }

        let publisher = record.publisher_name.to_lowercase();
        if rules
            .trusted_publishers
            .iter()
            .any(|p| !p.is_empty() && publisher.contains(p.as_str()))
        {
            score += rules.trusted_publisher_bonus;
        }

        score.clamp(0, 100) as QualityScore
    }

    pub fn accept(&self, record: &NewsRecord) -> bool {
        self.score(record) >= self.rules.threshold
    }
}
