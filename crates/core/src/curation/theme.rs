use crate::curation::rules::{ThemeRule, ThemeRules};
use crate::domain::news::NewsRecord;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct ThemeClassifier<'a> {
    rules: &'a ThemeRules,
}

impl<'a> ThemeClassifier<'a> {
    pub fn new(rules: &'a ThemeRules) -> Self {
        Self { rules }
    }

    pub fn fallback(&self) -> &'a str {
        &self.rules.fallback
    }

    pub fn classify(&self, record: &NewsRecord) -> BTreeSet<String> {
        self.matches(record).into_iter().map(str::to_string).collect()
    }

    pub fn matches(&self, record: &NewsRecord) -> Vec<&'a str> {
        let text = record.search_text();
        let hits: Vec<&'a str> = self
            .rules
            .themes
            .iter()
            .filter(|theme| fires(theme, &text, record))
            .map(|theme| theme.name.as_str())
            .collect();

        if hits.is_empty() {
            vec![self.fallback()]
        } else {
            hits
        }
    }

    pub fn primary(&self, record: &NewsRecord) -> &'a str {
        self.matches(record)
            .first()
            .copied()
            .unwrap_or_else(|| self.fallback())
    }
}

fn fires(theme: &ThemeRule, text: &str, record: &NewsRecord) -> bool {
    theme
        .keywords
        .iter()
        .any(|k| !k.is_empty() && text.contains(k.as_str()))
        || theme.tickers.iter().any(|t| record.has_ticker(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, tickers: &[&str]) -> NewsRecord {
        NewsRecord {
            title: title.to_string(),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unmatched_record_falls_back_to_other() {
        let rules = ThemeRules::default();
        let c = ThemeClassifier::new(&rules);
        assert_eq!(c.classify(&rec("Quiet session for bonds", &[])), set(&["other"]));
    }

    #[test]
    fn ticker_trigger_fires_without_keyword() {
        let rules = ThemeRules::default();
        let c = ThemeClassifier::new(&rules);
        let themes = c.classify(&rec("Shares flat in morning session", &["BABA"]));
        assert_eq!(themes, set(&["china_sea"]));
    }

    #[test]
    fn classification_is_a_union() {
        let rules = ThemeRules::default();
        let c = ThemeClassifier::new(&rules);
        let themes = c.classify(&rec("China Trade Tariffs Escalate Amid Yuan Pressure", &[]));
        assert!(themes.contains("china_sea"));
        assert!(themes.contains("trade_tensions"));
        assert!(!themes.contains("other"));
    }

    #[test]
    fn keywords_are_searched_in_teaser_and_keywords() {
        let rules = ThemeRules::default();
        let c = ThemeClassifier::new(&rules);
        let mut r = rec("Company update", &[]);
        r.keywords = vec!["Bitcoin".to_string()];
        assert!(c.classify(&r).contains("crypto"));

        let mut r = rec("Company update", &[]);
        r.teaser = "Powell signals patience".to_string();
        assert!(c.classify(&r).contains("fed_policy"));
    }

    #[test]
    fn primary_follows_priority_order() {
        let rules = ThemeRules::default();
        let c = ThemeClassifier::new(&rules);
        let r = rec("China Trade Tariffs Escalate Amid Yuan Pressure", &[]);
        assert_eq!(c.primary(&r), "china_sea");

        let r = rec("Apple Reports Record Quarterly Earnings Beating Estimates", &["AAPL"]);
        assert_eq!(c.classify(&r), set(&["earnings"]));
        assert_eq!(c.primary(&r), "earnings");
    }
}
