use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

const TEASER_FROM_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub id: String,
    pub title: String,
    pub teaser: String,
    pub body: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source_url: String,
    pub author: String,
    pub tickers: BTreeSet<String>,
    pub keywords: Vec<String>,
    pub publisher_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Record(NewsRecord),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "provider item is not a JSON object"),
        }
    }
}

impl NewsRecord {
    // teaser falls back to a body prefix, then the title.
    pub fn from_provider(item: &Value, default_publisher: &str) -> Normalized {
        let Some(obj) = item.as_object() else {
            return Normalized::Skipped(SkipReason::NotAnObject);
        };

        let title = first_text(item, &["title"]);

        let body = first_text(item, &["content", "body"]);
        let mut teaser = first_text(item, &["teaser", "summary", "description"]);
        if teaser.is_empty() {
            teaser = if !body.is_empty() {
                teaser_from_body(&body)
            } else {
                title.clone()
            };
        }

        let published_at = ["published", "published_utc", "date", "created"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .and_then(parse_timestamp);

        let publisher_name = obj
            .get("publisher")
            .and_then(|p| match p {
                Value::Object(_) => p.get("name").and_then(Value::as_str),
                Value::String(s) => Some(s.as_str()),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default_publisher)
            .to_string();

        Normalized::Record(NewsRecord {
            id: first_text(item, &["id", "benzinga_id"]),
            title,
            teaser,
            body,
            published_at,
            source_url: first_text(item, &["url", "article_url"]),
            author: first_text(item, &["author"]),
            tickers: string_list(item, &["tickers"]).into_iter().collect(),
            keywords: string_list(item, &["keywords", "tags"]),
            publisher_name,
        })
    }

    pub fn from_provider_batch(items: &[Value], default_publisher: &str) -> Vec<NewsRecord> {
        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match Self::from_provider(item, default_publisher) {
                Normalized::Record(record) => out.push(record),
                Normalized::Skipped(reason) => {
                    tracing::debug!(idx, %reason, "skipping provider news item");
                }
            }
        }
        out
    }

    pub fn has_ticker(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t.eq_ignore_ascii_case(ticker))
    }

    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title.to_lowercase(),
            self.teaser.to_lowercase(),
            self.keywords.join(" ").to_lowercase()
        )
    }
}

fn first_text(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| match item.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn string_list(item: &Value, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(Value::as_array))
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn teaser_from_body(body: &str) -> String {
    if body.chars().count() > TEASER_FROM_BODY_CHARS {
        let prefix: String = body.chars().take(TEASER_FROM_BODY_CHARS).collect();
        format!("{prefix}...")
    } else {
        body.to_string()
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
