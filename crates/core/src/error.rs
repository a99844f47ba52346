use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    NewsFeed,
    MarketFeed,
    TextSynthesizer,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NewsFeed => "news feed",
            Self::MarketFeed => "market feed",
            Self::TextSynthesizer => "text synthesizer",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmptyInput {
    #[error("no news articles passed the quality filter for this range")]
    NoSurvivingNews,
    #[error("no market data available for this range")]
    NoMarketData,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{collaborator} unavailable: {source:#}")]
    CollaboratorUnavailable {
        collaborator: Collaborator,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    EmptyInput(#[from] EmptyInput),
}

impl PipelineError {
    pub fn unavailable(collaborator: Collaborator, source: anyhow::Error) -> Self {
        Self::CollaboratorUnavailable {
            collaborator,
            source,
        }
    }
}
