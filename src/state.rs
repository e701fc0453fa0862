use std::sync::Arc;
use std::time::Instant;

use crate::catalog::Catalog;
use crate::db::Database;
use crate::services::attention::{AttentionScorer, ByteStatScorer};
use crate::services::recommend::{Recommender, ThresholdRecommender};
use crate::services::rephrase::RephraseGateway;
use crate::services::sentiment::{RemoteAnalyzer, SentimentAnalyzer};

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    db: Database,
    catalog: Arc<Catalog>,
    recommender: Arc<dyn Recommender>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    rephrase: Arc<RephraseGateway>,
    attention: Arc<dyn AttentionScorer>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let client = reqwest::Client::new();
        Self {
            started_at: Instant::now(),
            db,
            catalog: Arc::new(Catalog::builtin()),
            recommender: Arc::new(ThresholdRecommender),
            sentiment: Arc::from(RemoteAnalyzer::from_env(client.clone())),
            rephrase: Arc::new(RephraseGateway::from_env(client)),
            attention: Arc::new(ByteStatScorer),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn recommender(&self) -> &dyn Recommender {
        self.recommender.as_ref()
    }

    pub fn sentiment(&self) -> &dyn SentimentAnalyzer {
        self.sentiment.as_ref()
    }

    pub fn rephrase(&self) -> &RephraseGateway {
        &self.rephrase
    }

    pub fn attention(&self) -> &dyn AttentionScorer {
        self.attention.as_ref()
    }
}
