use crate::config::Config;
use crate::crm::Crm;
use std::sync::Arc;

/// Application context containing shared dependencies
/// This reduces parameter passing and makes it easier to add new dependencies
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub crm: Crm,
    /// Shared outbound HTTP client, pooled across concurrent pipelines
    pub http: reqwest::Client,
}

impl AppContext {
    pub fn new(config: Arc<Config>, crm: Crm, http: reqwest::Client) -> Self {
        Self { config, crm, http }
    }
}
