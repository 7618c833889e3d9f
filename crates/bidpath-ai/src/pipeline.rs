//! The four stages as independent, stateless operations.
//!
//! `Pipeline` does not sequence stages. The caller threads a parse result
//! into assess/generate and a draft into score.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use bidpath_core::{
    AssessmentResult, CompanyProfile, Draft, DraftSection, ParsedSolicitation, ScoreReport,
};

use crate::backend::GenerationBackend;
use crate::config::GatewayConfig;
use crate::error::GenerationFailure;
use crate::gateway::Gateway;
use crate::stages::{self, Stage};

/// Entry point for stage calls. Clone freely and call concurrently: the only
/// shared state is the read-only configuration.
#[derive(Clone)]
pub struct Pipeline {
    gateway: Gateway,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: GatewayConfig) -> Self {
        Self {
            gateway: Gateway::new(backend, Arc::new(config)),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub async fn parse(&self, text: &str) -> Result<ParsedSolicitation, GenerationFailure> {
        timed(Stage::Parse, stages::parse(&self.gateway, text)).await
    }

    pub async fn assess(
        &self,
        parsed: &ParsedSolicitation,
        company: &CompanyProfile,
    ) -> Result<AssessmentResult, GenerationFailure> {
        timed(Stage::Assess, stages::assess(&self.gateway, parsed, company)).await
    }

    pub async fn generate(
        &self,
        parsed: &ParsedSolicitation,
        company: &CompanyProfile,
    ) -> Result<Draft, GenerationFailure> {
        timed(Stage::Generate, stages::generate(&self.gateway, parsed, company)).await
    }

    pub async fn score(
        &self,
        parsed: &ParsedSolicitation,
        sections: &[DraftSection],
    ) -> Result<ScoreReport, GenerationFailure> {
        timed(Stage::Score, stages::score(&self.gateway, parsed, sections)).await
    }
}

async fn timed<T>(
    stage: Stage,
    call: impl Future<Output = Result<T, GenerationFailure>>,
) -> Result<T, GenerationFailure> {
    let start = Instant::now();
    let result = call.await;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => info!(%stage, elapsed_ms, "stage complete"),
        Err(e) => warn!(%stage, elapsed_ms, error = %e, "stage failed"),
    }
    result
}
