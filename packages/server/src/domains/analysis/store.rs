//! Postgres-backed [`BaseAnalysisStore`].

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::{debug, info};

use super::models::{AnalysisRecord, AnalysisStats, AnalysisSummary, ColumnUpdate, NewAnalysis};
use crate::common::{AnalysisId, AnalysisReport, AnalysisRequest};
use crate::kernel::BaseAnalysisStore;

#[derive(Clone)]
pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseAnalysisStore for PgAnalysisStore {
    async fn create(&self, request: &AnalysisRequest, report: &AnalysisReport) -> Result<AnalysisId> {
        let new = NewAnalysis::from_report(request, report)?;
        let id = AnalysisRecord::insert(&new, &self.pool).await?;
        info!(analysis_id = %id, segment = %new.segment, status = %new.status, "Analysis stored");
        Ok(id)
    }

    async fn update(&self, id: AnalysisId, fields: &Map<String, Value>) -> Result<bool> {
        let updates = ColumnUpdate::parse_all(fields)?;
        let updated = AnalysisRecord::apply_updates(id, &updates, &self.pool).await?;
        debug!(analysis_id = %id, columns = updates.len(), updated, "Analysis update applied");
        Ok(updated)
    }

    async fn get(&self, id: AnalysisId) -> Result<Option<AnalysisRecord>> {
        AnalysisRecord::find_by_id(id, &self.pool).await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AnalysisSummary>> {
        AnalysisRecord::list(limit, offset, &self.pool).await
    }

    async fn delete(&self, id: AnalysisId) -> Result<bool> {
        let deleted = AnalysisRecord::delete(id, &self.pool).await?;
        if deleted {
            info!(analysis_id = %id, "Analysis deleted");
        }
        Ok(deleted)
    }

    async fn stats(&self) -> Result<AnalysisStats> {
        AnalysisRecord::stats(&self.pool).await
    }

    async fn ping(&self) -> Result<()> {
        AnalysisRecord::ping(&self.pool).await
    }
}
