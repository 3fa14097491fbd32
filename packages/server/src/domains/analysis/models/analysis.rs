use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use crate::common::{display_value, parse_amount, AnalysisId, AnalysisReport, AnalysisRequest, Text};

/// Status stored for a run that finished normally.
pub const STATUS_COMPLETED: &str = "completed";

/// JSONB section columns. The only JSON columns that may be read back or set.
pub const JSON_COLUMNS: &[&str] = &[
    "avatar_data",
    "drivers_data",
    "anti_objection_data",
    "visual_proofs_data",
    "pre_pitch_data",
    "positioning_data",
    "competition_data",
    "marketing_data",
    "metrics_data",
    "projections_data",
    "action_plan",
    "insights_data",
    "market_intelligence",
    "comprehensive_analysis",
];

const TEXT_COLUMNS: &[&str] = &[
    "segment",
    "product",
    "target_audience",
    "launch_timeline",
    "competitors",
    "search_query",
    "additional_data",
    "session_id",
    "status",
];

const NUMBER_COLUMNS: &[&str] = &["price", "revenue_goal", "marketing_budget"];

/// Text columns declared `NOT NULL`.
const REQUIRED_COLUMNS: &[&str] = &["segment", "status"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub segment: String,
    pub product: Option<String>,
    pub price: Option<f64>,
    pub target_audience: Option<String>,
    pub revenue_goal: Option<f64>,
    pub marketing_budget: Option<f64>,
    pub launch_timeline: Option<String>,
    pub competitors: Option<String>,
    pub search_query: Option<String>,
    pub additional_data: Option<String>,
    pub session_id: Option<String>,
    pub status: String,
    pub avatar_data: Option<Value>,
    pub drivers_data: Option<Value>,
    pub anti_objection_data: Option<Value>,
    pub visual_proofs_data: Option<Value>,
    pub pre_pitch_data: Option<Value>,
    pub positioning_data: Option<Value>,
    pub competition_data: Option<Value>,
    pub marketing_data: Option<Value>,
    pub metrics_data: Option<Value>,
    pub projections_data: Option<Value>,
    pub action_plan: Option<Value>,
    pub insights_data: Option<Value>,
    pub market_intelligence: Option<Value>,
    pub comprehensive_analysis: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Value of a JSON section column by name.
    pub fn json_column(&self, column: &str) -> Option<&Value> {
        match column {
            "avatar_data" => self.avatar_data.as_ref(),
            "drivers_data" => self.drivers_data.as_ref(),
            "anti_objection_data" => self.anti_objection_data.as_ref(),
            "visual_proofs_data" => self.visual_proofs_data.as_ref(),
            "pre_pitch_data" => self.pre_pitch_data.as_ref(),
            "positioning_data" => self.positioning_data.as_ref(),
            "competition_data" => self.competition_data.as_ref(),
            "marketing_data" => self.marketing_data.as_ref(),
            "metrics_data" => self.metrics_data.as_ref(),
            "projections_data" => self.projections_data.as_ref(),
            "action_plan" => self.action_plan.as_ref(),
            "insights_data" => self.insights_data.as_ref(),
            "market_intelligence" => self.market_intelligence.as_ref(),
            "comprehensive_analysis" => self.comprehensive_analysis.as_ref(),
            _ => None,
        }
    }

    fn json_column_mut(&mut self, column: &str) -> Option<&mut Option<Value>> {
        match column {
            "avatar_data" => Some(&mut self.avatar_data),
            "drivers_data" => Some(&mut self.drivers_data),
            "anti_objection_data" => Some(&mut self.anti_objection_data),
            "visual_proofs_data" => Some(&mut self.visual_proofs_data),
            "pre_pitch_data" => Some(&mut self.pre_pitch_data),
            "positioning_data" => Some(&mut self.positioning_data),
            "competition_data" => Some(&mut self.competition_data),
            "marketing_data" => Some(&mut self.marketing_data),
            "metrics_data" => Some(&mut self.metrics_data),
            "projections_data" => Some(&mut self.projections_data),
            "action_plan" => Some(&mut self.action_plan),
            "insights_data" => Some(&mut self.insights_data),
            "market_intelligence" => Some(&mut self.market_intelligence),
            "comprehensive_analysis" => Some(&mut self.comprehensive_analysis),
            _ => None,
        }
    }

    /// Apply an update in memory, mirroring what the UPDATE statement does.
    pub fn apply(&mut self, update: &ColumnUpdate) {
        match (&update.value, update.column) {
            (ColumnValue::Json(value), column) => {
                if let Some(slot) = self.json_column_mut(column) {
                    *slot = Some(value.clone());
                }
            }
            (ColumnValue::Number(n), "price") => self.price = *n,
            (ColumnValue::Number(n), "revenue_goal") => self.revenue_goal = *n,
            (ColumnValue::Number(n), "marketing_budget") => self.marketing_budget = *n,
            (ColumnValue::Text(Some(t)), "segment") => self.segment = t.clone(),
            (ColumnValue::Text(Some(t)), "status") => self.status = t.clone(),
            (ColumnValue::Text(t), "product") => self.product = t.clone(),
            (ColumnValue::Text(t), "target_audience") => self.target_audience = t.clone(),
            (ColumnValue::Text(t), "launch_timeline") => self.launch_timeline = t.clone(),
            (ColumnValue::Text(t), "competitors") => self.competitors = t.clone(),
            (ColumnValue::Text(t), "search_query") => self.search_query = t.clone(),
            (ColumnValue::Text(t), "additional_data") => self.additional_data = t.clone(),
            (ColumnValue::Text(t), "session_id") => self.session_id = t.clone(),
            _ => {}
        }
        self.updated_at = Utc::now();
    }

    /// The report to render for this row: the stored full report when present,
    /// otherwise one rebuilt from the individual section columns.
    pub fn report_value(&self) -> Value {
        if let Some(full) = self.comprehensive_analysis.as_ref().filter(|v| v.is_object()) {
            return full.clone();
        }

        let mut report = Map::new();
        report.insert("segmento".into(), Value::String(self.segment.clone()));
        if let Some(product) = &self.product {
            report.insert("produto".into(), Value::String(product.clone()));
        }
        if let Some(audience) = &self.target_audience {
            report.insert("publico".into(), Value::String(audience.clone()));
        }
        if let Some(price) = self.price {
            report.insert("preco".into(), Value::from(price));
        }

        let sections = [
            ("market_intelligence", "pesquisa_web_massiva"),
            ("avatar_data", "avatar_ultra_detalhado"),
            ("drivers_data", "drivers_mentais_customizados"),
            ("anti_objection_data", "sistema_anti_objecao"),
            ("visual_proofs_data", "provas_visuais_sugeridas"),
            ("pre_pitch_data", "pre_pitch_invisivel"),
            ("competition_data", "analise_concorrencia_detalhada"),
            ("positioning_data", "escopo"),
            ("marketing_data", "estrategia_palavras_chave"),
            ("metrics_data", "metricas_performance_detalhadas"),
            ("projections_data", "projecoes_cenarios"),
            ("action_plan", "plano_acao_detalhado"),
            ("insights_data", "insights_exclusivos"),
        ];
        for (column, key) in sections {
            if let Some(value) = self.json_column(column) {
                report.insert(key.into(), value.clone());
            }
        }

        Value::Object(report)
    }
}

/// Row listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisSummary {
    pub id: AnalysisId,
    pub segment: String,
    pub product: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_analyses: i64,
    pub status_counts: BTreeMap<String, i64>,
    pub recent_analyses: i64,
    pub timestamp: DateTime<Utc>,
}

/// Row values for a new analysis, flattened from the request and report.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub id: AnalysisId,
    pub segment: String,
    pub product: Option<String>,
    pub price: Option<f64>,
    pub target_audience: Option<String>,
    pub revenue_goal: Option<f64>,
    pub marketing_budget: Option<f64>,
    pub launch_timeline: Option<String>,
    pub competitors: Option<String>,
    pub search_query: String,
    pub additional_data: Option<String>,
    pub session_id: Option<String>,
    pub status: String,
    /// `(column, value)` in [`JSON_COLUMNS`] order.
    pub sections: Vec<(&'static str, Value)>,
}

impl NewAnalysis {
    pub fn from_report(request: &AnalysisRequest, report: &AnalysisReport) -> Result<Self> {
        let sections = vec![
            ("avatar_data", serde_json::to_value(&report.avatar)?),
            ("drivers_data", serde_json::to_value(&report.mental_drivers)?),
            ("anti_objection_data", serde_json::to_value(&report.anti_objection)?),
            ("visual_proofs_data", serde_json::to_value(&report.visual_proofs)?),
            ("pre_pitch_data", serde_json::to_value(&report.pre_pitch)?),
            ("positioning_data", serde_json::to_value(&report.positioning)?),
            ("competition_data", serde_json::to_value(&report.competition)?),
            ("marketing_data", serde_json::to_value(&report.keywords)?),
            ("metrics_data", serde_json::to_value(&report.metrics)?),
            ("projections_data", serde_json::to_value(&report.projections)?),
            ("action_plan", serde_json::to_value(&report.action_plan)?),
            ("insights_data", serde_json::to_value(&report.insights)?),
            ("market_intelligence", serde_json::to_value(&report.web_research)?),
            ("comprehensive_analysis", serde_json::to_value(report)?),
        ];

        Ok(Self {
            id: AnalysisId::new(),
            segment: request.segment().to_string(),
            product: request.product(),
            price: request.price.as_ref().and_then(Text::as_amount),
            target_audience: request.audience(),
            revenue_goal: request.revenue_goal.as_ref().and_then(Text::as_amount),
            marketing_budget: request.marketing_budget.as_ref().and_then(Text::as_amount),
            launch_timeline: request.launch_timeline.clone(),
            competitors: request.competitors_text(),
            search_query: request.effective_query(),
            additional_data: request.notes_text(),
            session_id: request.session_id().map(str::to_string),
            status: report
                .status
                .clone()
                .unwrap_or_else(|| STATUS_COMPLETED.to_string()),
            sections,
        })
    }
}

impl NewAnalysis {
    /// The row the database would hold right after insertion.
    pub fn into_record(self, now: DateTime<Utc>) -> AnalysisRecord {
        let mut record = AnalysisRecord {
            id: self.id,
            segment: self.segment,
            product: self.product,
            price: self.price,
            target_audience: self.target_audience,
            revenue_goal: self.revenue_goal,
            marketing_budget: self.marketing_budget,
            launch_timeline: self.launch_timeline,
            competitors: self.competitors,
            search_query: Some(self.search_query),
            additional_data: self.additional_data,
            session_id: self.session_id,
            status: self.status,
            avatar_data: None,
            drivers_data: None,
            anti_objection_data: None,
            visual_proofs_data: None,
            pre_pitch_data: None,
            positioning_data: None,
            competition_data: None,
            marketing_data: None,
            metrics_data: None,
            projections_data: None,
            action_plan: None,
            insights_data: None,
            market_intelligence: None,
            comprehensive_analysis: None,
            created_at: now,
            updated_at: now,
        };
        for (column, value) in self.sections {
            if let Some(slot) = record.json_column_mut(column) {
                *slot = Some(value);
            }
        }
        record
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UpdateError {
    #[error("Campo não permitido: {0}")]
    UnknownColumn(String),
    #[error("Valor numérico inválido para {0}")]
    InvalidNumber(String),
    #[error("Nenhum campo para atualizar")]
    Empty,
    #[error("Campo obrigatório não pode ser nulo: {0}")]
    NullNotAllowed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Json(Value),
    Text(Option<String>),
    Number(Option<f64>),
}

/// One allow-listed column assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnUpdate {
    pub column: &'static str,
    pub value: ColumnValue,
}

impl ColumnUpdate {
    /// Validate and coerce an update map. JSON columns keep the value as is;
    /// text columns stringify scalars; numeric columns parse numbers and
    /// Brazilian-formatted strings.
    pub fn parse_all(fields: &Map<String, Value>) -> Result<Vec<Self>, UpdateError> {
        if fields.is_empty() {
            return Err(UpdateError::Empty);
        }

        fields
            .iter()
            .map(|(name, value)| Self::parse(name, value))
            .collect()
    }

    fn parse(name: &str, value: &Value) -> Result<Self, UpdateError> {
        if let Some(column) = JSON_COLUMNS.iter().find(|c| **c == name) {
            return Ok(Self {
                column,
                value: ColumnValue::Json(value.clone()),
            });
        }

        if let Some(column) = TEXT_COLUMNS.iter().find(|c| **c == name) {
            let text = match value {
                Value::Null if REQUIRED_COLUMNS.contains(column) => {
                    return Err(UpdateError::NullNotAllowed(name.to_string()))
                }
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(display_value(other)),
            };
            return Ok(Self {
                column,
                value: ColumnValue::Text(text),
            });
        }

        if let Some(column) = NUMBER_COLUMNS.iter().find(|c| **c == name) {
            let number = match value {
                Value::Null => None,
                Value::Number(n) => n.as_f64(),
                Value::String(s) => Some(
                    parse_amount(s).ok_or_else(|| UpdateError::InvalidNumber(name.to_string()))?,
                ),
                _ => return Err(UpdateError::InvalidNumber(name.to_string())),
            };
            return Ok(Self {
                column,
                value: ColumnValue::Number(number),
            });
        }

        Err(UpdateError::UnknownColumn(name.to_string()))
    }
}

// =============================================================================
// Queries
// =============================================================================

impl AnalysisRecord {
    pub async fn insert(new: &NewAnalysis, pool: &PgPool) -> Result<AnalysisId> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO analyses (id, segment, product, price, target_audience, revenue_goal, \
             marketing_budget, launch_timeline, competitors, search_query, additional_data, \
             session_id, status",
        );
        for (column, _) in &new.sections {
            qb.push(", ").push(*column);
        }
        qb.push(") VALUES (");

        let mut values = qb.separated(", ");
        values
            .push_bind(new.id)
            .push_bind(&new.segment)
            .push_bind(&new.product)
            .push_bind(new.price)
            .push_bind(&new.target_audience)
            .push_bind(new.revenue_goal)
            .push_bind(new.marketing_budget)
            .push_bind(&new.launch_timeline)
            .push_bind(&new.competitors)
            .push_bind(&new.search_query)
            .push_bind(&new.additional_data)
            .push_bind(&new.session_id)
            .push_bind(&new.status);
        for (_, value) in &new.sections {
            values.push_bind(value);
        }
        qb.push(") RETURNING id");

        let (id,): (AnalysisId,) = qb.build_query_as().fetch_one(pool).await?;
        Ok(id)
    }

    pub async fn apply_updates(
        id: AnalysisId,
        updates: &[ColumnUpdate],
        pool: &PgPool,
    ) -> Result<bool> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE analyses SET ");
        for update in updates {
            qb.push(update.column).push(" = ");
            match &update.value {
                ColumnValue::Json(v) => qb.push_bind(v.clone()),
                ColumnValue::Text(v) => qb.push_bind(v.clone()),
                ColumnValue::Number(v) => qb.push_bind(*v),
            };
            qb.push(", ");
        }
        qb.push("updated_at = now() WHERE id = ").push_bind(id);

        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(id: AnalysisId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM analyses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn list(limit: i64, offset: i64, pool: &PgPool) -> Result<Vec<AnalysisSummary>> {
        sqlx::query_as::<_, AnalysisSummary>(
            r#"
            SELECT id, segment, product, status, created_at, updated_at
            FROM analyses
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: AnalysisId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM analyses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats(pool: &PgPool) -> Result<AnalysisStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analyses")
            .fetch_one(pool)
            .await?;

        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM analyses GROUP BY status")
                .fetch_all(pool)
                .await?;

        let week_ago = Utc::now() - Duration::days(7);
        let recent: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analyses WHERE created_at >= $1")
            .bind(week_ago)
            .fetch_one(pool)
            .await?;

        Ok(AnalysisStats {
            total_analyses: total,
            status_counts: rows.into_iter().collect(),
            recent_analyses: recent,
            timestamp: Utc::now(),
        })
    }

    pub async fn ping(pool: &PgPool) -> Result<()> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
