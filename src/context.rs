//! Business context from published spreadsheet tabs
//!
//! The business profile lives in a spreadsheet maintained outside this app,
//! published as CSV export links. Each tab is laid out as label/value rows:
//! column 0 carries the field label, column 1 the value. The core only ever
//! addresses fields by fixed row offset, so the whole thing stays opaque
//! tabular data behind the [`TabularSource`] capability.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::config::SheetsConfig;

/// Opaque tabular data source.
#[async_trait]
pub trait TabularSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Table>;
}

/// A fetched tab: rows of string cells, no header interpretation.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Decode header-less CSV bytes. Ragged rows are tolerated.
    pub fn from_csv(data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("Failed to decode CSV row")?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        Ok(Self { rows })
    }

    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Value of the field at a row offset: the second column of that row,
    /// trimmed. Missing rows and cells read as empty.
    pub fn value(&self, row: usize) -> String {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(1))
            .map(|cell| cell.trim().to_string())
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Fetches published-sheet CSV exports over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpSheetSource {
    client: reqwest::Client,
}

impl HttpSheetSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TabularSource for HttpSheetSource {
    async fn fetch(&self, url: &str) -> Result<Table> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch sheet {}", url))?;

        if !response.status().is_success() {
            bail!("Sheet fetch failed ({}): {}", response.status(), url);
        }

        let bytes = response.bytes().await.context("Failed to read sheet body")?;
        Table::from_csv(&bytes)
    }
}

/// Named business profile fields, extracted from the three tabs at fixed row
/// offsets. The offsets mirror the sheet layout and are not configurable.
#[derive(Debug, Clone, Default)]
pub struct BusinessContext {
    // Primary tab
    pub business_name: String,
    pub industry: String,
    pub locations: String,
    pub uvp: String,
    pub usp: String,
    pub products_overview: String,
    pub products_details: String,
    pub target_audience: String,
    pub seasonality: String,
    pub community: String,
    pub competitive_advantage: String,
    pub caption_style: String,
    pub caption_examples: String,
    pub key_public_dates: String,
    pub opening_hours: String,
    // Questionnaire tab
    pub values: String,
    pub brand_personality: String,
    pub brand_voice: String,
    pub positioning: String,
    pub content_pillars: String,
    pub key_tone: String,
    // Summaries tab
    pub company_overview_summary: String,
    pub products_overview_summary: String,
    pub market_audience_summary: String,
    pub marketing_summary: String,
    pub brand_essence_summary: String,
    pub audience_summary: String,
    pub content_style_summary: String,
}

impl BusinessContext {
    /// Fetch all three tabs and extract the named fields.
    pub async fn fetch<T: TabularSource>(source: &T, sheets: &SheetsConfig) -> Result<Self> {
        if sheets.primary.is_empty() || sheets.questionnaire.is_empty() || sheets.summaries.is_empty()
        {
            bail!(
                "Sheet URLs are not configured. Run 'postplan config --set-sheet <tab> <url>' for primary, questionnaire and summaries."
            );
        }

        let primary = source.fetch(&sheets.primary).await?;
        let questionnaire = source.fetch(&sheets.questionnaire).await?;
        let summaries = source.fetch(&sheets.summaries).await?;
        Ok(Self::from_tables(&primary, &questionnaire, &summaries))
    }

    /// Row offsets follow the sheet layout exactly; gaps are rows the
    /// planner does not use.
    pub fn from_tables(primary: &Table, questionnaire: &Table, summaries: &Table) -> Self {
        Self {
            business_name: primary.value(0),
            industry: primary.value(1),
            locations: primary.value(2),
            uvp: primary.value(4),
            usp: primary.value(5),
            products_overview: primary.value(6),
            products_details: primary.value(7),
            target_audience: primary.value(8),
            seasonality: primary.value(13),
            community: primary.value(19),
            competitive_advantage: primary.value(26),
            caption_style: primary.value(31),
            caption_examples: primary.value(32),
            key_public_dates: primary.value(33),
            opening_hours: primary.value(34),

            values: questionnaire.value(0),
            brand_personality: questionnaire.value(1),
            brand_voice: questionnaire.value(2),
            positioning: questionnaire.value(4),
            content_pillars: questionnaire.value(22),
            key_tone: questionnaire.value(23),

            company_overview_summary: summaries.value(0),
            products_overview_summary: summaries.value(1),
            market_audience_summary: summaries.value(2),
            marketing_summary: summaries.value(3),
            brand_essence_summary: summaries.value(9),
            audience_summary: summaries.value(10),
            content_style_summary: summaries.value(11),
        }
    }
}
