//! Calendar assembly pipeline
//!
//! Two sequential model calls: stage 1 orders and dates the staged ideas as
//! free text, stage 2 restructures that text into JSON. The stages share no
//! state beyond the typed [`ScheduleDraft`] passed between them. A stage-2
//! parse failure is a hard stop: no events are materialized and the event id
//! counter does not move. Materialized events draw their ids from the
//! persisted monotonic counter, which is incremented and saved per event.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::llm::TextGenerator;
use crate::pipeline::prompts;
use crate::slots::SlotList;
use crate::store::StateStore;
use crate::vault::{STAGING_CAPACITY, STAGING_KEY_PREFIX};

/// Calendar events carry a fixed UTC+12 (New Zealand) offset.
pub const NZ_OFFSET_SECS: i32 = 12 * 3600;

static NZ_OFFSET: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(NZ_OFFSET_SECS).expect("valid UTC+12 offset"));

/// Stage-2 failures the caller must tell apart from transport errors: the
/// pipeline halted with no partial calendar.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("schedule structuring output is not valid JSON: {0}")]
    Structuring(#[from] serde_json::Error),
    #[error("schedule structuring output is not a JSON object")]
    NotAnObject,
}

/// Stage-1 output: the dated schedule as free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft(pub String);

/// Stage-2 output: the parsed `title{n}`/`description{n}`/`datetime{n}`
/// object.
#[derive(Debug, Clone)]
pub struct StructuredSchedule {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl StructuredSchedule {
    /// Strict parse of the stage-2 response. Anything that is not a
    /// well-formed JSON object is an error, by design; there is no repair
    /// pass.
    pub fn parse(text: &str) -> Result<Self, CalendarError> {
        let value: serde_json::Value = serde_json::from_str(text.trim())?;
        match value {
            serde_json::Value::Object(fields) => Ok(Self { fields }),
            _ => Err(CalendarError::NotAnObject),
        }
    }

    /// The complete entry at index n, if `title{n}`, `description{n}` and
    /// `datetime{n}` are all present as strings. Indices are independent:
    /// a missing n never hides a later entry.
    pub fn entry(&self, n: usize) -> Option<(String, String, String)> {
        let get = |prefix: &str| {
            self.fields
                .get(&format!("{}{}", prefix, n))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };
        Some((get("title")?, get("description")?, get("datetime")?))
    }
}

/// One materialized calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// From the persisted monotonic counter; unique across all runs.
    pub uid: u64,
    pub title: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
}

static ORDINAL_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)(?:st|nd|rd|th)\b").expect("valid ordinal regex"));
static MERIDIEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d)[ \t]*(am|pm)\b").expect("valid meridiem regex"));

/// Parse an event datetime: strict RFC 3339 first, then a lenient pass that
/// attaches the fixed UTC+12 offset.
pub fn parse_event_datetime(raw: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(dt);
    }
    lenient_parse(raw)
        .with_context(|| format!("Could not parse event datetime '{}'", raw))
}

/// Lenient fallback for the date shapes the model tends to emit when it
/// ignores the ISO instruction ("5th December 2025 at 7pm" and friends).
fn lenient_parse(raw: &str) -> Option<DateTime<FixedOffset>> {
    let text = normalize(raw);

    const DATETIME_FORMATS: &[&str] = &[
        "%d %B %Y %I:%M %p",
        "%d %B %Y %I %p",
        "%B %d %Y %I:%M %p",
        "%B %d %Y %I %p",
        "%d %B %Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, format) {
            return NZ_OFFSET.from_local_datetime(&naive).single();
        }
    }

    // Date-only values start at midnight.
    const DATE_FORMATS: &[&str] = &["%d %B %Y", "%B %d %Y", "%Y-%m-%d"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&text, format) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return NZ_OFFSET.from_local_datetime(&naive).single();
        }
    }

    None
}

/// Strip ordinal suffixes, commas and "at", split meridiems off their hour,
/// uppercase them, and collapse whitespace.
fn normalize(raw: &str) -> String {
    let text = raw.replace(',', " ");
    let text = ORDINAL_SUFFIX_RE.replace_all(&text, "$1");
    let text = MERIDIEM_RE.replace_all(&text, |caps: &regex::Captures| {
        format!("{} {}", &caps[1], caps[2].to_uppercase())
    });
    text.split_whitespace()
        .filter(|word| !word.eq_ignore_ascii_case("at"))
        .map(|word| {
            if word.eq_ignore_ascii_case("am") || word.eq_ignore_ascii_case("pm") {
                word.to_uppercase()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The two-stage assembly pipeline.
pub struct CalendarPipeline<G, S> {
    generator: G,
    store: S,
}

impl<G: TextGenerator, S: StateStore> CalendarPipeline<G, S> {
    pub fn new(generator: G, store: S) -> Self {
        Self { generator, store }
    }

    /// Run both stages against the current staging list and materialize the
    /// resulting events. Staged slots are read as-is; empty slots are passed
    /// through and the stage-1 instructions make the model skip them.
    pub async fn assemble(&self) -> Result<Vec<CalendarEvent>> {
        let state = self.store.load()?;
        let inputs = crate::inputs::UserInputs::from_state(&state);
        let staged = SlotList::from_map(STAGING_CAPACITY, STAGING_KEY_PREFIX, &state.cal.slots);

        let prompt = prompts::build_schedule_prompt(
            staged.slots(),
            &inputs.start_date,
            &inputs.frequency,
        );
        let draft = ScheduleDraft(self.generator.generate(&prompt).await?);
        debug!("Stage 1 schedule draft:\n{}", draft.0);

        let prompt = prompts::build_structuring_prompt(&draft.0);
        let structured_text = self.generator.generate(&prompt).await?;
        debug!("Stage 2 structured output:\n{}", structured_text);

        let structured = StructuredSchedule::parse(&structured_text)?;
        self.materialize(&structured)
    }

    /// Build events from a structured schedule, assigning and persisting one
    /// counter value per event. The state is saved after every increment so
    /// an id can never be handed out twice, even if a later datetime fails
    /// to parse.
    pub fn materialize(&self, structured: &StructuredSchedule) -> Result<Vec<CalendarEvent>> {
        let mut state = self.store.load()?;
        let mut events = Vec::new();

        for n in 1..=STAGING_CAPACITY {
            let Some((title, description, datetime)) = structured.entry(n) else {
                continue;
            };
            let start = parse_event_datetime(&datetime)?;

            let uid = state.cal.uid_counter;
            state.cal.uid_counter += 1;
            self.store.save(&state)?;

            events.push(CalendarEvent {
                uid,
                title,
                description,
                start,
            });
        }

        info!("Materialized {} calendar events", events.len());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedGenerator;
    use crate::store::{MemoryStore, StateStore};

    fn staged_store(ideas: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        let mut state = store.load().unwrap();
        for (i, idea) in ideas.iter().enumerate() {
            state
                .cal
                .slots
                .insert(format!("calpost_{}", i + 1), idea.to_string());
        }
        state.inputs.insert("input_startdate".into(), "5 December".into());
        state.inputs.insert("input_freq".into(), "2".into());
        store.save(&state).unwrap();
        store
    }

    #[test]
    fn test_strict_iso_datetime_keeps_offset() {
        let dt = parse_event_datetime("2025-12-05T19:00:00+12:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-12-05T19:00:00+12:00");
    }

    #[test]
    fn test_lenient_datetime_attaches_nz_offset() {
        let dt = parse_event_datetime("5th December 2025 at 7pm").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-12-05T19:00:00+12:00");

        let dt = parse_event_datetime("December 5 2025 7:30 PM").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-12-05T19:30:00+12:00");

        let dt = parse_event_datetime("2025-12-05").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-12-05T00:00:00+12:00");
    }

    #[test]
    fn test_unparseable_datetime_is_an_error() {
        assert!(parse_event_datetime("sometime soon").is_err());
    }

    #[test]
    fn test_structured_parse_rejects_non_json() {
        assert!(matches!(
            StructuredSchedule::parse("Here is your JSON: {oops"),
            Err(CalendarError::Structuring(_))
        ));
        assert!(matches!(
            StructuredSchedule::parse("[1, 2, 3]"),
            Err(CalendarError::NotAnObject)
        ));
    }

    #[test]
    fn test_entry_requires_all_three_fields() {
        let structured = StructuredSchedule::parse(
            r#"{"title1": "A", "description1": "d", "datetime1": "2025-12-05T19:00:00+12:00",
                "title2": "B", "datetime2": "2025-12-06T19:00:00+12:00"}"#,
        )
        .unwrap();

        assert!(structured.entry(1).is_some());
        // description2 is missing, so index 2 yields nothing.
        assert!(structured.entry(2).is_none());
    }

    #[test]
    fn test_materialize_permits_index_gaps() {
        let store = MemoryStore::new();
        let pipeline = CalendarPipeline::new(ScriptedGenerator::new(Vec::<String>::new()), store);
        let structured = StructuredSchedule::parse(
            r#"{"title1": "First", "description1": "d1", "datetime1": "2025-12-05T19:00:00+12:00",
                "title4": "Fourth", "description4": "d4", "datetime4": "2025-12-09T19:00:00+12:00"}"#,
        )
        .unwrap();

        let events = pipeline.materialize(&structured).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "First");
        assert_eq!(events[1].title, "Fourth");
        assert_eq!(events[0].uid, 1);
        assert_eq!(events[1].uid, 2);
    }

    #[test]
    fn test_uid_counter_survives_reloads_and_never_repeats() {
        let store = MemoryStore::new();
        let structured = StructuredSchedule::parse(
            r#"{"title1": "A", "description1": "d", "datetime1": "2025-12-05T19:00:00+12:00"}"#,
        )
        .unwrap();

        let pipeline =
            CalendarPipeline::new(ScriptedGenerator::new(Vec::<String>::new()), store.clone());
        let first = pipeline.materialize(&structured).unwrap();

        // A second run against a freshly loaded store continues the sequence.
        let pipeline =
            CalendarPipeline::new(ScriptedGenerator::new(Vec::<String>::new()), store.clone());
        let second = pipeline.materialize(&structured).unwrap();

        assert_eq!(first[0].uid, 1);
        assert_eq!(second[0].uid, 2);
        assert_eq!(store.load().unwrap().cal.uid_counter, 3);
    }

    #[tokio::test]
    async fn test_stage_two_parse_failure_halts_without_events() {
        let store = staged_store(&["Wrap and Roll idea text"]);
        let pipeline = CalendarPipeline::new(
            ScriptedGenerator::new(["the schedule text", "this is not json"]),
            store.clone(),
        );

        let err = pipeline.assemble().await.unwrap_err();
        assert!(err.downcast_ref::<CalendarError>().is_some());
        // Hard stop: the counter did not move.
        assert_eq!(store.load().unwrap().cal.uid_counter, 1);
    }

    #[tokio::test]
    async fn test_assemble_end_to_end_with_scripted_stages() {
        let store = staged_store(&["Wrap and Roll idea text"]);
        let pipeline = CalendarPipeline::new(
            ScriptedGenerator::new([
                "Post Number: 1\nTitle: Wrap and Roll\nDescription: Picnic wraps\nDate: 5th December 2025\nTime: 7pm",
                r#"{"title1": "Wrap and Roll", "description1": "Picnic wraps", "datetime1": "2025-12-05T19:00:00+12:00"}"#,
            ]),
            store.clone(),
        );

        let events = pipeline.assemble().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Wrap and Roll");
        assert_eq!(events[0].description, "Picnic wraps");
        assert_eq!(events[0].start.to_rfc3339(), "2025-12-05T19:00:00+12:00");
        assert_eq!(events[0].uid, 1);
        assert_eq!(store.load().unwrap().cal.uid_counter, 2);
    }
}
