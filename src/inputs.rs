//! Saved planning inputs
//!
//! Typed view over the `inputs` namespace of the session store. Key names
//! match the persisted file format.

use anyhow::Result;

use crate::store::{PersistedState, StateStore};

pub const KEY_GOALS: &str = "input_goals";
pub const KEY_KEYDATES: &str = "input_keydates";
pub const KEY_MEDIA: &str = "input_media";
pub const KEY_PARTNERSHIPS: &str = "input_partnerships";
pub const KEY_STARTDATE: &str = "input_startdate";
pub const KEY_FREQ: &str = "input_freq";
pub const KEY_PARTNERSHIPS_SUMMARY: &str = "userinputsummary_partnerships";

/// The planning inputs the prompt templates draw on. Absent keys read as
/// empty strings.
#[derive(Debug, Clone, Default)]
pub struct UserInputs {
    /// Content goals for the next batch of posts.
    pub goals: String,
    /// Key upcoming dates or events.
    pub key_dates: String,
    /// Media the operator can realistically produce.
    pub media: String,
    /// Partnerships and collaborations, free text.
    pub partnerships: String,
    /// Calendar start date, free text (e.g. "5 December").
    pub start_date: String,
    /// Posting frequency, posts per week.
    pub frequency: String,
    /// Model-condensed partnerships summary.
    pub partnerships_summary: String,
}

impl UserInputs {
    pub fn from_state(state: &PersistedState) -> Self {
        let get = |key: &str| state.inputs.get(key).cloned().unwrap_or_default();
        Self {
            goals: get(KEY_GOALS),
            key_dates: get(KEY_KEYDATES),
            media: get(KEY_MEDIA),
            partnerships: get(KEY_PARTNERSHIPS),
            start_date: get(KEY_STARTDATE),
            frequency: get(KEY_FREQ),
            partnerships_summary: get(KEY_PARTNERSHIPS_SUMMARY),
        }
    }
}

/// Input fields settable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Goals,
    KeyDates,
    Media,
    Partnerships,
    StartDate,
    Frequency,
}

impl InputField {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "goals" => Some(Self::Goals),
            "keydates" | "key-dates" | "dates" => Some(Self::KeyDates),
            "media" => Some(Self::Media),
            "partnerships" => Some(Self::Partnerships),
            "startdate" | "start-date" => Some(Self::StartDate),
            "frequency" | "freq" => Some(Self::Frequency),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Goals => KEY_GOALS,
            Self::KeyDates => KEY_KEYDATES,
            Self::Media => KEY_MEDIA,
            Self::Partnerships => KEY_PARTNERSHIPS,
            Self::StartDate => KEY_STARTDATE,
            Self::Frequency => KEY_FREQ,
        }
    }

    pub fn names() -> &'static [&'static str] {
        &[
            "goals",
            "keydates",
            "media",
            "partnerships",
            "startdate",
            "frequency",
        ]
    }
}

/// Store a single input field.
pub fn set_input<S: StateStore>(store: &S, field: InputField, value: &str) -> Result<()> {
    let mut state = store.load()?;
    state.inputs.insert(field.key().to_string(), value.to_string());
    store.save(&state)
}
