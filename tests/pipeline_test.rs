//! End-to-end flow: generate ideas, vault one, promote it, assemble the
//! calendar, and render the ICS export. Model calls are scripted so the run
//! is deterministic.

use postplan::context::{BusinessContext, Table};
use postplan::export;
use postplan::inputs::{self, InputField};
use postplan::llm::ScriptedGenerator;
use postplan::pipeline::{ideas, CalendarPipeline, IdeaPipeline};
use postplan::store::{MemoryStore, StateStore};
use postplan::vault::{Staging, Vault};

const IDEA_RESPONSE: &str = "Post 1\n\nTitle: Wrap and Roll Launch\n\nIdea: Tease the new \
lunchtime wrap menu with a short counter-side reel.\n\nPost 2\n\nTitle: Meet the Bakers\n\nIdea: \
Introduce the morning crew and what they bake first.\n";

const SCHEDULE_DRAFT: &str = "Friday 5 December 2025, 7pm - Wrap and Roll Launch\n";

const STRUCTURED_RESPONSE: &str = r#"{
  "title1": "Wrap and Roll Launch",
  "description1": "Tease the new lunchtime wrap menu.",
  "datetime1": "2025-12-05T19:00:00+12:00"
}"#;

fn business_context() -> BusinessContext {
    let primary = Table::from_csv(
        b"Business Name,Daily Crust Bakery\nIndustry,Hospitality\nLocations,Wellington\n",
    )
    .unwrap();
    let questionnaire = Table::from_csv(b"Brand Values,Fresh and local\n").unwrap();
    let summaries = Table::from_csv(b"Company Overview,A neighbourhood bakery\n").unwrap();
    BusinessContext::from_tables(&primary, &questionnaire, &summaries)
}

#[tokio::test]
async fn test_generate_vault_promote_assemble_export() -> anyhow::Result<()> {
    let store = MemoryStore::new();

    inputs::set_input(&store, InputField::StartDate, "5 December 2025")?;
    inputs::set_input(&store, InputField::Frequency, "3")?;

    // Generate a batch of ideas.
    let generator = ScriptedGenerator::new([IDEA_RESPONSE]);
    let pipeline = IdeaPipeline::new(generator, store.clone());
    let records = pipeline.generate(&business_context()).await?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Wrap and Roll Launch");

    // Persisted records survive a fresh read.
    let saved = ideas::saved_records(&store)?;
    assert_eq!(saved.len(), 2);

    // Vault the first idea and promote it to the staging list.
    let vault = Vault::new(store.clone());
    vault.save_idea(&saved[0].body)?;
    let list = vault.list()?;
    assert!(list.get(1).unwrap().contains("lunchtime wrap menu"));

    vault.promote(1)?;
    let staged = Staging::new(store.clone()).list()?;
    assert_eq!(staged.occupied(), 1);
    assert!(staged.get(1).unwrap().contains("Wrap and Roll Launch"));

    // The vault slot is untouched by promotion.
    assert_eq!(vault.list()?.occupied(), 1);

    // Assemble the calendar from the staged idea.
    let generator = ScriptedGenerator::new([SCHEDULE_DRAFT, STRUCTURED_RESPONSE]);
    let pipeline = CalendarPipeline::new(generator, store.clone());
    let events = pipeline.assemble().await?;

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].uid, 1);
    assert_eq!(events[0].title, "Wrap and Roll Launch");
    assert_eq!(events[0].start.to_rfc3339(), "2025-12-05T19:00:00+12:00");

    // The counter advanced and was persisted.
    assert_eq!(store.load()?.cal.uid_counter, 2);

    // ICS export carries the event in UTC.
    let ics = export::render_calendar(&events);
    assert!(ics.contains("BEGIN:VEVENT"));
    assert!(ics.contains("UID:1"));
    assert!(ics.contains("SUMMARY:Wrap and Roll Launch"));
    assert!(ics.contains("DTSTART:20251205T070000Z"));

    Ok(())
}

#[tokio::test]
async fn test_structuring_failure_commits_nothing() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut state = store.load()?;
    state
        .cal
        .slots
        .insert("calpost_1".to_string(), "A staged idea".to_string());
    store.save(&state)?;

    let generator = ScriptedGenerator::new([SCHEDULE_DRAFT, "Sorry, here is the schedule:"]);
    let pipeline = CalendarPipeline::new(generator, store.clone());

    assert!(pipeline.assemble().await.is_err());
    assert_eq!(store.load()?.cal.uid_counter, 1);

    Ok(())
}

#[tokio::test]
async fn test_uid_counter_is_monotonic_across_runs() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut state = store.load()?;
    state
        .cal
        .slots
        .insert("calpost_1".to_string(), "A staged idea".to_string());
    store.save(&state)?;

    for expected_uid in 1..=3u64 {
        let generator = ScriptedGenerator::new([SCHEDULE_DRAFT, STRUCTURED_RESPONSE]);
        let pipeline = CalendarPipeline::new(generator, store.clone());
        let events = pipeline.assemble().await?;
        assert_eq!(events[0].uid, expected_uid);
    }

    assert_eq!(store.load()?.cal.uid_counter, 4);
    Ok(())
}
