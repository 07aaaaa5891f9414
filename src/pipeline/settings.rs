//! Input summarization
//!
//! Condenses the free-text partnerships input into a single line the idea
//! prompt can carry verbatim. The model's whole (trimmed) response is stored
//! under `userinputsummary_partnerships`.

use anyhow::{bail, Result};
use tracing::info;

use crate::inputs::{KEY_PARTNERSHIPS, KEY_PARTNERSHIPS_SUMMARY};
use crate::llm::TextGenerator;
use crate::pipeline::prompts;
use crate::store::StateStore;

pub async fn summarize_partnerships<G, S>(generator: &G, store: &S) -> Result<String>
where
    G: TextGenerator,
    S: StateStore,
{
    let mut state = store.load()?;
    let partnerships = state
        .inputs
        .get(KEY_PARTNERSHIPS)
        .cloned()
        .unwrap_or_default();
    if partnerships.trim().is_empty() {
        bail!("No partnerships input to summarize. Set it with 'postplan inputs set partnerships ...'");
    }

    let prompt = prompts::build_partnerships_summary_prompt(&partnerships);
    let summary = generator.generate(&prompt).await?.trim().to_string();

    state
        .inputs
        .insert(KEY_PARTNERSHIPS_SUMMARY.to_string(), summary.clone());
    store.save(&state)?;
    info!("Stored partnerships summary");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{set_input, InputField, UserInputs};
    use crate::llm::ScriptedGenerator;
    use crate::store::{MemoryStore, StateStore};

    #[tokio::test]
    async fn test_summary_is_persisted() {
        let store = MemoryStore::new();
        set_input(&store, InputField::Partnerships, "We work with the local brewery and two food trucks.").unwrap();

        let gen = ScriptedGenerator::new([
            "Partnerships/Collaborations: Local brewery and two food trucks.",
        ]);
        let summary = summarize_partnerships(&gen, &store).await.unwrap();
        assert!(summary.contains("Local brewery"));

        let inputs = UserInputs::from_state(&store.load().unwrap());
        assert_eq!(inputs.partnerships_summary, summary);
    }

    #[tokio::test]
    async fn test_empty_input_is_an_error() {
        let store = MemoryStore::new();
        let gen = ScriptedGenerator::new(Vec::<String>::new());
        assert!(summarize_partnerships(&gen, &store).await.is_err());
    }
}
