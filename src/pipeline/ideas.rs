//! Idea generation pipeline
//!
//! One model call, then regex parsing of the free text into discrete post
//! records. The response is split on "Post <number>" markers followed by a
//! blank line; a response with no markers yields zero records, never an
//! error.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::context::BusinessContext;
use crate::inputs::UserInputs;
use crate::llm::TextGenerator;
use crate::pipeline::prompts;
use crate::store::StateStore;

/// At most this many records come out of one generation call.
pub const MAX_IDEAS: usize = 10;

/// Sentinel title for records without a `Title:` line.
pub const NO_TITLE: &str = "None";

static POST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Post \d+[ \t]*\n[ \t]*\n").expect("valid post marker regex"));

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Title:[ \t]*([^\n]*)").expect("valid title regex"));

/// One parsed post idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaRecord {
    /// 1-based position in the response, not the number printed in the marker.
    pub ordinal: usize,
    pub title: String,
    pub body: String,
}

/// Split a model response into post records. Records are numbered 1..K in
/// source order regardless of the numbers the model printed.
pub fn parse_idea_response(text: &str) -> Vec<IdeaRecord> {
    // Keep every marker so a kept record's body still ends at the next
    // marker even when the records past MAX_IDEAS are discarded.
    let markers: Vec<_> = POST_MARKER_RE.find_iter(text).collect();

    markers
        .iter()
        .take(MAX_IDEAS)
        .enumerate()
        .map(|(i, marker)| {
            let end = markers
                .get(i + 1)
                .map(|next| next.start())
                .unwrap_or(text.len());
            let body = text[marker.end()..end].trim().to_string();
            let title = extract_title(&body);
            IdeaRecord {
                ordinal: i + 1,
                title,
                body,
            }
        })
        .collect()
}

/// First `Title:` line's value, trimmed; the literal "None" when absent.
pub fn extract_title(body: &str) -> String {
    TITLE_RE
        .captures(body)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Generation pipeline: prompt assembly, one model call, parsing, and
/// persistence of the parsed records into the `outputs` namespace.
pub struct IdeaPipeline<G, S> {
    generator: G,
    store: S,
}

impl<G: TextGenerator, S: StateStore> IdeaPipeline<G, S> {
    pub fn new(generator: G, store: S) -> Self {
        Self { generator, store }
    }

    /// Run one generation call and persist the results. An unparseable
    /// response persists nothing and returns an empty set.
    pub async fn generate(&self, ctx: &BusinessContext) -> Result<Vec<IdeaRecord>> {
        let mut state = self.store.load()?;
        let inputs = UserInputs::from_state(&state);

        let prompt = prompts::build_idea_prompt(ctx, &inputs);
        debug!("Requesting post ideas ({} chars of prompt)", prompt.len());
        let response = self.generator.generate(&prompt).await?;

        let records = parse_idea_response(&response);
        info!("Generated {} post ideas", records.len());

        // Replace the previous generation wholesale.
        state
            .outputs
            .retain(|k, _| !k.starts_with("postidea_") && !k.starts_with("posttitle_"));
        for record in &records {
            state
                .outputs
                .insert(format!("postidea_{}", record.ordinal), record.body.clone());
            state
                .outputs
                .insert(format!("posttitle_{}", record.ordinal), record.title.clone());
        }
        self.store.save(&state)?;

        Ok(records)
    }

    /// Load the records persisted by the last generation run.
    pub fn saved_records(&self) -> Result<Vec<IdeaRecord>> {
        saved_records(&self.store)
    }

    /// Drop every generated record from the `outputs` namespace.
    pub fn wipe(&self) -> Result<()> {
        wipe(&self.store)
    }
}

/// Load the records persisted by the last generation run.
pub fn saved_records<S: StateStore>(store: &S) -> Result<Vec<IdeaRecord>> {
    let state = store.load()?;
    let mut records = Vec::new();
    for i in 1..=MAX_IDEAS {
        if let Some(body) = state.outputs.get(&format!("postidea_{}", i)) {
            if body.trim().is_empty() {
                continue;
            }
            let title = state
                .outputs
                .get(&format!("posttitle_{}", i))
                .cloned()
                .unwrap_or_else(|| extract_title(body));
            records.push(IdeaRecord {
                ordinal: i,
                title,
                body: body.clone(),
            });
        }
    }
    Ok(records)
}

/// Drop every generated record from the `outputs` namespace.
pub fn wipe<S: StateStore>(store: &S) -> Result<()> {
    let mut state = store.load()?;
    state
        .outputs
        .retain(|k, _| !k.starts_with("postidea_") && !k.starts_with("posttitle_"));
    store.save(&state)?;
    info!("Cleared all generated post ideas");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedGenerator;
    use crate::store::{MemoryStore, StateStore};

    const THREE_POSTS: &str = "Post 1\n\nTitle: Nutella Moments\n\nIdea: Gift doughnuts.\n\nPost 2\n\nTitle: Coffee with a Cause\n\nIdea: Community coffee.\n\nPost 3\n\nIdea: A record without a title line.\n";

    #[test]
    fn test_parse_counts_and_orders_records() {
        let records = parse_idea_response(THREE_POSTS);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].ordinal, 1);
        assert_eq!(records[0].title, "Nutella Moments");
        assert_eq!(records[1].title, "Coffee with a Cause");
        assert!(records[1].body.starts_with("Title: Coffee with a Cause"));
    }

    #[test]
    fn test_missing_title_yields_none_sentinel() {
        let records = parse_idea_response(THREE_POSTS);
        assert_eq!(records[2].title, "None");
    }

    #[test]
    fn test_title_whitespace_is_trimmed() {
        assert_eq!(extract_title("Title:    Wrap and Roll   \nIdea: x"), "Wrap and Roll");
        assert_eq!(extract_title("no title here"), "None");
    }

    #[test]
    fn test_extra_whitespace_between_blocks() {
        let text = "Post 1\n\nTitle: A\n\nbody\n\n\n\nPost 2\n\nTitle: B\n\nbody\n";
        let records = parse_idea_response(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[1].title, "B");
        // Trailing whitespace does not leak into the first record's body.
        assert!(records[0].body.ends_with("body"));
    }

    #[test]
    fn test_no_markers_yields_zero_records() {
        assert!(parse_idea_response("The model rambled with no markers.").is_empty());
        assert!(parse_idea_response("").is_empty());
        // A marker without the blank line is not a marker.
        assert!(parse_idea_response("Post 1\nTitle: X\n").is_empty());
    }

    #[test]
    fn test_records_capped_at_ten() {
        let mut text = String::new();
        for i in 1..=14 {
            text.push_str(&format!("Post {}\n\nTitle: T{}\n\nbody\n\n", i, i));
        }
        let records = parse_idea_response(&text);
        assert_eq!(records.len(), MAX_IDEAS);
        assert_eq!(records.last().unwrap().ordinal, 10);
    }

    #[test]
    fn test_tenth_record_ends_at_the_discarded_eleventh() {
        let mut text = String::new();
        for i in 1..=12 {
            text.push_str(&format!("Post {}\n\nTitle: T{}\n\nbody {}\n\n", i, i, i));
        }
        let records = parse_idea_response(&text);
        let last = records.last().unwrap();
        assert_eq!(last.title, "T10");
        assert_eq!(last.body, "Title: T10\n\nbody 10");
        assert!(!last.body.contains("Post 11"));
    }

    #[tokio::test]
    async fn test_generate_persists_outputs() {
        let store = MemoryStore::new();
        let pipeline = IdeaPipeline::new(ScriptedGenerator::new([THREE_POSTS]), store.clone());

        let records = pipeline
            .generate(&crate::context::BusinessContext::default())
            .await
            .unwrap();
        assert_eq!(records.len(), 3);

        let state = store.load().unwrap();
        assert_eq!(
            state.outputs.get("posttitle_1").map(String::as_str),
            Some("Nutella Moments")
        );
        assert!(state.outputs.contains_key("postidea_3"));

        let reloaded = pipeline.saved_records().unwrap();
        assert_eq!(reloaded, records);
    }

    #[tokio::test]
    async fn test_wipe_clears_generated_records() {
        let store = MemoryStore::new();
        let pipeline = IdeaPipeline::new(ScriptedGenerator::new([THREE_POSTS]), store.clone());
        pipeline
            .generate(&crate::context::BusinessContext::default())
            .await
            .unwrap();

        pipeline.wipe().unwrap();
        assert!(pipeline.saved_records().unwrap().is_empty());
        assert!(store.load().unwrap().outputs.is_empty());
    }
}
