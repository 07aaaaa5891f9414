//! Post builder pipeline
//!
//! Expands one selected idea into a publishable post: caption, media
//! description, and media instructions. One model call; the three sections
//! are recovered from the free text by their labeled headings. A missing
//! section comes back empty rather than failing the whole post.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::context::BusinessContext;
use crate::llm::TextGenerator;
use crate::pipeline::{ideas, prompts};

// Tolerates optional markdown bolding around the heading; models add it
// unpredictably.
static SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\*{0,2}(Caption|Media Description|Media Instructions)\*{0,2}:[ \t]*")
        .expect("valid section heading regex")
});

/// A ready-to-export post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostDocument {
    pub title: String,
    pub caption: String,
    pub media_description: String,
    pub media_instructions: String,
}

/// Split a builder response into its labeled sections. Section order in the
/// response does not matter; the last occurrence of a duplicated heading
/// wins.
pub fn parse_post_response(title: &str, text: &str) -> PostDocument {
    let mut doc = PostDocument {
        title: title.to_string(),
        ..PostDocument::default()
    };

    let matches: Vec<_> = SECTION_RE.captures_iter(text).collect();
    for (i, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).expect("regex match has group 0");
        let end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        let content = text[whole.end()..end].trim().to_string();

        match caps[1].to_lowercase().as_str() {
            "caption" => doc.caption = content,
            "media description" => doc.media_description = content,
            "media instructions" => doc.media_instructions = content,
            _ => {}
        }
    }
    doc
}

/// The single-call post builder.
pub struct PostPipeline<G> {
    generator: G,
}

impl<G: TextGenerator> PostPipeline<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Build a post from an idea's text. The document title is the idea's
    /// `Title:` line ("None" when absent, same as the generation parser).
    pub async fn build(
        &self,
        idea: &str,
        specific_info: &str,
        ctx: &BusinessContext,
    ) -> Result<PostDocument> {
        let prompt = prompts::build_post_prompt(idea, specific_info, ctx);
        debug!("Requesting post build");
        let response = self.generator.generate(&prompt).await?;

        let title = ideas::extract_title(idea);
        Ok(parse_post_response(&title, &response))
    }
}
