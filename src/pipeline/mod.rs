//! Prompt-chain pipelines
//!
//! Three small chains, each a fixed prompt template plus parsing of the free
//! text that comes back: idea generation (one call), calendar assembly (two
//! calls with a typed intermediate), and the post builder (one call). No step
//! is retried; parse tolerance is decided per stage.

pub mod calendar;
pub mod ideas;
pub mod post;
pub mod prompts;
pub mod settings;

pub use calendar::{CalendarError, CalendarEvent, CalendarPipeline, ScheduleDraft, StructuredSchedule};
pub use ideas::{IdeaPipeline, IdeaRecord};
pub use post::{PostDocument, PostPipeline};
pub use settings::summarize_partnerships;
