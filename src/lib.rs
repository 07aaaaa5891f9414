//! Postplan - Social Media Content Planner Library
//!
//! A content-planning toolkit with:
//! - An idea vault and calendar staging list with left-packed slots
//! - LLM-driven idea generation against a business profile
//! - Two-stage calendar assembly with ICS export
//! - A full post builder (caption, media description, media instructions)
//!
//! # Example
//!
//! ```ignore
//! use postplan::config::Config;
//! use postplan::store::JsonFileStore;
//! use postplan::vault::Vault;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let store = JsonFileStore::new(config.store.session_file_path()?);
//!     let vault = Vault::new(store);
//!     vault.save_idea("Behind-the-scenes reel of the morning bake")?;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod store;
pub mod slots;
pub mod vault;
pub mod inputs;
pub mod config;
pub mod credentials;
pub mod llm;
pub mod context;
pub mod cli;

// Feature modules
pub mod pipeline;
pub mod export;

// Re-export commonly used types for convenience
pub use store::{JsonFileStore, MemoryStore, PersistedState, StateStore};

pub use slots::SlotList;

pub use vault::{Staging, Vault};

pub use config::Config;

pub use credentials::{delete_api_key, get_api_key, has_api_key, set_api_key};

pub use llm::{OpenAiClient, ScriptedGenerator, TextGenerator};

pub use context::{BusinessContext, HttpSheetSource, TabularSource};

pub use pipeline::{
    CalendarEvent, CalendarPipeline, IdeaPipeline, IdeaRecord, PostDocument, PostPipeline,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Social Media Content Planner", NAME, VERSION)
}
