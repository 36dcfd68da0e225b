//! Character backstory generation for tabletop RPG characters.
//!
//! This crate provides:
//! - Dotted-path reads and writes into arbitrary character documents
//! - Configurable field mapping, genre presets and world lore
//! - Deterministic prompt building
//! - Generation through the OpenAI chat completions API
//! - A request handler that applies results back to the character
//!
//! # Quick Start
//!
//! ```ignore
//! use backstory_core::{Actor, BackstoryService, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load("backstory.toml").await?.apply_env();
//!     let service = BackstoryService::from_settings(settings);
//!
//!     let mut actor = Actor::load_json("kael.json").await?;
//!     let mut form = service.open_form(Some(&actor))?;
//!     form.tone = "stoic".to_string();
//!     form.save_to_bio = true;
//!
//!     let completion = service.submit(&form, Some(&mut actor)).await?;
//!     println!("{}", completion.text);
//!
//!     actor.save_json("kael.json").await?;
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod form;
pub mod frontend;
pub mod generation;
pub mod path;
pub mod prompt;
pub mod result;
pub mod service;
pub mod settings;
pub mod testing;
pub mod traits;
pub mod welcome;

// Primary public API
pub use actor::{Actor, ActorError};
pub use form::BackstoryForm;
pub use frontend::{Frontend, NoticeLevel};
pub use generation::{GenerationError, GenerationResult, Generator, OpenAiGenerator};
pub use prompt::build_prompt;
pub use result::{apply_result, AppliedResult};
pub use service::{BackstoryService, Completion, Outcome, ServiceError};
pub use settings::{Settings, SettingsError};
pub use testing::{RecordingFrontend, ScriptedGenerator};
pub use traits::{CharacterTraits, FieldMapping, GenrePreset, LogicalField};
