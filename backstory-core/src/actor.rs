//! Actor documents: the character data a backstory is generated for.
//!
//! An actor is an arbitrary JSON object owned by the host. Only a handful
//! of things are assumed about it: a `name`, a `type` (only `character`
//! actors get backstories) and an optional `flags` object for per-module
//! bookkeeping. Everything else is reached through dotted paths.

use crate::path::{self, PathError};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Actor kind that may receive a backstory.
pub const CHARACTER_KIND: &str = "character";

/// Errors from actor document operations.
#[derive(Debug, Error)]
pub enum ActorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Actor document must be a JSON object")]
    NotAnObject,
}

/// A mutable handle on one actor document.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    data: Value,
}

impl Actor {
    /// Wrap a JSON document. The document must be an object.
    pub fn new(data: Value) -> Result<Self, ActorError> {
        if !data.is_object() {
            return Err(ActorError::NotAnObject);
        }
        Ok(Self { data })
    }

    /// Load an actor from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, ActorError> {
        let content = fs::read_to_string(path).await?;
        Self::new(serde_json::from_str(&content)?)
    }

    /// Save the actor to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ActorError> {
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn name(&self) -> String {
        path::get_text(&self.data, "name")
    }

    /// The actor kind, e.g. `character` or `npc`.
    pub fn kind(&self) -> String {
        path::get_text(&self.data, "type")
    }

    pub fn is_character(&self) -> bool {
        self.kind() == CHARACTER_KIND
    }

    /// Text at a dotted path, empty when absent.
    pub fn text_at(&self, path: &str) -> String {
        path::get_text(&self.data, path)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        path::get(&self.data, path)
    }

    pub fn set(&mut self, path: &str, value: Value) -> Result<(), PathError> {
        path::set(&mut self.data, path, value)
    }

    pub fn flag(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.get(&flag_path(namespace, key))
    }

    pub fn set_flag(&mut self, namespace: &str, key: &str, value: Value) -> Result<(), PathError> {
        self.set(&flag_path(namespace, key), value)
    }
}

fn flag_path(namespace: &str, key: &str) -> String {
    format!("flags.{namespace}.{key}")
}
