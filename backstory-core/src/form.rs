//! The backstory request form.
//!
//! A form is pre-filled from the actor document through the configured
//! field paths, edited by the user, then turned into [`CharacterTraits`].

use crate::actor::Actor;
use crate::settings::Settings;
use crate::traits::{CharacterTraits, GenrePreset, LogicalField};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Editable values of one backstory request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackstoryForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub origin: String,
    pub homeland: String,
    pub class: String,
    pub tone: String,
    pub genre: GenrePreset,
    /// Used in place of the preset when `genre` is `custom`.
    pub custom_genre: String,
    pub world_context: String,
    /// The actor's current biography, shown for reference only.
    pub biography: String,
    pub save_to_bio: bool,
}

impl BackstoryForm {
    /// A form with nothing but the configured defaults.
    pub fn blank(settings: &Settings) -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            gender: String::new(),
            origin: String::new(),
            homeland: String::new(),
            class: String::new(),
            tone: String::new(),
            genre: settings.genre_preset,
            custom_genre: String::new(),
            world_context: settings.world_context.clone(),
            biography: String::new(),
            save_to_bio: false,
        }
    }

    /// A form pre-filled from `actor`.
    ///
    /// Fields whose path is unset or missing from the document come out empty.
    pub fn for_actor(actor: &Actor, settings: &Settings) -> Self {
        let read = |field: LogicalField| {
            let path = settings.paths.path(field);
            if path.trim().is_empty() {
                return String::new();
            }
            let value = actor.text_at(path);
            debug!(field = field.setting_key(), path, found = !value.is_empty(), "resolved field");
            value
        };

        Self {
            name: actor.name(),
            age: read(LogicalField::Age),
            gender: read(LogicalField::Gender),
            origin: read(LogicalField::Origin),
            homeland: read(LogicalField::Homeland),
            class: read(LogicalField::Class),
            biography: read(LogicalField::Biography),
            ..Self::blank(settings)
        }
    }

    pub fn genre_is_custom(&self) -> bool {
        self.genre == GenrePreset::Custom
    }

    /// Collect the submitted values for prompt building.
    ///
    /// A blank world context falls back to the configured default.
    pub fn to_traits(&self, settings: &Settings) -> CharacterTraits {
        let world_context = if self.world_context.trim().is_empty() {
            settings.world_context.trim().to_string()
        } else {
            self.world_context.trim().to_string()
        };

        CharacterTraits {
            name: self.name.clone(),
            age: self.age.clone(),
            gender: self.gender.clone(),
            origin: self.origin.clone(),
            homeland: self.homeland.clone(),
            class: self.class.clone(),
            tone: self.tone.clone(),
            genre: self.genre.describe(&self.custom_genre),
            world_context,
        }
    }
}
