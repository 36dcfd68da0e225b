//! Character traits and the mapping from logical fields to document paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The character fields read from (and written to) an actor document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Age,
    Gender,
    Origin,
    Homeland,
    Class,
    Biography,
}

impl LogicalField {
    pub fn all() -> &'static [LogicalField] {
        &[
            LogicalField::Age,
            LogicalField::Gender,
            LogicalField::Origin,
            LogicalField::Homeland,
            LogicalField::Class,
            LogicalField::Biography,
        ]
    }

    /// Settings key suffix, as in `path.<key>`.
    pub fn setting_key(&self) -> &'static str {
        match self {
            LogicalField::Age => "age",
            LogicalField::Gender => "gender",
            LogicalField::Origin => "origin",
            LogicalField::Homeland => "homeland",
            LogicalField::Class => "charClass",
            LogicalField::Biography => "biography",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogicalField::Age => "Character Age Path",
            LogicalField::Gender => "Character Gender Path",
            LogicalField::Origin => "Character Race/Ancestry Path",
            LogicalField::Homeland => "Character Homeland Path",
            LogicalField::Class => "Character Class Path",
            LogicalField::Biography => "Actor Biography Path",
        }
    }

    pub fn default_path(&self) -> &'static str {
        match self {
            LogicalField::Age => "system.details.age",
            LogicalField::Gender => "system.details.gender",
            LogicalField::Origin => "system.details.race",
            LogicalField::Homeland => "system.details.homeland",
            LogicalField::Class => "system.details.class",
            LogicalField::Biography => "system.biography",
        }
    }

    /// Look a field up by its settings key.
    pub fn from_setting_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.setting_key() == key)
    }
}

/// Dotted paths locating each logical field inside an actor document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub age: String,
    pub gender: String,
    pub origin: String,
    pub homeland: String,
    #[serde(alias = "charClass")]
    pub class: String,
    pub biography: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            age: LogicalField::Age.default_path().to_string(),
            gender: LogicalField::Gender.default_path().to_string(),
            origin: LogicalField::Origin.default_path().to_string(),
            homeland: LogicalField::Homeland.default_path().to_string(),
            class: LogicalField::Class.default_path().to_string(),
            biography: LogicalField::Biography.default_path().to_string(),
        }
    }
}

impl FieldMapping {
    pub fn path(&self, field: LogicalField) -> &str {
        match field {
            LogicalField::Age => &self.age,
            LogicalField::Gender => &self.gender,
            LogicalField::Origin => &self.origin,
            LogicalField::Homeland => &self.homeland,
            LogicalField::Class => &self.class,
            LogicalField::Biography => &self.biography,
        }
    }

    pub fn set_path(&mut self, field: LogicalField, path: impl Into<String>) {
        let slot = match field {
            LogicalField::Age => &mut self.age,
            LogicalField::Gender => &mut self.gender,
            LogicalField::Origin => &mut self.origin,
            LogicalField::Homeland => &mut self.homeland,
            LogicalField::Class => &mut self.class,
            LogicalField::Biography => &mut self.biography,
        };
        *slot = path.into();
    }
}

/// Error for an unrecognised genre preset key.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown genre preset: {0}")]
pub struct UnknownGenre(pub String);

/// Genre presets that steer the tone of a backstory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenrePreset {
    #[default]
    SwordSorcery,
    HighFantasy,
    Grimdark,
    NobleBright,
    WeirdFantasy,
    ScienceFantasy,
    /// Free text supplied with the request.
    Custom,
}

impl GenrePreset {
    pub fn all() -> &'static [GenrePreset] {
        &[
            GenrePreset::SwordSorcery,
            GenrePreset::HighFantasy,
            GenrePreset::Grimdark,
            GenrePreset::NobleBright,
            GenrePreset::WeirdFantasy,
            GenrePreset::ScienceFantasy,
            GenrePreset::Custom,
        ]
    }

    /// Stable key, also what the prompt shows for non-custom presets.
    pub fn key(&self) -> &'static str {
        match self {
            GenrePreset::SwordSorcery => "sword_sorcery",
            GenrePreset::HighFantasy => "high_fantasy",
            GenrePreset::Grimdark => "grimdark",
            GenrePreset::NobleBright => "noble_bright",
            GenrePreset::WeirdFantasy => "weird_fantasy",
            GenrePreset::ScienceFantasy => "science_fantasy",
            GenrePreset::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenrePreset::SwordSorcery => "Sword & Sorcery",
            GenrePreset::HighFantasy => "High Fantasy",
            GenrePreset::Grimdark => "Grimdark",
            GenrePreset::NobleBright => "Noblebright",
            GenrePreset::WeirdFantasy => "Weird Fantasy",
            GenrePreset::ScienceFantasy => "Science Fantasy",
            GenrePreset::Custom => "Custom / Manual",
        }
    }

    /// The genre text sent to the model.
    pub fn describe(&self, custom: &str) -> String {
        match self {
            GenrePreset::Custom => custom.trim().to_string(),
            other => other.key().to_string(),
        }
    }
}

impl fmt::Display for GenrePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GenrePreset {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|g| g.key() == wanted)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}

/// Everything gathered for one generation request.
///
/// Built from a submitted form and dropped once the request completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterTraits {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub origin: String,
    pub homeland: String,
    pub class: String,
    pub tone: String,
    pub genre: String,
    pub world_context: String,
}
