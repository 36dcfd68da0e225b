//! BackstoryService - the request handler for backstory generation.
//!
//! Built once at startup and passed to whatever needs to open a form. One
//! call to [`BackstoryService::run`] is one request: open the form, let the
//! user edit it, generate, show the result and write it back if asked.
//! Requests share nothing but the settings and the generator.

use crate::actor::Actor;
use crate::form::BackstoryForm;
use crate::frontend::{Frontend, NoticeLevel};
use crate::generation::{GenerationError, Generator, OpenAiGenerator};
use crate::prompt::build_prompt;
use crate::result::{apply_result, format_backstory};
use crate::settings::{Settings, NAMESPACE};
use crate::traits::LogicalField;
use crate::welcome::welcome_message;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Title of the result dialog.
pub const RESULT_TITLE: &str = "Character Backstory";

/// Flag set on an actor once a backstory has been generated for it.
pub const USED_FLAG: &str = "generatorUsed";

/// Errors from a backstory request.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Only character actors can have a backstory (this one is '{kind}')")]
    NotACharacter { kind: String },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Text produced by the model for one submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub prompt: String,
    pub text: String,
}

/// A generation that has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub prompt: String,
    pub text: String,
    /// HTML fragment shown to the user.
    pub display: String,
    /// Whether the biography was updated.
    pub saved: bool,
    /// Why a requested save did not happen.
    pub save_skipped: Option<String>,
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(Completion),
    /// The user closed the form without submitting.
    Dismissed,
    /// The result arrived after the form was gone and was dropped.
    Discarded,
    /// Something went wrong; the message was shown to the user.
    Failed(String),
}

/// The backstory generator service.
pub struct BackstoryService {
    settings: Settings,
    generator: Arc<dyn Generator>,
    today: fn() -> NaiveDate,
}

impl BackstoryService {
    pub fn new(settings: Settings, generator: Arc<dyn Generator>) -> Self {
        Self {
            settings,
            generator,
            today: || chrono::Local::now().date_naive(),
        }
    }

    /// Create a service that talks to the configured OpenAI endpoint.
    pub fn from_settings(settings: Settings) -> Self {
        let generator = Arc::new(OpenAiGenerator::from_settings(&settings));
        Self::new(settings, generator)
    }

    /// Replace the clock used to date biography entries.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The welcome guide, if it is enabled.
    pub fn welcome(&self, is_gm: bool) -> Option<String> {
        self.settings
            .show_welcome_message
            .then(|| welcome_message(is_gm))
    }

    /// Open a form, pre-filled from `actor` when there is one.
    pub fn open_form(&self, actor: Option<&Actor>) -> Result<BackstoryForm, ServiceError> {
        match actor {
            Some(actor) if !actor.is_character() => Err(ServiceError::NotACharacter {
                kind: actor.kind(),
            }),
            Some(actor) => Ok(BackstoryForm::for_actor(actor, &self.settings)),
            None => Ok(BackstoryForm::blank(&self.settings)),
        }
    }

    /// The prompt a submitted form would send.
    pub fn prompt_for(&self, form: &BackstoryForm) -> String {
        build_prompt(&form.to_traits(&self.settings))
    }

    /// Ask the model for a backstory. Nothing is written anywhere.
    pub async fn generate(&self, form: &BackstoryForm) -> Result<Generated, ServiceError> {
        let prompt = self.prompt_for(form);
        debug!(prompt_len = prompt.len(), "built prompt");
        let text = self.generator.generate(&prompt).await?;
        Ok(Generated { prompt, text })
    }

    /// Apply a generated backstory: format it, mark the actor and append
    /// it to the biography if saving was requested.
    ///
    /// Writes to the actor never fail the request. The usage flag is best
    /// effort; a biography that cannot be written leaves the actor's
    /// biography untouched and is reported in [`Completion::save_skipped`].
    pub fn commit(
        &self,
        generated: Generated,
        form: &BackstoryForm,
        actor: Option<&mut Actor>,
    ) -> Completion {
        let Some(actor) = actor else {
            let applied = apply_result(&generated.text, "", false, (self.today)());
            return Completion {
                prompt: generated.prompt,
                text: generated.text,
                display: applied.display,
                saved: false,
                save_skipped: None,
            };
        };

        if let Err(err) = actor.set_flag(NAMESPACE, USED_FLAG, Value::Bool(true)) {
            warn!(error = %err, "could not flag the actor as generated for");
        }

        let bio_path = self.settings.paths.path(LogicalField::Biography).trim();
        let current = if bio_path.is_empty() {
            String::new()
        } else {
            actor.text_at(bio_path)
        };
        let applied = apply_result(&generated.text, &current, form.save_to_bio, (self.today)());

        let save_skipped = match applied.biography {
            Some(_) if bio_path.is_empty() => Some(format!(
                "{} is not set; the backstory was not saved.",
                LogicalField::Biography.label()
            )),
            Some(biography) => actor
                .set(bio_path, Value::String(biography))
                .err()
                .map(|err| format!("Could not save the backstory to the biography: {err}")),
            None => None,
        };
        if let Some(reason) = &save_skipped {
            warn!(path = bio_path, %reason, "biography not updated");
        }

        Completion {
            prompt: generated.prompt,
            text: generated.text,
            display: applied.display,
            saved: form.save_to_bio && save_skipped.is_none(),
            save_skipped,
        }
    }

    /// Generate and apply in one step, without a frontend.
    pub async fn submit(
        &self,
        form: &BackstoryForm,
        actor: Option<&mut Actor>,
    ) -> Result<Completion, ServiceError> {
        let generated = self.generate(form).await?;
        Ok(self.commit(generated, form, actor))
    }

    /// Handle one request end to end through `frontend`.
    ///
    /// A failure before a backstory exists becomes a single error
    /// notification and leaves the actor alone. Once a backstory exists it
    /// is always shown, before anything is written to the actor.
    pub async fn run(&self, frontend: &mut dyn Frontend, actor: Option<&mut Actor>) -> Outcome {
        let form = match self.open_form(actor.as_deref()) {
            Ok(form) => form,
            Err(err) => return fail(frontend, err),
        };

        let Some(form) = frontend.fill_form(form) else {
            debug!("form dismissed");
            return Outcome::Dismissed;
        };

        info!(name = %form.name, genre = %form.genre, save = form.save_to_bio, "generating backstory");
        let generated = match self.generate(&form).await {
            Ok(generated) => generated,
            Err(err) => return fail(frontend, err),
        };

        if !frontend.is_open() {
            debug!("form closed before the backstory arrived, dropping it");
            return Outcome::Discarded;
        }

        frontend.show_backstory(RESULT_TITLE, &format_backstory(&generated.text));

        let completion = self.commit(generated, &form, actor);
        match &completion.save_skipped {
            Some(reason) => frontend.notify(NoticeLevel::Warn, reason),
            None if completion.saved => {
                frontend.notify(NoticeLevel::Info, "Backstory added to biography.")
            }
            None => {}
        }
        Outcome::Completed(completion)
    }
}

fn fail(frontend: &mut dyn Frontend, err: ServiceError) -> Outcome {
    warn!(error = %err, "backstory request failed");
    let message = err.to_string();
    frontend.notify(NoticeLevel::Error, &message);
    Outcome::Failed(message)
}
