//! Testing utilities for backstory generation.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedGenerator` returns canned results without any network
//! - `RecordingFrontend` submits forms programmatically and records
//!   everything shown to the user

use crate::form::BackstoryForm;
use crate::frontend::{Frontend, NoticeLevel};
use crate::generation::{GenerationError, GenerationResult, Generator};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A generator that returns scripted results in order.
///
/// Once the script runs out every call fails with
/// [`GenerationError::EmptyCompletion`].
pub struct ScriptedGenerator {
    results: Mutex<VecDeque<GenerationResult>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(results: Vec<GenerationResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A generator that answers once with `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());
        self.results
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyCompletion))
    }
}

type FormEdit = Box<dyn Fn(BackstoryForm) -> BackstoryForm>;

/// A frontend driven by code instead of a user.
pub struct RecordingFrontend {
    edit: Option<FormEdit>,
    open: bool,
    /// Forms as they were presented, before editing.
    pub forms: Vec<BackstoryForm>,
    pub notices: Vec<(NoticeLevel, String)>,
    /// `(title, html)` of every result dialog.
    pub dialogs: Vec<(String, String)>,
    pub messages: Vec<String>,
}

impl RecordingFrontend {
    /// Submit every form after passing it through `edit`.
    pub fn submitting(edit: impl Fn(BackstoryForm) -> BackstoryForm + 'static) -> Self {
        Self {
            edit: Some(Box::new(edit)),
            open: true,
            forms: Vec::new(),
            notices: Vec::new(),
            dialogs: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Dismiss every form.
    pub fn dismissing() -> Self {
        Self {
            edit: None,
            ..Self::submitting(|form| form)
        }
    }

    /// Report the form as closed by the time results arrive.
    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }
}

impl Frontend for RecordingFrontend {
    fn fill_form(&mut self, form: BackstoryForm) -> Option<BackstoryForm> {
        self.forms.push(form.clone());
        self.edit.as_ref().map(|edit| edit(form))
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }

    fn show_backstory(&mut self, title: &str, html: &str) {
        self.dialogs.push((title.to_string(), html.to_string()));
    }

    fn show_message(&mut self, html: &str) {
        self.messages.push(html.to_string());
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
