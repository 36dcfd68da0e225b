//! Terminal frontends for the backstory service.
//!
//! Two adapters, picked at startup:
//! - `InteractiveFrontend` walks the user through the form line by line
//! - `BatchFrontend` takes the form as given on the command line and
//!   reports everything as JSON lines, for scripts and automated testing

use crate::render::html_to_text;
use backstory_core::{BackstoryForm, Frontend, GenrePreset, NoticeLevel};
use clap::Args;
use serde_json::json;
use std::fmt;
use std::io::{BufRead, Write};
use tracing::warn;

/// Form values supplied on the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct FormOverrides {
    /// Character name
    #[arg(long)]
    pub name: Option<String>,
    /// Character age
    #[arg(long)]
    pub age: Option<String>,
    /// Character sex or gender
    #[arg(long)]
    pub gender: Option<String>,
    /// Race or ancestry
    #[arg(long)]
    pub origin: Option<String>,
    /// Homeland
    #[arg(long)]
    pub homeland: Option<String>,
    /// Class or profession
    #[arg(long)]
    pub class: Option<String>,
    /// Personality tone or theme
    #[arg(long)]
    pub tone: Option<String>,
    /// Genre preset (sword_sorcery, high_fantasy, grimdark, noble_bright,
    /// weird_fantasy, science_fantasy, custom)
    #[arg(long)]
    pub genre: Option<GenrePreset>,
    /// Genre text used when the preset is `custom`
    #[arg(long)]
    pub custom_genre: Option<String>,
    /// World or regional lore for this character
    #[arg(long)]
    pub world_context: Option<String>,
}

impl FormOverrides {
    pub fn apply(&self, form: &mut BackstoryForm) {
        let text_fields = [
            (&self.name, &mut form.name),
            (&self.age, &mut form.age),
            (&self.gender, &mut form.gender),
            (&self.origin, &mut form.origin),
            (&self.homeland, &mut form.homeland),
            (&self.class, &mut form.class),
            (&self.tone, &mut form.tone),
            (&self.custom_genre, &mut form.custom_genre),
            (&self.world_context, &mut form.world_context),
        ];
        for (value, slot) in text_fields {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        if let Some(genre) = self.genre {
            form.genre = genre;
        }
    }
}

/// Terminal output that logs the first failed write and drops the rest.
struct Output<W> {
    inner: W,
    broken: bool,
}

impl<W: Write> Output<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            broken: false,
        }
    }

    fn print(&mut self, args: fmt::Arguments<'_>) {
        let result = self
            .inner
            .write_fmt(args)
            .and_then(|()| self.inner.flush());
        if let Err(err) = result {
            if !self.broken {
                warn!(error = %err, "cannot write to the terminal, further output is dropped");
            }
            self.broken = true;
        }
    }
}

/// Line-oriented prompts on a reader/writer pair.
///
/// Protocol:
/// - Each field is shown with its current value; an empty line keeps it
/// - `#cancel` (or end of input) dismisses the form
pub struct InteractiveFrontend<R, W> {
    input: R,
    output: Output<W>,
    overrides: FormOverrides,
    save: bool,
}

enum Answer {
    Keep,
    Value(String),
    Cancel,
}

impl<R: BufRead, W: Write> InteractiveFrontend<R, W> {
    pub fn new(input: R, output: W, overrides: FormOverrides, save: bool) -> Self {
        Self {
            input,
            output: Output::new(output),
            overrides,
            save,
        }
    }

    fn ask(&mut self, label: &str, current: &str) -> Answer {
        self.output.print(format_args!("{label} [{current}]: "));

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => Answer::Cancel,
            Ok(_) => match line.trim() {
                "#cancel" => Answer::Cancel,
                "" => Answer::Keep,
                value => Answer::Value(value.to_string()),
            },
        }
    }

    fn edit_text(&mut self, label: &str, slot: &mut String) -> Option<()> {
        let current = slot.clone();
        match self.ask(label, &current) {
            Answer::Cancel => None,
            Answer::Keep => Some(()),
            Answer::Value(value) => {
                *slot = value;
                Some(())
            }
        }
    }

    fn edit_genre(&mut self, form: &mut BackstoryForm) -> Option<()> {
        self.output.print(format_args!("Genres:\n"));
        for genre in GenrePreset::all() {
            self.output
                .print(format_args!("  {} ({})\n", genre.key(), genre.label()));
        }
        loop {
            match self.ask("Genre", form.genre.key()) {
                Answer::Cancel => return None,
                Answer::Keep => break,
                Answer::Value(value) => match value.parse() {
                    Ok(genre) => {
                        form.genre = genre;
                        break;
                    }
                    Err(e) => self.output.print(format_args!("[ERROR] {e}\n")),
                },
            }
        }
        if form.genre_is_custom() {
            self.edit_text("Custom genre", &mut form.custom_genre)?;
        }
        Some(())
    }

    fn edit_form(&mut self, form: &mut BackstoryForm) -> Option<()> {
        self.output
            .print(format_args!("=== Character Backstory Generator ===\n"));
        if !form.biography.trim().is_empty() {
            self.output.print(format_args!(
                "Current biography:\n{}\n\n",
                html_to_text(&form.biography)
            ));
        }

        self.edit_genre(form)?;
        self.edit_text("Name", &mut form.name)?;
        self.edit_text("Age", &mut form.age)?;
        self.edit_text("Sex/Gender", &mut form.gender)?;
        self.edit_text("Race/Ancestry", &mut form.origin)?;
        self.edit_text("Homeland", &mut form.homeland)?;
        self.edit_text("Class", &mut form.class)?;
        self.edit_text("Personality tone or theme", &mut form.tone)?;
        self.edit_text("World context", &mut form.world_context)?;

        let default = if form.save_to_bio { "y" } else { "n" };
        match self.ask("Save to biography? (y/n)", default) {
            Answer::Cancel => return None,
            Answer::Keep => {}
            Answer::Value(value) => {
                form.save_to_bio = matches!(value.to_lowercase().as_str(), "y" | "yes")
            }
        }

        self.output.print(format_args!("Generating backstory...\n"));
        Some(())
    }
}

impl<R: BufRead, W: Write> Frontend for InteractiveFrontend<R, W> {
    fn fill_form(&mut self, mut form: BackstoryForm) -> Option<BackstoryForm> {
        self.overrides.apply(&mut form);
        form.save_to_bio = self.save;
        self.edit_form(&mut form)?;
        Some(form)
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        let tag = level.as_str().to_uppercase();
        self.output.print(format_args!("[{tag}] {message}\n"));
    }

    fn show_backstory(&mut self, title: &str, html: &str) {
        self.output
            .print(format_args!("\n=== {title} ===\n{}\n\n", html_to_text(html)));
    }

    fn show_message(&mut self, html: &str) {
        self.output
            .print(format_args!("{}\n\n", html_to_text(html)));
    }
}

/// Non-interactive adapter emitting one JSON object per line.
pub struct BatchFrontend<W> {
    output: Output<W>,
    overrides: FormOverrides,
    save: bool,
}

impl<W: Write> BatchFrontend<W> {
    pub fn new(output: W, overrides: FormOverrides, save: bool) -> Self {
        Self {
            output: Output::new(output),
            overrides,
            save,
        }
    }

    fn emit(&mut self, event: serde_json::Value) {
        self.output.print(format_args!("{event}\n"));
    }
}

impl<W: Write> Frontend for BatchFrontend<W> {
    fn fill_form(&mut self, mut form: BackstoryForm) -> Option<BackstoryForm> {
        self.overrides.apply(&mut form);
        form.save_to_bio = self.save;
        Some(form)
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.emit(json!({"event": "notice", "level": level.as_str(), "message": message}));
    }

    fn show_backstory(&mut self, title: &str, html: &str) {
        self.emit(json!({
            "event": "backstory",
            "title": title,
            "html": html,
            "text": html_to_text(html),
        }));
    }

    fn show_message(&mut self, html: &str) {
        self.emit(json!({"event": "message", "text": html_to_text(html)}));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backstory_core::Settings;
    use std::io::{self, Cursor};

    fn blank() -> BackstoryForm {
        BackstoryForm::blank(&Settings::default())
    }

    #[test]
    fn test_overrides_apply_only_given_fields() {
        let mut form = blank();
        form.age = "34".to_string();
        let overrides = FormOverrides {
            name: Some("Kael".to_string()),
            genre: Some(GenrePreset::HighFantasy),
            ..FormOverrides::default()
        };
        overrides.apply(&mut form);

        assert_eq!(form.name, "Kael");
        assert_eq!(form.age, "34");
        assert_eq!(form.genre, GenrePreset::HighFantasy);
    }

    #[test]
    fn test_interactive_keeps_defaults_and_takes_answers() {
        // genre, name, age, gender, origin, homeland, class, tone, world, save
        let input = "grimdark\n\n40\n\n\n\n\nbitter\n\ny\n";
        let mut output = Vec::new();
        let overrides = FormOverrides {
            name: Some("Kael".to_string()),
            ..FormOverrides::default()
        };
        let mut frontend =
            InteractiveFrontend::new(Cursor::new(input), &mut output, overrides, false);

        let form = frontend.fill_form(blank()).unwrap();

        assert_eq!(form.genre, GenrePreset::Grimdark);
        assert_eq!(form.name, "Kael");
        assert_eq!(form.age, "40");
        assert_eq!(form.tone, "bitter");
        assert!(form.save_to_bio);
    }

    #[test]
    fn test_interactive_retries_bad_genre_then_custom() {
        let input = "space opera\ncustom\ndieselpunk\n\n\n\n\n\n\n\n\n\n";
        let mut output = Vec::new();
        let mut frontend = InteractiveFrontend::new(
            Cursor::new(input),
            &mut output,
            FormOverrides::default(),
            true,
        );

        let form = frontend.fill_form(blank()).unwrap();
        drop(frontend);

        assert_eq!(form.genre, GenrePreset::Custom);
        assert_eq!(form.custom_genre, "dieselpunk");
        assert!(form.save_to_bio);
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("  high_fantasy (High Fantasy)\n"));
        assert!(printed.contains("[ERROR] Unknown genre preset: space opera"));
    }

    #[test]
    fn test_interactive_cancel() {
        let mut output = Vec::new();
        let mut frontend = InteractiveFrontend::new(
            Cursor::new("\n#cancel\n"),
            &mut output,
            FormOverrides::default(),
            false,
        );
        assert!(frontend.fill_form(blank()).is_none());
    }

    #[test]
    fn test_interactive_end_of_input_cancels() {
        let mut output = Vec::new();
        let mut frontend =
            InteractiveFrontend::new(Cursor::new(""), &mut output, FormOverrides::default(), false);
        assert!(frontend.fill_form(blank()).is_none());
    }

    struct BrokenPipe {
        attempts: usize,
    }

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_survives_broken_pipe() {
        let mut output = Output::new(BrokenPipe { attempts: 0 });
        output.print(format_args!("one\n"));
        assert!(output.broken);
        output.print(format_args!("two\n"));
        assert!(output.broken);
        assert_eq!(output.inner.attempts, 2);
    }

    #[test]
    fn test_batch_on_broken_pipe_still_submits() {
        let mut frontend =
            BatchFrontend::new(BrokenPipe { attempts: 0 }, FormOverrides::default(), true);
        frontend.notify(NoticeLevel::Info, "hello");
        frontend.show_message("<p>Welcome</p>");
        assert!(frontend.output.broken);
        assert!(frontend.fill_form(blank()).unwrap().save_to_bio);
    }

    #[test]
    fn test_batch_emits_json_lines() {
        let mut output = Vec::new();
        {
            let mut frontend = BatchFrontend::new(&mut output, FormOverrides::default(), true);
            let form = frontend.fill_form(blank()).unwrap();
            assert!(form.save_to_bio);
            frontend.notify(NoticeLevel::Error, "OpenAI API Error: bad key");
            frontend.show_backstory("Character Backstory", "<h3>Hi</h3><p>There</p>");
        }

        let printed = String::from_utf8(output).unwrap();
        let events: Vec<serde_json::Value> = printed
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events[0]["level"], "error");
        assert_eq!(events[0]["message"], "OpenAI API Error: bad key");
        assert_eq!(events[1]["event"], "backstory");
        assert_eq!(events[1]["text"], "Hi\n\nThere");
    }
}
