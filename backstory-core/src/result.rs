//! Turning generated text into something to show and, optionally, to keep.

use chrono::NaiveDate;

/// Heading placed above every generated backstory.
pub const RESULT_HEADING: &str = "The Story So Far...";

/// What a successful generation produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedResult {
    /// HTML fragment for the result dialog.
    pub display: String,
    /// New full biography value, present only when saving was requested.
    pub biography: Option<String>,
}

/// Format raw model text as an HTML fragment.
///
/// Blank lines separate paragraphs; single newlines become `<br/>`.
/// Markup characters in the text are escaped.
pub fn format_backstory(text: &str) -> String {
    let blocks: Vec<String> = paragraphs(text)
        .iter()
        .map(|p| format!("<p>{}</p>", escape_html(p).replace('\n', "<br/>")))
        .collect();

    let body = if blocks.is_empty() {
        "<p></p>".to_string()
    } else {
        blocks.concat()
    };
    format!("<h3>{RESULT_HEADING}</h3>{body}")
}

/// Separator appended to the biography before each saved backstory.
pub fn biography_separator(date: NaiveDate) -> String {
    format!(
        "<hr><p><em>Generated on {}</em></p>",
        date.format("%-m/%-d/%Y")
    )
}

/// Build the display fragment and, if requested, the updated biography.
///
/// `current_biography` is the value already stored on the actor; the new
/// backstory is appended after a dated separator, never replacing it.
pub fn apply_result(
    text: &str,
    current_biography: &str,
    save_requested: bool,
    date: NaiveDate,
) -> AppliedResult {
    let display = format_backstory(text);
    let biography = save_requested
        .then(|| format!("{current_biography}{}{display}", biography_separator(date)));
    AppliedResult { display, biography }
}

/// Group consecutive non-blank lines into paragraphs.
fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn test_format_single_paragraph() {
        assert_eq!(
            format_backstory("Once upon a time..."),
            "<h3>The Story So Far...</h3><p>Once upon a time...</p>"
        );
    }

    #[test]
    fn test_format_paragraphs_and_line_breaks() {
        let text = "First line\nsecond line\n\n\nNew paragraph.\n";
        assert_eq!(
            format_backstory(text),
            "<h3>The Story So Far...</h3><p>First line<br/>second line</p><p>New paragraph.</p>"
        );
    }

    #[test]
    fn test_format_crlf_and_whitespace_blank_lines() {
        let text = "One.\r\n  \r\nTwo.";
        assert_eq!(
            format_backstory(text),
            "<h3>The Story So Far...</h3><p>One.</p><p>Two.</p>"
        );
    }

    #[test]
    fn test_format_escapes_markup() {
        let html = format_backstory("Fear the <Lich> & his kin");
        assert!(html.contains("Fear the &lt;Lich&gt; &amp; his kin"));
    }

    #[test]
    fn test_separator() {
        assert_eq!(
            biography_separator(date()),
            "<hr><p><em>Generated on 3/7/2026</em></p>"
        );
    }

    #[test]
    fn test_apply_without_save() {
        let result = apply_result("A tale.", "<p>Old bio</p>", false, date());
        assert_eq!(result.display, format_backstory("A tale."));
        assert!(result.biography.is_none());
    }

    #[test]
    fn test_apply_with_save_appends() {
        let result = apply_result("A tale.", "<p>Old bio</p>", true, date());
        assert_eq!(
            result.biography.as_deref(),
            Some(
                "<p>Old bio</p><hr><p><em>Generated on 3/7/2026</em></p>\
                 <h3>The Story So Far...</h3><p>A tale.</p>"
            )
        );
    }

    #[test]
    fn test_apply_with_save_on_empty_biography() {
        let result = apply_result("A tale.", "", true, date());
        let bio = result.biography.unwrap();
        assert!(bio.starts_with("<hr>"));
        assert!(bio.ends_with(&result.display));
    }
}
