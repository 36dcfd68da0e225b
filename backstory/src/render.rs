//! Plain-text rendering of the small HTML fragments the generator produces.

/// Render an HTML fragment as terminal text.
///
/// Only the handful of tags the generator emits get special treatment;
/// any other tag is dropped.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }
        let tag: String = chars.by_ref().take_while(|&c| c != '>').collect();
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let closing = tag.starts_with('/');

        match (name.as_str(), closing) {
            ("br", _) => out.push('\n'),
            ("hr", _) => out.push_str("\n----\n"),
            ("p" | "h2" | "h3" | "ul", true) => out.push_str("\n\n"),
            ("li", false) => out.push_str("- "),
            ("li", true) => out.push('\n'),
            _ => {}
        }
    }

    let text = out
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    collapse_blank_lines(text.trim())
}

fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && lines.last().is_some_and(|l| l.trim().is_empty()) {
            continue;
        }
        lines.push(if blank { "" } else { line });
    }
    lines.join("\n")
}
