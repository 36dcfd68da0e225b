//! Prompt construction for backstory generation.

use crate::traits::CharacterTraits;

const PREAMBLE: &str = "You are a creative writing assistant for tabletop RPG players.\n\
Generate a vivid, short character backstory (2-4 paragraphs) based on the following:";

const CLOSING: &str =
    "Avoid generic tropes, use a story-like tone, and return only the backstory text.";

/// Build the prompt for one request.
///
/// Layout: preamble, an optional `World Context:` block, one bullet per
/// non-empty trait in a fixed order, then the closing instruction. Empty
/// traits are left out rather than shown blank. The output depends only on
/// `traits`.
pub fn build_prompt(traits: &CharacterTraits) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push_str("\n\n");

    let world_context = traits.world_context.trim();
    if !world_context.is_empty() {
        prompt.push_str("World Context:\n");
        prompt.push_str(world_context);
        prompt.push_str("\n\n");
    }

    for (label, value) in bullets(traits) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        prompt.push_str(&format!("- {label}: {value}\n"));
    }

    prompt.push('\n');
    prompt.push_str(CLOSING);
    prompt
}

fn bullets(traits: &CharacterTraits) -> [(&'static str, &str); 8] {
    [
        ("Genre", traits.genre.as_str()),
        ("Name", traits.name.as_str()),
        ("Sex", traits.gender.as_str()),
        ("Age", traits.age.as_str()),
        ("Ancestry", traits.origin.as_str()),
        ("Homeland", traits.homeland.as_str()),
        ("Class", traits.class.as_str()),
        ("Personality Tone or Theme", traits.tone.as_str()),
    ]
}
