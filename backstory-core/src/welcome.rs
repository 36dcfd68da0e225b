//! Quick-start guide shown when the generator starts up.

/// Build the welcome message. GMs also get the configuration notes.
pub fn welcome_message(is_gm: bool) -> String {
    let mut content = String::from("<h2>Character Backstory Generator</h2>");

    if is_gm {
        content.push_str(
            "<p><strong>Configuration:</strong><br>\
             In the settings file, you can:\
             <ul>\
             <li>Set your OpenAI API key.</li>\
             <li>Choose which model to use (e.g., <code>gpt-3.5-turbo</code>, <code>gpt-4o-mini</code>).</li>\
             <li>Update the data paths to character info fields.</li>\
             <li>Pick a default genre preset and world lore.</li>\
             </ul></p>",
        );
    }

    content.push_str(
        "<p><strong>Usage:</strong><br>\
         <ul>\
         <li>Pick a character (Actor) document.</li>\
         <li>Verify or fill in basic details (age, gender, ancestry, class, tone).</li>\
         <li>Generate the backstory.</li>\
         </ul></p>\
         <p>The result is a vivid, multi-paragraph character history, rooted in your world, written in your tone.</p>",
    );
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gm_sees_configuration() {
        let gm = welcome_message(true);
        assert!(gm.contains("Configuration:"));
        assert!(gm.contains("Usage:"));
    }

    #[test]
    fn test_player_sees_usage_only() {
        let player = welcome_message(false);
        assert!(!player.contains("Configuration:"));
        assert!(player.contains("Usage:"));
        assert!(player.starts_with("<h2>Character Backstory Generator</h2>"));
    }
}
