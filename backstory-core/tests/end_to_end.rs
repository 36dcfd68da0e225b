//! Scenario tests: actor file in, prompt and biography out.

use backstory_core::path;
use backstory_core::service::USED_FLAG;
use backstory_core::settings::NAMESPACE;
use backstory_core::{
    build_prompt, Actor, BackstoryService, CharacterTraits, GenrePreset, LogicalField, Outcome,
    RecordingFrontend, ScriptedGenerator, Settings,
};
use serde_json::{json, Value};
use std::sync::Arc;

#[test]
fn test_kael_prompt() {
    let traits = CharacterTraits {
        name: "Kael".to_string(),
        age: "34".to_string(),
        gender: "male".to_string(),
        origin: "human".to_string(),
        homeland: String::new(),
        class: "ranger".to_string(),
        tone: "stoic".to_string(),
        genre: "high_fantasy".to_string(),
        world_context: String::new(),
    };

    let prompt = build_prompt(&traits);

    assert!(!prompt.contains("World Context"));
    assert!(prompt.contains("- Genre: high_fantasy\n"));
    assert!(prompt.contains("- Name: Kael\n"));
    assert!(prompt.contains("- Sex: male\n"));
    assert!(prompt.contains("- Age: 34\n"));
    assert!(prompt.contains("- Ancestry: human\n"));
    assert!(prompt.contains("- Class: ranger\n"));
    assert!(prompt.contains("- Personality Tone or Theme: stoic\n"));
    assert_eq!(prompt, build_prompt(&traits.clone()));
}

#[test]
fn test_set_then_get_returns_value() {
    let documents = [
        json!({}),
        json!({"system": {"details": {}}}),
        json!({"system": null, "name": "Kael"}),
        json!({"flags": {"other": {"x": 1}}}),
    ];
    let paths = [
        "name",
        "system.biography",
        "system.details.age",
        "flags.backstory-generator.generatorUsed",
    ];
    let values = [json!("text"), json!(34), json!(true), json!(2.5)];

    for doc in &documents {
        for p in paths {
            for v in &values {
                let mut doc = doc.clone();
                path::set(&mut doc, p, v.clone()).unwrap();
                assert_eq!(path::get(&doc, p), Some(v), "{p} in {doc}");
            }
        }
    }
}

#[test]
fn test_missing_intermediate_is_always_empty() {
    let documents = [
        json!({}),
        json!({"system": 5}),
        json!({"system": "text"}),
        json!({"system": [1, 2, 3]}),
        json!({"system": {"details": null}}),
        Value::Null,
        json!(true),
    ];
    for doc in &documents {
        assert_eq!(path::get(doc, "system.details.age"), None, "{doc}");
        assert_eq!(path::get_text(doc, "system.details.age"), "");
    }
}

#[tokio::test]
async fn test_actor_file_round_trip_with_mapped_paths() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("kael.json");
    tokio::fs::write(
        &file,
        json!({
            "name": "Kael",
            "type": "character",
            "system": {
                "details": {"age": 34, "gender": "male", "ancestry": "human", "class": "ranger"},
                "bio": {"public": ""}
            }
        })
        .to_string(),
    )
    .await
    .unwrap();

    let mut settings = Settings::default();
    settings.genre_preset = GenrePreset::HighFantasy;
    settings.world_context = "The Thornwood is older than the kingdoms.".to_string();
    settings.paths.set_path(LogicalField::Origin, "system.details.ancestry");
    settings.paths.set_path(LogicalField::Biography, "system.bio.public");

    let generator = Arc::new(ScriptedGenerator::text("Kael grew up among the pines.\n\nHe left."));
    let service = BackstoryService::new(settings, generator.clone());

    let mut actor = Actor::load_json(&file).await.unwrap();
    let mut frontend = RecordingFrontend::submitting(|mut form| {
        form.tone = "stoic".to_string();
        form.save_to_bio = true;
        form
    });

    let outcome = service.run(&mut frontend, Some(&mut actor)).await;
    assert!(matches!(outcome, Outcome::Completed(ref c) if c.saved));
    actor.save_json(&file).await.unwrap();

    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("World Context:\nThe Thornwood is older than the kingdoms.\n\n"));
    assert!(prompt.contains("- Genre: high_fantasy\n"));
    assert!(prompt.contains("- Ancestry: human\n"));
    assert!(!prompt.contains("- Homeland"));

    let reloaded = Actor::load_json(&file).await.unwrap();
    let bio = reloaded.text_at("system.bio.public");
    assert!(bio.starts_with("<hr><p><em>Generated on "));
    assert!(bio.ends_with("<p>Kael grew up among the pines.</p><p>He left.</p>"));
    assert_eq!(reloaded.flag(NAMESPACE, USED_FLAG), Some(&json!(true)));
    assert_eq!(frontend.forms[0].origin, "human");
}

#[tokio::test]
async fn test_no_save_requested_never_updates_biography() {
    for result in [Ok("A story.".to_string()), Err(backstory_core::GenerationError::EmptyCompletion)] {
        let service = BackstoryService::new(
            Settings::default(),
            Arc::new(ScriptedGenerator::new(vec![result])),
        );
        let mut actor = Actor::new(json!({
            "name": "Mira",
            "type": "character",
            "system": {"biography": "<p>Original</p>"}
        }))
        .unwrap();
        let mut frontend = RecordingFrontend::submitting(|form| form);

        service.run(&mut frontend, Some(&mut actor)).await;

        assert_eq!(actor.text_at("system.biography"), "<p>Original</p>");
    }
}
