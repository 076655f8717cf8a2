//! End-to-end flows over real directories: extraction, activation,
//! request injection, restart and refresh.

use std::fs;
use std::path::Path;

use promptdeck_orchestrator::{Orchestrator, OutboundRequest};
use tempfile::tempdir;

fn write_export(dir: &Path, name: &str, value: serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string(&value).unwrap()).unwrap();
}

fn seed_sources(dir: &Path) {
    write_export(
        dir,
        "novel.json",
        serde_json::json!({
            "prompts": [
                {"identifier": "style", "name": "Style", "content": "style text"},
                {"identifier": "world", "name": "World", "content": "world text"},
                {"identifier": "tone", "name": "Tone", "content": "tone text"},
                {"identifier": "personaDescription", "name": "Persona", "content": "persona text"},
            ],
            "prompt_order": [
                {"character_id": 1, "order": [
                    {"identifier": "tone", "enabled": false},
                    {"identifier": "personaDescription", "enabled": true},
                    {"identifier": "world", "enabled": true},
                    {"identifier": "style", "enabled": true},
                ]},
            ],
        }),
    );
}

#[test]
fn extract_load_activate_inject() {
    let sources = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed_sources(sources.path());

    let mut orchestrator = Orchestrator::with_dirs(sources.path(), output.path()).unwrap();

    // "tone" is ordered before the boundary, so it merges into the prefix
    // even though its enabled flag is false.
    assert_eq!(orchestrator.current_preset(), Some("novel"));
    assert_eq!(
        orchestrator.prefix(),
        "<!-- Tone (identifier: tone) -->\ntone text"
    );

    // Body is the boundary fragment and everything after, sorted by name.
    let names: Vec<String> = orchestrator
        .list_fragments()
        .iter()
        .map(|e| e.fragment.name.clone())
        .collect();
    assert_eq!(names, vec!["Persona", "Style", "World"]);

    orchestrator.activate_fragment(2).unwrap();
    orchestrator.activate_fragment(1).unwrap();

    let mut request = OutboundRequest::new("base system", "tell me a story");
    orchestrator.apply_to_request(&mut request);

    assert_eq!(
        request.system_instruction,
        "<!-- Tone (identifier: tone) -->\ntone text\n\nbase system"
    );
    assert_eq!(
        request.user_content,
        "world text\n\nstyle text\n\ntell me a story"
    );
}

#[test]
fn activation_survives_restart() {
    let sources = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed_sources(sources.path());

    {
        let mut orchestrator =
            Orchestrator::with_dirs(sources.path(), output.path()).unwrap();
        orchestrator.activate_fragment(0).unwrap();
        orchestrator.activate_fragment(1).unwrap();
    }

    // A new process over the same directories re-associates by name.
    let orchestrator = Orchestrator::with_dirs(sources.path(), output.path()).unwrap();

    let active: Vec<String> = orchestrator
        .active_fragments()
        .iter()
        .map(|f| f.name.clone())
        .collect();
    assert_eq!(active, vec!["Persona", "Style"]);
}

#[test]
fn reextraction_reproduces_the_tree() {
    let sources = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed_sources(sources.path());

    let mut orchestrator = Orchestrator::with_dirs(sources.path(), output.path()).unwrap();
    let names_before: Vec<String> = orchestrator
        .list_fragments()
        .iter()
        .map(|e| e.fragment.name.clone())
        .collect();
    let prefix_before = orchestrator.prefix().to_string();

    orchestrator.refresh().unwrap();

    let names_after: Vec<String> = orchestrator
        .list_fragments()
        .iter()
        .map(|e| e.fragment.name.clone())
        .collect();
    assert_eq!(names_after, names_before);
    assert_eq!(orchestrator.prefix(), prefix_before);
}

#[test]
fn user_fragments_and_groups_survive_refresh() {
    let sources = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed_sources(sources.path());

    let mut orchestrator = Orchestrator::with_dirs(sources.path(), output.path()).unwrap();
    orchestrator.add_fragment("My Notes", "remember this").unwrap();
    orchestrator.create_group("favorites", &[0, 3]).unwrap();

    orchestrator.refresh().unwrap();

    // The user record is re-loaded from the tree (sorted into place) and
    // the group document beside the sources was untouched.
    let names: Vec<String> = orchestrator
        .list_fragments()
        .iter()
        .map(|e| e.fragment.name.clone())
        .collect();
    assert_eq!(names, vec!["My Notes", "Persona", "Style", "World"]);
    assert_eq!(
        orchestrator.groups().get("favorites"),
        Some(&vec![0usize, 3])
    );
}

#[test]
fn preset_creation_and_authoring_flow() {
    let sources = tempdir().unwrap();
    let output = tempdir().unwrap();
    seed_sources(sources.path());

    let mut orchestrator = Orchestrator::with_dirs(sources.path(), output.path()).unwrap();
    orchestrator.create_preset("scratch").unwrap();

    let token = orchestrator.begin_add_fragment("Opening").unwrap();
    orchestrator
        .complete_add_fragment(&token, "opening line")
        .unwrap();

    orchestrator.activate_fragment(0).unwrap();

    let mut request = OutboundRequest::new("", "go");
    orchestrator.apply_to_request(&mut request);

    // The scratch preset has no prefix; only the fragment is injected.
    assert_eq!(request.system_instruction, "");
    assert_eq!(request.user_content, "opening line\n\ngo");
}
