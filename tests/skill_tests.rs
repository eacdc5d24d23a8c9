//! Tests for passive skills.
//!
//! These tests verify:
//! - Skill records load from authored JSON
//! - Broken skills and bonuses are skipped, not fatal
//! - The library synchronizes over the byte stream
//! - Connectivity of a loaded tree

use serde_json::{json, Value};
use skilltree::bonus::CombatBonus;
use skilltree::graph::{Connection, SkillGraph};
use skilltree::skill::{read_skills, write_skills, SkillLibrary};
use skilltree::wire::{WireReader, WireWriter};
use skilltree::*;
use std::collections::HashSet;

fn registries() -> Registries {
    Registries::builtin().unwrap()
}

fn id(s: &str) -> ResourceId {
    ResourceId::parse(s).unwrap()
}

fn skill_record(path: &str, starting_point: bool, connections: &[&str]) -> Value {
    json!({
        "id": format!("skilltree:{path}"),
        "button_size": 16,
        "background_texture": "skilltree:textures/icons/background/lesser.png",
        "icon_texture": "skilltree:textures/icons/void.png",
        "border_texture": "skilltree:textures/tooltip/lesser.png",
        "starting_point": starting_point,
        "x": 0.0,
        "y": 0.0,
        "connections": connections
            .iter()
            .map(|c| format!("skilltree:{c}"))
            .collect::<Vec<_>>(),
    })
}

fn load_library(records: &[(&str, Value)]) -> SkillLibrary {
    let mut library = SkillLibrary::new();
    library.load_skills(
        records.iter().map(|(source, record)| (*source, record)),
        &registries(),
    );
    library
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_bonuses_merge_while_loading() {
    let mut record = skill_record("hunter_1", true, &[]);
    record["bonuses"] = json!([
        { "type": "skilltree:damage", "amount": 0.1, "operation": "multiply_base" },
        { "type": "mod:removed_bonus", "amount": 1.0 },
        { "type": "skilltree:damage", "amount": 0.2, "operation": "multiply_base" }
    ]);
    let library = load_library(&[("hunter_1.json", record)]);

    let skill = library.skill(&id("skilltree:hunter_1")).unwrap();
    assert_eq!(skill.bonuses.len(), 1);
    let SkillBonus::Damage(bonus) = &skill.bonuses[0] else {
        panic!("expected a damage bonus, got {:?}", skill.bonuses[0]);
    };
    assert!((bonus.amount - 0.3).abs() < 1e-6);
    assert_eq!(bonus.operation, Operation::MultiplyBase);
}

#[test]
fn test_broken_skill_skipped() {
    let mut missing_texture = skill_record("broken", false, &[]);
    missing_texture
        .as_object_mut()
        .unwrap()
        .remove("icon_texture");
    let library = load_library(&[
        ("a.json", skill_record("a", true, &[])),
        ("broken.json", missing_texture),
        ("not_an_object.json", json!([1, 2, 3])),
    ]);
    assert_eq!(library.len(), 1);
    assert!(library.skill(&id("skilltree:broken")).is_none());
}

#[test]
fn test_later_duplicate_replaces_earlier() {
    let mut second = skill_record("a", true, &[]);
    second["button_size"] = json!(24);
    let library = load_library(&[
        ("first.json", skill_record("a", true, &[])),
        ("second.json", second),
    ]);
    assert_eq!(library.len(), 1);
    assert_eq!(library.skill(&id("skilltree:a")).unwrap().button_size, 24);
}

#[test]
fn test_tree_skills_in_tree_order() {
    let mut library = load_library(&[
        ("a.json", skill_record("a", true, &["b"])),
        ("b.json", skill_record("b", false, &[])),
    ]);
    let tree = json!({
        "id": "skilltree:main_tree",
        "skill_ids": ["skilltree:b", "skilltree:missing", "skilltree:a"]
    });
    library.load_trees([("main_tree.json", &tree)]);

    let tree = library.tree(&id("skilltree:main_tree")).unwrap();
    let ids: Vec<&ResourceId> = library.tree_skills(tree).map(|s| &s.id).collect();
    assert_eq!(ids, vec![&id("skilltree:b"), &id("skilltree:a")]);
}

// ============================================================================
// Synchronization
// ============================================================================

#[test]
fn test_library_stream_sync() {
    let registries = registries();
    let mut record = skill_record("a", true, &["b"]);
    record["connected_tree"] = json!("skilltree:side_tree");
    record["gateway_connections"] = json!(["skilltree:b"]);
    record["bonuses"] = json!([
        { "type": "skilltree:crit_chance", "amount": 0.05, "operation": "addition" }
    ]);
    let mut server = load_library(&[
        ("a.json", record),
        ("b.json", skill_record("b", false, &[])),
    ]);
    let tree = json!({ "id": "skilltree:main_tree", "skill_ids": ["skilltree:a", "skilltree:b"] });
    server.load_trees([("main_tree.json", &tree)]);

    let mut writer = WireWriter::new();
    server.write(&mut writer, &registries).unwrap();
    let mut reader = WireReader::new(writer.freeze());
    let client = SkillLibrary::read(&mut reader, &registries).unwrap();
    assert_eq!(reader.remaining(), 0);

    assert_eq!(client.len(), 2);
    assert_eq!(
        client.skills().collect::<Vec<_>>(),
        server.skills().collect::<Vec<_>>()
    );
    assert_eq!(
        client.trees().collect::<Vec<_>>(),
        server.trees().collect::<Vec<_>>()
    );
}

#[test]
fn test_truncated_stream_fails() {
    let registries = registries();
    let mut skill = PassiveSkill::new(
        id("skilltree:a"),
        16,
        id("skilltree:textures/a.png"),
        id("skilltree:textures/b.png"),
        id("skilltree:textures/c.png"),
        true,
    );
    skill.add_bonus(SkillBonus::Damage(CombatBonus::new(1.0, Operation::Add)));

    let mut writer = WireWriter::new();
    write_skills(&mut writer, &registries, [&skill]).unwrap();
    let bytes = writer.freeze();

    let mut reader = WireReader::from_slice(&bytes[..bytes.len() - 2]);
    assert!(matches!(
        read_skills(&mut reader, &registries),
        Err(CodecError::UnexpectedEof { .. })
    ));
}

// ============================================================================
// Connectivity
// ============================================================================

#[test]
fn test_graph_from_loaded_library() {
    let mut gateway = skill_record("gateway", false, &["a"]);
    gateway["gateway_connections"] = json!(["skilltree:far_gateway"]);
    let library = load_library(&[
        ("a.json", skill_record("a", true, &["b"])),
        ("b.json", skill_record("b", false, &["ghost"])),
        ("gateway.json", gateway),
        ("far_gateway.json", skill_record("far_gateway", false, &[])),
        ("island.json", skill_record("island", false, &[])),
    ]);
    let graph = SkillGraph::from_skills(library.skills());

    assert_eq!(graph.len(), 5);
    assert_eq!(
        graph.dangling_connections(),
        &[(id("skilltree:b"), id("skilltree:ghost"))]
    );
    assert_eq!(
        graph.connection(&id("skilltree:far_gateway"), &id("skilltree:gateway")),
        Some(Connection::Gateway)
    );
    assert_eq!(graph.unreachable(), vec![id("skilltree:island")]);

    let learned: HashSet<ResourceId> = [id("skilltree:a")].into_iter().collect();
    assert_eq!(
        graph.learnable(&learned),
        vec![id("skilltree:b"), id("skilltree:gateway")]
    );
}
