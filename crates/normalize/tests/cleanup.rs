use catalog_normalize::{run_cleanup, Category, CleanupOptions, CleanupReport};
use catalog_rules::RuleBook;
use catalog_store::{CatalogStore, Document, Level, MemoryStore, NodePath, VARIANT_DOCUMENT};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json(root: &Path, rel: &str, file: &str, value: Value) {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    let text = serde_json::to_string_pretty(&value).unwrap() + "\n";
    fs::write(dir.join(file), text).unwrap();
}

fn filament(root: &Path, rel: &str, name: &str) {
    let id = rel.rsplit('/').next().unwrap();
    write_json(root, rel, "filament.json", json!({"id": id, "name": name, "density": 1.24}));
}

/// Variant documents carry their original path as `sku` so they can be
/// traced after moves.
fn variant(root: &Path, rel: &str, name: &str) {
    let id = rel.rsplit('/').next().unwrap();
    write_json(root, rel, VARIANT_DOCUMENT, json!({"id": id, "name": name, "sku": rel}));
}

fn read(root: &Path, rel: &str, file: &str) -> Value {
    let text = fs::read_to_string(root.join(rel).join(file)).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn children(root: &Path, rel: &str) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root.join(rel))
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn run(root: &Path, apply: bool) -> CleanupReport {
    let rules = RuleBook::builtin().unwrap();
    let options = CleanupOptions {
        apply,
        ..CleanupOptions::default()
    };
    run_cleanup(root, &rules, &options).unwrap()
}

fn snapshot(root: &Path) -> MemoryStore {
    let (store, unreadable) = MemoryStore::snapshot(root).unwrap();
    assert!(unreadable.is_empty());
    store
}

fn variant_docs(root: &Path) -> Vec<(NodePath, Document)> {
    let store = snapshot(root);
    store
        .nodes()
        .filter(|node| node.level() == Level::Variant)
        .filter_map(|node| {
            store
                .read_document(node, VARIANT_DOCUMENT)
                .unwrap()
                .map(|doc| (node.clone(), doc))
        })
        .collect()
}

/// A catalog with at least one instance of every auto-fixable category.
fn mixed_catalog() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    filament(root, "acme/PLA/pla", "PLA");
    variant(root, "acme/PLA/pla/red", "PLA  Red ()");
    variant(root, "acme/PLA/pla/7016", "7016");
    write_json(
        root,
        "acme/PLA/silk_pla_red",
        "filament.json",
        json!({"id": "silk_pla_red", "name": "Silk PLA Red", "color_hex": "#FF0000"}),
    );
    write_json(root, "acme/PLA/silk_pla_red", "sizes.json", json!({"sizes": [1000]}));
    write_json(
        root,
        "acme/TPU/blue",
        "filament.json",
        json!({"id": "blue", "name": "Blue", "color_hex": "#0000FF"}),
    );
    variant(root, "acme/TPU/blue/flexible_tpu", "Flexible TPU");
    filament(root, "acme/TPU/tpu", "TPU");
    variant(root, "acme/TPU/tpu/a95_black", "A95 Black");
    variant(root, "acme/TPU/tpu/a95_white", "A95 White");
    variant(root, "acme/TPU/tpu/a95_red", "A95 Red");

    filament(root, "matter3d_inc/PLA/pla", "PLA");
    variant(root, "matter3d_inc/PLA/pla/hf_red", "HF Red");
    variant(root, "matter3d_inc/PLA/pla/blue", "Blue");

    filament(root, "sakata_3d/PLA/pla", "PLA");
    variant(root, "sakata_3d/PLA/pla/850_black", "850 Black");
    variant(root, "sakata_3d/PLA/pla/850_white", "850 White");
    variant(root, "sakata_3d/PLA/pla/red", "Red");
    dir
}

#[test]
fn color_split_moves_color_hex_to_variant() {
    let dir = mixed_catalog();
    let root = dir.path();
    run(root, true);

    assert!(!root.join("acme/PLA/silk_pla_red").exists());
    assert_eq!(
        read(root, "acme/PLA/silk_pla", "filament.json"),
        json!({"id": "silk_pla", "name": "Silk PLA"})
    );
    assert_eq!(
        read(root, "acme/PLA/silk_pla/red", VARIANT_DOCUMENT),
        json!({"id": "red", "name": "Red", "color_hex": "#FF0000"})
    );
    assert_eq!(
        read(root, "acme/PLA/silk_pla/red", "sizes.json"),
        json!({"sizes": [1000]})
    );
}

#[test]
fn product_line_prefix_moves_into_line_type() {
    let dir = mixed_catalog();
    let root = dir.path();
    let report = run(root, true);

    assert_eq!(children(root, "sakata_3d/PLA"), vec!["850", "pla"]);
    assert_eq!(children(root, "sakata_3d/PLA/850"), vec!["black", "white"]);
    assert_eq!(
        read(root, "sakata_3d/PLA/850", "filament.json"),
        json!({"id": "850", "name": "850", "density": 1.24})
    );
    assert_eq!(
        read(root, "sakata_3d/PLA/850/black", VARIANT_DOCUMENT),
        json!({"id": "black", "name": "Black", "sku": "sakata_3d/PLA/pla/850_black"})
    );
    assert!(report.actions.iter().any(|a| a.category == Category::ProductLine
        && a.old_path == "sakata_3d/PLA/pla/850_black"
        && a.new_path == "sakata_3d/PLA/850/black"));
}

#[test]
fn unimplied_common_prefix_moves_to_new_type() {
    let dir = mixed_catalog();
    let root = dir.path();
    run(root, true);

    assert!(!root.join("acme/TPU/tpu").exists());
    assert_eq!(children(root, "acme/TPU/a95_tpu"), vec!["black", "red", "white"]);
    assert_eq!(
        read(root, "acme/TPU/a95_tpu", "filament.json"),
        json!({"id": "a95_tpu", "name": "A95 TPU", "density": 1.24})
    );
    assert_eq!(read(root, "acme/TPU/a95_tpu/white", VARIANT_DOCUMENT)["name"], "White");
}

#[test]
fn color_type_swaps_with_product_variant() {
    let dir = mixed_catalog();
    let root = dir.path();
    run(root, true);

    assert!(!root.join("acme/TPU/blue").exists());
    assert_eq!(
        read(root, "acme/TPU/flexible_tpu/blue", VARIANT_DOCUMENT),
        json!({
            "id": "blue",
            "name": "Blue",
            "sku": "acme/TPU/blue/flexible_tpu",
            "color_hex": "#0000FF"
        })
    );
}

#[test]
fn series_prefix_and_display_name_are_fixed_in_place() {
    let dir = mixed_catalog();
    let root = dir.path();
    run(root, true);

    assert_eq!(children(root, "matter3d_inc/PLA/pla"), vec!["blue", "red"]);
    assert_eq!(read(root, "matter3d_inc/PLA/pla/red", VARIANT_DOCUMENT)["name"], "Red");
    assert_eq!(read(root, "acme/PLA/pla/red", VARIANT_DOCUMENT)["name"], "Red");
}

#[test]
fn second_apply_finds_nothing_new() {
    let dir = mixed_catalog();
    let root = dir.path();
    let first = run(root, true);
    assert_eq!(first.auto_actions().count(), 9, "{first:#?}");

    let before = snapshot(root);
    let second = run(root, true);
    assert_eq!(second.auto_actions().count(), 0, "{second:#?}");
    assert!(second.skipped.is_empty());
    assert_eq!(
        second.manual_actions().collect::<Vec<_>>(),
        first.manual_actions().collect::<Vec<_>>()
    );
    assert!(before == snapshot(root));
}

#[test]
fn applied_fixes_keep_every_variant_document() {
    let dir = mixed_catalog();
    let root = dir.path();
    let before = variant_docs(root);
    run(root, true);
    let after = variant_docs(root);

    let by_sku: BTreeMap<String, &Document> = after
        .iter()
        .filter_map(|(_, doc)| Some((doc.get("sku")?.as_str()?.to_string(), doc)))
        .collect();
    for (node, old) in &before {
        let sku = node.to_string();
        let new = by_sku
            .get(&sku)
            .unwrap_or_else(|| panic!("variant document for {sku} was lost"));
        for (key, value) in old.iter().filter(|(key, _)| *key != "id" && *key != "name") {
            assert_eq!(new.get(key), Some(value), "{sku}: field {key} changed");
        }
    }
    for (node, doc) in &after {
        assert_eq!(doc["id"], node.name().unwrap(), "id out of sync at {node}");
    }
}

#[test]
fn applied_destinations_are_unique() {
    let dir = mixed_catalog();
    let report = run(dir.path(), true);
    let mut seen = std::collections::HashSet::new();
    for action in report.actions.iter().filter(|a| !a.new_path.is_empty()) {
        assert!(seen.insert(action.new_path.clone()), "duplicate {}", action.new_path);
    }
}

#[test]
fn dry_run_matches_apply_and_leaves_disk_alone() {
    let dir = mixed_catalog();
    let root = dir.path();
    let before = snapshot(root);

    let dry = run(root, false);
    assert!(before == snapshot(root), "dry run touched the disk");

    let applied = run(root, true);
    assert_eq!(dry.actions, applied.actions);
    assert_eq!(dry.skipped, applied.skipped);
}

#[test]
fn existing_destination_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    variant(root, "matter3d_inc/PLA/pla/hf_red", "HF Red");
    variant(root, "matter3d_inc/PLA/pla/red", "Red");

    let report = run(root, true);
    assert!(report.actions.is_empty(), "{report:#?}");
    assert_eq!(
        report.skipped,
        vec!["Cat 2: matter3d_inc/PLA/pla/hf_red -> matter3d_inc/PLA/pla/red would collide"]
    );
    assert_eq!(children(root, "matter3d_inc/PLA/pla"), vec!["hf_red", "red"]);
}

#[test]
fn second_claim_on_a_destination_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    variant(root, "dremel/PLA/pla/digilab_bla_01_black", "Digilab BLA 01 Black");
    variant(root, "dremel/PLA/pla/digilab_black", "Digilab Black");

    let report = run(root, true);
    let moved: Vec<&str> = report.actions.iter().map(|a| a.new_path.as_str()).collect();
    assert_eq!(moved, vec!["dremel/PLA/digilab/black"]);
    assert_eq!(
        report.skipped,
        vec!["Cat 7: dremel/PLA/pla/digilab_black -> dremel/PLA/digilab/black would collide"]
    );
    assert_eq!(read(root, "dremel/PLA/digilab/black", VARIANT_DOCUMENT)["name"], "Black");
    assert_eq!(children(root, "dremel/PLA/pla"), vec!["digilab_black"]);
}

#[test]
fn malformed_document_is_reported_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("acme/PLA/pla/green")).unwrap();
    fs::write(root.join("acme/PLA/pla/green/variant.json"), "{not json").unwrap();
    variant(root, "acme/PLA/pla/red", "Red  ()");

    for apply in [false, true] {
        let report = run(root, apply);
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.starts_with("acme/PLA/pla/green/variant.json")),
            "{report:#?}"
        );
        assert!(report.actions.iter().any(|a| a.old_path == "acme/PLA/pla/red"));
    }
    assert_eq!(
        fs::read_to_string(root.join("acme/PLA/pla/green/variant.json")).unwrap(),
        "{not json"
    );
}
