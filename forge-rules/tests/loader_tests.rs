use forge_rules::loader::load_from_file;
use forge_rules::{build_model_from_tiles, Dimensionality, Direction, LoadError, PatternId};
use std::fs;
use tempfile::tempdir;

// Helper function to create the full path to test data
fn test_data_path(filename: &str) -> std::path::PathBuf {
    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("rules_data");
    path.push(filename);
    path
}

#[test]
fn test_load_valid_simple() {
    let catalogue = load_from_file(&test_data_path("valid_simple.ron")).unwrap();

    assert_eq!(catalogue.len(), 2);
    assert_eq!(catalogue.pattern_size(), 1);
    assert_eq!(catalogue.dimensionality(), Dimensionality::Two);
    assert_eq!(catalogue.tiles()[0].name, "grass");
    assert_eq!(catalogue.tiles()[0].frequency, 3);
    assert_eq!(catalogue.tiles()[1].symbols.as_slice(), &[2]);

    let grass = PatternId(0);
    let water = PatternId(1);
    assert!(catalogue.tiles()[0]
        .neighbors(Direction::Right)
        .contains(&water));

    let model = build_model_from_tiles(catalogue).unwrap();
    let rules = model.adjacency();
    assert!(rules.check(grass, water, Direction::Right));
    // Mirrored from the one-sided entry.
    assert!(rules.check(water, grass, Direction::Left));
    // Never authored in either orientation.
    assert!(!rules.check(water, grass, Direction::Right));
    assert!(!rules.check(grass, water, Direction::Down));
    assert!(rules.is_symmetric());

    let weights = model.library().weights();
    assert!((weights[0] - 0.75).abs() < 1e-12);
    assert!((weights[1] - 0.25).abs() < 1e-12);
}

#[test]
fn test_load_valid_blocks_3d() {
    let catalogue = load_from_file(&test_data_path("valid_blocks_3d.ron")).unwrap();
    assert_eq!(catalogue.dimensionality(), Dimensionality::Three);
    assert_eq!(catalogue.tiles()[1].symbols.dimensions(), (2, 2, 2));

    let model = build_model_from_tiles(catalogue).unwrap();
    assert!(model.patterns()[0].is_empty_pattern());
    assert!(model
        .adjacency()
        .check(PatternId(1), PatternId(0), Direction::Up));
}

#[test]
fn test_load_duplicate_names() {
    let result = load_from_file(&test_data_path("duplicate_names.ron"));
    match result {
        Err(LoadError::InvalidData(message)) => assert!(message.contains("Duplicate")),
        other => panic!("expected InvalidData, got {other:?}"),
    }
}

#[test]
fn test_load_unknown_tile() {
    let result = load_from_file(&test_data_path("unknown_tile.ron"));
    match result {
        Err(LoadError::InvalidData(message)) => assert!(message.contains("Unknown tile: b")),
        other => panic!("expected InvalidData, got {other:?}"),
    }
}

#[test]
fn test_load_bad_direction() {
    let result = load_from_file(&test_data_path("bad_direction.ron"));
    assert!(matches!(result, Err(LoadError::InvalidData(_))));
}

#[test]
fn test_load_malformed() {
    let result = load_from_file(&test_data_path("malformed.ron"));
    assert!(matches!(result, Err(LoadError::ParseError(_))));
}

#[test]
fn test_load_empty_tiles() {
    let result = load_from_file(&test_data_path("empty_tiles.ron"));
    assert!(matches!(result, Err(LoadError::InvalidData(_))));
}

#[test]
fn test_load_missing_file() {
    let result = load_from_file(&test_data_path("does_not_exist.ron"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(&path, "{}").unwrap();
    assert!(matches!(
        load_from_file(&path),
        Err(LoadError::InvalidData(_))
    ));
}

#[test]
fn test_zero_frequency_fails_at_model_build() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zero.ron");
    fs::write(&path, r#"(tiles: [(name: "a", frequency: 0, symbols: [1])])"#).unwrap();

    let catalogue = load_from_file(&path).unwrap();
    assert!(build_model_from_tiles(catalogue).is_err());
}
