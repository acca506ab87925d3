use forge_rules::{
    build_model, Grid, Model, ModelOptions, PatternId, PatternLibrary, RuleError, Symbol,
    VOID_SYMBOL,
};

fn scenario_exemplar() -> Grid<Symbol> {
    Grid::from_rows(&[vec![1, 2, 3], vec![0, 1, 0], vec![0, 2, 0]]).unwrap()
}

fn weight_sum(library: &PatternLibrary) -> f64 {
    library.weights().iter().sum()
}

fn pattern_at(library: &PatternLibrary, x: usize, y: usize) -> Vec<Symbol> {
    let id = library.patterns_by_position()[0][&(x, y, 0)];
    library.pattern(id).unwrap().values().to_vec()
}

#[test]
fn test_scenario_symbol_frequency() {
    let library =
        PatternLibrary::overlapping(&scenario_exemplar(), 2, &ModelOptions::default()).unwrap();
    let counts: Vec<(Symbol, usize)> = library
        .symbol_frequency()
        .iter()
        .map(|(&symbol, &count)| (symbol, count))
        .collect();
    assert_eq!(counts, vec![(0, 4), (1, 2), (2, 2), (3, 1)]);
}

#[test]
fn test_scenario_patterns_by_position() {
    let library =
        PatternLibrary::overlapping(&scenario_exemplar(), 2, &ModelOptions::default()).unwrap();

    // [[1, 2], [0, 1]]
    assert_eq!(pattern_at(&library, 0, 0), vec![1, 2, 0, 1]);
    // Wraps on both axes: [[0, 0], [3, 1]]
    assert_eq!(pattern_at(&library, 2, 2), vec![0, 0, 3, 1]);
    assert_eq!(library.patterns_by_position()[0].len(), 9);
}

#[test]
fn test_overlapping_weights_sum_to_one() {
    let exemplar = scenario_exemplar();
    for (rotation, symmetry) in [(false, false), (true, false), (false, true), (true, true)] {
        let options = ModelOptions {
            rotation,
            symmetry,
            ..ModelOptions::default()
        };
        let library = PatternLibrary::overlapping(&exemplar, 2, &options).unwrap();
        assert!(
            (weight_sum(&library) - 1.0).abs() < 1e-9,
            "weights do not sum to 1 for rotation={rotation} symmetry={symmetry}"
        );
        assert!(library.weights().iter().all(|&w| w > 0.0));
    }
}

#[test]
fn test_overlapping_weight_is_occurrence_share() {
    let exemplar = Grid::from_rows(&[vec![5, 5], vec![5, 5]]).unwrap();
    let options = ModelOptions {
        rotation: true,
        symmetry: true,
        ..ModelOptions::default()
    };
    let library = PatternLibrary::overlapping(&exemplar, 2, &options).unwrap();
    assert_eq!(library.len(), 1);
    assert!((library.weights()[0] - 1.0).abs() < 1e-12);
}

#[test]
fn test_extraction_is_idempotent() {
    let exemplar = scenario_exemplar();
    let options = ModelOptions {
        rotation: true,
        ..ModelOptions::default()
    };
    let first = PatternLibrary::overlapping(&exemplar, 2, &options).unwrap();
    let second = PatternLibrary::overlapping(&exemplar, 2, &options).unwrap();
    assert_eq!(first.patterns(), second.patterns());
    assert_eq!(first.weights(), second.weights());

    // Every pattern is unique by value.
    for (i, a) in first.patterns().iter().enumerate() {
        for b in &first.patterns()[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_rotation_adds_turned_variants() {
    let exemplar = scenario_exemplar();
    let plain = PatternLibrary::overlapping(&exemplar, 2, &ModelOptions::default()).unwrap();
    let rotated = PatternLibrary::overlapping(
        &exemplar,
        2,
        &ModelOptions {
            rotation: true,
            ..ModelOptions::default()
        },
    )
    .unwrap();
    assert!(rotated.len() > plain.len());
    let origin = pattern_at(&plain, 0, 0);
    let turned = plain
        .pattern(plain.patterns_by_position()[0][&(0, 0, 0)])
        .unwrap()
        .rotated();
    assert_ne!(turned.values(), origin.as_slice());
    assert!(rotated.patterns().contains(&turned));
}

#[test]
fn test_exemplar_neighbors_are_edge_compatible() {
    let exemplar = scenario_exemplar();
    let model = Model::overlapping(&exemplar, 2, &ModelOptions::default()).unwrap();
    let positions = &model.patterns_by_position()[0];
    let rules = model.adjacency();

    for x in 0..3 {
        for y in 0..3 {
            let here = positions[&(x, y, 0)];
            let right = positions[&((x + 1) % 3, y, 0)];
            let below = positions[&(x, (y + 1) % 3, 0)];
            assert!(rules.check(here, right, forge_rules::Direction::Right));
            assert!(rules.check(here, below, forge_rules::Direction::Down));
        }
    }
    assert!(rules.is_symmetric());
}

#[test]
fn test_overlapping_rejections() {
    let options = ModelOptions::default();
    let empty: Grid<Symbol> = Grid::from_rows(&[]).unwrap();
    assert_eq!(
        PatternLibrary::overlapping(&empty, 2, &options).unwrap_err(),
        RuleError::EmptyExemplar
    );
    assert_eq!(
        PatternLibrary::overlapping(&scenario_exemplar(), 1, &options).unwrap_err(),
        RuleError::PatternSizeTooSmall {
            size: 1,
            minimum: 2
        }
    );
    assert_eq!(
        PatternLibrary::overlapping(&scenario_exemplar(), 4, &options).unwrap_err(),
        RuleError::PatternSizeTooLarge { size: 4, extent: 3 }
    );
    let volume = Grid::filled(3, 3, 3, 1);
    assert!(matches!(
        PatternLibrary::overlapping(&volume, 2, &options),
        Err(RuleError::InvalidOption(_))
    ));
}

#[test]
fn test_tiled_uniform_volume() {
    let exemplar = Grid::filled(2, 2, 2, 1);
    let library = PatternLibrary::tiled(&exemplar, 1, &ModelOptions::default()).unwrap();

    assert_eq!(library.len(), 2);
    let empty = library.empty_pattern().unwrap();
    assert_eq!(empty, PatternId(0));
    assert!(library.pattern(empty).unwrap().is_empty_pattern());
    assert_eq!(library.pattern(PatternId(1)).unwrap().values(), &[1]);

    // Padded volume is 4 x 3 x 4 with the ground side left open.
    let positions = &library.patterns_by_position()[0];
    assert_eq!(positions.len(), 48);
    assert_eq!(positions[&(0, 0, 0)], empty);
    assert_eq!(positions[&(1, 2, 1)], PatternId(1));
    assert_eq!(positions[&(1, 0, 1)], empty);

    assert!((weight_sum(&library) - 1.0).abs() < 1e-9);
    assert!(library.weight(empty) > 0.0);
    assert!(library.weight(empty) < library.weight(PatternId(1)));
    assert_eq!(library.weight(library.void_id()), 0.0);
}

#[test]
fn test_tiled_rotation_adds_orientations() {
    let exemplar = Grid::from_fn(3, 2, 2, |x, _, z| (x + 3 * z) as Symbol);
    let options = ModelOptions {
        rotation: true,
        ..ModelOptions::default()
    };
    let library = PatternLibrary::tiled(&exemplar, 1, &options).unwrap();
    assert_eq!(library.patterns_by_position().len(), 4);
    // Quarter turns swap the lattice extents along x and z.
    let first = library.patterns_by_position()[0].keys().max().unwrap();
    let second = library.patterns_by_position()[1].keys().max().unwrap();
    assert_eq!((first.0, first.2), (second.2, second.0));
    assert!((weight_sum(&library) - 1.0).abs() < 1e-9);
}

#[test]
fn test_avoid_empty_pattern_scales_empty_weight() {
    let mut exemplar = Grid::filled(2, 2, 2, VOID_SYMBOL);
    exemplar[(1, 1, 1)] = 5;

    let ratio = |avoid: f64| {
        let options = ModelOptions {
            avoid_empty_pattern: avoid,
            ..ModelOptions::default()
        };
        let library = PatternLibrary::tiled(&exemplar, 1, &options).unwrap();
        library.weights()[0] / library.weights()[1]
    };

    let plain = ratio(0.0);
    let halved = ratio(0.5);
    assert!((plain - 7.0).abs() < 1e-3);
    assert!((halved - plain / 2.0).abs() < 1e-3);
}

#[test]
fn test_tiled_rejections() {
    let options = ModelOptions::default();
    let volume = Grid::filled(2, 2, 2, 1);
    assert_eq!(
        PatternLibrary::tiled(&volume, 0, &options).unwrap_err(),
        RuleError::PatternSizeTooSmall {
            size: 0,
            minimum: 1
        }
    );
    assert_eq!(
        PatternLibrary::tiled(&volume, 3, &options).unwrap_err(),
        RuleError::PatternSizeTooLarge { size: 3, extent: 2 }
    );
    let bad_avoid = ModelOptions {
        avoid_empty_pattern: 1.5,
        ..ModelOptions::default()
    };
    assert!(matches!(
        build_model(&volume, 1, &bad_avoid),
        Err(RuleError::InvalidOption(_))
    ));
}

#[test]
fn test_base_block_is_recorded_before_its_variants() {
    let options = ModelOptions {
        rotation: true,
        symmetry: true,
        ..ModelOptions::default()
    };
    let library = PatternLibrary::overlapping(&scenario_exemplar(), 2, &options).unwrap();

    assert_eq!(library.patterns_by_position()[0][&(0, 0, 0)], PatternId(0));
    assert_eq!(library.patterns()[0].values(), &[1, 2, 0, 1]);
    let first_turn = library.patterns()[0].rotated();
    assert_eq!(library.patterns()[1], first_turn);
}
