// tests/spine_topology.rs
use approx::assert_relative_eq;
use glam::Vec3;
use tensegrity_spine::{SpineConfig, SpineError, SpineModel};

#[test]
fn default_spine_assembles() {
    let model = SpineModel::assemble(&SpineConfig::default()).unwrap();
    let blueprint = model.blueprint();

    // One compound body per segment: the four legs of a vertebra share the
    // middle node, so each segment welds into a single rigid piece.
    assert_eq!(blueprint.bodies.len(), 3);
    for body in &blueprint.bodies {
        assert_eq!(body.rods.len(), 4);
    }

    // Eight cables per adjacent segment pair.
    assert_eq!(blueprint.cables.len(), 16);
}

#[test]
fn base_is_fixed_and_moving_segments_carry_mass() {
    let model = SpineModel::assemble(&SpineConfig::default()).unwrap();
    let blueprint = model.blueprint();

    let base = blueprint
        .bodies
        .iter()
        .find(|b| b.has_tags("segment1"))
        .unwrap();
    assert!(base.is_fixed());

    let second = blueprint
        .bodies
        .iter()
        .find(|b| b.has_tags("segment2"))
        .unwrap();
    // Rod density is derived so the compound sums back to the class mass.
    assert_relative_eq!(second.mass, 0.0924, max_relative = 1e-3);
    assert_relative_eq!(blueprint.total_mass(), 2.0 * 0.0924, max_relative = 1e-3);
}

#[test]
fn muscle_map_names_and_counts() {
    let model = SpineModel::assemble(&SpineConfig::default()).unwrap();

    // Vertical muscles span every adjacent pair, one per named column.
    for name in ["vertical a", "vertical b", "vertical c", "vertical d"] {
        assert_eq!(model.muscles(name).unwrap().len(), 2, "{name}");
    }

    // Saddle muscles are grouped per adjacent pair.
    assert_eq!(model.muscles("saddle0").unwrap().len(), 4);
    assert_eq!(model.muscles("saddle1").unwrap().len(), 4);

    assert_eq!(model.muscle_names().count(), 6);
    assert_eq!(model.all_muscles().len(), 16);
}

#[test]
fn vertical_cable_geometry() {
    let model = SpineModel::assemble(&SpineConfig::default()).unwrap();

    // First "vertical a" cable: right node of the base (lifted to y = 2) up
    // to the right node of segment2 (template at y = -6 plus 2 * 7.5).
    let id = model.muscles("vertical a").unwrap()[0];
    let cable = model.cable(id).unwrap();
    assert_eq!(cable.a, Vec3::new(10.0, 2.0, 0.0));
    assert_eq!(cable.b, Vec3::new(10.0, 9.0, 0.0));
    assert_relative_eq!(cable.length(), 7.0);

    // Pretension 2452 over stiffness 1000 shortens the rest length by 2.452.
    assert_relative_eq!(cable.rest_length(), 4.548, max_relative = 1e-5);
}

#[test]
fn longer_spines_scale_topology() {
    let config = SpineConfig {
        segments: 5,
        ..SpineConfig::default()
    };
    let model = SpineModel::assemble(&config).unwrap();
    let blueprint = model.blueprint();

    assert_eq!(blueprint.bodies.len(), 5);
    assert_eq!(blueprint.cables.len(), 32);
    for name in ["saddle0", "saddle1", "saddle2", "saddle3"] {
        assert_eq!(model.muscles(name).unwrap().len(), 4, "{name}");
    }
    assert_eq!(model.muscles("vertical a").unwrap().len(), 4);
}

#[test]
fn unknown_muscle_key_is_an_error() {
    let model = SpineModel::assemble(&SpineConfig::default()).unwrap();
    match model.muscles("lateral x") {
        Err(SpineError::UnknownMuscle(key)) => assert_eq!(key, "lateral x"),
        other => panic!("expected UnknownMuscle, got {other:?}"),
    }
}

#[test]
fn step_validates_dt() {
    let mut model = SpineModel::assemble(&SpineConfig::default()).unwrap();
    assert!(model.step(1.0 / 1000.0).is_ok());
    assert!(matches!(
        model.step(-1.0),
        Err(SpineError::InvalidTimestep(_))
    ));
}

#[test]
fn assemble_rejects_invalid_config() {
    let config = SpineConfig {
        segments: 0,
        ..SpineConfig::default()
    };
    assert!(SpineModel::assemble(&config).is_err());
}
