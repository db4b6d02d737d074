//! The assembled spine model: blueprint, muscle map, and step delegation.
//!
//! [`SpineModel::assemble`] runs the whole setup once: build the structure
//! graph, realize it through a [`BuildSpec`], and index the cables by their
//! symbolic muscle names. After assembly the muscle map is read-only;
//! controllers look cables up by name and the engine does the numerical work.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::blueprint::{BuildSpec, CableDef, CableId, SpineBlueprint};
use crate::config::SpineConfig;
use crate::error::SpineError;
use crate::spine::{BASE_ROD_TAG, MUSCLE_TAG, ROD_TAG, SpineBuilder, VERTICAL_MUSCLE_NAMES};

/// Observer notified on every simulation step, before the engine integrates.
///
/// Controllers implement this to adjust cable targets per tick.
pub trait StepObserver {
    fn on_step(&mut self, dt: f32);
}

/// A realized spine with named muscle access.
pub struct SpineModel {
    blueprint: SpineBlueprint,
    muscle_map: HashMap<String, Vec<CableId>>,
    observers: Vec<Box<dyn StepObserver>>,
}

impl SpineModel {
    /// One-shot setup: builds the structure, realizes the blueprint, and
    /// populates the muscle map.
    ///
    /// Moving vertebrae realize with the passive-class rod density; the base
    /// realizes with zero density and stays fixed in space.
    pub fn assemble(config: &SpineConfig) -> Result<Self, SpineError> {
        let structure = SpineBuilder::new(config.clone()).build()?;

        let spec = BuildSpec::new()
            .with_rod(ROD_TAG, config.passive.rod_config())
            .with_rod(BASE_ROD_TAG, config.base.rod_config())
            .with_cable(MUSCLE_TAG, config.cable.clone());
        let blueprint = spec.realize(&structure);

        let muscle_map = map_muscles(&blueprint, config.segments);

        for (i, body) in blueprint.bodies.iter().enumerate() {
            debug!(
                body = i,
                mass = body.mass,
                fixed = body.is_fixed(),
                tags = ?body.tags,
                "rigid body"
            );
        }
        info!(
            bodies = blueprint.bodies.len(),
            cables = blueprint.cables.len(),
            total_mass = blueprint.total_mass(),
            "assembled spine model"
        );

        Ok(Self {
            blueprint,
            muscle_map,
            observers: Vec::new(),
        })
    }

    pub fn blueprint(&self) -> &SpineBlueprint {
        &self.blueprint
    }

    /// Cable ids registered under a symbolic muscle name.
    ///
    /// Names are `"vertical a"` through `"vertical d"` and `"saddle{i}"` for
    /// each adjacent segment pair `i`, starting at zero.
    pub fn muscles(&self, key: &str) -> Result<&[CableId], SpineError> {
        self.muscle_map
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| SpineError::UnknownMuscle(key.to_owned()))
    }

    /// Every cable of the model, in blueprint order.
    pub fn all_muscles(&self) -> &[CableDef] {
        &self.blueprint.cables
    }

    pub fn cable(&self, id: CableId) -> Option<&CableDef> {
        self.blueprint.cables.get(id)
    }

    /// Symbolic muscle names, in arbitrary order.
    pub fn muscle_names(&self) -> impl Iterator<Item = &str> {
        self.muscle_map.keys().map(String::as_str)
    }

    /// Registers a controller to be notified each step.
    pub fn add_observer(&mut self, observer: Box<dyn StepObserver>) {
        self.observers.push(observer);
    }

    /// Advances the model by `dt`, notifying observers.
    ///
    /// The numerical integration itself belongs to the engine consuming the
    /// blueprint; this only validates `dt` and fans out to controllers.
    pub fn step(&mut self, dt: f32) -> Result<(), SpineError> {
        if dt <= 0.0 {
            return Err(SpineError::InvalidTimestep(dt));
        }
        for observer in &mut self.observers {
            observer.on_step(dt);
        }
        Ok(())
    }
}

/// Associates symbolic names with cable ids, once, after realization.
fn map_muscles(blueprint: &SpineBlueprint, segments: usize) -> HashMap<String, Vec<CableId>> {
    let mut map = HashMap::new();

    for name in VERTICAL_MUSCLE_NAMES {
        map.insert(
            format!("vertical {name}"),
            blueprint.cables_with_tags(&format!("vertical muscle {name}")),
        );
    }
    for i in 1..segments {
        map.insert(
            format!("saddle{}", i - 1),
            blueprint.cables_with_tags(&format!("saddle muscle seg{}", i - 1)),
        );
    }
    map
}
