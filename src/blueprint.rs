//! Realization of a tagged [`Structure`] into engine-agnostic definitions.
//!
//! A [`BuildSpec`] maps tag tokens to rod and cable builder configurations.
//! Realizing a structure walks its pairs, turns rod-tagged pairs into
//! [`RodDef`]s (mass computed from cylinder volume and density via
//! `bevy_heavy`), compounds rods that share endpoints into one
//! [`RigidBodyDef`], and turns muscle-tagged pairs into [`CableDef`]s.
//!
//! The resulting [`SpineBlueprint`] is what an engine adapter ingests; this
//! crate never simulates anything itself.

use bevy_heavy::ComputeMassProperties3d as _;
use bevy_math::primitives::Cylinder;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{CableConfig, RodConfig};
use crate::structure::Structure;

/// Index of a cable within a [`SpineBlueprint`].
pub type CableId = usize;

/// One rigid rod between two world-space endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RodDef {
    pub a: Vec3,
    pub b: Vec3,
    pub radius: f32,
    /// Density in kg per unit volume. Zero marks a fixed rod.
    pub density: f32,
    /// Mass in kg, computed from cylinder volume and density.
    pub mass: f32,
    pub friction: f32,
    pub rolling_friction: f32,
    pub restitution: f32,
    pub tags: Vec<String>,
}

impl RodDef {
    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }
}

/// A compound rigid body: every rod of one connected cluster.
///
/// Rods that share an endpoint within one structure scope are welded into a
/// single body, the way a tetrahedral vertebra's four legs form one rigid
/// piece.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RigidBodyDef {
    pub rods: Vec<RodDef>,
    /// Total mass in kg. Zero means the body is fixed in space.
    pub mass: f32,
    /// Tags inherited from the owning structure (e.g. `segment2`).
    pub tags: Vec<String>,
}

impl RigidBodyDef {
    pub fn is_fixed(&self) -> bool {
        self.mass == 0.0
    }

    /// True when this body carries every token of `query`.
    pub fn has_tags(&self, query: &str) -> bool {
        crate::structure::matches_tags(&self.tags, query)
    }
}

/// One cable ("muscle") between two world-space anchor points.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CableDef {
    pub a: Vec3,
    pub b: Vec3,
    pub config: CableConfig,
    pub tags: Vec<String>,
}

impl CableDef {
    /// Anchor-to-anchor distance at the start pose.
    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    /// Rest length that realizes the configured pretension at the start pose:
    /// `length - pretension / stiffness`, floored at zero.
    pub fn rest_length(&self) -> f32 {
        (self.length() - self.config.pretension / self.config.stiffness).max(0.0)
    }

    /// True when this cable carries every token of `query`.
    pub fn has_tags(&self, query: &str) -> bool {
        crate::structure::matches_tags(&self.tags, query)
    }
}

/// The realized spine: rigid bodies plus cables, ready for an engine adapter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SpineBlueprint {
    pub bodies: Vec<RigidBodyDef>,
    pub cables: Vec<CableDef>,
}

impl SpineBlueprint {
    /// Ids of every cable matching a tag query.
    pub fn cables_with_tags(&self, query: &str) -> Vec<CableId> {
        self.cables
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_tags(query))
            .map(|(id, _)| id)
            .collect()
    }

    /// Total mass of all rigid bodies.
    pub fn total_mass(&self) -> f32 {
        self.bodies.iter().map(|b| b.mass).sum()
    }
}

/// Maps tag tokens to builder configurations.
///
/// A pair matches a builder when the pair's tag list contains the builder's
/// tag token, so a single `"muscle"` cable builder covers both
/// `"vertical muscle a"` and `"saddle muscle seg0"` pairs.
#[derive(Clone, Debug, Default)]
pub struct BuildSpec {
    rods: Vec<(String, RodConfig)>,
    cables: Vec<(String, CableConfig)>,
}

impl BuildSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rod builder for pairs carrying `tag`.
    pub fn with_rod(mut self, tag: &str, config: RodConfig) -> Self {
        self.rods.push((tag.to_owned(), config));
        self
    }

    /// Registers a cable builder for pairs carrying `tag`.
    pub fn with_cable(mut self, tag: &str, config: CableConfig) -> Self {
        self.cables.push((tag.to_owned(), config));
        self
    }

    /// Translates `structure` and all its children into a [`SpineBlueprint`].
    ///
    /// Pairs matching no registered builder are skipped with a warning.
    pub fn realize(&self, structure: &Structure) -> SpineBlueprint {
        let mut blueprint = SpineBlueprint::default();
        self.realize_into(structure, &mut blueprint);
        blueprint
    }

    fn realize_into(&self, structure: &Structure, out: &mut SpineBlueprint) {
        let mut rods = Vec::new();

        for pair in structure.pairs() {
            let (a, b) = structure.endpoints(pair);
            if let Some((_, rc)) = self.rods.iter().find(|(tag, _)| pair.has_tags(tag)) {
                let mass = Cylinder::new(rc.radius, a.distance(b)).mass(rc.density);
                rods.push((
                    pair.a,
                    pair.b,
                    RodDef {
                        a,
                        b,
                        radius: rc.radius,
                        density: rc.density,
                        mass,
                        friction: rc.friction,
                        rolling_friction: rc.rolling_friction,
                        restitution: rc.restitution,
                        tags: pair.tags.clone(),
                    },
                ));
            } else if let Some((_, cc)) = self.cables.iter().find(|(tag, _)| pair.has_tags(tag)) {
                out.cables.push(CableDef {
                    a,
                    b,
                    config: cc.clone(),
                    tags: pair.tags.clone(),
                });
            } else {
                warn!(tags = ?pair.tags, "no builder registered for pair tags, skipping");
            }
        }

        for component in connected_components(&rods) {
            let mass = component.iter().map(|rod| rod.mass).sum();
            out.bodies.push(RigidBodyDef {
                rods: component,
                mass,
                tags: structure.tags().to_vec(),
            });
        }

        for child in structure.children() {
            self.realize_into(child, out);
        }
    }
}

/// Groups rods into clusters connected through shared endpoint nodes.
fn connected_components(rods: &[(usize, usize, RodDef)]) -> Vec<Vec<RodDef>> {
    let mut components = Vec::new();
    let mut assigned = vec![false; rods.len()];

    for start in 0..rods.len() {
        if assigned[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = vec![start];
        assigned[start] = true;

        while let Some(i) = queue.pop() {
            let (ia, ib, ref rod) = rods[i];
            component.push(rod.clone());
            for (j, &(ja, jb, _)) in rods.iter().enumerate() {
                if !assigned[j] && (ja == ia || ja == ib || jb == ia || jb == ib) {
                    assigned[j] = true;
                    queue.push(j);
                }
            }
        }
        components.push(component);
    }
    components
}
