//! Physical configuration for the spine model.
//!
//! Three vertebra classes are distinguished: the fixed base (zero mass), the
//! passive moving vertebra, and the active moving vertebra that carries the
//! actuator package. The default values reproduce the measured hardware of a
//! two-segment prototype (231 g total, split 2/5 passive, 3/5 active).
//!
//! Note that this configuration does not enforce any angle between rods, so a
//! vertebra is not necessarily a symmetric tetrahedron. Symmetry holds when
//! `height == edge / sqrt(2)`, which [`SpineConfig::height`] produces.

use std::path::Path;

use bevy_math::prelude::Measured3d;
use bevy_math::primitives::Cylinder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_radius() -> f32 {
    0.5
}
const fn default_leg_length() -> f32 {
    12.25
}
const fn default_friction() -> f32 {
    0.99
}
const fn default_rolling_friction() -> f32 {
    0.01
}
const fn default_edge() -> f32 {
    20.0
}
const fn default_separation() -> f32 {
    7.5
}
const fn default_segments() -> usize {
    3
}
const fn default_base_offset() -> f32 {
    2.0
}
const fn default_template_offset() -> f32 {
    -6.0
}
const fn default_stiffness() -> f32 {
    1000.0
}
const fn default_damping() -> f32 {
    10.0
}
const fn default_pretension() -> f32 {
    2452.0
}
const fn default_max_tension() -> f32 {
    100_000.0
}
const fn default_target_velocity() -> f32 {
    10_000.0
}

// ---------------------------------------------------------------------------
// VertebraConfig
// ---------------------------------------------------------------------------

/// Physical constants for one vertebra class.
///
/// A vertebra is a tetrahedral cluster of four rods meeting at a middle node.
/// Setting `mass` to zero fixes the realized body in space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertebraConfig {
    /// Total mass of the compound rigid body, kg. Zero means fixed in space.
    pub mass: f32,

    /// Radius of the rods that make up this body.
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Length of one rod, a "leg" of the tetrahedron.
    /// For a symmetric vertebra this is `sqrt((height/2)^2 + (edge/2)^2)`.
    #[serde(default = "default_leg_length")]
    pub leg_length: f32,

    /// Sliding friction coefficient, passed through to the engine.
    #[serde(default = "default_friction")]
    pub friction: f32,

    /// Rolling friction coefficient, passed through to the engine.
    #[serde(default = "default_rolling_friction")]
    pub rolling_friction: f32,

    /// Restitution coefficient, passed through to the engine.
    #[serde(default)]
    pub restitution: f32,
}

impl VertebraConfig {
    /// The unmoving base vertebra. Zero mass keeps it fixed in space.
    pub fn base() -> Self {
        Self {
            mass: 0.0,
            radius: default_radius(),
            leg_length: default_leg_length(),
            friction: default_friction(),
            rolling_friction: default_rolling_friction(),
            restitution: 0.0,
        }
    }

    /// A moving vertebra without the actuator package.
    pub fn passive() -> Self {
        Self {
            mass: 0.0924,
            ..Self::base()
        }
    }

    /// A moving vertebra carrying the actuator package.
    pub fn active() -> Self {
        Self {
            mass: 0.1386,
            ..Self::base()
        }
    }

    /// Rod density that realizes `mass` spread over the four legs.
    ///
    /// The class mass is divided by the total rod volume, so a compound body
    /// built from four legs of this class sums back to `mass`.
    pub fn rod_density(&self) -> f32 {
        let leg = Cylinder::new(self.radius, self.leg_length);
        self.mass / (4.0 * leg.volume())
    }

    /// The rod builder configuration for this class.
    pub fn rod_config(&self) -> RodConfig {
        RodConfig {
            radius: self.radius,
            density: self.rod_density(),
            friction: self.friction,
            rolling_friction: self.rolling_friction,
            restitution: self.restitution,
        }
    }

    fn validate(&self, class: &'static str) -> Result<(), ConfigError> {
        if self.mass < 0.0 {
            return Err(ConfigError::Negative {
                field: class,
                value: self.mass,
            });
        }
        if self.radius <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "radius",
                value: self.radius,
            });
        }
        if self.leg_length <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "leg_length",
                value: self.leg_length,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RodConfig
// ---------------------------------------------------------------------------

/// Builder configuration for rod pairs: geometry plus the surface constants
/// the engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RodConfig {
    pub radius: f32,
    /// Density in kg per unit volume. Zero realizes a fixed body.
    pub density: f32,
    pub friction: f32,
    pub rolling_friction: f32,
    pub restitution: f32,
}

// ---------------------------------------------------------------------------
// CableConfig
// ---------------------------------------------------------------------------

/// Builder configuration for cable ("muscle") pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableConfig {
    /// Spring stiffness, kg/s^2.
    #[serde(default = "default_stiffness")]
    pub stiffness: f32,

    /// Damping, kg/s.
    #[serde(default = "default_damping")]
    pub damping: f32,

    /// Force applied at the start pose; the rest length is shortened so the
    /// cable carries this tension before the first step.
    #[serde(default = "default_pretension")]
    pub pretension: f32,

    /// Record tension/length history in the engine.
    #[serde(default)]
    pub history: bool,

    /// Upper bound on cable tension.
    #[serde(default = "default_max_tension")]
    pub max_tension: f32,

    /// Target retraction velocity for the actuator.
    #[serde(default = "default_target_velocity")]
    pub target_velocity: f32,
}

impl Default for CableConfig {
    fn default() -> Self {
        Self {
            stiffness: default_stiffness(),
            damping: default_damping(),
            pretension: default_pretension(),
            history: false,
            max_tension: default_max_tension(),
            target_velocity: default_target_velocity(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpineConfig
// ---------------------------------------------------------------------------

/// Complete configuration for a multi-segment spine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineConfig {
    /// Horizontal edge length of one vertebra.
    #[serde(default = "default_edge")]
    pub edge: f32,

    /// Initial vertical separation between adjacent vertebrae.
    #[serde(default = "default_separation")]
    pub vertebra_separation: f32,

    /// Total number of vertebrae, including the fixed base.
    #[serde(default = "default_segments")]
    pub segments: usize,

    /// Vertical placement of the fixed base vertebra.
    #[serde(default = "default_base_offset")]
    pub base_offset: f32,

    /// Vertical placement of the moving-vertebra template before stacking.
    #[serde(default = "default_template_offset")]
    pub template_offset: f32,

    #[serde(default = "VertebraConfig::base")]
    pub base: VertebraConfig,

    #[serde(default = "VertebraConfig::passive")]
    pub passive: VertebraConfig,

    #[serde(default = "VertebraConfig::active")]
    pub active: VertebraConfig,

    #[serde(default)]
    pub cable: CableConfig,
}

impl Default for SpineConfig {
    fn default() -> Self {
        Self {
            edge: default_edge(),
            vertebra_separation: default_separation(),
            segments: default_segments(),
            base_offset: default_base_offset(),
            template_offset: default_template_offset(),
            base: VertebraConfig::base(),
            passive: VertebraConfig::passive(),
            active: VertebraConfig::active(),
            cable: CableConfig::default(),
        }
    }
}

impl SpineConfig {
    /// Total height of one vertebra, bottom node to top nodes.
    ///
    /// Derived as `edge / sqrt(2)`, which makes the tetrahedron symmetric.
    pub fn height(&self) -> f32 {
        self.edge / std::f32::consts::SQRT_2
    }

    /// Validate the configuration. Returns `Err` on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.edge <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "edge",
                value: self.edge,
            });
        }
        if self.vertebra_separation <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "vertebra_separation",
                value: self.vertebra_separation,
            });
        }
        if self.segments < 2 {
            return Err(ConfigError::TooFewSegments(self.segments));
        }
        if self.cable.stiffness <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "stiffness",
                value: self.cable.stiffness,
            });
        }
        if self.cable.damping < 0.0 {
            return Err(ConfigError::Negative {
                field: "damping",
                value: self.cable.damping,
            });
        }
        if self.cable.pretension < 0.0 {
            return Err(ConfigError::Negative {
                field: "pretension",
                value: self.cable.pretension,
            });
        }
        self.base.validate("base mass")?;
        self.passive.validate("passive mass")?;
        self.active.validate("active mass")?;
        Ok(())
    }

    /// Load from a TOML file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
