//! Vertebra and spine assembly.
//!
//! [`SpineBuilder`] is the one-shot build procedure: it places the five nodes
//! of a tetrahedral vertebra, tags its rods, stacks segment copies vertically,
//! and strings the cables between adjacent segments. The output is a tagged
//! [`Structure`] ready for realization by a build spec.

use glam::Vec3;

use crate::config::SpineConfig;
use crate::error::SpineError;
use crate::structure::Structure;

/// Tag carried by the rods of moving vertebrae.
pub const ROD_TAG: &str = "rod";

/// Tag carried by the rods of the fixed base vertebra.
pub const BASE_ROD_TAG: &str = "rod_base";

/// Tag token shared by every cable pair.
pub const MUSCLE_TAG: &str = "muscle";

/// Suffixes of the four vertical cables, in node order (right, left, top, front).
pub const VERTICAL_MUSCLE_NAMES: [&str; 4] = ["a", "b", "c", "d"];

/// Node order within one vertebra: right, left, top, front, middle.
const RIGHT: usize = 0;
const LEFT: usize = 1;
const TOP: usize = 2;
const FRONT: usize = 3;
const MIDDLE: usize = 4;

/// Saddle cables run from the upper nodes of the lower segment to the lower
/// nodes of the upper segment.
const SADDLE_ROUTES: [(usize, usize); 4] = [(TOP, LEFT), (FRONT, LEFT), (TOP, RIGHT), (FRONT, RIGHT)];

/// Builds the spine structure graph from a [`SpineConfig`].
#[derive(Clone, Debug)]
pub struct SpineBuilder {
    config: SpineConfig,
}

impl SpineBuilder {
    pub fn new(config: SpineConfig) -> Self {
        Self { config }
    }

    /// Builds one tetrahedral vertebra with its rods tagged `rod_tag`.
    ///
    /// The five nodes sit at the right and left tips of the bottom edge, the
    /// top and front tips of the upper edge, and the middle where the four
    /// rods meet.
    pub fn vertebra(&self, rod_tag: &str) -> Result<Structure, SpineError> {
        let edge = self.config.edge;
        let height = self.config.height();

        // Node ids follow the RIGHT..MIDDLE ordering.
        let mut vertebra = Structure::new();
        vertebra.add_node(Vec3::new(edge / 2.0, 0.0, 0.0));
        vertebra.add_node(Vec3::new(-edge / 2.0, 0.0, 0.0));
        vertebra.add_node(Vec3::new(0.0, height, -edge / 2.0));
        vertebra.add_node(Vec3::new(0.0, height, edge / 2.0));
        vertebra.add_node(Vec3::new(0.0, height / 2.0, 0.0));

        for tip in [RIGHT, LEFT, TOP, FRONT] {
            vertebra.add_pair(tip, MIDDLE, rod_tag)?;
        }
        Ok(vertebra)
    }

    /// Builds the full spine: tagged segments plus inter-segment cables.
    ///
    /// The base vertebra becomes `segment1` at the base offset; moving
    /// vertebrae are copies of a template placed at the template offset, so
    /// `segment{i+1}` ends up at `template_offset + (i+1) * separation`.
    pub fn build(&self) -> Result<Structure, SpineError> {
        self.config.validate()?;

        let mut base = self.vertebra(BASE_ROD_TAG)?;
        base.translate(Vec3::new(0.0, self.config.base_offset, 0.0));
        base.add_tags("segment1");

        let mut template = self.vertebra(ROD_TAG)?;
        template.translate(Vec3::new(0.0, self.config.template_offset, 0.0));

        let mut spine = Structure::new();
        spine.add_child(base);

        let offset = Vec3::new(0.0, self.config.vertebra_separation, 0.0);
        for i in 1..self.config.segments {
            let mut vertebra = template.clone();
            vertebra.add_tags(&format!("segment{}", i + 1));
            vertebra.translate((i + 1) as f32 * offset);
            spine.add_child(vertebra);
        }

        self.add_muscles(&mut spine)?;
        Ok(spine)
    }

    /// Strings the cables between each adjacent pair of segments: four
    /// vertical cables (matching node to matching node) and four saddle
    /// cables crossing between the tiers.
    fn add_muscles(&self, spine: &mut Structure) -> Result<(), SpineError> {
        for i in 1..spine.children().len() {
            let below = spine.children()[i - 1].nodes().to_vec();
            let above = spine.children()[i].nodes().to_vec();

            for (k, name) in VERTICAL_MUSCLE_NAMES.iter().enumerate() {
                let a = spine.add_node(below[k]);
                let b = spine.add_node(above[k]);
                spine.add_pair(a, b, &format!("vertical muscle {name}"))?;
            }

            let saddle_tag = format!("saddle muscle seg{}", i - 1);
            for (lower, upper) in SADDLE_ROUTES {
                let a = spine.add_node(below[lower]);
                let b = spine.add_node(above[upper]);
                spine.add_pair(a, b, &saddle_tag)?;
            }
        }
        Ok(())
    }
}
