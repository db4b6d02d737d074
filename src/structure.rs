//! Tagged node/pair graphs.
//!
//! A [`Structure`] is the declarative form of the robot: 3D nodes, tagged
//! pairs between them, and tagged child structures. It carries no physics of
//! its own; a build spec later translates the tags into rigid-body and cable
//! definitions.
//!
//! Tags are whitespace-separated tokens. A query matches when every token of
//! the query is present, so a pair tagged `"vertical muscle a"` matches the
//! queries `"muscle"`, `"vertical a"`, and `"vertical muscle a"`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SpineError;

/// Index of a node within its owning [`Structure`].
pub type NodeId = usize;

pub(crate) fn parse_tags(tags: &str) -> Vec<String> {
    tags.split_whitespace().map(str::to_owned).collect()
}

pub(crate) fn matches_tags(tags: &[String], query: &str) -> bool {
    query
        .split_whitespace()
        .all(|token| tags.iter().any(|t| t == token))
}

/// A tagged edge between two nodes of the same structure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pair {
    pub a: NodeId,
    pub b: NodeId,
    pub tags: Vec<String>,
}

impl Pair {
    /// True when this pair carries every token of `query`.
    pub fn has_tags(&self, query: &str) -> bool {
        matches_tags(&self.tags, query)
    }
}

/// A node/edge graph with tagged pairs and tagged children.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Structure {
    nodes: Vec<Vec3>,
    pairs: Vec<Pair>,
    children: Vec<Structure>,
    tags: Vec<String>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node at `position` and returns its id.
    pub fn add_node(&mut self, position: Vec3) -> NodeId {
        self.nodes.push(position);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id).copied()
    }

    pub fn nodes(&self) -> &[Vec3] {
        &self.nodes
    }

    /// Adds a tagged pair between two existing nodes.
    ///
    /// Both endpoints must reference nodes already added to this structure.
    pub fn add_pair(&mut self, a: NodeId, b: NodeId, tags: &str) -> Result<(), SpineError> {
        if a >= self.nodes.len() || b >= self.nodes.len() {
            return Err(SpineError::NodeOutOfBounds {
                a,
                b,
                node_count: self.nodes.len(),
            });
        }
        self.pairs.push(Pair {
            a,
            b,
            tags: parse_tags(tags),
        });
        Ok(())
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// World positions of a pair's endpoints.
    ///
    /// Endpoint ids were bounds-checked by [`add_pair`](Self::add_pair), so
    /// this never fails for pairs obtained from [`pairs`](Self::pairs).
    pub fn endpoints(&self, pair: &Pair) -> (Vec3, Vec3) {
        (self.nodes[pair.a], self.nodes[pair.b])
    }

    pub fn add_child(&mut self, child: Structure) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Structure] {
        &self.children
    }

    /// Appends the tokens of `tags` to this structure's tag list.
    pub fn add_tags(&mut self, tags: &str) {
        self.tags.extend(parse_tags(tags));
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// True when this structure carries every token of `query`.
    pub fn has_tags(&self, query: &str) -> bool {
        matches_tags(&self.tags, query)
    }

    /// Moves every node of this structure and all children by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for node in &mut self.nodes {
            *node += offset;
        }
        for child in &mut self.children {
            child.translate(offset);
        }
    }

    /// Pairs of this structure (not children) matching a tag query.
    pub fn pairs_with_tags<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Pair> {
        self.pairs.iter().filter(move |p| p.has_tags(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_pair_checks_bounds() {
        let mut s = Structure::new();
        let a = s.add_node(Vec3::ZERO);
        let err = s.add_pair(a, 5, "rod").unwrap_err();
        assert!(matches!(
            err,
            SpineError::NodeOutOfBounds {
                a: 0,
                b: 5,
                node_count: 1
            }
        ));
        assert!(s.pairs().is_empty());
    }

    #[test]
    fn tag_tokens_match_subsets() {
        let mut s = Structure::new();
        let a = s.add_node(Vec3::ZERO);
        let b = s.add_node(Vec3::Y);
        s.add_pair(a, b, "vertical muscle a").unwrap();

        let pair = &s.pairs()[0];
        assert_eq!(pair.tags, vec!["vertical", "muscle", "a"]);
        assert!(pair.has_tags("muscle"));
        assert!(pair.has_tags("vertical a"));
        assert!(pair.has_tags("vertical muscle a"));
        assert!(!pair.has_tags("saddle"));
        assert!(!pair.has_tags("muscle b"));
    }

    #[test]
    fn translate_is_recursive() {
        let mut child = Structure::new();
        child.add_node(Vec3::new(1.0, 0.0, 0.0));

        let mut parent = Structure::new();
        parent.add_node(Vec3::ZERO);
        parent.add_child(child);

        parent.translate(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(parent.nodes()[0], Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(parent.children()[0].nodes()[0], Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn structure_tags_accumulate() {
        let mut s = Structure::new();
        s.add_tags("segment1");
        s.add_tags("fixed base");
        assert!(s.has_tags("segment1"));
        assert!(s.has_tags("base segment1"));
        assert!(!s.has_tags("segment2"));
    }

    #[test]
    fn pairs_with_tags_filters() {
        let mut s = Structure::new();
        let a = s.add_node(Vec3::ZERO);
        let b = s.add_node(Vec3::Y);
        let c = s.add_node(Vec3::X);
        s.add_pair(a, b, "rod").unwrap();
        s.add_pair(b, c, "vertical muscle a").unwrap();
        s.add_pair(a, c, "saddle muscle seg0").unwrap();

        assert_eq!(s.pairs_with_tags("muscle").count(), 2);
        assert_eq!(s.pairs_with_tags("rod").count(), 1);
        assert_eq!(s.pairs_with_tags("seg0").count(), 1);
    }
}
