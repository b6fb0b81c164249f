// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! Flattened CSG chains
//!
//! A chain is the linear form of a normalized term: an ordered list of
//! primitives, each tagged with a boolean operator. A union-tagged entry
//! starts a new product; intersection and difference entries refine the
//! current product; the products are unioned into the final volume. It is
//! the structure handed to the rendering and evaluation stages.

use super::term::{BooleanOp, Color, CsgTerm, TermRef};
use crate::geometry::BoundingBox;
use crate::Primitive;
use nalgebra::Matrix4;
use std::sync::Arc;

/// One primitive in evaluation order
#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub solid: Arc<Primitive>,
    pub transform: Matrix4<f64>,
    pub color: Color,
    pub op: BooleanOp,
    pub label: String,
}

/// Ordered, flat evaluation sequence imported from a normalized term tree
#[derive(Debug, Clone, Default)]
pub struct CsgChain {
    entries: Vec<ChainEntry>,
}

impl CsgChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a normalized term, joining its first primitive by union
    pub fn from_term(term: &Arc<CsgTerm>) -> Self {
        let mut chain = Self::new();
        chain.import(term, BooleanOp::Union);
        chain
    }

    /// Flatten an optional term; an absent term yields an empty chain
    pub fn from_term_ref(term: &TermRef) -> Self {
        match term {
            Some(term) => Self::from_term(term),
            None => Self::new(),
        }
    }

    /// Append the primitives of `term` in left-to-right order.
    ///
    /// The left branch inherits `op` from the calling context; the right
    /// branch takes the node's own operator. In a normalized term each
    /// union-tagged entry opens a new product that the following
    /// intersection and difference entries refine; flattening an
    /// arbitrary tree produces an order without that reading.
    pub fn import(&mut self, term: &Arc<CsgTerm>, op: BooleanOp) {
        match &**term {
            CsgTerm::Primitive {
                solid,
                transform,
                color,
                label,
                ..
            } => self.add(solid.clone(), *transform, *color, op, label.clone()),
            CsgTerm::Operation {
                op: node_op,
                left,
                right,
                ..
            } => {
                self.import(left, op);
                self.import(right, *node_op);
            }
        }
    }

    fn add(
        &mut self,
        solid: Arc<Primitive>,
        transform: Matrix4<f64>,
        color: Color,
        op: BooleanOp,
        label: String,
    ) {
        self.entries.push(ChainEntry {
            solid,
            transform,
            color,
            op,
            label,
        });
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-line-per-union rendering of the evaluation order
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            match entry.op {
                BooleanOp::Union => {
                    if i != 0 {
                        out.push('\n');
                    }
                    out.push('+');
                }
                BooleanOp::Difference => out.push_str(" -"),
                BooleanOp::Intersection => out.push_str(" *"),
            }
            out.push_str(&entry.label);
        }
        out.push('\n');
        out
    }

    /// Bounding box of the chain's visible extent.
    ///
    /// Difference entries are skipped since subtraction never enlarges the
    /// result.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for entry in &self.entries {
            if entry.op != BooleanOp::Difference {
                let solid_box = entry.solid.bounding_box();
                if !solid_box.is_null() {
                    let transformed = solid_box.transform(&entry.transform);
                    bbox.expand_to_include(&transformed.min);
                    bbox.expand_to_include(&transformed.max);
                }
            }
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn cube(offset: f64, label: &str) -> Arc<CsgTerm> {
        let solid = Arc::new(Primitive::cube(Vector3::new(2.0, 2.0, 2.0), false));
        let transform = Matrix4::new_translation(&Vector3::new(offset, 0.0, 0.0));
        CsgTerm::primitive(solid, transform, [1.0, 1.0, 1.0, 1.0], label)
    }

    fn op(kind: BooleanOp, left: &Arc<CsgTerm>, right: &Arc<CsgTerm>) -> Arc<CsgTerm> {
        CsgTerm::operation(kind, Some(left.clone()), Some(right.clone())).unwrap()
    }

    #[test]
    fn test_flatten_union_difference() {
        // (a + b) - c is already normalized; the chain lists a, b by union
        // and c by difference, in traversal order
        let (a, b, c) = (cube(0.0, "a"), cube(0.5, "b"), cube(1.0, "c"));
        let term = op(BooleanOp::Difference, &op(BooleanOp::Union, &a, &b), &c);

        let chain = CsgChain::from_term(&term);
        assert_eq!(chain.len(), 3);

        let ops: Vec<_> = chain.entries().iter().map(|e| (e.label.as_str(), e.op)).collect();
        assert_eq!(
            ops,
            vec![
                ("a", BooleanOp::Union),
                ("b", BooleanOp::Union),
                ("c", BooleanOp::Difference),
            ]
        );
    }

    #[test]
    fn test_entry_count_matches_primitive_leaves() {
        let (a, b, c) = (cube(0.0, "a"), cube(0.5, "b"), cube(1.0, "c"));
        let term = op(BooleanOp::Union, &op(BooleanOp::Union, &a, &b), &c);

        let chain = CsgChain::from_term(&term);
        assert_eq!(chain.len(), term.primitive_count());
    }

    #[test]
    fn test_dump_format() {
        let (a, b, c) = (cube(0.0, "a"), cube(0.5, "b"), cube(1.0, "c"));
        let term = op(BooleanOp::Difference, &op(BooleanOp::Union, &a, &b), &c);

        let chain = CsgChain::from_term(&term);
        assert_eq!(chain.dump(), "+a\n+b -c\n");
    }

    #[test]
    fn test_bounding_box_skips_difference_entries() {
        let (a, b) = (cube(0.0, "a"), cube(0.5, "b"));
        let far = cube(20.0, "far");

        // Force the subtrahend into the chain despite disjoint boxes
        let mut chain = CsgChain::from_term(&op(BooleanOp::Union, &a, &b));
        chain.import(&far, BooleanOp::Difference);
        assert_eq!(chain.len(), 3);

        let bbox = chain.bounding_box();
        assert_eq!(bbox.min.x, 0.0);
        assert_eq!(bbox.max.x, 2.5);
    }

    #[test]
    fn test_empty_chain() {
        let chain = CsgChain::from_term_ref(&None);
        assert!(chain.is_empty());
        assert!(chain.bounding_box().is_null());
        assert_eq!(chain.dump(), "\n");
    }
}
