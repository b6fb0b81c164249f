// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! CSG term trees
//!
//! A term is either a primitive leaf (an opaque solid with its transform,
//! color and label) or a binary boolean operation over two child terms.
//! Terms are immutable once built and shared by reference counting, so
//! rewrites construct new nodes and reuse untouched subtrees.
//!
//! An absent term (`None` in a [`TermRef`]) stands for the empty volume.
//! It is a valid algebraic result, not an error: pruned intersections and
//! fully-subtracted volumes collapse to it.

use crate::geometry::BoundingBox;
use crate::Primitive;
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// RGBA display color attached to a primitive term
pub type Color = [f32; 4];

/// Boolean set operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

/// Shared handle to a term; `None` is the empty volume
pub type TermRef = Option<Arc<CsgTerm>>;

/// A node in a CSG expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum CsgTerm {
    Primitive {
        solid: Arc<Primitive>,
        transform: Matrix4<f64>,
        color: Color,
        label: String,
        bbox: BoundingBox,
    },
    Operation {
        op: BooleanOp,
        left: Arc<CsgTerm>,
        right: Arc<CsgTerm>,
        bbox: BoundingBox,
    },
}

impl CsgTerm {
    /// Build a primitive leaf. The bounding box is the solid's local box
    /// taken through `transform`.
    pub fn primitive(
        solid: Arc<Primitive>,
        transform: Matrix4<f64>,
        color: Color,
        label: impl Into<String>,
    ) -> Arc<CsgTerm> {
        let bbox = solid.bounding_box().transform(&transform);
        Arc::new(CsgTerm::Primitive {
            solid,
            transform,
            color,
            label: label.into(),
            bbox,
        })
    }

    /// Build an operation node, pruning where the bounding boxes already
    /// decide the outcome.
    ///
    /// Absent operands follow the degenerate algebra: an absent right keeps
    /// the left operand for union and difference and empties an
    /// intersection; an absent left keeps the right operand only for union.
    /// For present operands, a disjoint intersection collapses to absent
    /// and a disjoint difference keeps the left operand untouched
    /// (Goldfeather-style geometric pruning).
    pub fn operation(op: BooleanOp, left: TermRef, right: TermRef) -> TermRef {
        let (left, right) = match (left, right) {
            (left, None) => {
                return match op {
                    BooleanOp::Union | BooleanOp::Difference => left,
                    BooleanOp::Intersection => None,
                }
            }
            (None, right) => {
                return match op {
                    BooleanOp::Union => right,
                    BooleanOp::Difference | BooleanOp::Intersection => None,
                }
            }
            (Some(left), Some(right)) => (left, right),
        };

        let overlap = BoundingBox::intersection(left.bounding_box(), right.bounding_box());
        match op {
            // The volumes cannot meet: the whole product is empty
            BooleanOp::Intersection if overlap.is_null() => return None,
            // The subtrahend cannot remove anything from the minuend
            BooleanOp::Difference if overlap.is_null() => return Some(left),
            _ => {}
        }

        Some(Self::operation_node(op, left, right))
    }

    /// Allocate an operation node without any pruning test, computing its
    /// bounding box from the children.
    pub(crate) fn operation_node(
        op: BooleanOp,
        left: Arc<CsgTerm>,
        right: Arc<CsgTerm>,
    ) -> Arc<CsgTerm> {
        let bbox = match op {
            BooleanOp::Union => left.bounding_box().union_with(right.bounding_box()),
            BooleanOp::Intersection => {
                BoundingBox::intersection(left.bounding_box(), right.bounding_box())
            }
            BooleanOp::Difference => *left.bounding_box(),
        };
        Arc::new(CsgTerm::Operation {
            op,
            left,
            right,
            bbox,
        })
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        match self {
            CsgTerm::Primitive { bbox, .. } => bbox,
            CsgTerm::Operation { bbox, .. } => bbox,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, CsgTerm::Primitive { .. })
    }

    pub fn is_union(&self) -> bool {
        matches!(
            self,
            CsgTerm::Operation {
                op: BooleanOp::Union,
                ..
            }
        )
    }

    /// The node's operator, if it is an operation
    pub fn op(&self) -> Option<BooleanOp> {
        match self {
            CsgTerm::Operation { op, .. } => Some(*op),
            CsgTerm::Primitive { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&Arc<CsgTerm>> {
        match self {
            CsgTerm::Operation { left, .. } => Some(left),
            CsgTerm::Primitive { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&Arc<CsgTerm>> {
        match self {
            CsgTerm::Operation { right, .. } => Some(right),
            CsgTerm::Primitive { .. } => None,
        }
    }

    /// Number of primitive leaves in the tree
    pub fn primitive_count(&self) -> usize {
        match self {
            CsgTerm::Primitive { .. } => 1,
            CsgTerm::Operation { left, right, .. } => {
                left.primitive_count() + right.primitive_count()
            }
        }
    }
}

impl fmt::Display for CsgTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsgTerm::Primitive { label, .. } => write!(f, "{label}"),
            CsgTerm::Operation {
                op, left, right, ..
            } => {
                let symbol = match op {
                    BooleanOp::Union => "+",
                    BooleanOp::Intersection => "*",
                    BooleanOp::Difference => "-",
                };
                write!(f, "({left} {symbol} {right})")
            }
        }
    }
}
