// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! AST Evaluator - converts AST to CSG term trees

use super::{Node, NodeKind};
use crate::csg::{BooleanOp, Color, CsgTerm, TermRef};
use crate::Primitive;
use anyhow::{ensure, Context, Result};
use dashmap::DashMap;
use nalgebra::Matrix4;
use std::sync::Arc;

const DEFAULT_COLOR: Color = [0.8, 0.8, 0.8, 1.0];

/// AST evaluator with caching support
pub struct Evaluator {
    cache: Arc<DashMap<String, TermRef>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Evaluate an AST node into a term tree.
    ///
    /// The result is `None` when the node describes an empty volume (empty
    /// boolean groups, or everything pruned away at construction).
    pub fn evaluate(&self, node: &Node) -> Result<TermRef> {
        // Check cache if node has an ID
        if let Some(id) = &node.id {
            if let Some(term) = self.cache.get(id) {
                return Ok(term.clone());
            }
        }

        let term = self.evaluate_node(&node.kind, &Matrix4::identity(), DEFAULT_COLOR)?;

        // Store in cache if node has an ID
        if let Some(id) = &node.id {
            self.cache.insert(id.clone(), term.clone());
        }

        Ok(term)
    }

    fn evaluate_node(
        &self,
        kind: &NodeKind,
        transform: &Matrix4<f64>,
        color: Color,
    ) -> Result<TermRef> {
        match kind {
            NodeKind::Cube { size, center } => {
                ensure!(
                    size.x > 0.0 && size.y > 0.0 && size.z > 0.0,
                    "cube dimensions must be positive, got [{}, {}, {}]",
                    size.x,
                    size.y,
                    size.z
                );
                Ok(primitive_term(Primitive::cube(*size, *center), transform, color))
            }

            NodeKind::Sphere { r } => {
                ensure!(*r > 0.0, "sphere radius must be positive, got {r}");
                Ok(primitive_term(Primitive::sphere(*r), transform, color))
            }

            NodeKind::Cylinder { h, r } => {
                ensure!(*h > 0.0, "cylinder height must be positive, got {h}");
                ensure!(*r > 0.0, "cylinder radius must be positive, got {r}");
                Ok(primitive_term(Primitive::cylinder(*h, *r), transform, color))
            }

            NodeKind::Cone { h, r1, r2 } => {
                ensure!(*h > 0.0, "cone height must be positive, got {h}");
                ensure!(
                    *r1 >= 0.0 && *r2 >= 0.0 && r1.max(*r2) > 0.0,
                    "cone radii must be non-negative with at least one positive"
                );
                Ok(primitive_term(Primitive::cone(*h, *r1, *r2), transform, color))
            }

            NodeKind::Union(children) => {
                self.evaluate_boolean(children, transform, color, BooleanOp::Union)
            }

            NodeKind::Difference(children) => {
                self.evaluate_boolean(children, transform, color, BooleanOp::Difference)
            }

            NodeKind::Intersection(children) => {
                self.evaluate_boolean(children, transform, color, BooleanOp::Intersection)
            }

            NodeKind::Transform { op, children } => {
                let new_transform = transform * op.to_matrix();

                if children.len() == 1 {
                    self.evaluate_node(&children[0].kind, &new_transform, color)
                } else {
                    self.evaluate_boolean(children, &new_transform, color, BooleanOp::Union)
                }
            }

            NodeKind::Color { rgba, children } => {
                if children.len() == 1 {
                    self.evaluate_node(&children[0].kind, transform, *rgba)
                } else {
                    self.evaluate_boolean(children, transform, *rgba, BooleanOp::Union)
                }
            }

            NodeKind::Empty => Ok(None),
        }
    }

    fn evaluate_boolean(
        &self,
        children: &[Node],
        transform: &Matrix4<f64>,
        color: Color,
        op: BooleanOp,
    ) -> Result<TermRef> {
        if children.is_empty() {
            return Ok(None);
        }

        let mut result = self
            .evaluate_node(&children[0].kind, transform, color)
            .context("Failed to evaluate first child")?;

        for child in &children[1..] {
            let child_term = self
                .evaluate_node(&child.kind, transform, color)
                .context("Failed to evaluate child")?;

            // The pruning constructor handles absent operands and disjoint
            // bounding boxes as it folds
            result = CsgTerm::operation(op, result, child_term);
        }

        Ok(result)
    }
}

fn primitive_term(solid: Primitive, transform: &Matrix4<f64>, color: Color) -> TermRef {
    let solid = Arc::new(solid);
    let label = solid.to_string();
    Some(CsgTerm::primitive(solid, *transform, color, label))
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
