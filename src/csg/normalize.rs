// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! CSG tree normalization
//!
//! Rewrites an arbitrary CSG tree into the canonical left-deep form where
//! unions sit at the top and every non-union operation has a primitive
//! right operand, so boolean evaluation can run as a left-to-right
//! accumulation against primitives.
//!
//! Reference: Goldfeather, J., Molnar, S., Turk, G., and Fuchs, H.
//! "Near Realtime CSG Rendering Using Tree Normalization and Geometric
//! Pruning." IEEE Computer Graphics and Applications, 9(3):20-28, 1989.

use super::term::{BooleanOp, CsgTerm, TermRef};
use std::sync::Arc;

/// Normalize a CSG tree to a fixed point of the rewrite rules.
///
/// Returns `None` when pruning inside the rewrites eliminates the whole
/// volume. Untouched subtrees are shared with the input; the input itself
/// is never mutated.
pub fn normalize(term: Arc<CsgTerm>) -> TermRef {
    if term.is_primitive() {
        return Some(term);
    }

    let mut current: TermRef = Some(term);
    let (op, left, right) = loop {
        // Rewrite the head of the tree until no rule fires
        while let Some(t) = current.clone() {
            if t.is_primitive() {
                break;
            }
            let (next, changed) = normalize_tail(&t);
            current = next;
            if !changed {
                break;
            }
        }

        let Some(t) = current.take() else { return None };
        if t.is_primitive() {
            return Some(t);
        }
        let CsgTerm::Operation {
            op, left, right, ..
        } = &*t
        else {
            unreachable!()
        };
        let (op, right) = (*op, right.clone());

        match normalize(left.clone()) {
            Some(left) => {
                // Keep tightening the left spine until the right operand is
                // a plain primitive and the left side is no longer a
                // pending union; unions are already in target shape here.
                if op != BooleanOp::Union && (!right.is_primitive() || left.is_union()) {
                    current = Some(CsgTerm::operation_node(op, left, right));
                    continue;
                }
                break (op, left, right);
            }
            None => {
                // The left subtree pruned away entirely; collapse the node
                // and keep rewriting whatever survives.
                current = match op {
                    BooleanOp::Union => Some(right),
                    BooleanOp::Difference | BooleanOp::Intersection => None,
                };
                continue;
            }
        }
    };

    // Normalizing the right operand may itself produce an absent result,
    // so the empty-operand algebra is applied once more on the way out.
    match normalize(right) {
        Some(right) => Some(CsgTerm::operation_node(op, left, right)),
        None => match op {
            BooleanOp::Union | BooleanOp::Difference => Some(left),
            BooleanOp::Intersection => None,
        },
    }
}

/// Apply at most one local rewrite at the root of `term`.
///
/// Returns the (possibly pruned) replacement and whether a rule fired.
/// Replacement subterms go through the pruning constructor, so every
/// rewrite step re-applies the bounding-box tests.
fn normalize_tail(term: &Arc<CsgTerm>) -> (TermRef, bool) {
    use BooleanOp::{Difference, Intersection, Union};

    let CsgTerm::Operation {
        op, left, right, ..
    } = &**term
    else {
        return (Some(term.clone()), false);
    };
    if *op == Union {
        return (Some(term.clone()), false);
    }

    // Part A: the 'x . (y . z)' expressions
    if let CsgTerm::Operation {
        op: right_op,
        left: y,
        right: z,
        ..
    } = &**right
    {
        let x = left;
        let rewritten = match (*op, *right_op) {
            // 1. x - (y + z) -> (x - y) - z
            (Difference, Union) => CsgTerm::operation(
                Difference,
                CsgTerm::operation(Difference, Some(x.clone()), Some(y.clone())),
                Some(z.clone()),
            ),
            // 2. x * (y + z) -> (x * y) + (x * z)
            (Intersection, Union) => CsgTerm::operation(
                Union,
                CsgTerm::operation(Intersection, Some(x.clone()), Some(y.clone())),
                CsgTerm::operation(Intersection, Some(x.clone()), Some(z.clone())),
            ),
            // 3. x - (y * z) -> (x - y) + (x - z)
            (Difference, Intersection) => CsgTerm::operation(
                Union,
                CsgTerm::operation(Difference, Some(x.clone()), Some(y.clone())),
                CsgTerm::operation(Difference, Some(x.clone()), Some(z.clone())),
            ),
            // 4. x * (y * z) -> (x * y) * z
            (Intersection, Intersection) => CsgTerm::operation(
                Intersection,
                CsgTerm::operation(Intersection, Some(x.clone()), Some(y.clone())),
                Some(z.clone()),
            ),
            // 5. x - (y - z) -> (x - y) + (x * z)
            (Difference, Difference) => CsgTerm::operation(
                Union,
                CsgTerm::operation(Difference, Some(x.clone()), Some(y.clone())),
                CsgTerm::operation(Intersection, Some(x.clone()), Some(z.clone())),
            ),
            // 6. x * (y - z) -> (x * y) - z
            (Intersection, Difference) => CsgTerm::operation(
                Difference,
                CsgTerm::operation(Intersection, Some(x.clone()), Some(y.clone())),
                Some(z.clone()),
            ),
            (Union, _) => unreachable!("unions are canonical at this level"),
        };
        return (rewritten, true);
    }

    // Part B: the '(x . y) . z' expressions; the right operand is a
    // primitive at this point
    if let CsgTerm::Operation {
        op: left_op,
        left: x,
        right: y,
        ..
    } = &**left
    {
        let z = right;
        let rewritten = match (*left_op, *op) {
            // 7. (x - y) * z -> (x * z) - y
            (Difference, Intersection) => CsgTerm::operation(
                Difference,
                CsgTerm::operation(Intersection, Some(x.clone()), Some(z.clone())),
                Some(y.clone()),
            ),
            // 8. (x + y) - z -> (x - z) + (y - z)
            (Union, Difference) => CsgTerm::operation(
                Union,
                CsgTerm::operation(Difference, Some(x.clone()), Some(z.clone())),
                CsgTerm::operation(Difference, Some(y.clone()), Some(z.clone())),
            ),
            // 9. (x + y) * z -> (x * z) + (y * z)
            (Union, Intersection) => CsgTerm::operation(
                Union,
                CsgTerm::operation(Intersection, Some(x.clone()), Some(z.clone())),
                CsgTerm::operation(Intersection, Some(y.clone()), Some(z.clone())),
            ),
            _ => return (Some(term.clone()), false),
        };
        return (rewritten, true);
    }

    (Some(term.clone()), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Primitive;
    use nalgebra::{Matrix4, Vector3};

    // Overlapping cubes so no bounding-box pruning interferes with the
    // algebraic rewrites under test
    fn cube(offset: f64, label: &str) -> Arc<CsgTerm> {
        let solid = Arc::new(Primitive::cube(Vector3::new(2.0, 2.0, 2.0), false));
        let transform = Matrix4::new_translation(&Vector3::new(offset, 0.0, 0.0));
        CsgTerm::primitive(solid, transform, [1.0, 1.0, 1.0, 1.0], label)
    }

    fn op(kind: BooleanOp, left: &Arc<CsgTerm>, right: &Arc<CsgTerm>) -> Arc<CsgTerm> {
        CsgTerm::operation(kind, Some(left.clone()), Some(right.clone())).unwrap()
    }

    #[test]
    fn test_primitive_is_already_normal() {
        let x = cube(0.0, "x");
        let normalized = normalize(x.clone()).unwrap();
        assert!(Arc::ptr_eq(&normalized, &x));
    }

    #[test]
    fn test_difference_of_union_rewrites_left_deep() {
        let (x, y, z) = (cube(0.0, "x"), cube(0.5, "y"), cube(1.0, "z"));
        let term = op(BooleanOp::Difference, &x, &op(BooleanOp::Union, &y, &z));

        let normalized = normalize(term).unwrap();
        assert_eq!(normalized.to_string(), "((x - y) - z)");
    }

    #[test]
    fn test_intersection_of_union_distributes() {
        let (x, y, z) = (cube(0.0, "x"), cube(0.5, "y"), cube(1.0, "z"));
        let term = op(BooleanOp::Intersection, &op(BooleanOp::Union, &x, &y), &z);

        let normalized = normalize(term).unwrap();
        assert_eq!(normalized.to_string(), "((x * z) + (y * z))");
    }

    #[test]
    fn test_union_over_difference_distributes() {
        let (x, y, z) = (cube(0.0, "x"), cube(0.5, "y"), cube(1.0, "z"));
        let term = op(BooleanOp::Difference, &op(BooleanOp::Union, &x, &y), &z);

        let normalized = normalize(term).unwrap();
        assert_eq!(normalized.to_string(), "((x - z) + (y - z))");
    }

    #[test]
    fn test_difference_of_difference() {
        let (x, y, z) = (cube(0.0, "x"), cube(0.5, "y"), cube(1.0, "z"));
        let term = op(BooleanOp::Difference, &x, &op(BooleanOp::Difference, &y, &z));

        let normalized = normalize(term).unwrap();
        assert_eq!(normalized.to_string(), "((x - y) + (x * z))");
    }

    #[test]
    fn test_intersection_with_difference_operand() {
        let (x, y, z) = (cube(0.0, "x"), cube(0.5, "y"), cube(1.0, "z"));
        let term = op(BooleanOp::Intersection, &op(BooleanOp::Difference, &x, &y), &z);

        let normalized = normalize(term).unwrap();
        assert_eq!(normalized.to_string(), "((x * z) - y)");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let (x, y, z) = (cube(0.0, "x"), cube(0.5, "y"), cube(1.0, "z"));
        let w = cube(1.5, "w");
        let term = op(
            BooleanOp::Difference,
            &op(BooleanOp::Union, &x, &y),
            &op(BooleanOp::Intersection, &z, &w),
        );

        let once = normalize(term).unwrap();
        let twice = normalize(once.clone()).unwrap();
        assert_eq!(*once, *twice);
    }

    #[test]
    fn test_pruning_during_rewrite_can_empty_the_tree() {
        // x sits in the gap between y and z: it overlaps the union's box
        // but neither operand, so distributing x * (y + z) prunes both
        // rewritten products and the whole tree collapses
        let solid = Arc::new(Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false));
        let x = CsgTerm::primitive(
            solid,
            Matrix4::new_translation(&Vector3::new(2.5, 0.0, 0.0)),
            [1.0, 1.0, 1.0, 1.0],
            "x",
        );
        let y = cube(0.0, "y");
        let z = cube(4.0, "z");
        let term = op(BooleanOp::Intersection, &x, &op(BooleanOp::Union, &y, &z));

        assert!(normalize(term).is_none());
    }
}
