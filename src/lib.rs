// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! Goldfeather CSG Kernel
//!
//! Normalizes CSG expression trees into canonical left-deep form and
//! flattens them into ordered evaluation chains, pruning subtrees whose
//! bounding boxes prove them empty or irrelevant.

pub mod ast;
pub mod csg;
pub mod geometry;

pub use ast::{Node, NodeKind, TransformOp};
pub use csg::{normalize, BooleanOp, Color, CsgChain, CsgTerm, TermRef};
pub use geometry::{BoundingBox, Primitive};

use anyhow::Result;

/// Main entry point: evaluate an AST, normalize the resulting term tree
/// and flatten it into an evaluation chain
pub fn compile(ast: &Node) -> Result<CsgChain> {
    let evaluator = ast::Evaluator::new();
    let term = evaluator.evaluate(ast)?;
    let normalized = match term {
        Some(term) => normalize(term),
        None => None,
    };
    Ok(CsgChain::from_term_ref(&normalized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Vec3;

    #[test]
    fn test_compile_basic_difference() {
        let ast = Node::new(NodeKind::Difference(vec![
            Node::new(NodeKind::Cube {
                size: Vec3::new(20.0, 20.0, 20.0),
                center: false,
            }),
            Node::new(NodeKind::Transform {
                op: TransformOp::Translate(Vec3::new(10.0, 10.0, 10.0)),
                children: vec![Node::new(NodeKind::Sphere { r: 15.0 })],
            }),
        ]));

        let chain = compile(&ast).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.entries()[0].op, BooleanOp::Union);
        assert_eq!(chain.entries()[1].op, BooleanOp::Difference);
    }
}
