// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! Abstract Syntax Tree module
//!
//! Defines the AST structure for OpenSCAD-compatible operations

mod evaluator;
mod node;

pub use evaluator::Evaluator;
pub use node::{Node, NodeKind, TransformOp, Vec3};
