// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! CSG module - term trees, normalization and flattened chains

mod chain;
mod normalize;
mod term;

pub use chain::{ChainEntry, CsgChain};
pub use normalize::normalize;
pub use term::{BooleanOp, Color, CsgTerm, TermRef};
