// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! Geometry module - bounding boxes and primitive solids

mod bbox;
mod primitives;

pub use bbox::BoundingBox;
pub use primitives::Primitive;
