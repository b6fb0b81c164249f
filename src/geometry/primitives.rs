// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Goldfeather Team

//! Geometric primitives
//!
//! Primitives are opaque solids from the point of view of the CSG core: all
//! it ever asks of one is its local-space bounding box and a display label.
//! Surface tessellation lives downstream.

use super::BoundingBox;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometric primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    Sphere { r: f64 },
    Cylinder { h: f64, r: f64 },
    Cone { h: f64, r1: f64, r2: f64 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn sphere(r: f64) -> Self {
        Self::Sphere { r }
    }

    pub fn cylinder(h: f64, r: f64) -> Self {
        Self::Cylinder { h, r }
    }

    pub fn cone(h: f64, r1: f64, r2: f64) -> Self {
        Self::Cone { h, r1, r2 }
    }

    /// Local-space bounding box of the solid
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Self::Cube { size, center } => {
                if *center {
                    BoundingBox::new(
                        Point3::new(-size.x / 2.0, -size.y / 2.0, -size.z / 2.0),
                        Point3::new(size.x / 2.0, size.y / 2.0, size.z / 2.0),
                    )
                } else {
                    BoundingBox::new(Point3::origin(), Point3::new(size.x, size.y, size.z))
                }
            }
            Self::Sphere { r } => {
                BoundingBox::new(Point3::new(-r, -r, -r), Point3::new(*r, *r, *r))
            }
            // Cylinders and cones run from z=0 to z=h, matching OpenSCAD defaults
            Self::Cylinder { h, r } => {
                BoundingBox::new(Point3::new(-r, -r, 0.0), Point3::new(*r, *r, *h))
            }
            Self::Cone { h, r1, r2 } => {
                let r = r1.max(*r2);
                BoundingBox::new(Point3::new(-r, -r, 0.0), Point3::new(r, r, *h))
            }
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cube { size, center } => {
                if *center {
                    write!(f, "cube([{}, {}, {}], center = true)", size.x, size.y, size.z)
                } else {
                    write!(f, "cube([{}, {}, {}])", size.x, size.y, size.z)
                }
            }
            Self::Sphere { r } => write!(f, "sphere({r})"),
            Self::Cylinder { h, r } => write!(f, "cylinder(h = {h}, r = {r})"),
            Self::Cone { h, r1, r2 } => write!(f, "cylinder(h = {h}, r1 = {r1}, r2 = {r2})"),
        }
    }
}
