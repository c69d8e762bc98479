//! This module contains the engine-facing abstractions the widgets build on: CPU-side meshes
//! with double buffering and materials with named color properties.

pub mod material;
pub mod mesh;

pub use material::*;
pub use mesh::*;
