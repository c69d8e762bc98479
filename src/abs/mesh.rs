//! Mesh management module.
//!
//! This module defines [`MeshData`], the CPU-side geometry produced by a widget build, and
//! [`DoubleBufferedMesh`], which publishes that geometry into one of two [`MeshBuffer`] slots
//! so a renderer never reads a buffer that is being rewritten.

use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;

/// An interleaved vertex, laid out for direct upload into a GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub color: Vec4,
}

/// Geometry as parallel arrays. Every quad pushes 4 positions, uvs and colors and 6 indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all geometry, keeping the allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.colors.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }

    /// Appends a quad.
    ///
    /// `corners` and `uvs` are given in the same order. `flip` selects the `{0, 2, 1, 0, 3, 2}`
    /// triangle order instead of `{0, 1, 2, 0, 2, 3}`.
    pub fn push_quad(&mut self, corners: [Vec3; 4], uvs: [Vec2; 4], color: Vec4, flip: bool) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&corners);
        self.uvs.extend_from_slice(&uvs);
        self.colors.extend_from_slice(&[color; 4]);

        let order: [u32; 6] = if flip {
            [0, 2, 1, 0, 3, 2]
        } else {
            [0, 1, 2, 0, 2, 3]
        };
        self.indices.extend(order.iter().map(|i| base + i));
    }

    /// Iterates the geometry as interleaved vertices.
    pub fn vertices(&self) -> impl Iterator<Item = GaugeVertex> + '_ {
        self.positions
            .iter()
            .zip(&self.uvs)
            .zip(&self.colors)
            .map(|((&position, &uv), &color)| GaugeVertex {
                position,
                uv,
                color,
            })
    }
}

/// Axis aligned bounding box of a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Computes the bounds of the given points. An empty slice yields zero bounds.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points
            .iter()
            .skip(1)
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// One mesh slot, as handed to the renderer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeshBuffer {
    pub data: MeshData,
    pub bounds: Bounds,
}

impl MeshBuffer {
    /// Replaces the contents of this buffer with `data` and recalculates the bounds.
    pub fn replace(&mut self, data: &MeshData) {
        self.data.clear();
        self.data.positions.extend_from_slice(&data.positions);
        self.data.uvs.extend_from_slice(&data.uvs);
        self.data.colors.extend_from_slice(&data.colors);
        self.data.indices.extend_from_slice(&data.indices);
        self.bounds = Bounds::from_points(&self.data.positions);
    }
}

/// Identifies one of the two slots of a [`DoubleBufferedMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }

    fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Two mesh slots with a pointer to the live one.
///
/// Commits are written into the back slot and then the pointer is flipped.
pub struct DoubleBufferedMesh {
    buffers: Option<Box<[MeshBuffer; 2]>>,
    live: Slot,
    generation: u64,
}

impl DoubleBufferedMesh {
    /// Creates the swapper without allocating its slots. Call [`DoubleBufferedMesh::create`].
    pub fn new() -> Self {
        Self {
            buffers: None,
            live: Slot::A,
            generation: 0,
        }
    }

    /// Allocates both slots. Does nothing if they already exist.
    pub fn create(&mut self) {
        if self.buffers.is_none() {
            self.buffers = Some(Box::default());
            self.live = Slot::A;
        }
    }

    /// Releases both slots.
    pub fn destroy(&mut self) {
        self.buffers = None;
    }

    pub fn is_created(&self) -> bool {
        self.buffers.is_some()
    }

    /// Writes `data` into the back slot and makes it live.
    pub fn commit(&mut self, data: &MeshData) -> Result<(), String> {
        let buffers = self
            .buffers
            .as_mut()
            .ok_or_else(|| "mesh buffers have been destroyed".to_string())?;
        let back = self.live.other();
        buffers[back.index()].replace(data);
        self.live = back;
        self.generation += 1;
        Ok(())
    }

    /// The slot the renderer should read, if the buffers exist.
    pub fn live(&self) -> Option<&MeshBuffer> {
        self.buffers
            .as_ref()
            .map(|buffers| &buffers[self.live.index()])
    }

    pub fn live_slot(&self) -> Slot {
        self.live
    }

    /// Number of commits since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for DoubleBufferedMesh {
    fn default() -> Self {
        Self::new()
    }
}
