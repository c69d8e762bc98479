//! Texture coordinates for the arc gauge.
//!
//! The texture is nine-sliced twice. The border rectangle splits the outer border from the
//! fill, and the fill rectangle splits the fill's own border from its stretched middle.
//! Texture u runs along the arc and v runs outwards from the inner edge.

use glam::{Vec2, vec2};

use super::UvRect;

/// Row or column boundaries of a nine-slice, from the low edge to the high edge.
type Lines = [f32; 4];

/// UV lookup for every quad the gauge emits.
pub struct GaugeUvs {
    /// Outer nine-slice columns and rows.
    border_u: Lines,
    border_v: Lines,
    /// Inner nine-slice columns and rows, nested inside the border rectangle.
    fill_u: Lines,
    fill_v: Lines,
    slices: u32,
}

/// Corner of a section border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Leading,
    Trailing,
}

/// Radial band of a quad, from the inner edge outwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Bottom,
    Middle,
    Top,
}

impl Band {
    fn index(self) -> usize {
        match self {
            Band::Bottom => 0,
            Band::Middle => 1,
            Band::Top => 2,
        }
    }
}

/// Returns the UVs of a quad covering `[u0, u1] x [v0, v1]`, in the order quads emit their
/// corners: inner start, outer start, outer end, inner end.
pub fn quad_uvs(u: [f32; 2], v: [f32; 2]) -> [Vec2; 4] {
    [
        vec2(u[0], v[0]),
        vec2(u[0], v[1]),
        vec2(u[1], v[1]),
        vec2(u[1], v[0]),
    ]
}

impl GaugeUvs {
    pub fn new(border: UvRect, fill: UvRect, slices: u32) -> Self {
        Self {
            border_u: [0.0, border.x_min(), border.x_max(), 1.0],
            border_v: [0.0, border.y_min(), border.y_max(), 1.0],
            fill_u: [border.x_min(), fill.x_min(), fill.x_max(), border.x_max()],
            fill_v: [border.y_min(), fill.y_min(), fill.y_max(), border.y_max()],
            slices,
        }
    }

    fn cell(lines: &Lines, index: usize) -> [f32; 2] {
        [lines[index], lines[index + 1]]
    }

    /// One of the three quads of a border corner.
    pub fn border_corner(&self, side: Side, band: Band) -> [Vec2; 4] {
        let column = match side {
            Side::Leading => 0,
            Side::Trailing => 2,
        };
        quad_uvs(
            Self::cell(&self.border_u, column),
            Self::cell(&self.border_v, band.index()),
        )
    }

    /// A middle border tick. The border rectangle's width is shared evenly by every slice.
    pub fn border_tick(&self, slice: u32, band: Band) -> [Vec2; 4] {
        let [min, max] = Self::cell(&self.border_u, 1);
        let step = (max - min) / self.slices as f32;
        quad_uvs(
            [min + slice as f32 * step, min + (slice + 1) as f32 * step],
            Self::cell(&self.border_v, band.index()),
        )
    }

    /// A fill quad. The first and last slices map to the fill's border columns and the
    /// interior slices share the fill rectangle's width.
    pub fn fill(&self, slice: u32, band: Band) -> [Vec2; 4] {
        let u = if slice == 0 {
            Self::cell(&self.fill_u, 0)
        } else if slice + 1 == self.slices {
            Self::cell(&self.fill_u, 2)
        } else {
            let [min, max] = Self::cell(&self.fill_u, 1);
            let step = (max - min) / self.slices.saturating_sub(2).max(1) as f32;
            [
                min + (slice - 1) as f32 * step,
                min + slice as f32 * step,
            ]
        };
        quad_uvs(u, Self::cell(&self.fill_v, band.index()))
    }
}
