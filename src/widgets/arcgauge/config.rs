//! Arc gauge configuration.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// A rectangle in texture space, given by its minimum corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl UvRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x_min(&self) -> f32 {
        self.x
    }

    pub fn y_min(&self) -> f32 {
        self.y
    }

    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }
}

/// Every parameter the arc gauge mesh is generated from.
///
/// Fields may be assigned any value. Out of range values are corrected by
/// [`GaugeConfig::clamp`] when the mesh is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Number of sections in the gauge. At least 1.
    pub sections: u32,
    /// Distance of the inner edge from the origin.
    pub distance: f32,
    /// Distance from the inner edge to the outer edge.
    pub thickness: f32,
    /// Starting angle in degrees. This is the left edge of a clockwise gauge and the right
    /// edge of a counter-clockwise one.
    pub angle: f32,
    /// Degrees between the first and last edge. Negative values produce a clockwise gauge.
    pub spread: f32,
    /// World width of the border, also used for the inset of the fill. A width of 0 disables
    /// border geometry.
    pub border_width: f32,
    /// Degrees between adjacent sections.
    pub section_buffer: f32,
    /// Number of quads per section fill. At least 3.
    pub slices: u32,
    pub border_color: Vec4,
    pub fill_color: Vec4,
    /// Each section holds 1 unit of value, so 2.5 on a three section gauge fills two sections
    /// and half of the third.
    pub value: f32,
    /// Texture rectangle separating the border from the fill.
    pub border_uv: UvRect,
    /// Texture rectangle the fill is stretched from.
    pub fill_uv: UvRect,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            sections: 3,
            distance: 1.0,
            thickness: 0.25,
            angle: 135.0,
            spread: -90.0,
            border_width: 0.05,
            section_buffer: 6.0,
            slices: 6,
            border_color: Vec4::ONE,
            fill_color: Vec4::ONE,
            value: 1.0,
            border_uv: UvRect::new(0.125, 0.125, 0.75, 0.75),
            fill_uv: UvRect::new(0.25, 0.25, 0.5, 0.5),
        }
    }
}

impl GaugeConfig {
    /// Parses a configuration from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }

    /// Moves every field into its valid range. Returns the names of the fields that changed.
    ///
    /// `value` is clamped against the already corrected section count.
    pub fn clamp(&mut self) -> Vec<&'static str> {
        let mut corrected = Vec::new();

        if self.sections < 1 {
            self.sections = 1;
            corrected.push("sections");
        }
        if self.slices < 3 {
            self.slices = 3;
            corrected.push("slices");
        }
        for (name, field) in [
            ("distance", &mut self.distance),
            ("thickness", &mut self.thickness),
            ("border_width", &mut self.border_width),
            ("section_buffer", &mut self.section_buffer),
        ] {
            if !field.is_finite() || *field < 0.0 {
                *field = 0.0;
                corrected.push(name);
            }
        }

        for (name, field) in [("angle", &mut self.angle), ("spread", &mut self.spread)] {
            if !field.is_finite() {
                *field = 0.0;
                corrected.push(name);
            }
        }

        let value = if self.value.is_finite() {
            self.value.clamp(0.0, self.sections as f32)
        } else {
            0.0
        };
        if value.to_bits() != self.value.to_bits() {
            self.value = value;
            corrected.push("value");
        }

        corrected
    }
}
