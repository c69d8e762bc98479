//! Materials
//!
//! A [`Material`] is the CPU-side set of named color properties a shader program exposes as
//! uniforms. Widgets read and write these by name. A property that the material does not
//! declare can be neither read nor written.

use fxhash::FxHashMap;
use glam::Vec4;

/// A named set of color properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    colors: FxHashMap<String, Vec4>,
}

impl Material {
    /// Creates a material with no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a color property with an initial value.
    pub fn with_color(mut self, name: &str, value: Vec4) -> Self {
        self.colors.insert(name.to_string(), value);
        self
    }

    /// Whether the material declares the named color property.
    pub fn has_property(&self, name: &str) -> bool {
        self.colors.contains_key(name)
    }

    /// The value of a declared color property.
    pub fn color(&self, name: &str) -> Option<Vec4> {
        self.colors.get(name).copied()
    }

    /// Sets a declared color property. Returns `false` if the material has no such property.
    pub fn set_color(&mut self, name: &str, value: Vec4) -> bool {
        match self.colors.get_mut(name) {
            Some(color) => {
                *color = value;
                true
            }
            None => false,
        }
    }
}
