//! Angular layout of an arc gauge.
//!
//! All spreads returned here are directionless angles in degrees. Multiply by
//! [`ArcLayout::direction`] to lay them out along the gauge.

use glam::Vec3;

use super::GaugeConfig;

/// Converts polar coordinates, with the angle in degrees, into a point on the z = 0 plane.
pub fn polar_to_cartesian(radius: f32, degrees: f32) -> Vec3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec3::new(radius * cos, radius * sin, 0.0)
}

/// Apex angle in degrees of an isosceles triangle with the given base and legs.
///
/// The sine argument is clamped so a base wider than both legs gives a straight angle
/// instead of NaN.
fn isosceles_apex(base: f32, leg: f32) -> f32 {
    let ratio = if leg > 0.0 {
        (base * 0.5 / leg).clamp(0.0, 1.0)
    } else {
        1.0
    };
    2.0 * ratio.asin().to_degrees()
}

/// Computes the angles of every sub-shape of a gauge from its configuration.
///
/// The layout assumes a clamped configuration (see [`GaugeConfig::clamp`]).
#[derive(Debug, Clone, Copy)]
pub struct ArcLayout<'a> {
    config: &'a GaugeConfig,
}

impl<'a> ArcLayout<'a> {
    pub fn new(config: &'a GaugeConfig) -> Self {
        Self { config }
    }

    /// `1.0` for counter-clockwise gauges and `-1.0` for clockwise ones. A spread of zero
    /// counts as counter-clockwise.
    pub fn direction(&self) -> f32 {
        if self.config.spread < 0.0 { -1.0 } else { 1.0 }
    }

    fn raw_section_spread(&self) -> f32 {
        let sections = self.config.sections.max(1) as f32;
        (self.config.spread.abs() - (sections - 1.0) * self.config.section_buffer) / sections
    }

    /// Angle covered by one section, excluding the buffers around it.
    pub fn section_spread(&self) -> f32 {
        self.raw_section_spread().max(0.0)
    }

    /// Starting angle of the section at `index`.
    pub fn section_angle(&self, index: u32) -> f32 {
        self.config.angle
            + index as f32 * self.direction() * (self.section_spread() + self.config.section_buffer)
    }

    /// Ending angle of the section at `index`.
    pub fn section_end_angle(&self, index: u32) -> f32 {
        self.section_angle(index) + self.direction() * self.section_spread()
    }

    fn mid_radius(&self) -> f32 {
        self.config.distance + self.config.thickness * 0.5
    }

    /// Angle the border width covers at the middle of the ring, so borders keep roughly the
    /// same world width at any radius. Never more than half a section.
    pub fn border_spread(&self) -> f32 {
        if self.config.border_width <= 0.0 {
            return 0.0;
        }
        isosceles_apex(self.config.border_width, self.mid_radius())
            .min(self.section_spread() * 0.5)
    }

    /// Angle between the two border corners of a section, which the fill and the middle
    /// border ticks share.
    pub fn fill_capable_spread(&self) -> f32 {
        (self.section_spread() - 2.0 * self.border_spread()).max(0.0)
    }

    /// Angle of one middle border tick.
    pub fn slice_spread(&self) -> f32 {
        self.fill_capable_spread() / self.config.slices.max(1) as f32
    }

    /// Filled angle of the section at `section`.
    pub fn fill_spread(&self, section: u32) -> f32 {
        (self.config.value - section as f32).clamp(0.0, 1.0) * self.fill_capable_spread()
    }

    /// Filled angle of one slice of a section.
    ///
    /// The first and last slices keep the border width until the fill no longer covers both
    /// of them, then shrink together while the interior slices collapse to zero.
    pub fn fill_slice_spread(&self, section: u32, slice: u32) -> f32 {
        let fill = self.fill_spread(section);
        let border = self.border_spread();
        let slices = self.config.slices;

        if slice == 0 || slice + 1 == slices {
            if fill > border * 2.0 { border } else { fill * 0.5 }
        } else if fill > border * 2.0 {
            (fill - border * 2.0) / slices.saturating_sub(2).max(1) as f32
        } else {
            0.0
        }
    }

    /// Sum of the filled angles of every section.
    pub fn total_fill_spread(&self) -> f32 {
        (0..self.config.sections).map(|i| self.fill_spread(i)).sum()
    }

    /// Whether the configuration only lays out because of clamping: the section buffers eat
    /// more than the whole spread or the border is wider than the ring can hold.
    pub fn is_degenerate(&self) -> bool {
        if self.raw_section_spread() < 0.0 {
            return true;
        }
        if self.config.border_width > 0.0 {
            let mid = self.mid_radius();
            if mid <= 0.0 || self.config.border_width * 0.5 / mid > 1.0 {
                return true;
            }
            let apex = isosceles_apex(self.config.border_width, mid);
            return apex * 2.0 > self.section_spread();
        }
        false
    }
}
