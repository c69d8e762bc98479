//! A segmented radial gauge.
//!
//! The gauge is a ring split into sections. Each section has a nine-sliced border and a fill
//! that grows along the arc with the gauge's value. The mesh is rebuilt only after the
//! configuration changes and is published through a [`DoubleBufferedMesh`].

use glam::{Vec2, Vec4};
use log::{debug, warn};

use crate::abs::{DoubleBufferedMesh, Material, MeshBuffer, MeshData};

pub mod config;
pub mod layout;
pub mod uv;

pub use config::*;
pub use layout::*;
pub use uv::*;

/// Name of the color property the default material exposes.
pub const DEFAULT_COLOR_PROPERTY: &str = "u_color";

/// Pushes the quad spanning radii `r` and angles `a` (degrees) with the corner order
/// inner start, outer start, outer end, inner end.
fn push_polar_quad(
    mesh: &mut MeshData,
    r: [f32; 2],
    a: [f32; 2],
    uvs: [Vec2; 4],
    color: Vec4,
    flip: bool,
) {
    mesh.push_quad(
        [
            polar_to_cartesian(r[0], a[0]),
            polar_to_cartesian(r[1], a[0]),
            polar_to_cartesian(r[1], a[1]),
            polar_to_cartesian(r[0], a[1]),
        ],
        uvs,
        color,
        flip,
    );
}

pub struct ArcGauge {
    config: GaugeConfig,
    material: Material,
    color_property: String,
    visible: bool,
    revision: u64,
    built_revision: Option<u64>,
    scratch: MeshData,
    mesh: DoubleBufferedMesh,
}

impl ArcGauge {
    /// Creates a gauge, allocates its mesh buffers and builds the first mesh.
    pub fn new(config: GaugeConfig, material: Material) -> Self {
        let mut gauge = Self {
            config,
            material,
            color_property: DEFAULT_COLOR_PROPERTY.to_string(),
            visible: true,
            revision: 0,
            built_revision: None,
            scratch: MeshData::new(),
            mesh: DoubleBufferedMesh::new(),
        };
        gauge.create();
        gauge.commit();
        gauge
    }

    /// The configuration as of the last mutation. Fields are clamped on the next commit.
    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    /// Mutable access to the configuration. The next commit rebuilds the mesh.
    pub fn config_mut(&mut self) -> &mut GaugeConfig {
        self.mark_dirty();
        &mut self.config
    }

    /// Replaces the configuration, marking the gauge dirty only if anything changed.
    pub fn set_config(&mut self, config: GaugeConfig) {
        if config != self.config {
            self.config = config;
            self.mark_dirty();
        }
    }

    /// Sets the fill value, marking the gauge dirty if it changed.
    pub fn set_value(&mut self, value: f32) {
        if value != self.config.value {
            self.config.value = value;
            self.mark_dirty();
        }
    }

    /// Forces the next commit to rebuild the mesh.
    pub fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    /// Whether the configuration changed since the last published build.
    pub fn is_dirty(&self) -> bool {
        self.built_revision != Some(self.revision)
    }

    /// The angular layout of the current configuration.
    pub fn layout(&self) -> ArcLayout<'_> {
        ArcLayout::new(&self.config)
    }

    /// Adds a section the size of the existing ones. With `maintain_center`, the angle moves
    /// so the gauge stays centered on the same direction.
    pub fn add_section(&mut self, maintain_center: bool) {
        let layout = self.layout();
        let step = layout.direction() * (layout.section_spread() + self.config.section_buffer);

        self.config.sections += 1;
        self.shift_spread(step, maintain_center);
    }

    /// Removes a section, keeping the remaining ones the same size. Returns `false` and does
    /// nothing if only one section is left.
    pub fn remove_section(&mut self, maintain_center: bool) -> bool {
        if self.config.sections <= 1 {
            return false;
        }
        let layout = self.layout();
        let step = layout.direction() * (layout.section_spread() + self.config.section_buffer);

        self.config.sections -= 1;
        self.shift_spread(-step, maintain_center);
        true
    }

    fn shift_spread(&mut self, delta: f32, maintain_center: bool) {
        let old_spread = self.config.spread;
        self.config.spread += delta;
        if maintain_center {
            self.config.angle -= (self.config.spread - old_spread) * 0.5;
        }
        self.mark_dirty();
    }

    /// Rebuilds and publishes the mesh if the configuration changed since the last build.
    /// Returns whether a rebuild happened.
    pub fn commit(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        if !self.mesh.is_created() {
            warn!("Arc gauge committed after its mesh buffers were destroyed");
            return false;
        }

        let corrected = self.config.clamp();
        if !corrected.is_empty() {
            debug!("Clamped arc gauge fields: {}", corrected.join(", "));
        }

        let mut scratch = std::mem::take(&mut self.scratch);
        self.build_mesh(&mut scratch);
        let result = self.mesh.commit(&scratch);
        self.scratch = scratch;

        match result {
            Ok(()) => {
                self.built_revision = Some(self.revision);
                true
            }
            Err(e) => {
                warn!("Failed to publish arc gauge mesh: {}", e);
                false
            }
        }
    }

    /// Per-frame hook.
    pub fn late_update(&mut self) {
        self.commit();
    }

    /// Emits the gauge geometry for the current (clamped) configuration into `mesh`.
    pub fn build_mesh(&self, mesh: &mut MeshData) {
        mesh.clear();

        let config = &self.config;
        let layout = self.layout();
        if layout.is_degenerate() {
            warn!(
                "Arc gauge geometry is degenerate (spread {}, sections {}, buffer {}, border {})",
                config.spread, config.sections, config.section_buffer, config.border_width
            );
        }

        let uvs = GaugeUvs::new(config.border_uv, config.fill_uv, config.slices);
        let direction = layout.direction();
        let border = layout.border_spread();
        let flip = direction >= 0.0;

        let d = config.distance;
        let t = config.thickness;
        let bw = config.border_width;

        let fill_bands = [
            (Band::Bottom, [d + bw, d + 2.0 * bw]),
            (Band::Middle, [d + 2.0 * bw, d + t - 2.0 * bw]),
            (Band::Top, [d + t - 2.0 * bw, d + t - bw]),
        ];
        for section in 0..config.sections {
            let mut a2 = layout.section_angle(section) + direction * border;
            for slice in 0..config.slices {
                let a1 = a2;
                a2 += direction * layout.fill_slice_spread(section, slice);
                for (band, r) in fill_bands {
                    let uv = uvs.fill(slice, band);
                    push_polar_quad(mesh, r, [a1, a2], uv, config.fill_color, flip);
                }
            }
        }

        if bw <= 0.0 {
            return;
        }

        let border_bands = [
            (Band::Bottom, [d, d + bw]),
            (Band::Middle, [d + bw, d + t - bw]),
            (Band::Top, [d + t - bw, d + t]),
        ];
        let slice_spread = layout.slice_spread();
        for section in 0..config.sections {
            let start = layout.section_angle(section);
            let leading = [start, start + direction * border];
            for (band, r) in border_bands {
                let uv = uvs.border_corner(Side::Leading, band);
                push_polar_quad(mesh, r, leading, uv, config.border_color, flip);
            }

            let mut a2 = leading[1];
            for slice in 0..config.slices {
                let a1 = a2;
                a2 += direction * slice_spread;
                for (band, r) in [border_bands[0], border_bands[2]] {
                    let uv = uvs.border_tick(slice, band);
                    push_polar_quad(mesh, r, [a1, a2], uv, config.border_color, flip);
                }
            }

            let end = layout.section_end_angle(section);
            let trailing = [end - direction * border, end];
            for (band, r) in border_bands {
                let uv = uvs.border_corner(Side::Trailing, band);
                push_polar_quad(mesh, r, trailing, uv, config.border_color, flip);
            }
        }
    }

    /// The mesh the renderer should draw, if the buffers exist.
    pub fn live_mesh(&self) -> Option<&MeshBuffer> {
        self.mesh.live()
    }

    /// Allocates the mesh buffers. The next commit rebuilds into them.
    pub fn create(&mut self) {
        if !self.mesh.is_created() {
            self.mesh.create();
            self.mark_dirty();
        }
    }

    /// Releases both mesh buffers.
    pub fn destroy(&mut self) {
        self.mesh.destroy();
    }

    /// Makes the gauge visible to the renderer.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hides the gauge without releasing its mesh.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Whether the renderer should draw the gauge.
    pub fn is_showing(&self) -> bool {
        self.visible
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn color_property(&self) -> &str {
        &self.color_property
    }

    pub fn set_color_property(&mut self, name: &str) {
        self.color_property = name.to_string();
    }

    /// The material's color, or opaque white if the material has no color property.
    pub fn color(&self) -> Vec4 {
        self.material
            .color(&self.color_property)
            .unwrap_or(Vec4::ONE)
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.material.set_color(&self.color_property, color);
    }

    /// The material's alpha, or 1 if the material has no color property.
    pub fn alpha(&self) -> f32 {
        self.material
            .color(&self.color_property)
            .map_or(1.0, |c| c.w)
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if let Some(color) = self.material.color(&self.color_property)
            && color.w != alpha
        {
            self.material
                .set_color(&self.color_property, color.with_w(alpha));
        }
    }
}

impl Default for ArcGauge {
    fn default() -> Self {
        Self::new(
            GaugeConfig::default(),
            Material::new().with_color(DEFAULT_COLOR_PROPERTY, Vec4::ONE),
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn gauge(config: GaugeConfig) -> ArcGauge {
        ArcGauge::new(config, Material::new().with_color("u_color", Vec4::ONE))
    }

    fn live(gauge: &ArcGauge) -> &MeshData {
        &gauge.live_mesh().unwrap().data
    }

    fn signed_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
        (b - a).truncate().perp_dot((c - a).truncate()) * 0.5
    }

    /// Angular width of a quad, from its inner start and inner end corners.
    fn quad_width(mesh: &MeshData, quad: usize) -> f32 {
        let start = mesh.positions[quad * 4];
        let end = mesh.positions[quad * 4 + 3];
        let a = start.y.atan2(start.x).to_degrees();
        let b = end.y.atan2(end.x).to_degrees();
        (b - a).abs()
    }

    #[test]
    fn test_quad_counts() {
        let gauge = gauge(GaugeConfig {
            sections: 4,
            slices: 5,
            border_width: 0.05,
            ..Default::default()
        });
        let mesh = live(&gauge);
        let fill = 3 * 4 * 5;
        let border = 4 * (6 + 2 * 5);
        assert_eq!(mesh.quad_count(), fill + border);
        assert_eq!(mesh.positions.len(), 4 * (fill + border));
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
        assert_eq!(mesh.colors.len(), mesh.positions.len());
        assert_eq!(mesh.indices.len(), 6 * (fill + border));
    }

    #[test]
    fn test_no_border_without_width() {
        let gauge = gauge(GaugeConfig {
            sections: 2,
            slices: 7,
            border_width: 0.0,
            border_color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            fill_color: Vec4::new(0.0, 1.0, 0.0, 1.0),
            ..Default::default()
        });
        let mesh = live(&gauge);
        assert_eq!(mesh.quad_count(), 3 * 2 * 7);
        assert!(mesh.colors.iter().all(|c| *c == Vec4::new(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_colors_follow_pass() {
        let gauge = gauge(GaugeConfig {
            sections: 1,
            slices: 3,
            border_color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            fill_color: Vec4::new(0.0, 0.0, 1.0, 1.0),
            ..Default::default()
        });
        let mesh = live(&gauge);
        let fill_vertices = 4 * 3 * 3;
        assert!(mesh.colors[..fill_vertices].iter().all(|c| c.z == 1.0));
        assert!(mesh.colors[fill_vertices..].iter().all(|c| c.x == 1.0));
    }

    #[test]
    fn test_scenario_partial_fill() {
        let gauge = gauge(GaugeConfig {
            sections: 3,
            spread: -90.0,
            section_buffer: 6.0,
            border_width: 0.0,
            value: 1.5,
            ..Default::default()
        });
        let mesh = live(&gauge);
        let slices = gauge.config().slices as usize;
        let section_width = |section: usize| -> f32 {
            // Only the bottom band of every slice, so each slice is counted once.
            (0..slices)
                .map(|slice| quad_width(mesh, (section * slices + slice) * 3))
                .sum()
        };
        assert!(approx_eq(section_width(0), 26.0));
        assert!(approx_eq(section_width(1), 13.0));
        for quad in (2 * slices * 3)..(3 * slices * 3) {
            assert!(quad_width(mesh, quad) < 1e-4);
        }
    }

    #[test]
    fn test_winding_is_consistent() {
        for spread in [-120.0, 120.0] {
            let gauge = gauge(GaugeConfig {
                spread,
                value: 2.0,
                ..Default::default()
            });
            let mesh = live(&gauge);
            let mut negative = 0;
            for triangle in mesh.indices.chunks(3) {
                let [a, b, c] = [0, 1, 2].map(|i| mesh.positions[triangle[i] as usize]);
                let area = signed_area(a, b, c);
                assert!(area < 1e-6, "spread {} produced area {}", spread, area);
                if area < -1e-6 {
                    negative += 1;
                }
            }
            assert!(negative > 0);
        }

        let clockwise = gauge(GaugeConfig {
            spread: -90.0,
            ..Default::default()
        });
        let counter = gauge(GaugeConfig {
            spread: 90.0,
            ..Default::default()
        });
        assert_eq!(live(&clockwise).indices[..6], [0, 1, 2, 0, 2, 3]);
        assert_eq!(live(&counter).indices[..6], [0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn test_border_closes_section() {
        let gauge = gauge(GaugeConfig {
            sections: 1,
            slices: 4,
            ..Default::default()
        });
        let mesh = live(&gauge);
        let layout = gauge.layout();
        let fill_quads = 3 * 4;
        // Leading corner, then 4 bottom/top tick pairs, then the trailing corner.
        let last_bottom_tick = fill_quads + 3 + 2 * 3;
        let first_trailing = last_bottom_tick + 2;
        let tick_end = mesh.positions[last_bottom_tick * 4 + 3];
        let trailing_start = mesh.positions[first_trailing * 4];
        assert!(tick_end.distance(trailing_start) < 1e-4);

        let end = polar_to_cartesian(gauge.config().distance, layout.section_end_angle(0));
        assert!(mesh.positions[first_trailing * 4 + 3].distance(end) < 1e-4);
    }

    #[test]
    fn test_clamps_and_writes_back() {
        let mut gauge = gauge(GaugeConfig::default());
        gauge.config_mut().sections = 0;
        gauge.config_mut().slices = 2;
        gauge.config_mut().value = 10.0;
        assert!(gauge.commit());
        assert_eq!(gauge.config().sections, 1);
        assert_eq!(gauge.config().slices, 3);
        assert_eq!(gauge.config().value, 1.0);
    }

    #[test]
    fn test_degenerate_geometry_has_no_nan() {
        let gauge = gauge(GaugeConfig {
            sections: 5,
            spread: 10.0,
            section_buffer: 30.0,
            distance: 0.0,
            thickness: 0.0,
            border_width: 2.0,
            ..Default::default()
        });
        let mesh = live(&gauge);
        assert!(!mesh.is_empty());
        assert!(mesh.positions.iter().all(|p| p.is_finite()));
        assert!(mesh.uvs.iter().all(|uv| uv.is_finite()));
    }

    #[test]
    fn test_non_finite_config_builds_finite_mesh() {
        let mut gauge = gauge(GaugeConfig::default());
        gauge.config_mut().value = f32::NAN;
        gauge.config_mut().distance = f32::NAN;
        assert!(gauge.commit());
        let config = gauge.config();
        assert!(config.value >= 0.0 && config.value <= config.sections as f32);
        assert!(config.distance >= 0.0);
        assert!(live(&gauge).positions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut gauge = gauge(GaugeConfig::default());
        assert!(!gauge.is_dirty());
        assert!(!gauge.commit());

        gauge.set_value(2.0);
        assert!(gauge.is_dirty());
        assert!(gauge.commit());
        assert!(!gauge.commit());

        gauge.set_value(2.0);
        assert!(!gauge.is_dirty());
        gauge.set_config(gauge.config().clone());
        assert!(!gauge.is_dirty());

        gauge.add_section(true);
        assert!(gauge.is_dirty());
        gauge.late_update();
        assert!(!gauge.is_dirty());
    }

    #[test]
    fn test_rebuild_swaps_live_mesh() {
        let mut gauge = gauge(GaugeConfig {
            value: 0.0,
            border_width: 0.0,
            ..Default::default()
        });
        let before = live(&gauge).clone();
        gauge.set_value(3.0);
        gauge.commit();
        let after = live(&gauge);
        assert_eq!(before.quad_count(), after.quad_count());
        assert_ne!(&before, after);

        let bounds = gauge.live_mesh().unwrap().bounds;
        assert!(bounds.max.x <= 1.25 + 1e-4 && bounds.max.y <= 1.25 + 1e-4);
        assert!(after.positions.iter().all(|p| p.length() <= 1.2 + 1e-4));
    }

    #[test]
    fn test_add_then_remove_section() {
        let mut gauge = gauge(GaugeConfig::default());
        let original = gauge.config().clone();
        let center = original.angle + original.spread * 0.5;
        let width = gauge.layout().section_spread();

        gauge.add_section(true);
        let config = gauge.config();
        assert_eq!(config.sections, 4);
        assert!(approx_eq(config.spread, original.spread - (width + config.section_buffer)));
        assert!(approx_eq(config.angle + config.spread * 0.5, center));
        assert!(approx_eq(gauge.layout().section_spread(), width));

        assert!(gauge.remove_section(true));
        let config = gauge.config();
        assert_eq!(config.sections, original.sections);
        assert!(approx_eq(config.spread, original.spread));
        assert!(approx_eq(config.angle, original.angle));
    }

    #[test]
    fn test_add_section_without_center_keeps_angle() {
        let mut gauge = gauge(GaugeConfig {
            spread: 60.0,
            ..Default::default()
        });
        gauge.add_section(false);
        assert_eq!(gauge.config().angle, 135.0);
        assert!(gauge.config().spread > 60.0);
    }

    #[test]
    fn test_remove_last_section_fails() {
        let mut gauge = gauge(GaugeConfig {
            sections: 1,
            ..Default::default()
        });
        let before = gauge.config().clone();
        assert!(!gauge.remove_section(true));
        assert_eq!(gauge.config(), &before);
        assert!(!gauge.is_dirty());
    }

    #[test]
    fn test_destroyed_buffers_stay_dirty() {
        let mut gauge = gauge(GaugeConfig::default());
        gauge.destroy();
        assert!(gauge.live_mesh().is_none());
        gauge.set_value(2.0);
        assert!(!gauge.commit());
        assert!(gauge.is_dirty());

        gauge.create();
        assert!(gauge.commit());
        assert!(gauge.live_mesh().is_some());
    }

    #[test]
    fn test_visibility_and_color() {
        let mut gauge = ArcGauge::default();
        assert!(gauge.is_showing());
        gauge.hide();
        assert!(!gauge.is_showing());
        gauge.show();
        assert!(gauge.is_showing());

        gauge.set_color(Vec4::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(gauge.color(), Vec4::new(0.5, 0.5, 0.5, 1.0));
        gauge.set_alpha(2.0);
        assert_eq!(gauge.alpha(), 1.0);
        gauge.set_alpha(0.25);
        assert_eq!(gauge.alpha(), 0.25);
        assert_eq!(gauge.color().x, 0.5);

        gauge.set_color_property("u_missing");
        assert_eq!(gauge.color(), Vec4::ONE);
        assert_eq!(gauge.alpha(), 1.0);
        gauge.set_color(Vec4::ZERO);
        gauge.set_alpha(0.0);
        assert!(!gauge.material().has_property("u_missing"));
    }
}
