//! Tunables for the canvas and its overview.
//!
//! Every field has a default matching the shipped editor; hosts override
//! individual fields with struct-update syntax.

// ─── Canvas ───────────────────────────────────────────────────────────────

/// Configuration for viewport math, fit-to-content and edge rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    /// Multiplicative zoom step per wheel notch or shortcut. Default: **1.1**.
    pub zoom_step: f32,
    /// Lower bound of the viewport scale. Default: **0.1**.
    pub min_scale: f32,
    /// Upper bound of the viewport scale. Default: **3.0**.
    pub max_scale: f32,
    /// Fraction of the container that fit-to-content may fill. Default: **0.8**.
    pub fit_ratio: f32,
    /// Fit padding `(left, top, right, bottom)` in world units.
    /// Nodes are anchored at their top-left corner, so the right side gets
    /// extra room for the node footprint.
    pub fit_padding: (f32, f32, f32, f32),
    /// Footprint used for nodes the host has not measured yet.
    pub default_footprint: (f32, f32),
    /// Visible stroke width of a connection, in screen pixels.
    pub edge_width: f32,
    /// Width of the invisible hit region around a connection, in screen pixels.
    pub edge_hit_width: f32,
    /// Distance between a connection and its label anchor, in screen pixels.
    pub label_offset: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.1,
            min_scale: 0.1,
            max_scale: 3.0,
            fit_ratio: 0.8,
            fit_padding: (100.0, 100.0, 250.0, 100.0),
            default_footprint: (178.0, 50.0),
            edge_width: 2.0,
            edge_hit_width: 12.0,
            label_offset: 10.0,
        }
    }
}

impl CanvasConfig {
    /// Clamp a scale into `[min_scale, max_scale]`.
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

// ─── Minimap ──────────────────────────────────────────────────────────────

/// Configuration for the overview map.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapConfig {
    /// Overview width in pixels. Default: **200**.
    pub width: f32,
    /// Overview height in pixels. Default: **140**.
    pub height: f32,
    /// World-space margin added around the node bounding box. Default: **200**.
    pub padding: f32,
    /// Half-extent of the box shown when the map is empty. Default: **500**.
    pub empty_half_extent: f32,
    /// Distance from the container's bottom-right corner. Default: **16**.
    pub margin: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 140.0,
            padding: 200.0,
            empty_half_extent: 500.0,
            margin: 16.0,
        }
    }
}
