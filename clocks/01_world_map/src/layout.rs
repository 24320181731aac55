//! Label layout - marker positions and collision-avoiding label offsets
//!
//! Zones are placed greedily in list order. Each label is pushed upward by
//! one step for every earlier marker close to its own, then clamped so the
//! whole box stays on the canvas.

use serde::{Deserialize, Serialize};

use crate::cities::geo_point;
use crate::projection::{CanvasSize, Projection};

/// Tunables for the label pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelLayoutConfig {
    /// Two markers closer than this on both axes count as overlapping
    pub threshold_px: f64,
    /// Offset of an unobstructed label (negative = above the marker)
    pub base_offset: f64,
    /// Extra displacement per overlapping earlier marker
    pub delta_y: f64,
    pub label_width: f64,
    pub label_height: f64,
    /// Gap kept between a clamped label and the canvas edge
    pub edge_margin: f64,
    /// Radius of the marker dot, also its click target
    pub marker_radius: f64,
}

impl Default for LabelLayoutConfig {
    fn default() -> Self {
        Self {
            threshold_px: 30.0,
            base_offset: -22.0,
            delta_y: 16.0,
            label_width: 60.0,
            label_height: 44.0,
            edge_margin: 2.0,
            marker_radius: 3.0,
        }
    }
}

/// Canvas position of a marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Everything needed to draw one zone on the map
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLabel<Z> {
    pub zone: Z,
    pub screen: ScreenPoint,
    /// Vertical offset of the label's top edge from `screen.y`
    pub offset: f64,
    pub display_name: String,
    pub time: String,
}

impl<Z> MarkerLabel<Z> {
    /// Label box as (left, top, right, bottom)
    pub fn label_box(&self, config: &LabelLayoutConfig) -> (f64, f64, f64, f64) {
        let left = self.screen.x - config.label_width / 2.0;
        let top = self.screen.y + self.offset;
        (left, top, left + config.label_width, top + config.label_height)
    }
}

/// Result of one layout pass, in zone list order
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout<Z> {
    pub labels: Vec<MarkerLabel<Z>>,
    pub config: LabelLayoutConfig,
}

impl<Z: PartialEq> MapLayout<Z> {
    #[allow(dead_code)]
    pub fn get(&self, zone: &Z) -> Option<&MarkerLabel<Z>> {
        self.labels.iter().find(|l| &l.zone == zone)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Topmost marker or label under a canvas point
    ///
    /// Later labels are drawn over earlier ones, so they win.
    pub fn label_at(&self, x: f64, y: f64) -> Option<&MarkerLabel<Z>> {
        self.labels.iter().rev().find(|label| {
            let (left, top, right, bottom) = label.label_box(&self.config);
            let in_box = x >= left && x <= right && y >= top && y <= bottom;
            let dx = x - label.screen.x;
            let dy = y - label.screen.y;
            let on_marker = dx * dx + dy * dy <= self.config.marker_radius.powi(2);
            in_box || on_marker
        })
    }
}

/// Number of earlier points within the threshold on both axes
fn overlap_count(point: ScreenPoint, placed: &[ScreenPoint], threshold: f64) -> usize {
    placed
        .iter()
        .filter(|prev| (point.x - prev.x).abs() < threshold && (point.y - prev.y).abs() < threshold)
        .count()
}

/// Keep the label box inside `[0, canvas_height]`
///
/// The bottom edge wins when the canvas is too short for the box.
pub fn clamp_offset(y: f64, offset: f64, canvas_height: f64, config: &LabelLayoutConfig) -> f64 {
    let mut offset = offset;
    if y + offset < 0.0 {
        offset = -y + config.edge_margin;
    }
    let bottom = y + offset + config.label_height;
    if bottom > canvas_height {
        offset -= bottom - canvas_height + config.edge_margin;
    }
    offset
}

/// Offsets for already projected points, in order
pub fn compute_offsets(
    points: &[ScreenPoint],
    canvas_height: f64,
    config: &LabelLayoutConfig,
) -> Vec<f64> {
    points
        .iter()
        .enumerate()
        .map(|(i, &point)| {
            let overlaps = overlap_count(point, &points[..i], config.threshold_px);
            let offset = config.base_offset - overlaps as f64 * config.delta_y;
            clamp_offset(point.y, offset, canvas_height, config)
        })
        .collect()
}

/// Lay out every zone of the list on the map
///
/// `zone_id` names a zone for the city table and `time_of` renders its live
/// time. Points the projection rejects are placed at the canvas origin.
pub fn layout_labels<Z, P>(
    zones: &[Z],
    zone_id: impl Fn(&Z) -> &str,
    projection: &P,
    canvas: CanvasSize,
    config: &LabelLayoutConfig,
    time_of: impl Fn(&Z) -> String,
) -> MapLayout<Z>
where
    Z: Clone,
    P: Projection + ?Sized,
{
    let resolved: Vec<_> = zones
        .iter()
        .map(|zone| {
            let geo = geo_point(zone_id(zone));
            let (x, y) = projection.project(geo.lon, geo.lat).unwrap_or_else(|| {
                tracing::debug!(zone = zone_id(zone), "unprojectable point, using origin");
                (0.0, 0.0)
            });
            (geo.name, ScreenPoint { x, y })
        })
        .collect();

    let points: Vec<ScreenPoint> = resolved.iter().map(|(_, p)| *p).collect();
    let offsets = compute_offsets(&points, canvas.height, config);

    let labels = zones
        .iter()
        .zip(resolved)
        .zip(offsets)
        .map(|((zone, (display_name, screen)), offset)| MarkerLabel {
            zone: zone.clone(),
            screen,
            offset,
            display_name,
            time: time_of(zone),
        })
        .collect();

    MapLayout {
        labels,
        config: *config,
    }
}
