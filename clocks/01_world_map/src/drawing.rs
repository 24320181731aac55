//! Drawing module - world map canvas, markers and zone labels
//!
//! The map is laid out on a fixed-size canvas (top-left origin, y down) and
//! scaled uniformly into the free area of the window.

use chrono_tz::Tz;
use nannou::prelude::*;

use crate::layout::{MapLayout, MarkerLabel};
use crate::projection::{CanvasSize, Projection};

/// Color palette for the world map clock
pub mod colors {
    use nannou::prelude::*;

    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 15,
        green: 23,
        blue: 42,
        standard: std::marker::PhantomData,
    };
    pub const MAP_FILL: Srgb<u8> = Srgb {
        red: 30,
        green: 41,
        blue: 59,
        standard: std::marker::PhantomData,
    };
    pub const GRATICULE: Srgb<u8> = Srgb {
        red: 71,
        green: 85,
        blue: 105,
        standard: std::marker::PhantomData,
    };
    pub const MARKER: Srgb<u8> = Srgb {
        red: 34,
        green: 211,
        blue: 238,
        standard: std::marker::PhantomData,
    };
    pub const LABEL_BG: Srgb<u8> = Srgb {
        red: 15,
        green: 23,
        blue: 42,
        standard: std::marker::PhantomData,
    };
    pub const LABEL_NAME: Srgb<u8> = Srgb {
        red: 103,
        green: 232,
        blue: 249,
        standard: std::marker::PhantomData,
    };
    pub const LABEL_TIME: Srgb<u8> = Srgb {
        red: 209,
        green: 213,
        blue: 219,
        standard: std::marker::PhantomData,
    };
    pub const SELECTED: Srgb<u8> = Srgb {
        red: 250,
        green: 204,
        blue: 21,
        standard: std::marker::PhantomData,
    };
}

/// Placement of the map canvas inside the window
#[derive(Debug, Clone, Copy)]
pub struct MapView {
    /// Window area reserved for the map
    pub rect: Rect,
    /// Window pixels per canvas pixel
    pub scale: f32,
    /// Window position of the canvas's top-left corner
    pub origin: Point2,
}

impl MapView {
    /// Fit the canvas into the window area left free by the egui panels
    pub fn calculate(
        window_rect: Rect,
        left_panel_width: f32,
        bottom_panel_height: f32,
        canvas: CanvasSize,
    ) -> Self {
        let rect = Rect::from_corners(
            pt2(window_rect.left() + left_panel_width, window_rect.bottom() + bottom_panel_height),
            pt2(window_rect.right(), window_rect.top()),
        );

        let scale_x = rect.w() / canvas.width as f32;
        let scale_y = rect.h() / canvas.height as f32;
        let scale = scale_x.min(scale_y).max(0.01);

        // Centre the canvas in the free area
        let origin = pt2(
            rect.x() - canvas.width as f32 * scale / 2.0,
            rect.y() + canvas.height as f32 * scale / 2.0,
        );

        Self { rect, scale, origin }
    }

    pub fn contains(&self, point: Point2) -> bool {
        point.x >= self.rect.left()
            && point.x <= self.rect.right()
            && point.y >= self.rect.bottom()
            && point.y <= self.rect.top()
    }

    pub fn to_window(&self, x: f64, y: f64) -> Point2 {
        pt2(
            self.origin.x + x as f32 * self.scale,
            self.origin.y - y as f32 * self.scale,
        )
    }

    pub fn to_canvas(&self, point: Point2) -> (f64, f64) {
        (
            ((point.x - self.origin.x) / self.scale) as f64,
            ((self.origin.y - point.y) / self.scale) as f64,
        )
    }
}

/// Canvas background and a 30 degree graticule
pub fn draw_map_base<P: Projection>(
    draw: &Draw,
    view: &MapView,
    canvas: CanvasSize,
    projection: &P,
) {
    let center = view.to_window(canvas.width / 2.0, canvas.height / 2.0);
    draw.rect()
        .xy(center)
        .w_h(canvas.width as f32 * view.scale, canvas.height as f32 * view.scale)
        .color(colors::MAP_FILL);

    let inside = |(x, y): (f64, f64)| x >= 0.0 && x <= canvas.width && y >= 0.0 && y <= canvas.height;

    // Meridians
    for lon in (-180..=180).step_by(30) {
        let points: Vec<Point2> = (-80..=80)
            .filter_map(|lat| projection.project(lon as f64, lat as f64))
            .filter(|&p| inside(p))
            .map(|(x, y)| view.to_window(x, y))
            .collect();
        if points.len() > 1 {
            draw.polyline()
                .weight(1.0)
                .color(colors::GRATICULE)
                .points(points);
        }
    }

    // Parallels
    for lat in (-60..=60).step_by(30) {
        let points: Vec<Point2> = (-180..=180)
            .filter_map(|lon| projection.project(lon as f64, lat as f64))
            .filter(|&p| inside(p))
            .map(|(x, y)| view.to_window(x, y))
            .collect();
        if points.len() > 1 {
            let weight = if lat == 0 { 1.5 } else { 1.0 };
            draw.polyline()
                .weight(weight)
                .color(colors::GRATICULE)
                .points(points);
        }
    }
}

/// Markers first, then labels in list order so later labels sit on top
pub fn draw_markers(draw: &Draw, view: &MapView, layout: &MapLayout<Tz>, selected: Option<Tz>) {
    let radius = layout.config.marker_radius as f32 * view.scale;

    for label in &layout.labels {
        let center = view.to_window(label.screen.x, label.screen.y);
        draw.ellipse()
            .xy(center)
            .radius(radius.max(2.0))
            .color(colors::MARKER)
            .stroke(WHITE)
            .stroke_weight(1.0);
    }

    for label in &layout.labels {
        draw_label(draw, view, layout, label, selected == Some(label.zone));
    }
}

fn draw_label(
    draw: &Draw,
    view: &MapView,
    layout: &MapLayout<Tz>,
    label: &MarkerLabel<Tz>,
    is_selected: bool,
) {
    let (left, top, right, bottom) = label.label_box(&layout.config);
    let center = view.to_window((left + right) / 2.0, (top + bottom) / 2.0);
    let w = (right - left) as f32 * view.scale;
    let h = (bottom - top) as f32 * view.scale;

    draw.rect()
        .xy(center)
        .w_h(w, h)
        .color(srgba(
            colors::LABEL_BG.red,
            colors::LABEL_BG.green,
            colors::LABEL_BG.blue,
            224u8,
        ));

    if is_selected {
        draw.rect()
            .xy(center)
            .w_h(w, h)
            .no_fill()
            .stroke(colors::SELECTED)
            .stroke_weight(1.5);
    }

    let font_scale = view.scale.clamp(0.75, 2.0);
    draw.text(&label.display_name)
        .xy(center + vec2(0.0, h * 0.18))
        .color(colors::LABEL_NAME)
        .font_size((11.0 * font_scale) as u32)
        .w(w);

    draw.text(&label.time)
        .xy(center - vec2(0.0, h * 0.18))
        .color(colors::LABEL_TIME)
        .font_size((10.0 * font_scale) as u32)
        .w(w);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_view_round_trip() {
        let window = Rect::from_w_h(1200.0, 800.0);
        let view = MapView::calculate(window, 280.0, 120.0, CanvasSize::default());

        // 920 x 680 free, canvas 800 x 400 -> width-bound
        assert!((view.scale - 1.15).abs() < 1e-5);

        let p = view.to_window(400.0, 200.0);
        assert!((p.x - view.rect.x()).abs() < 1e-3);
        assert!((p.y - view.rect.y()).abs() < 1e-3);

        let (x, y) = view.to_canvas(view.to_window(123.0, 45.0));
        assert!((x - 123.0).abs() < 1e-3);
        assert!((y - 45.0).abs() < 1e-3);
    }
}
