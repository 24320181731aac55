//! Projection module - geographic to canvas coordinates
//!
//! Canvas coordinates have their origin at the top-left corner with y
//! growing downward.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// Map canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Persisted projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Pixels per radian
    pub scale: f64,
    /// (longitude, latitude) placed at the canvas centre
    pub center: (f64, f64),
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            scale: 100.0,
            center: (0.0, 20.0),
        }
    }
}

/// Maps (longitude, latitude) in degrees to canvas pixels
pub trait Projection {
    /// `None` when the point cannot be placed on the canvas plane
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)>;
}

impl<F> Projection for F
where
    F: Fn(f64, f64) -> Option<(f64, f64)>,
{
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        self(lon, lat)
    }
}

/// Spherical Mercator centred on a configurable point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    scale: f64,
    center_lambda: f64,
    center_y: f64,
    translate: (f64, f64),
}

impl Mercator {
    pub fn new(config: ProjectionConfig, canvas: CanvasSize) -> Self {
        let (lon0, lat0) = config.center;
        Self {
            scale: config.scale,
            center_lambda: lon0.to_radians(),
            center_y: mercator_y(lat0.to_radians()),
            translate: (canvas.width / 2.0, canvas.height / 2.0),
        }
    }
}

fn mercator_y(phi: f64) -> f64 {
    (FRAC_PI_4 + phi / 2.0).tan().ln()
}

impl Projection for Mercator {
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() >= 90.0 {
            return None;
        }
        let x = self.translate.0 + self.scale * (lon.to_radians() - self.center_lambda);
        let y = self.translate.1 - self.scale * (mercator_y(lat.to_radians()) - self.center_y);
        if x.is_finite() && y.is_finite() {
            Some((x, y))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Mercator {
        Mercator::new(ProjectionConfig::default(), CanvasSize::default())
    }

    #[test]
    fn test_center_maps_to_canvas_center() {
        let (x, y) = projection().project(0.0, 20.0).unwrap();
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_axes_orientation() {
        let p = projection();
        let (x_east, _) = p.project(90.0, 20.0).unwrap();
        let (_, y_north) = p.project(0.0, 60.0).unwrap();
        let (_, y_south) = p.project(0.0, -30.0).unwrap();

        // 90 degrees east is a quarter turn: scale * pi / 2
        assert!((x_east - (400.0 + 100.0 * std::f64::consts::FRAC_PI_2)).abs() < 1e-9);
        assert!(y_north < 200.0);
        assert!(y_south > 200.0);
    }

    #[test]
    fn test_equator_offset() {
        // y at the equator sits below the centre by scale * ln(tan(pi/4 + 10deg))
        let (_, y) = projection().project(0.0, 0.0).unwrap();
        let expected = 200.0 + 100.0 * (FRAC_PI_4 + 10f64.to_radians()).tan().ln();
        assert!((y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unprojectable() {
        let p = projection();
        assert_eq!(p.project(0.0, 90.0), None);
        assert_eq!(p.project(0.0, -90.0), None);
        assert_eq!(p.project(f64::NAN, 0.0), None);
        assert_eq!(p.project(0.0, f64::INFINITY), None);
    }

    #[test]
    fn test_closure_projection() {
        let fixed = |_lon: f64, _lat: f64| -> Option<(f64, f64)> { Some((1.0, 2.0)) };
        assert_eq!(fixed.project(10.0, 10.0), Some((1.0, 2.0)));
    }
}
