use nannou::prelude::*;

use crate::bounds::Bounds;
use crate::curve::StringCurve;
use crate::error::Result;
use crate::host::Surface;
use crate::pos::Pos;

/// Bezier pieces are flattened into this many line segments each.
const CURVE_STEPS: usize = 48;

/// The nannou window the string lives in. The widget hands it the latest curve;
/// `view` draws whatever was handed over last.
#[derive(Debug)]
pub struct CanvasSurface {
    pub element: String,
    logical: Bounds,
    curve: Option<StringCurve>,
    redraws: u64,
}

impl CanvasSurface {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            logical: Bounds::default(),
            curve: None,
            redraws: 0,
        }
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn draw(&self, draw: &Draw) {
        let Some(curve) = &self.curve else {
            return;
        };
        let points: Vec<Point2> = curve
            .sample(CURVE_STEPS)
            .into_iter()
            .map(|p| to_view(p, self.logical))
            .collect();

        draw.polyline()
            .weight(curve.stroke_width)
            .points(points)
            .color(BLACK);
    }
}

impl Surface for CanvasSurface {
    fn set_logical_size(&mut self, bounds: Bounds) {
        self.logical = bounds;
    }

    fn redraw(&mut self, curve: &StringCurve) -> Result<()> {
        self.curve = Some(curve.clone());
        self.redraws += 1;
        Ok(())
    }
}

/// Surface-local coordinates (top left origin, y down) to nannou's centred,
/// y-up space. The logical canvas is centred in the window.
pub fn to_view(p: Pos, bounds: Bounds) -> Point2 {
    pt2(p.x - bounds.width / 2.0, bounds.height / 2.0 - p.y)
}

pub fn to_local(p: Point2, bounds: Bounds) -> Pos {
    Pos::new(p.x + bounds.width / 2.0, bounds.height / 2.0 - p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn local_and_view_coordinates_round_trip() {
        let bounds = Bounds::new(600.0, 200.0);
        assert_eq!(to_view(Pos::new(0.0, 0.0), bounds), pt2(-300.0, 100.0));
        assert_eq!(to_view(Pos::new(300.0, 100.0), bounds), pt2(0.0, 0.0));
        assert_eq!(to_local(pt2(300.0, -100.0), bounds), Pos::new(600.0, 200.0));
        let p = Pos::new(123.0, 45.0);
        assert_eq!(to_local(to_view(p, bounds), bounds), p);
    }

    #[test]
    fn redraw_keeps_the_latest_curve() {
        let bounds = Bounds::new(600.0, 200.0);
        let mut surface = CanvasSurface::new("pluck-canvas");
        surface.set_logical_size(bounds);

        let mut curve = StringCurve::at_rest(bounds);
        surface.redraw(&curve).unwrap();
        curve.set_midpoint_y(40.0);
        surface.redraw(&curve).unwrap();

        assert_eq!(surface.logical, bounds);
        assert_eq!(surface.redraws(), 2);
        assert_eq!(surface.curve.as_ref().map(StringCurve::midpoint_y), Some(40.0));
    }
}
