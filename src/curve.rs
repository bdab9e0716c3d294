use crate::bounds::Bounds;
use crate::pos::Pos;

/// Horizontal handle lengths, as fractions of the canvas width:
/// left handle out, middle handle in, middle handle out, right handle in.
const HANDLE_FRACTIONS: [f32; 4] = [0.15, -0.2, 0.2, -0.15];

/// A curve vertex with its two bezier handles, both relative to `point`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Segment {
    pub point: Pos,
    pub handle_in: Pos,
    pub handle_out: Pos,
}

/// The plucked string: three segments joined by two cubic bezier pieces.
/// The end points sit on the vertical centre of the canvas, only the middle
/// point moves and only vertically.
#[derive(Clone, Debug, PartialEq)]
pub struct StringCurve {
    pub segments: [Segment; 3],
    pub stroke_width: f32,
}

impl StringCurve {
    pub fn at_rest(bounds: Bounds) -> Self {
        let mut curve = StringCurve {
            segments: [Segment::default(); 3],
            stroke_width: 0.0,
        };
        curve.reset(bounds);
        curve
    }

    /// Lay the string out flat for `bounds`, discarding any displacement.
    pub fn reset(&mut self, bounds: Bounds) {
        let Bounds { width: w, height: h } = bounds;
        let [left_out, mid_in, mid_out, right_in] = HANDLE_FRACTIONS.map(|f| Pos::new(w * f, 0.0));

        self.stroke_width = bounds.stroke_width();
        self.segments = [
            Segment {
                point: Pos::new(0.0, h / 2.0),
                handle_in: Pos::default(),
                handle_out: left_out,
            },
            Segment {
                point: Pos::new(w / 2.0, h / 2.0),
                handle_in: mid_in,
                handle_out: mid_out,
            },
            Segment {
                point: Pos::new(w, h / 2.0),
                handle_in: right_in,
                handle_out: Pos::default(),
            },
        ];
    }

    pub fn midpoint_y(&self) -> f32 {
        self.segments[1].point.y
    }

    pub fn set_midpoint_y(&mut self, y: f32) {
        self.segments[1].point.y = y;
    }

    /// Flatten the curve into a polyline with `steps` points per bezier piece.
    pub fn sample(&self, steps: usize) -> Vec<Pos> {
        let steps = steps.max(1);
        let mut points = Vec::with_capacity(steps * 2 + 1);
        points.push(self.segments[0].point);

        for pair in self.segments.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let p0 = from.point;
            let p1 = from.point + from.handle_out;
            let p2 = to.point + to.handle_in;
            let p3 = to.point;
            for i in 1..=steps {
                points.push(cubic(p0, p1, p2, p3, i as f32 / steps as f32));
            }
        }

        points
    }
}

/// De Casteljau evaluation of one cubic piece.
fn cubic(p0: Pos, p1: Pos, p2: Pos, p3: Pos, t: f32) -> Pos {
    let (a, b, c) = (p0.lerp(p1, t), p1.lerp(p2, t), p2.lerp(p3, t));
    let (d, e) = (a.lerp(b, t), b.lerp(c, t));
    d.lerp(e, t)
}
