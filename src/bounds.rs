//! Canvas extent and the width/height sources it is resolved from.

use std::fmt;

/// Ratio between canvas height and stroke thickness.
const STROKE_RATIO: f32 = 5.0 / 115.0;

/// A width or height option: either a literal or a closure evaluated on every
/// resize.
pub enum Dimension {
    Fixed(f32),
    Query(Box<dyn Fn() -> f32>),
}

impl Dimension {
    pub fn query(f: impl Fn() -> f32 + 'static) -> Self {
        Dimension::Query(Box::new(f))
    }

    pub fn resolve(&self) -> f32 {
        match self {
            Dimension::Fixed(value) => *value,
            Dimension::Query(f) => f(),
        }
    }

    /// Zero and NaN literals are treated as absent.
    pub fn is_set(&self) -> bool {
        match self {
            Dimension::Fixed(value) => *value != 0.0 && !value.is_nan(),
            Dimension::Query(_) => true,
        }
    }
}

impl From<f32> for Dimension {
    fn from(value: f32) -> Self {
        Dimension::Fixed(value)
    }
}

impl From<f64> for Dimension {
    fn from(value: f64) -> Self {
        Dimension::Fixed(value as f32)
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Dimension::Query(_) => f.write_str("Query(..)"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn resolve(width: &Dimension, height: &Dimension) -> Self {
        Self::new(width.resolve(), height.resolve())
    }

    /// Vertical centre line the string rests on.
    pub fn rest_y(&self) -> f32 {
        self.height / 2.0
    }

    pub fn stroke_width(&self) -> f32 {
        self.height * STROKE_RATIO
    }
}
