//! Capabilities the widget needs from whatever is hosting it.

use crate::bounds::Bounds;
use crate::curve::StringCurve;
use crate::error::Result;

/// Something the string can be drawn on.
pub trait Surface {
    fn set_logical_size(&mut self, bounds: Bounds);

    fn redraw(&mut self, curve: &StringCurve) -> Result<()>;
}

/// Per-frame notification source. Both calls must be safe to repeat.
pub trait FrameTicker {
    fn subscribe(&mut self);

    fn unsubscribe(&mut self);
}

/// A single subscription flag the host's frame loop checks before ticking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    subscribed: bool,
}

impl FrameGate {
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }
}

impl FrameTicker for FrameGate {
    fn subscribe(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_toggles_idempotently() {
        let mut gate = FrameGate::default();
        gate.unsubscribe();
        assert!(!gate.is_subscribed());
        gate.subscribe();
        gate.subscribe();
        assert!(gate.is_subscribed());
        gate.unsubscribe();
        assert!(!gate.is_subscribed());
    }
}
