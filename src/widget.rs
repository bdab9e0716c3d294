//! The pluckable string: grab handling, release into a decaying vibration,
//! and the matching sound.

use log::debug;
use std::time::Duration;
use wasm_timer::Instant;

use crate::bounds::{Bounds, Dimension};
use crate::curve::StringCurve;
use crate::error::{PluckError, Result};
use crate::host::{FrameTicker, Surface};
use crate::pos::Pos;
use crate::schedule::{Debouncer, Throttler};
use crate::sound::{volume_for, SoundPlayer, SoundVariant};

/// Fraction of the displacement kept on every tick.
pub const FRICTION: f32 = 0.94;

/// Vertical distance in pixels within which the pointer catches the string.
pub const HANDLE_SIZE: f32 = 10.0;

/// Displacement in pixels under which the string snaps to rest.
pub const SETTLE_DISTANCE: f32 = 1.0;

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(30);
pub const RELEASE_THROTTLE: Duration = Duration::from_millis(30);

/// Horizontal band, as fractions of the width, where the string can be grabbed.
const GRAB_BAND: (f32, f32) = (0.15, 0.85);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrabState {
    Idle,
    Grabbed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VibrationState {
    AtRest,
    Vibrating,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidgetEvent {
    Resize,
    PointerMove(Pos),
    Release,
}

/// What a release set off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pluck {
    pub variant: SoundVariant,
    pub volume: f32,
    pub amplitude: f32,
}

pub struct WidgetOptions<S> {
    pub element: Option<S>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

impl<S> WidgetOptions<S> {
    pub fn new(element: S, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        Self {
            element: Some(element),
            width: Some(width.into()),
            height: Some(height.into()),
        }
    }
}

pub struct StringWidget<S, P, T> {
    width: Dimension,
    height: Dimension,
    bounds: Bounds,
    curve: StringCurve,
    grab: GrabState,
    vibration: VibrationState,
    last_pluck: Option<Pluck>,
    resize: Debouncer,
    release: Throttler,
    surface: S,
    player: P,
    ticker: T,
}

impl<S: Surface, P: SoundPlayer, T: FrameTicker> StringWidget<S, P, T> {
    pub fn create(options: WidgetOptions<S>, player: P, ticker: T) -> Result<Self> {
        let surface = options.element.ok_or(PluckError::MissingElement)?;
        let width = options
            .width
            .filter(Dimension::is_set)
            .ok_or(PluckError::MissingWidth)?;
        let height = options
            .height
            .filter(Dimension::is_set)
            .ok_or(PluckError::MissingHeight)?;

        let bounds = Bounds::resolve(&width, &height);
        let mut widget = Self {
            width,
            height,
            bounds,
            curve: StringCurve::at_rest(bounds),
            grab: GrabState::Idle,
            vibration: VibrationState::AtRest,
            last_pluck: None,
            resize: Debouncer::new(RESIZE_DEBOUNCE),
            release: Throttler::new(RELEASE_THROTTLE),
            surface,
            player,
            ticker,
        };
        widget.on_resize()?;
        Ok(widget)
    }

    /// Route a host event through the resize debounce and release throttle.
    pub fn handle_event(&mut self, event: WidgetEvent, now: Instant) -> Result<()> {
        match event {
            WidgetEvent::Resize => {
                self.resize.trigger(now);
                Ok(())
            }
            WidgetEvent::PointerMove(point) => self.on_pointer_move(point, now),
            WidgetEvent::Release => self.throttled_release(now),
        }
    }

    /// Fire a resize whose quiet period has elapsed, and a release that the
    /// throttle held back.
    pub fn poll(&mut self, now: Instant) -> Result<()> {
        if self.resize.poll(now) {
            self.on_resize()?;
        }
        if self.release.poll(now) {
            self.on_release()?;
        }
        Ok(())
    }

    /// Re-read the bounds and lay the string out flat for them.
    ///
    /// Grab and vibration bookkeeping is left alone: a vibrating string finds
    /// itself at rest on its next tick and settles there.
    pub fn on_resize(&mut self) -> Result<()> {
        self.bounds = Bounds::resolve(&self.width, &self.height);
        debug!("resize to {}x{}", self.bounds.width, self.bounds.height);
        self.surface.set_logical_size(self.bounds);
        self.curve.reset(self.bounds);
        self.surface.redraw(&self.curve)
    }

    /// Follow the pointer while it holds the string; anything else counts as
    /// letting go.
    pub fn on_pointer_move(&mut self, point: Pos, now: Instant) -> Result<()> {
        if !self.in_grab_zone(point) {
            return self.throttled_release(now);
        }

        if self.grab == GrabState::Idle {
            debug!("string grabbed at y={}", point.y);
        }
        self.grab = GrabState::Grabbed;
        if self.vibration == VibrationState::Vibrating {
            self.end_vibration()?;
        }
        self.curve.set_midpoint_y(point.y);
        self.surface.redraw(&self.curve)
    }

    /// Let go of the string: play a sound sized to the displacement and start
    /// the decay. Returns `None` when there was nothing to pluck.
    pub fn on_release(&mut self) -> Result<Option<Pluck>> {
        self.grab = GrabState::Idle;

        let rest = self.bounds.rest_y();
        let y = self.curve.midpoint_y();
        if y == rest || self.vibration == VibrationState::Vibrating {
            return Ok(None);
        }

        let amplitude = ((y - rest).abs() / rest).min(1.0);
        let pluck = Pluck {
            variant: SoundVariant::for_amplitude(amplitude),
            volume: volume_for(amplitude),
            amplitude,
        };
        debug!(
            "pluck amplitude={:.3} variant={} volume={:.3}",
            amplitude, pluck.variant, pluck.volume
        );

        self.player.stop()?;
        self.player.set_volume(pluck.volume)?;
        self.player.play(pluck.variant)?;

        self.ticker.subscribe();
        self.vibration = VibrationState::Vibrating;
        self.last_pluck = Some(pluck);
        Ok(Some(pluck))
    }

    /// Advance the vibration by one frame.
    pub fn on_tick(&mut self) -> Result<()> {
        if self.vibration == VibrationState::AtRest {
            return Ok(());
        }

        let rest = self.bounds.rest_y();
        let y = self.curve.midpoint_y();
        if (y - rest).abs() > SETTLE_DISTANCE {
            self.curve.set_midpoint_y(decay(y, self.bounds.height));
        } else {
            self.curve.set_midpoint_y(rest);
            debug!("string settled");
            self.end_vibration()?;
        }
        self.surface.redraw(&self.curve)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn curve(&self) -> &StringCurve {
        &self.curve
    }

    pub fn grab_state(&self) -> GrabState {
        self.grab
    }

    pub fn vibration_state(&self) -> VibrationState {
        self.vibration
    }

    pub fn is_vibrating(&self) -> bool {
        self.vibration == VibrationState::Vibrating
    }

    pub fn last_pluck(&self) -> Option<Pluck> {
        self.last_pluck
    }

    /// Current displacement of the midpoint, normalized to `[0, 1]`.
    pub fn amplitude(&self) -> f32 {
        let rest = self.bounds.rest_y();
        if rest == 0.0 {
            return 0.0;
        }
        ((self.curve.midpoint_y() - rest).abs() / rest).min(1.0)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    fn throttled_release(&mut self, now: Instant) -> Result<()> {
        if self.release.admit(now) {
            self.on_release()?;
        }
        Ok(())
    }

    fn in_grab_zone(&self, point: Pos) -> bool {
        let Bounds { width, height } = self.bounds;
        let stroke = self.curve.stroke_width;
        point.y > stroke
            && point.y < height - stroke
            && point.x >= width * GRAB_BAND.0
            && point.x <= width * GRAB_BAND.1
            && (point.y - self.curve.midpoint_y()).abs() < HANDLE_SIZE
    }

    fn end_vibration(&mut self) -> Result<()> {
        self.ticker.unsubscribe();
        self.vibration = VibrationState::AtRest;
        self.player.stop()
    }
}

/// One step of `y' = h/2 * (F + 1) - F * y`: the displacement from rest
/// shrinks by `F` and flips side.
pub fn decay(y: f32, height: f32) -> f32 {
    0.5 * height * (FRICTION + 1.0) - FRICTION * y
}
