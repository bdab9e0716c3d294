//! A string drawn across a canvas that the pointer can grab and pluck.
//!
//! [`widget::StringWidget`] is the state machine; the hosting app supplies a
//! [`host::Surface`], a [`sound::SoundPlayer`] and a [`host::FrameTicker`].

pub mod audio;
pub mod bounds;
pub mod config;
pub mod console;
pub mod curve;
pub mod error;
pub mod host;
pub mod input;
pub mod inspector;
pub mod model;
pub mod pos;
pub mod render;
pub mod schedule;
pub mod sound;
pub mod widget;

pub use error::{PluckError, Result};
pub use widget::{StringWidget, WidgetEvent, WidgetOptions};
