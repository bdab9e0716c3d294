use nannou::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

use crate::audio::SpritePlayer;
use crate::bounds::Dimension;
use crate::config::PluckConfig;
use crate::error::Result;
use crate::host::FrameGate;
use crate::render::CanvasSurface;
use crate::widget::{StringWidget, WidgetOptions};

pub type Widget = StringWidget<CanvasSurface, Option<SpritePlayer>, FrameGate>;

pub struct Model {
    pub window: WindowId,
    pub widget: Widget,
    /// Last known window size, read by the width/height queries.
    pub window_size: Rc<Cell<Vec2>>,
    pub egui: Option<nannou_egui::Egui>,
    pub show_inspector: bool,
}

impl Model {
    pub fn new(
        window: WindowId,
        window_size: Vec2,
        config: &PluckConfig,
        player: Option<SpritePlayer>,
    ) -> Result<Self> {
        let window_size = Rc::new(Cell::new(window_size));
        let width = config.width.map(Dimension::Fixed).unwrap_or_else(|| {
            let size = window_size.clone();
            Dimension::query(move || size.get().x)
        });
        let height = config.height.map(Dimension::Fixed).unwrap_or_else(|| {
            let size = window_size.clone();
            Dimension::query(move || size.get().y)
        });

        let options = WidgetOptions {
            element: Some(CanvasSurface::new(config.element.clone())),
            width: Some(width),
            height: Some(height),
        };
        let widget = StringWidget::create(options, player, FrameGate::default())?;

        Ok(Model {
            window,
            widget,
            window_size,
            egui: None,
            show_inspector: false,
        })
    }
}
