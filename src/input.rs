use log::warn;
use nannou::prelude::*;
use wasm_timer::Instant;

use crate::model::Model;
use crate::render::to_local;
use crate::widget::WidgetEvent;

/// Map a nannou window event onto the widget's inputs.
pub fn widget_event(event: &WindowEvent, model: &Model) -> Option<WidgetEvent> {
    match event {
        WindowEvent::MouseMoved(pos) => Some(WidgetEvent::PointerMove(to_local(
            *pos,
            model.widget.bounds(),
        ))),
        WindowEvent::MouseReleased(_) | WindowEvent::MouseExited => Some(WidgetEvent::Release),
        WindowEvent::Resized(_) => Some(WidgetEvent::Resize),
        _ => None,
    }
}

pub fn event(_app: &App, model: &mut Model, event: WindowEvent) {
    if let WindowEvent::Resized(size) = event {
        model.window_size.set(size);
    }

    if let Some(widget_event) = widget_event(&event, model) {
        if let Err(err) = model.widget.handle_event(widget_event, Instant::now()) {
            warn!("{:?} failed: {}", widget_event, err);
        }
    }
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if key == Key::I {
        model.show_inspector = !model.show_inspector;
    }
}

pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    // Let egui handle things like keyboard and mouse input.
    if let Some(egui) = model.egui.as_mut() {
        egui.handle_raw_event(event);
    }
}
