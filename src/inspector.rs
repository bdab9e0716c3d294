use nannou_egui::{egui, Egui};
use std::time::Duration;

use crate::model::Widget;

pub fn update(egui: &mut Egui, since_start: Duration, widget: &Widget) {
    egui.set_elapsed_time(since_start);
    let ctx = egui.begin_frame();
    egui::Window::new("String").show(&ctx, |ui| {
        let bounds = widget.bounds();
        ui.label(format!("Canvas: {:.0} x {:.0}", bounds.width, bounds.height));
        ui.label(format!(
            "Midpoint: {:.1} (rest {:.1})",
            widget.curve().midpoint_y(),
            bounds.rest_y()
        ));
        ui.label(format!("Amplitude: {:.3}", widget.amplitude()));
        ui.label(format!("Grab: {:?}", widget.grab_state()));
        ui.label(format!("Vibration: {:?}", widget.vibration_state()));
        ui.label(format!("Redraws: {}", widget.surface().redraws()));

        ui.separator();
        match widget.last_pluck() {
            Some(pluck) => ui.label(format!(
                "Last pluck: {} at volume {:.3}",
                pluck.variant, pluck.volume
            )),
            None => ui.label("Last pluck: none"),
        };
    });
}
