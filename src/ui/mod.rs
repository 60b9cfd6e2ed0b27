use eframe::egui::{Color32, Ui};

pub mod dashboard;
pub mod panels;
pub mod plot;
pub mod shapes;

const WARNING_COLOR: Color32 = Color32::from_rgb(0xE0, 0xA0, 0x00);

/// Per-chart "nothing to show" notice; the rest of the dashboard keeps going.
pub fn no_data(ui: &mut Ui, message: &str) {
    ui.colored_label(WARNING_COLOR, format!("⚠ {message}"));
}
