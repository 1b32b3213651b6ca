/// egui rendering of a session [`Page`](crate::session::Page).
pub mod overview;
pub mod panels;
pub mod plot;

use eframe::egui::{Color32, RichText, Ui};

use crate::session::Notice;

/// Coloured one-line notice.
pub fn notice_label(ui: &mut Ui, notice: &Notice) {
    let (icon, text, color) = match notice {
        Notice::Info(text) => ("ℹ", text, Color32::LIGHT_BLUE),
        Notice::Success(text) => ("✔", text, Color32::from_rgb(90, 180, 90)),
        Notice::Error(text) => ("⚠", text, Color32::RED),
    };
    ui.label(RichText::new(format!("{icon} {text}")).color(color));
}
