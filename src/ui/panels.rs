use std::path::Path;

use eframe::egui::{self, Button, RichText, Ui};

use super::notice_label;
use crate::data::loader::UploadedFile;
use crate::export::{SummaryReport, default_export_name};
use crate::session::{Event, Notice, Page, SessionState};

// ---------------------------------------------------------------------------
// Left side panel – upload affordance
// ---------------------------------------------------------------------------

/// Render the upload panel.
pub fn side_panel(ui: &mut Ui, page: &Page, events: &mut Vec<Event>) {
    ui.heading("Upload your file here");
    ui.separator();

    if ui.button("Browse files…").clicked() {
        open_file_dialog(events);
    }
    ui.label(RichText::new("or drop a .csv / .xlsx file onto the window").weak());
    ui.add_space(8.0);

    if let Page::Failed { file_name, .. } | Page::Report { file_name, .. } = page {
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(file_name).monospace());
            if ui.small_button("✖").on_hover_text("Remove file").clicked() {
                events.push(Event::ClearUpload);
            }
        });
    }

    if let Some(status) = page.upload_status() {
        notice_label(ui, &status);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(
    ui: &mut Ui,
    session: &SessionState,
    export_status: &mut Option<Notice>,
    events: &mut Vec<Event>,
) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(events);
                ui.close_menu();
            }
            if ui
                .add_enabled(session.dataset.is_some(), Button::new("Export summary…"))
                .clicked()
            {
                if let Some(status) = export_summary(session) {
                    *export_status = Some(status);
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(session.file_name.is_some(), Button::new("Close file"))
                .clicked()
            {
                events.push(Event::ClearUpload);
                *export_status = None;
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &session.dataset {
            let (rows, cols) = ds.shape();
            ui.label(format!("{rows} rows × {cols} columns"));
            ui.separator();
        }

        if let Some(status) = export_status {
            notice_label(ui, status);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog and drag-and-drop
// ---------------------------------------------------------------------------

pub fn open_file_dialog(events: &mut Vec<Event>) {
    let file = rfd::FileDialog::new()
        .set_title("Upload your file")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls", "ods"])
        .pick_file();

    if let Some(path) = file {
        events.push(upload_event(&path));
    }
}

/// Turn the first file dropped on the window this frame into an upload.
pub fn dropped_files(ctx: &egui::Context, events: &mut Vec<Event>) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let Some(file) = dropped.into_iter().next() else {
        return;
    };

    if let Some(path) = &file.path {
        events.push(upload_event(path));
    } else if let Some(bytes) = file.bytes {
        events.push(Event::Upload(UploadedFile::new(file.name, bytes.to_vec())));
    }
}

fn upload_event(path: &Path) -> Event {
    match UploadedFile::read(path) {
        Ok(file) => Event::Upload(file),
        Err(error) => Event::UploadFailed {
            name: path.display().to_string(),
            error,
        },
    }
}

// ---------------------------------------------------------------------------
// Summary export
// ---------------------------------------------------------------------------

/// Ask for a destination and write the JSON summary. `None` when cancelled.
fn export_summary(session: &SessionState) -> Option<Notice> {
    let (Some(name), Some(dataset)) = (&session.file_name, &session.dataset) else {
        return None;
    };
    let path = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name(default_export_name(name))
        .add_filter("JSON", &["json"])
        .save_file()?;

    match SummaryReport::new(name, dataset).write(&path) {
        Ok(()) => {
            log::info!("Wrote summary of '{name}' to {}", path.display());
            Some(Notice::Success(format!("Summary saved to {}", path.display())))
        }
        Err(e) => {
            log::error!("Failed to export summary: {e:#}");
            Some(Notice::Error(format!("Export failed: {e:#}")))
        }
    }
}
