use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Preview;
use crate::data::stats::{Describe, MissingCount};
use crate::session::{ColumnInfo, Event, Overview};

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Summary view (central panel, upper half)
// ---------------------------------------------------------------------------

/// Preview, shape, column list, missing values and optional statistics.
pub fn data_overview(ui: &mut Ui, overview: &Overview, events: &mut Vec<Event>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Data preview");
        if ui.small_button("Copy as CSV").clicked() {
            match overview.preview.to_csv() {
                Ok(text) => ui.ctx().copy_text(text),
                Err(e) => log::error!("Failed to serialise preview: {e:#}"),
            }
        }
    });
    preview_table(ui, &overview.preview);
    ui.add_space(12.0);

    ui.heading("Details");
    let (rows, cols) = overview.shape;
    ui.label(format!("Shape of the data: ({rows}, {cols})"));
    ui.add_space(4.0);
    column_list(ui, &overview.columns);
    ui.add_space(4.0);
    missing_table(ui, &overview.missing);
    ui.add_space(12.0);

    let mut show_stats = overview.show_stats;
    if ui
        .checkbox(&mut show_stats, "Show descriptive statistics")
        .changed()
    {
        events.push(Event::ToggleStats(show_stats));
    }
    if let Some(stats) = &overview.stats {
        if stats.is_empty() {
            ui.label(RichText::new("No numeric columns to describe.").weak());
        } else {
            stats_table(ui, stats);
        }
    }
}

fn preview_table(ui: &mut Ui, preview: &Preview) {
    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("preview_table")
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .cell_layout(Layout::left_to_right(Align::Center))
                .column(Column::auto())
                .columns(Column::auto().at_least(60.0), preview.columns.len())
                .header(ROW_HEIGHT, |mut header| {
                    header.col(|_ui: &mut Ui| {});
                    for name in &preview.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for (i, (row, missing)) in preview.rows.iter().zip(&preview.missing).enumerate() {
                        body.row(ROW_HEIGHT, |mut tr| {
                            tr.col(|ui: &mut Ui| {
                                ui.label(RichText::new(i.to_string()).weak());
                            });
                            for (cell, &is_missing) in row.iter().zip(missing) {
                                tr.col(|ui: &mut Ui| {
                                    if is_missing {
                                        let shown = if cell.is_empty() { "<NA>" } else { cell.as_str() };
                                        ui.label(RichText::new(shown).italics().weak());
                                    } else {
                                        ui.label(cell.as_str());
                                    }
                                });
                            }
                        });
                    }
                });
        });
}

fn column_list(ui: &mut Ui, columns: &[ColumnInfo]) {
    ui.label("Columns in the data:");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for col in columns {
            ui.label(RichText::new(&col.name).monospace())
                .on_hover_text(format!("{} ({})", col.kind, col.dtype));
        }
    });
}

fn missing_table(ui: &mut Ui, missing: &[MissingCount]) {
    ui.label("Missing values per column:");
    egui::Grid::new("missing_values")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            for m in missing {
                ui.label(RichText::new(&m.column).monospace());
                ui.label(m.missing.to_string());
                ui.end_row();
            }
        });
}

/// Statistics laid out with one column per numeric field.
fn stats_table(ui: &mut Ui, stats: &[Describe]) {
    let labels: Vec<&'static str> = stats[0].rows().iter().map(|(label, _)| *label).collect();

    ScrollArea::horizontal()
        .id_salt("stats_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("stats_table")
                .striped(true)
                .vscroll(false)
                .cell_layout(Layout::right_to_left(Align::Center))
                .column(Column::auto())
                .columns(Column::auto().at_least(80.0), stats.len())
                .header(ROW_HEIGHT, |mut header| {
                    header.col(|_ui: &mut Ui| {});
                    for d in stats {
                        header.col(|ui: &mut Ui| {
                            ui.strong(d.column.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for (row, label) in labels.iter().enumerate() {
                        body.row(ROW_HEIGHT, |mut tr| {
                            tr.col(|ui: &mut Ui| {
                                ui.strong(*label);
                            });
                            for d in stats {
                                let value = d.rows()[row].1;
                                tr.col(|ui: &mut Ui| {
                                    ui.label(format_stat(*label, value));
                                });
                            }
                        });
                    }
                });
        });
}

fn format_stat(label: &str, value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if label == "count" {
        format!("{value:.0}")
    } else {
        format!("{value:.6}")
    }
}
