use eframe::egui::{self, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use super::notice_label;
use crate::color::{SeriesColors, series_colors};
use crate::data::histogram::Distribution;
use crate::session::{Event, Visuals};

// ---------------------------------------------------------------------------
// Visualization view (central panel, lower half)
// ---------------------------------------------------------------------------

/// Column selector plus histogram, or the notice when nothing is numeric.
pub fn distribution_view(ui: &mut Ui, visuals: &Visuals, events: &mut Vec<Event>) {
    ui.heading("Distribution");

    let (choices, selected, distribution) = match visuals {
        Visuals::Notice(notice) => {
            notice_label(ui, notice);
            return;
        }
        Visuals::Chart {
            choices,
            selected,
            distribution,
        } => (choices, selected, distribution),
    };

    let mut choice = selected.clone();
    egui::ComboBox::from_label("Select a numeric column")
        .selected_text(selected.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for name in choices {
                ui.selectable_value(&mut choice, name.clone(), name.as_str());
            }
        });
    if choice != *selected {
        events.push(Event::SelectColumn(choice));
    }

    let index = choices.iter().position(|c| c == selected).unwrap_or(0);
    histogram_plot(ui, distribution, series_colors(index, choices.len()));
}

fn histogram_plot(ui: &mut Ui, dist: &Distribution, colors: SeriesColors) {
    let bars: Vec<Bar> = dist
        .histogram
        .bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.3} – {:.3}", b.start, b.end))
        })
        .collect();
    let chart = BarChart::new(bars)
        .name(dist.column.as_str())
        .color(colors.bars);

    Plot::new("distribution_plot")
        .legend(Legend::default())
        .x_axis_label(dist.column.clone())
        .y_axis_label("Count")
        .height(360.0)
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            if let Some(curve) = &dist.density {
                let line = Line::new(PlotPoints::from(curve.clone()))
                    .name("density")
                    .color(colors.density)
                    .width(2.0);
                plot_ui.line(line);
            }
        });

    ui.label(RichText::new(format!("{} values plotted", dist.n)).weak());
}
