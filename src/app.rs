use eframe::egui::{self, ScrollArea, Ui};

use crate::config::Config;
use crate::session::{self, Event, Notice, Page, SessionState};
use crate::ui::{notice_label, overview, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// Hosts the session: keeps its state between frames, draws the current
/// page and feeds widget interactions back in as events.
pub struct ExplorerApp {
    title: String,
    session: SessionState,
    page: Page,
    export_status: Option<Notice>,
}

impl ExplorerApp {
    pub fn new(config: &Config) -> Self {
        let (page, session) = session::render(SessionState::new(config), Event::Rerun);
        Self {
            title: config.title.clone(),
            session,
            page,
            export_status: None,
        }
    }

    fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            if matches!(event, Event::Upload(_) | Event::UploadFailed { .. }) {
                self.export_status = None;
            }
            let previous = std::mem::take(&mut self.session);
            let (page, session) = session::render(previous, event);
            self.page = page;
            self.session = session;
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events = Vec::new();
        panels::dropped_files(ctx, &mut events);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.session, &mut self.export_status, &mut events);
        });

        // ---- Left side panel: upload ----
        egui::SidePanel::left("upload_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.page, &mut events);
            });

        // ---- Central panel: summary and chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading(self.title.as_str());
                    ui.separator();
                    match &self.page {
                        Page::Prompt(notice) => notice_label(ui, notice),
                        Page::Failed { notice, .. } => notice_label(ui, notice),
                        Page::Report {
                            overview: summary,
                            visuals,
                            ..
                        } => {
                            overview::data_overview(ui, summary, &mut events);
                            ui.separator();
                            plot::distribution_view(ui, visuals, &mut events);
                        }
                    }
                });
        });

        if !events.is_empty() {
            self.dispatch(events);
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::UploadedFile;

    fn upload(name: &str, text: &str) -> Event {
        Event::Upload(UploadedFile::new(name, text.as_bytes().to_vec()))
    }

    #[test]
    fn new_upload_clears_export_status() {
        let mut app = ExplorerApp::new(&Config::default());
        app.dispatch(vec![upload("first.csv", "a\n1\n")]);
        app.export_status = Some(Notice::Success("Summary saved to first-summary.json".into()));

        app.dispatch(vec![upload("second.csv", "b\n2\n")]);
        assert_eq!(app.export_status, None);
        assert_eq!(app.session.file_name.as_deref(), Some("second.csv"));
    }

    #[test]
    fn other_events_keep_export_status() {
        let mut app = ExplorerApp::new(&Config::default());
        app.dispatch(vec![upload("first.csv", "a\n1\n")]);
        let saved = Notice::Success("Summary saved".into());
        app.export_status = Some(saved.clone());

        app.dispatch(vec![Event::ToggleStats(true), Event::Rerun]);
        assert_eq!(app.export_status, Some(saved));
    }
}
