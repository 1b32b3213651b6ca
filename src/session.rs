use std::sync::Arc;

use crate::config::Config;
use crate::data::histogram::{Distribution, distribution};
use crate::data::loader::{UploadedFile, load_data};
use crate::data::model::{ColumnKind, Dataset, Preview};
use crate::data::stats::{Describe, MissingCount, describe, missing_counts};
use crate::error::LoadError;

pub const UPLOAD_PROMPT: &str = "Upload a CSV or Excel file to get started.";
pub const UPLOAD_SUCCESS: &str = "File uploaded successfully";
pub const LOAD_ERROR_NOTICE: &str = "Error loading file. Please upload a valid CSV or Excel file.";
pub const NO_NUMERIC_NOTICE: &str = "No numeric columns available for visualization.";

// ---------------------------------------------------------------------------
// Session state and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Error(String),
}

/// One user interaction.
#[derive(Debug)]
pub enum Event {
    /// Redraw without any change (first frame, window refresh).
    Rerun,
    Upload(UploadedFile),
    /// The file could not even be read from disk.
    UploadFailed { name: String, error: LoadError },
    ClearUpload,
    ToggleStats(bool),
    SelectColumn(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub preview_rows: usize,
    pub kde_points: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        let config = Config::default();
        Self {
            preview_rows: config.preview_rows,
            kde_points: config.kde_points,
        }
    }
}

/// Everything carried from one interaction to the next.
///
/// A file name without a dataset means the last upload failed to parse.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub file_name: Option<String>,
    pub dataset: Option<Arc<Dataset>>,
    pub show_stats: bool,
    pub selected_column: Option<String>,
    pub settings: ViewSettings,
}

impl SessionState {
    pub fn new(config: &Config) -> Self {
        Self {
            show_stats: config.show_stats,
            settings: ViewSettings {
                preview_rows: config.preview_rows,
                kde_points: config.kde_points,
            },
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Page – the view model of one render pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub dtype: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub preview: Preview,
    pub shape: (usize, usize),
    pub columns: Vec<ColumnInfo>,
    pub missing: Vec<MissingCount>,
    /// Present only while the statistics toggle is on.
    pub stats: Option<Vec<Describe>>,
    pub show_stats: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Visuals {
    Notice(Notice),
    Chart {
        choices: Vec<String>,
        selected: String,
        distribution: Distribution,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Nothing uploaded yet.
    Prompt(Notice),
    Failed {
        file_name: String,
        notice: Notice,
    },
    Report {
        file_name: String,
        overview: Box<Overview>,
        visuals: Box<Visuals>,
    },
}

impl Page {
    /// Upload status shown beside the upload control.
    pub fn upload_status(&self) -> Option<Notice> {
        match self {
            Page::Prompt(_) => None,
            Page::Failed { notice, .. } => Some(notice.clone()),
            Page::Report { .. } => Some(Notice::Success(UPLOAD_SUCCESS.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Apply one interaction and produce the page to draw next.
pub fn render(previous: SessionState, event: Event) -> (Page, SessionState) {
    let state = apply(previous, event);
    let page = build_page(&state);
    (page, state)
}

fn apply(mut state: SessionState, event: Event) -> SessionState {
    match event {
        Event::Rerun => {}
        Event::Upload(file) => match load_data(&file) {
            Ok(dataset) => {
                let (rows, cols) = dataset.shape();
                log::info!("Loaded '{}': {rows} rows, {cols} columns", file.name);
                let keep = state
                    .selected_column
                    .as_deref()
                    .and_then(|name| dataset.column(name))
                    .is_some_and(|c| c.is_numeric());
                if !keep {
                    state.selected_column = None;
                }
                state.dataset = Some(Arc::new(dataset));
                state.file_name = Some(file.name);
            }
            Err(error) => fail_upload(&mut state, file.name, &error),
        },
        Event::UploadFailed { name, error } => fail_upload(&mut state, name, &error),
        Event::ClearUpload => {
            state.file_name = None;
            state.dataset = None;
            state.selected_column = None;
        }
        Event::ToggleStats(on) => state.show_stats = on,
        Event::SelectColumn(name) => {
            let numeric = state
                .dataset
                .as_ref()
                .and_then(|ds| ds.column(&name))
                .is_some_and(|c| c.is_numeric());
            if numeric {
                state.selected_column = Some(name);
            } else {
                log::debug!("ignoring selection of non-numeric column '{name}'");
            }
        }
    }
    state
}

fn fail_upload(state: &mut SessionState, name: String, error: &LoadError) {
    log::error!("Failed to load '{name}': {error:#}");
    state.file_name = Some(name);
    state.dataset = None;
}

/// Draw the current state: prompt, failure, or summary then chart.
pub fn build_page(state: &SessionState) -> Page {
    let Some(file_name) = state.file_name.clone() else {
        return Page::Prompt(Notice::Info(UPLOAD_PROMPT.to_string()));
    };
    let Some(dataset) = &state.dataset else {
        return Page::Failed {
            file_name,
            notice: Notice::Error(LOAD_ERROR_NOTICE.to_string()),
        };
    };

    Page::Report {
        file_name,
        overview: Box::new(overview(dataset, state.settings.preview_rows, state.show_stats)),
        visuals: Box::new(visuals(
            dataset,
            state.selected_column.as_deref(),
            state.settings.kde_points,
        )),
    }
}

pub fn overview(dataset: &Dataset, preview_rows: usize, show_stats: bool) -> Overview {
    Overview {
        preview: dataset.head(preview_rows),
        shape: dataset.shape(),
        columns: dataset
            .columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                kind: c.kind(),
                dtype: c.data.dtype(),
            })
            .collect(),
        missing: missing_counts(dataset),
        stats: show_stats.then(|| describe(dataset)),
        show_stats,
    }
}

/// Numeric column choice plus the distribution of the selected one;
/// defaults to the first numeric column.
pub fn visuals(dataset: &Dataset, selected: Option<&str>, kde_points: usize) -> Visuals {
    let numeric: Vec<_> = dataset.numeric_columns().collect();
    let Some(first) = numeric.first() else {
        return Visuals::Notice(Notice::Info(NO_NUMERIC_NOTICE.to_string()));
    };

    let column = selected
        .and_then(|name| numeric.iter().find(|c| c.name == name))
        .unwrap_or(first);

    Visuals::Chart {
        choices: numeric.iter().map(|c| c.name.clone()).collect(),
        selected: column.name.clone(),
        distribution: distribution(column, kde_points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_csv() -> String {
        let mut text = String::from("order_id,amount,country\n");
        for i in 1..=100 {
            let amount = if i % 30 == 0 {
                String::new()
            } else {
                format!("{}.{:02}", 10 + i % 17, i % 100)
            };
            let country = ["US", "DE", "FR", "BR"][i % 4];
            text.push_str(&format!("{i},{amount},{country}\n"));
        }
        text
    }

    fn upload(state: SessionState, name: &str, text: &str) -> (Page, SessionState) {
        render(
            state,
            Event::Upload(UploadedFile::new(name, text.as_bytes().to_vec())),
        )
    }

    fn report(page: &Page) -> (&Overview, &Visuals) {
        match page {
            Page::Report {
                overview, visuals, ..
            } => (&**overview, &**visuals),
            other => panic!("expected a report, got {other:?}"),
        }
    }

    #[test]
    fn prompts_before_upload() {
        let (page, _) = render(SessionState::default(), Event::Rerun);
        assert_eq!(page, Page::Prompt(Notice::Info(UPLOAD_PROMPT.to_string())));
        assert_eq!(page.upload_status(), None);
    }

    #[test]
    fn orders_scenario() {
        let (page, state) = upload(SessionState::default(), "orders.csv", &orders_csv());
        let (overview, visuals) = report(&page);

        assert_eq!(overview.shape, (100, 3));
        let missing: Vec<(&str, usize)> = overview
            .missing
            .iter()
            .map(|m| (m.column.as_str(), m.missing))
            .collect();
        assert_eq!(missing, vec![("order_id", 0), ("amount", 3), ("country", 0)]);
        assert_eq!(overview.preview.rows.len(), 5);
        assert!(overview.stats.is_none());

        match visuals {
            Visuals::Chart {
                choices,
                selected,
                distribution,
            } => {
                assert_eq!(choices, &vec!["order_id".to_string(), "amount".to_string()]);
                assert_eq!(selected, "order_id");
                assert_eq!(distribution.n, 100);
            }
            other => panic!("expected a chart, got {other:?}"),
        }
        assert_eq!(
            page.upload_status(),
            Some(Notice::Success(UPLOAD_SUCCESS.to_string()))
        );
        assert_eq!(state.file_name.as_deref(), Some("orders.csv"));
    }

    #[test]
    fn text_only_dataset_has_no_chart() {
        let (page, _) = upload(SessionState::default(), "names.csv", "name,city\na,x\nb,y\n");
        let (_, visuals) = report(&page);
        assert_eq!(
            visuals,
            &Visuals::Notice(Notice::Info(NO_NUMERIC_NOTICE.to_string()))
        );
    }

    #[test]
    fn corrupted_upload_then_valid_upload() {
        let corrupt = UploadedFile::new("orders.xlsx", vec![0x50, 0x4B, 0x03, 0x04, 0xFF]);
        let (page, state) = render(SessionState::default(), Event::Upload(corrupt));
        assert_eq!(
            page,
            Page::Failed {
                file_name: "orders.xlsx".to_string(),
                notice: Notice::Error(LOAD_ERROR_NOTICE.to_string()),
            }
        );
        assert!(state.dataset.is_none());

        let (page, state) = upload(state, "orders.csv", &orders_csv());
        assert_eq!(report(&page).0.shape, (100, 3));
        assert!(state.dataset.is_some());
    }

    #[test]
    fn unreadable_file_reports_generic_error() {
        let error = LoadError::EmptyFile;
        let (page, _) = render(
            SessionState::default(),
            Event::UploadFailed {
                name: "gone.csv".into(),
                error,
            },
        );
        assert!(matches!(page, Page::Failed { .. }));
    }

    #[test]
    fn stats_toggle_adds_describe() {
        let (_, state) = upload(SessionState::default(), "orders.csv", &orders_csv());
        let (page, state) = render(state, Event::ToggleStats(true));
        let stats = report(&page).0.stats.as_ref().unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[1].column, "amount");
        assert_eq!(stats[1].count, 97);

        let (page, _) = render(state, Event::ToggleStats(false));
        assert!(report(&page).0.stats.is_none());
    }

    #[test]
    fn selection_is_validated_and_survives_reupload() {
        let (_, state) = upload(SessionState::default(), "orders.csv", &orders_csv());

        let (_, state) = render(state, Event::SelectColumn("country".into()));
        assert_eq!(state.selected_column, None);

        let (page, state) = render(state, Event::SelectColumn("amount".into()));
        match report(&page).1 {
            Visuals::Chart { selected, distribution, .. } => {
                assert_eq!(selected, "amount");
                assert_eq!(distribution.n, 97);
            }
            other => panic!("expected a chart, got {other:?}"),
        }

        let (_, state) = upload(state, "again.csv", &orders_csv());
        assert_eq!(state.selected_column.as_deref(), Some("amount"));

        let (_, state) = upload(state, "other.csv", "x,y\n1,2\n");
        assert_eq!(state.selected_column, None);
    }

    #[test]
    fn clearing_returns_to_prompt() {
        let (_, state) = upload(SessionState::default(), "orders.csv", &orders_csv());
        let (page, state) = render(state, Event::ClearUpload);
        assert!(matches!(page, Page::Prompt(_)));
        assert!(state.dataset.is_none() && state.file_name.is_none());
    }

    #[test]
    fn config_drives_view_settings() {
        let config = Config {
            preview_rows: 2,
            show_stats: true,
            ..Config::default()
        };
        let (page, _) = upload(SessionState::new(&config), "orders.csv", &orders_csv());
        let (overview, _) = report(&page);
        assert_eq!(overview.preview.rows.len(), 2);
        assert!(overview.stats.is_some());
    }
}
