// Builds the render-ready snapshot of the application state.

use std::time::Instant;

use super::App;
use super::filter::FilterMode;
use super::input::InputMode;
use super::model::{ActionKind, Unit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// 1-based page number for display.
    pub page: usize,
    pub total_pages: usize,
    pub total_units: usize,
    pub matching_units: usize,
    pub rows: Vec<RowView>,
    pub mode: InputMode,
    pub filter_mode: FilterMode,
    pub query: String,
    pub prompt: Option<ActionPrompt>,
    pub busy: Option<BusyIndicator>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub name: String,
    pub load_state: String,
    pub active_state: String,
    pub sub_state: String,
    pub description: String,
    pub running: bool,
    pub failed: bool,
    pub selected: bool,
}

impl RowView {
    fn new(unit: &Unit, selected: bool) -> Self {
        Self {
            name: unit.name.clone(),
            load_state: unit.load_state.clone(),
            active_state: unit.active_state.clone(),
            sub_state: unit.sub_state.clone(),
            description: unit.description.clone(),
            running: unit.is_running(),
            failed: unit.is_failed(),
            selected,
        }
    }
}

/// The action-name prompt opened on a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPrompt {
    pub unit: String,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyIndicator {
    pub unit: String,
    pub action: ActionKind,
    pub elapsed_secs: u64,
}

/// Projects `app` into a snapshot. Reads only the rows the pager exposes.
pub fn project(app: &App, now: Instant) -> ViewSnapshot {
    let inventory = app.inventory.units();
    let range = app.pager.page_range();
    let selected = app.pager.selected_position();

    let rows = range
        .filter_map(|position| {
            let unit = inventory.get(*app.filtered.get(position)?)?;
            Some(RowView::new(unit, selected == Some(position)))
        })
        .collect();

    let prompt = match (&app.mode, &app.action_target) {
        (InputMode::Action, Some(unit)) => Some(ActionPrompt {
            unit: unit.clone(),
            input: app.action_input.clone(),
        }),
        _ => None,
    };

    let busy = app.dispatcher.pending().map(|p| BusyIndicator {
        unit: p.unit.clone(),
        action: p.action,
        elapsed_secs: now.saturating_duration_since(p.started_at).as_secs(),
    });

    ViewSnapshot {
        page: app.pager.current_page() + 1,
        total_pages: app.pager.total_pages(),
        total_units: inventory.len(),
        matching_units: app.filtered.len(),
        rows,
        mode: app.mode,
        filter_mode: app.filter.mode(),
        query: app.filter.query().to_string(),
        prompt,
        busy,
        error: app.error.clone(),
        notice: app.notice.clone(),
    }
}
