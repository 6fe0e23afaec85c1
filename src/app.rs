// The central application controller and event loop.

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{Terminal, backend::Backend};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub mod dispatcher;
pub mod filter;
pub mod input;
pub mod inventory;
pub mod model;
pub mod pager;
pub mod systemd;
pub mod ui;
pub mod view;

#[cfg(test)]
mod testing;

use crate::error::{ActionError, ManagerError, ValidationError};
use dispatcher::{ActionDispatcher, Completion};
use filter::{FilterEngine, FilterMode};
use input::{Command, InputMode};
use inventory::InventoryStore;
use model::{ActionKind, Unit};
use pager::Pager;
use systemd::ServiceManager;
use view::ViewSnapshot;

const INPUT_POLL: Duration = Duration::from_millis(100);

pub struct App {
    manager: Arc<dyn ServiceManager>,
    inventory: InventoryStore,
    filter: FilterEngine,
    /// Positions in the inventory matching the active query.
    filtered: Vec<usize>,
    pager: Pager,
    dispatcher: ActionDispatcher,
    mode: InputMode,
    action_target: Option<String>,
    action_input: String,
    error: Option<String>,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(manager: Arc<dyn ServiceManager>, page_size: usize, filter_mode: FilterMode) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(Arc::clone(&manager)),
            manager,
            inventory: InventoryStore::new(),
            filter: FilterEngine::new(filter_mode),
            filtered: Vec::new(),
            pager: Pager::new(page_size),
            mode: InputMode::Normal,
            action_target: None,
            action_input: String::new(),
            error: None,
            notice: None,
            should_quit: false,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>, tick_rate: Option<Duration>) -> Result<()> {
        let mut last_tick = Instant::now();

        loop {
            let snapshot = self.snapshot();
            terminal.draw(|f| ui::render(f, &snapshot))?;

            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(command) = input::map_key(self.mode, key) {
                        self.handle(command);
                    }
                }
            }

            self.drain_completions();

            if let Some(rate) = tick_rate {
                if last_tick.elapsed() >= rate {
                    self.on_tick();
                    last_tick = Instant::now();
                }
            }

            if self.should_quit() {
                if let Some(pending) = self.dispatcher.pending() {
                    warn!(unit = %pending.unit, action = %pending.action, "quitting with an action still running");
                }
                return Ok(());
            }
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        view::project(self, Instant::now())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Reloads the inventory from the manager and re-derives the view.
    pub fn refresh(&mut self) -> Result<(), ManagerError> {
        match self.inventory.refresh(self.manager.as_ref()) {
            Ok(_) => {
                self.error = None;
                self.rederive();
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn rederive(&mut self) {
        self.filtered = filter::apply(self.inventory.units(), self.filter.active_query());
        self.pager.reclamp(self.filtered.len());
        debug!(
            matching = self.filtered.len(),
            page = self.pager.current_page(),
            selected = self.pager.selected_index(),
            "view re-derived"
        );
    }

    pub fn selected_unit(&self) -> Option<&Unit> {
        let position = self.pager.selected_position()?;
        self.inventory.units().get(*self.filtered.get(position)?)
    }

    pub fn handle(&mut self, command: Command) {
        debug!(?command, mode = ?self.mode, "command");
        match command {
            Command::Quit => self.should_quit = true,
            Command::MoveUp => self.pager.move_selection(-1),
            Command::MoveDown => self.pager.move_selection(1),
            Command::PageNext => self.pager.change_page(1),
            Command::PagePrev => self.pager.change_page(-1),
            Command::Refresh => {
                let _ = self.refresh();
            }

            Command::FilterStart => self.mode = InputMode::Filter,
            Command::FilterChar(c) => self.edit_filter(|f| f.append_char(c)),
            Command::FilterBackspace => self.edit_filter(FilterEngine::delete_last_char),
            Command::FilterCommit => {
                self.edit_filter(FilterEngine::commit);
                self.mode = InputMode::Normal;
            }
            Command::FilterCancel => {
                self.edit_filter(FilterEngine::reset);
                self.mode = InputMode::Normal;
            }

            Command::ActionConfirm => match self.mode {
                InputMode::Action => self.submit_prompt(),
                _ => self.open_prompt(),
            },
            Command::ActionKeyInput(c) => {
                if self.mode == InputMode::Action {
                    self.action_input.push(c);
                }
            }
            Command::ActionBackspace => {
                self.action_input.pop();
            }
            Command::ActionCancel => self.close_prompt(),
            Command::QuickAction(action) => match self.selected_unit().map(|u| u.name.clone()) {
                Some(name) => self.request_action(&name, action),
                None => self.reject(ValidationError::NoSelection.into()),
            },
        }
    }

    fn edit_filter(&mut self, edit: impl FnOnce(&mut FilterEngine) -> bool) {
        if edit(&mut self.filter) {
            self.rederive();
        }
    }

    fn open_prompt(&mut self) {
        let Some(name) = self.selected_unit().map(|u| u.name.clone()) else {
            self.reject(ValidationError::NoSelection.into());
            return;
        };
        self.action_target = Some(name);
        self.action_input.clear();
        self.mode = InputMode::Action;
    }

    fn close_prompt(&mut self) {
        self.action_target = None;
        self.action_input.clear();
        self.mode = InputMode::Normal;
    }

    fn submit_prompt(&mut self) {
        let target = self.action_target.take();
        let parsed = self.action_input.parse::<ActionKind>();
        self.close_prompt();

        match (target, parsed) {
            (Some(unit), Ok(action)) => self.request_action(&unit, action),
            (None, _) => self.reject(ValidationError::NoSelection.into()),
            (_, Err(e)) => self.reject(e.into()),
        }
    }

    fn request_action(&mut self, unit: &str, action: ActionKind) {
        match self.dispatcher.invoke(unit, action) {
            Ok(()) => self.notice = None,
            Err(e) => self.reject(e),
        }
    }

    fn reject(&mut self, err: ActionError) {
        match err {
            // A busy rejection must not replace the outcome of the action it lost to.
            ActionError::Busy { .. } => self.notice = Some(err.to_string()),
            other => {
                warn!(error = %other, "action rejected");
                self.notice = None;
                self.error = Some(other.to_string());
            }
        }
    }

    /// Applies every action outcome the dispatcher has collected so far.
    pub fn drain_completions(&mut self) {
        while let Some(completion) = self.dispatcher.poll() {
            self.on_completion(completion);
        }
    }

    fn on_completion(&mut self, completion: Completion) {
        // Only a fresh listing is trusted for the unit's new state.
        let _ = self.refresh();

        match completion.result {
            Ok(()) => {
                info!(
                    unit = %completion.unit,
                    action = %completion.action,
                    elapsed = ?completion.elapsed,
                    "action completed"
                );
                self.notice = Some(format!("{} succeeded on {}", completion.action, completion.unit));
            }
            Err(e) => {
                self.notice = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Periodic refresh. Skipped while an action is in flight so the
    /// post-action refresh is the one that reports its outcome.
    pub fn on_tick(&mut self) {
        if self.dispatcher.is_busy() {
            return;
        }
        let _ = self.refresh();
    }
}
