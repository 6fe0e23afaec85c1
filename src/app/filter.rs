// Case-insensitive name filter and the query being edited by the user.

use clap::ValueEnum;

use super::model::Unit;

/// When edits to the query take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterMode {
    /// Every keystroke re-filters immediately.
    #[default]
    Live,
    /// Edits stay in the prompt until committed.
    OnCommit,
}

/// Returns the positions in `inventory` whose name contains `query`,
/// ignoring case. An empty query passes everything through.
pub fn apply(inventory: &[Unit], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..inventory.len()).collect();
    }
    let needle = query.to_lowercase();
    inventory
        .iter()
        .enumerate()
        .filter(|(_, unit)| unit.name.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Default)]
pub struct FilterEngine {
    mode: FilterMode,
    query: String,
    applied: String,
}

impl FilterEngine {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Text shown in the filter prompt.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Query the filtered view is currently derived from.
    pub fn active_query(&self) -> &str {
        &self.applied
    }

    // The mutators return true when the active query changed and the view
    // has to be re-derived.

    pub fn append_char(&mut self, c: char) -> bool {
        self.query.push(c);
        self.sync_live()
    }

    pub fn delete_last_char(&mut self) -> bool {
        if self.query.pop().is_none() {
            return false;
        }
        self.sync_live()
    }

    pub fn commit(&mut self) -> bool {
        self.sync()
    }

    pub fn reset(&mut self) -> bool {
        self.query.clear();
        self.sync()
    }

    fn sync_live(&mut self) -> bool {
        match self.mode {
            FilterMode::Live => self.sync(),
            FilterMode::OnCommit => false,
        }
    }

    fn sync(&mut self) -> bool {
        if self.applied == self.query {
            return false;
        }
        self.applied.clone_from(&self.query);
        true
    }
}
