//! The administrative workflows themselves.

use serde::{Deserialize, Serialize};

use confstore_core::ConfigRoot;
use confstore_data::{ConfigError, ConfigStore};

use crate::clock::{Clock, SystemClock};

/// Suffix timestamp appended when an imported component's name collides
/// with an existing one. Fixed-width: MMDDYYYYHHMMSS.
const IMPORT_STAMP_FORMAT: &str = "%m%d%Y%H%M%S";

/// Per-item results of an import. Empty lists are a valid outcome, not an
/// error.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ImportOutcome {
    pub import_successes: Vec<String>,
    pub import_warnings: Vec<String>,
}

/// Multi-step workflows composed from single-document store operations.
pub struct AdminConsole<S: ConfigStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: ConfigStore> AdminConsole<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Copy `source` to a new component named `destination`.
    ///
    /// A failed fetch propagates as the workflow's result; otherwise the
    /// retrieved document is renamed and created, and the create's outcome
    /// (including a rejection because `destination` already exists) is the
    /// workflow's outcome.
    pub fn copy_component(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<ConfigRoot, ConfigError> {
        log::debug!("Copying component '{}' to '{}'", source, destination);

        let mut config = self.store.get(source)?;
        config.rename(destination);
        self.store.create(config)
    }

    /// Exchange the contents of two components.
    ///
    /// Both documents are fetched up front; either fetch failing aborts the
    /// workflow before anything is written. Each document then takes the
    /// other's identity and is updated back under its original key, so the
    /// stored entities keep their ids. The two updates run one after the
    /// other with no compensation: if the second fails after the first
    /// succeeded, the store is left half-swapped. Swapping the same pair
    /// twice restores both documents.
    ///
    /// Returns the updated documents under (`first`, `second`) in that
    /// order.
    pub fn swap_components(
        &self,
        first: &str,
        second: &str,
    ) -> Result<(ConfigRoot, ConfigRoot), ConfigError> {
        log::debug!("Swapping components '{}' and '{}'", first, second);

        let mut first_config = self.store.get(first)?;
        let mut second_config = self.store.get(second)?;

        first_config.rename(second);
        second_config.rename(first);

        let stored_under_first = self.store.update(first, second_config)?;
        let stored_under_second = self.store.update(second, first_config)?;
        Ok((stored_under_first, stored_under_second))
    }

    /// Import a batch of documents, renaming around name collisions.
    ///
    /// The current component list is fetched first; a failure there aborts
    /// the whole import. Each entry whose name collides case-insensitively
    /// with an existing component is renamed to
    /// `<name>Imported<timestamp>` (one timestamp for the whole batch).
    /// Every entry is then created individually: per-item outcomes land in
    /// the success or warning list and never fail the workflow itself.
    pub fn import_config(&self, entries: Vec<ConfigRoot>) -> Result<ImportOutcome, ConfigError> {
        let existing_names = self.store.list()?;
        let stamp = self.clock.now().format(IMPORT_STAMP_FORMAT).to_string();

        let mut outcome = ImportOutcome::default();
        for mut entry in entries {
            let collides = existing_names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(&entry.component_name));
            if collides {
                let renamed = format!("{}Imported{}", entry.component_name, stamp);
                entry.rename(renamed);
            }

            let name = entry.component_name.clone();
            match self.store.create(entry) {
                Ok(_) => outcome
                    .import_successes
                    .push(format!("Component '{}' imported successfully.", name)),
                Err(err) => outcome.import_warnings.push(format!(
                    "Component '{}' NOT imported successfully.  It may contain invalid contents. Error Message: {}",
                    name, err
                )),
            }
        }
        Ok(outcome)
    }

    /// Fetch every stored document.
    ///
    /// A failed list propagates as-is. Every listed name is then fetched;
    /// if any fetch fails the whole export fails with one error joining
    /// every failure's message, otherwise the full document list is
    /// returned in list order.
    pub fn export_config(&self) -> Result<Vec<ConfigRoot>, ConfigError> {
        let names = self.store.list()?;

        let mut configs = Vec::with_capacity(names.len());
        let mut failures = Vec::new();
        for name in &names {
            match self.store.get(name) {
                Ok(config) => configs.push(config),
                Err(err) => failures.push(err.to_string()),
            }
        }

        if !failures.is_empty() {
            return Err(ConfigError::Internal {
                message: failures.join("\n"),
            });
        }
        Ok(configs)
    }
}
