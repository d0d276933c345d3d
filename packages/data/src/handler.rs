//! Local [`ConfigStore`] implementation over the durable entity store.

use lazy_static::lazy_static;
use regex::Regex;

use confstore_core::{ConfigRoot, DurableMemoryStore, JsonEntity, StdFileSystem, StoreError};

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::ConfigStore;

lazy_static! {
    // Component names allow word characters only.
    static ref NON_WORD: Regex = Regex::new(r"\W").unwrap();
}

/// Applies the component-level rules (name validation, uniqueness,
/// rename-vs-recreate) on top of a [`DurableMemoryStore`] and persists after
/// every mutation.
pub struct ConfigHandler {
    repository: DurableMemoryStore<ConfigRoot>,
}

impl ConfigHandler {
    pub fn new(repository: DurableMemoryStore<ConfigRoot>) -> Self {
        Self { repository }
    }

    /// Open a handler over the directory named in `settings`, backed by the
    /// real filesystem.
    pub fn open(settings: &Settings) -> Result<Self, StoreError> {
        let repository =
            DurableMemoryStore::new(settings.data_directory.clone(), Box::new(StdFileSystem))?;
        Ok(Self::new(repository))
    }

    /// The stored entity (and a copy of its document) whose component name
    /// matches `name` case-insensitively. Content-less records never match.
    fn find_entity(&self, name: &str) -> Option<(JsonEntity<ConfigRoot>, ConfigRoot)> {
        for mut entity in self.repository.entities() {
            let Ok(Some(contents)) = entity.contents() else {
                continue;
            };
            if contents.component_name.eq_ignore_ascii_case(name) {
                let contents = contents.clone();
                return Some((entity, contents));
            }
        }
        None
    }
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || NON_WORD.is_match(name) {
        return Err(ConfigError::Validation {
            message: format!("'{}' is not a valid component name", name),
        });
    }
    Ok(())
}

impl ConfigStore for ConfigHandler {
    fn list(&self) -> Result<Vec<String>, ConfigError> {
        let mut names: Vec<String> = self
            .repository
            .entities()
            .into_iter()
            .filter_map(|mut entity| {
                entity
                    .contents()
                    .ok()
                    .flatten()
                    .map(|config| config.component_name.clone())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn get(&self, component_name: &str) -> Result<ConfigRoot, ConfigError> {
        log::debug!("Getting component '{}'", component_name);

        match self.find_entity(component_name) {
            Some((_, config)) => Ok(config),
            None => Err(ConfigError::NotFound {
                name: component_name.to_string(),
            }),
        }
    }

    fn create(&self, config: ConfigRoot) -> Result<ConfigRoot, ConfigError> {
        log::debug!("Creating component '{}'", config.component_name);

        validate_name(&config.component_name)?;
        if self.find_entity(&config.component_name).is_some() {
            return Err(ConfigError::Validation {
                message: format!(
                    "a component named '{}' already exists",
                    config.component_name
                ),
            });
        }

        let mut entity = self.repository.create();
        entity.set_contents(config.clone());
        self.repository.add(entity);
        self.repository.save()?;
        Ok(config)
    }

    fn update(&self, component_name: &str, config: ConfigRoot) -> Result<ConfigRoot, ConfigError> {
        log::debug!(
            "Updating component '{}' (incoming name '{}')",
            component_name,
            config.component_name
        );

        let Some((mut entity, _)) = self.find_entity(component_name) else {
            return Err(ConfigError::NotFound {
                name: component_name.to_string(),
            });
        };
        validate_name(&config.component_name)?;

        // Renaming onto another component would clobber it.
        if !config.component_name.eq_ignore_ascii_case(component_name)
            && self.find_entity(&config.component_name).is_some()
        {
            return Err(ConfigError::NameConflict {
                message: format!(
                    "cannot rename '{}' to '{}': that name is already taken",
                    component_name, config.component_name
                ),
            });
        }

        entity.set_contents(config.clone());
        self.repository.update(entity);
        self.repository.save()?;
        Ok(config)
    }

    fn delete(&self, component_name: &str) -> Result<(), ConfigError> {
        log::debug!("Deleting component '{}'", component_name);

        let Some((entity, _)) = self.find_entity(component_name) else {
            return Err(ConfigError::NotFound {
                name: component_name.to_string(),
            });
        };
        self.repository.delete(entity);
        self.repository.save()?;
        Ok(())
    }
}
