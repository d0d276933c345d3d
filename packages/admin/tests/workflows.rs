use std::sync::Mutex;

use chrono::{DateTime, Utc};

use confstore_admin::{AdminConsole, Clock};
use confstore_core::{ConfigNode, ConfigRoot};
use confstore_data::{ConfigError, ConfigStore};

/// In-memory stand-in for the config service, with switches to make
/// individual operations fail the way a remote store can.
#[derive(Default)]
struct FakeConfigStore {
    configs: Mutex<Vec<ConfigRoot>>,
    broken_components: Vec<String>,
    list_broken: bool,
}

impl FakeConfigStore {
    fn with_configs(configs: Vec<ConfigRoot>) -> Self {
        Self {
            configs: Mutex::new(configs),
            ..Self::default()
        }
    }

    fn valid_name(name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl ConfigStore for FakeConfigStore {
    fn list(&self) -> Result<Vec<String>, ConfigError> {
        if self.list_broken {
            return Err(ConfigError::Transport {
                message: "Unsuccessful request: 500 Internal Server Error".to_string(),
            });
        }
        let configs = self.configs.lock().unwrap();
        let mut names: Vec<String> = configs
            .iter()
            .map(|config| config.component_name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn get(&self, component_name: &str) -> Result<ConfigRoot, ConfigError> {
        if self
            .broken_components
            .iter()
            .any(|name| name.eq_ignore_ascii_case(component_name))
        {
            return Err(ConfigError::Transport {
                message: format!("Unsuccessful request for '{}'", component_name),
            });
        }
        let configs = self.configs.lock().unwrap();
        configs
            .iter()
            .find(|config| config.component_name.eq_ignore_ascii_case(component_name))
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                name: component_name.to_string(),
            })
    }

    fn create(&self, config: ConfigRoot) -> Result<ConfigRoot, ConfigError> {
        if !Self::valid_name(&config.component_name) {
            return Err(ConfigError::Validation {
                message: format!("'{}' is not a valid component name", config.component_name),
            });
        }
        let mut configs = self.configs.lock().unwrap();
        if configs
            .iter()
            .any(|existing| existing.component_name.eq_ignore_ascii_case(&config.component_name))
        {
            return Err(ConfigError::Validation {
                message: format!(
                    "a component named '{}' already exists",
                    config.component_name
                ),
            });
        }
        configs.push(config.clone());
        Ok(config)
    }

    fn update(&self, component_name: &str, config: ConfigRoot) -> Result<ConfigRoot, ConfigError> {
        let mut configs = self.configs.lock().unwrap();
        let position = configs
            .iter()
            .position(|existing| existing.component_name.eq_ignore_ascii_case(component_name))
            .ok_or_else(|| ConfigError::NotFound {
                name: component_name.to_string(),
            })?;
        configs[position] = config.clone();
        Ok(config)
    }

    fn delete(&self, component_name: &str) -> Result<(), ConfigError> {
        let mut configs = self.configs.lock().unwrap();
        let position = configs
            .iter()
            .position(|existing| existing.component_name.eq_ignore_ascii_case(component_name))
            .ok_or_else(|| ConfigError::NotFound {
                name: component_name.to_string(),
            })?;
        configs.remove(position);
        Ok(())
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn fixed_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2020-01-02T03:04:05Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn config_with_children(name: &str, children: Vec<ConfigNode>) -> ConfigRoot {
    ConfigRoot {
        component_name: name.to_string(),
        last_modified: fixed_instant(),
        data: ConfigNode::branch(name, children),
    }
}

fn config(name: &str) -> ConfigRoot {
    config_with_children(name, vec![ConfigNode::leaf("host", "tortilla")])
}

mod copy {
    use super::*;

    #[test]
    fn clones_the_source_under_the_new_name() {
        let children = vec![
            ConfigNode::leaf("N1", "V1"),
            ConfigNode::leaf("N2", "V2"),
        ];
        let store = FakeConfigStore::with_configs(vec![config_with_children(
            "foo",
            children.clone(),
        )]);
        let console = AdminConsole::new(store);

        let copied = console.copy_component("foo", "boo").unwrap();

        assert_eq!(copied.component_name, "boo");
        assert_eq!(copied.data.name, "boo");
        assert_eq!(copied.data.children, Some(children.clone()));

        // The source is untouched.
        let original = console.export_config().unwrap();
        let foo = original
            .iter()
            .find(|c| c.component_name == "foo")
            .unwrap();
        assert_eq!(foo.data.name, "foo");
        assert_eq!(foo.data.children, Some(children));
    }

    #[test]
    fn propagates_a_missing_source() {
        let console = AdminConsole::new(FakeConfigStore::default());

        assert!(matches!(
            console.copy_component("ghost", "boo"),
            Err(ConfigError::NotFound { name }) if name == "ghost"
        ));
    }

    #[test]
    fn surfaces_the_create_rejection_for_a_taken_destination() {
        let store = FakeConfigStore::with_configs(vec![config("foo"), config("boo")]);
        let console = AdminConsole::new(store);

        assert!(matches!(
            console.copy_component("foo", "boo"),
            Err(ConfigError::Validation { .. })
        ));
    }
}

mod swap {
    use super::*;

    #[test]
    fn exchanges_contents_between_the_two_keys() {
        let store = FakeConfigStore::with_configs(vec![
            config_with_children("config1", vec![ConfigNode::leaf("Name1", "Value1")]),
            config_with_children("config2", vec![ConfigNode::leaf("Name2", "Value2")]),
        ]);
        let console = AdminConsole::new(store);

        console.swap_components("config1", "config2").unwrap();

        let first = console.export_config().unwrap();
        let config1 = first
            .iter()
            .find(|c| c.component_name == "config1")
            .unwrap();
        let config2 = first
            .iter()
            .find(|c| c.component_name == "config2")
            .unwrap();

        assert_eq!(
            config1.data.children,
            Some(vec![ConfigNode::leaf("Name2", "Value2")])
        );
        assert_eq!(
            config2.data.children,
            Some(vec![ConfigNode::leaf("Name1", "Value1")])
        );
    }

    #[test]
    fn swapping_twice_restores_both_documents() {
        let original1 = config_with_children("config1", vec![ConfigNode::leaf("Name1", "Value1")]);
        let original2 = config_with_children("config2", vec![ConfigNode::leaf("Name2", "Value2")]);
        let store = FakeConfigStore::with_configs(vec![original1.clone(), original2.clone()]);
        let console = AdminConsole::new(store);

        console.swap_components("config1", "config2").unwrap();
        console.swap_components("config1", "config2").unwrap();

        let configs = console.export_config().unwrap();
        assert!(configs.contains(&original1));
        assert!(configs.contains(&original2));
    }

    #[test]
    fn aborts_before_writing_when_either_fetch_fails() {
        let original = config("lonely");
        let store = FakeConfigStore::with_configs(vec![original.clone()]);
        let console = AdminConsole::new(store);

        assert!(matches!(
            console.swap_components("lonely", "missing"),
            Err(ConfigError::NotFound { name }) if name == "missing"
        ));
        assert!(matches!(
            console.swap_components("missing", "lonely"),
            Err(ConfigError::NotFound { name }) if name == "missing"
        ));

        // No write happened.
        assert_eq!(console.export_config().unwrap(), vec![original]);
    }
}

mod import {
    use super::*;

    #[test]
    fn renames_collisions_and_imports_everything() {
        let store = FakeConfigStore::with_configs(vec![config("exists")]);
        let console = AdminConsole::with_clock(store, Box::new(FixedClock(fixed_instant())));

        let outcome = console
            .import_config(vec![config("EXISTS"), config("fresh")])
            .unwrap();

        assert_eq!(outcome.import_warnings, Vec::<String>::new());
        assert_eq!(
            outcome.import_successes,
            vec![
                "Component 'EXISTSImported01022020030405' imported successfully.".to_string(),
                "Component 'fresh' imported successfully.".to_string(),
            ]
        );

        // The renamed document's root node follows the new name.
        let renamed = console.export_config().unwrap();
        let imported = renamed
            .iter()
            .find(|c| c.component_name == "EXISTSImported01022020030405")
            .unwrap();
        assert_eq!(imported.data.name, "EXISTSImported01022020030405");
    }

    #[test]
    fn an_invalid_entry_becomes_a_warning_not_a_failure() {
        let console = AdminConsole::new(FakeConfigStore::default());

        let outcome = console.import_config(vec![config("bad&name")]).unwrap();

        assert!(outcome.import_successes.is_empty());
        assert_eq!(outcome.import_warnings.len(), 1);
        assert!(outcome.import_warnings[0].contains("'bad&name' NOT imported successfully."));
        assert!(outcome.import_warnings[0].contains("not a valid component name"));
    }

    #[test]
    fn an_empty_batch_yields_empty_lists() {
        let console = AdminConsole::new(FakeConfigStore::default());

        let outcome = console.import_config(vec![]).unwrap();
        assert_eq!(outcome, confstore_admin::ImportOutcome::default());
    }

    #[test]
    fn aborts_when_the_component_list_is_unavailable() {
        let store = FakeConfigStore {
            list_broken: true,
            ..FakeConfigStore::default()
        };
        let console = AdminConsole::new(store);

        assert!(matches!(
            console.import_config(vec![config("fresh")]),
            Err(ConfigError::Transport { .. })
        ));
    }
}

mod export {
    use super::*;

    #[test]
    fn returns_every_document_in_list_order() {
        let store = FakeConfigStore::with_configs(vec![
            config("zebra"),
            config("apple"),
            config("mango"),
        ]);
        let console = AdminConsole::new(store);

        let configs = console.export_config().unwrap();
        let names: Vec<&str> = configs
            .iter()
            .map(|config| config.component_name.as_str())
            .collect();
        assert_eq!(names, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn aggregates_every_fetch_failure_into_one_error() {
        let store = FakeConfigStore {
            configs: Mutex::new(vec![config("good"), config("bad1"), config("bad2")]),
            broken_components: vec!["bad1".to_string(), "bad2".to_string()],
            list_broken: false,
        };
        let console = AdminConsole::new(store);

        let err = console.export_config().unwrap_err();
        let ConfigError::Internal { message } = &err else {
            panic!("expected an aggregated failure, got {:?}", err);
        };
        assert!(message.contains("bad1"));
        assert!(message.contains("bad2"));
    }
}

/// The workflows run unchanged against the real handler.
mod against_the_real_handler {
    use super::*;
    use confstore_data::{ConfigHandler, Settings};

    fn open_console(dir: &std::path::Path) -> AdminConsole<ConfigHandler> {
        let settings = Settings {
            data_directory: dir.to_path_buf(),
        };
        AdminConsole::new(ConfigHandler::open(&settings).unwrap())
    }

    #[test]
    fn copy_and_swap_persist_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let console = open_console(dir.path());

        console
            .import_config(vec![
                config_with_children("first", vec![ConfigNode::leaf("a", "1")]),
                config_with_children("second", vec![ConfigNode::leaf("b", "2")]),
            ])
            .unwrap();

        console.copy_component("first", "third").unwrap();
        console.swap_components("first", "second").unwrap();

        // A fresh console over the same directory sees the results.
        let reopened = open_console(dir.path());
        let configs = reopened.export_config().unwrap();
        let names: Vec<&str> = configs
            .iter()
            .map(|config| config.component_name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);

        let first = configs
            .iter()
            .find(|c| c.component_name == "first")
            .unwrap();
        assert_eq!(first.data.children, Some(vec![ConfigNode::leaf("b", "2")]));

        let third = configs
            .iter()
            .find(|c| c.component_name == "third")
            .unwrap();
        assert_eq!(third.data.children, Some(vec![ConfigNode::leaf("a", "1")]));
    }
}
