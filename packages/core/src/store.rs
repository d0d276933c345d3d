//! Durable in-memory entity store.
//!
//! [`DurableMemoryStore`] keeps every entity of one document type in an
//! in-memory table and persists each as its own JSON file:
//!
//! ```text
//! <id zero-padded to 10 digits>_<TypeName>.json
//! ```
//!
//! directly inside the configured directory, where the file content is the
//! envelope's JSON text with no wrapping. On startup the store scans that
//! directory, rebuilds its index from the matching files, and resumes id
//! allocation above the highest id it found.
//!
//! `create`/`add`/`update`/`delete` only touch the in-memory state; nothing
//! reaches the filesystem until [`DurableMemoryStore::save`], which rewrites
//! every indexed entity (a full resync, not a diff) and then removes the
//! files of everything deleted since construction.
//!
//! This store suits small data sets; reach for a real database before the
//! full-resync save becomes the bottleneck.
//!
//! ## Concurrency
//!
//! One reader/writer lock guards the index and the pending-delete list.
//! The store assumes a single process owns its directory - two stores
//! pointed at the same directory will clobber each other's files.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entity::JsonEntity;
use crate::error::StoreError;
use crate::fs::FileSystem;

pub struct DurableMemoryStore<T> {
    dir: PathBuf,
    fs: Box<dyn FileSystem>,
    type_name: &'static str,
    data_file_pattern: Regex,
    inner: RwLock<Inner<T>>,
}

struct Inner<T> {
    index: HashMap<u32, JsonEntity<T>>,
    delete_list: Vec<JsonEntity<T>>,
    next_id: u32,
}

impl<T: Serialize + DeserializeOwned + Clone> DurableMemoryStore<T> {
    /// Open (or initialize) a store over `dir`.
    ///
    /// Creates the directory if needed, reads every data file matching the
    /// naming convention into the index, and positions the id sequence one
    /// past the highest id found. A file whose content fails to decode is
    /// kept as a content-less record rather than aborting the load.
    pub fn new(dir: PathBuf, fs: Box<dyn FileSystem>) -> Result<Self, StoreError> {
        if dir.as_os_str().is_empty() {
            return Err(StoreError::InvalidArgument {
                message: "store directory must not be empty".to_string(),
            });
        }

        let type_name = short_type_name::<T>();
        let data_file_pattern = Regex::new(&format!(
            r"^(\d{{10}})_{}\.json$",
            regex::escape(type_name)
        ))
        .expect("data file pattern is a valid regex");

        let store = Self {
            dir,
            fs,
            type_name,
            data_file_pattern,
            inner: RwLock::new(Inner {
                index: HashMap::new(),
                delete_list: Vec::new(),
                next_id: 1,
            }),
        };
        store.load()?;
        Ok(store)
    }

    /// Read every data file in the configured directory into memory. This
    /// can be expensive, but it only runs at construction.
    fn load(&self) -> Result<(), StoreError> {
        self.fs.create_dir_if_missing(&self.dir)?;

        let mut inner = self.inner.write().expect("store lock poisoned");
        let mut highest_id = 0u32;
        for file_name in self.fs.list_files(&self.dir)? {
            let Some(captures) = self.data_file_pattern.captures(&file_name) else {
                continue;
            };
            let Ok(id) = captures[1].parse::<u32>() else {
                continue;
            };

            let text = self.fs.read_to_string(&self.dir.join(&file_name))?;
            let mut entity = JsonEntity::new(id);
            entity.set_json(text);
            if let Err(err) = entity.contents() {
                log::warn!(
                    "Data file {} does not decode; keeping a content-less record: {}",
                    file_name,
                    err
                );
            }

            inner.index.insert(id, entity);
            highest_id = highest_id.max(id);
        }
        inner.next_id = highest_id + 1;
        Ok(())
    }

    /// Allocate a fresh envelope with the next unused id.
    ///
    /// The envelope is not added to the index; populate it and pass it to
    /// [`Self::add`], or drop it (its id is then simply never reused).
    pub fn create(&self) -> JsonEntity<T> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let entity = JsonEntity::new(inner.next_id);
        inner.next_id += 1;
        entity
    }

    /// Insert an entity into the index. An entity whose id is already
    /// present is silently ignored.
    pub fn add(&self, entity: JsonEntity<T>) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.index.entry(entity.id()).or_insert(entity);
    }

    /// Replace the index entry for the entity's id, inserting if absent.
    pub fn update(&self, entity: JsonEntity<T>) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.index.insert(entity.id(), entity);
    }

    /// Remove the entity from the index and schedule its data file for
    /// removal on the next [`Self::save`].
    pub fn delete(&self, entity: JsonEntity<T>) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.index.remove(&entity.id());
        inner.delete_list.push(entity);
    }

    /// Synchronize the filesystem with the in-memory state.
    ///
    /// Writes every indexed entity's JSON text to its data file (a record
    /// with no content becomes an empty file), then removes the data file of
    /// every deleted entity. Neither list is cleared, so a repeated save
    /// rewrites unchanged files. Filesystem faults propagate to the caller.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let Inner {
            index, delete_list, ..
        } = &mut *inner;

        for entity in index.values_mut() {
            let path = data_file_path(&self.dir, self.type_name, entity.id());
            let text = match entity.json() {
                Ok(Some(text)) => text,
                Ok(None) => "",
                Err(err) => {
                    log::warn!(
                        "Entity {} no longer encodes; persisting an empty record: {}",
                        entity.id(),
                        err
                    );
                    ""
                }
            };
            self.fs.write_string(&path, text)?;
        }

        for entity in delete_list.iter() {
            let path = data_file_path(&self.dir, self.type_name, entity.id());
            self.fs.remove_file_if_exists(&path)?;
        }
        Ok(())
    }

    /// A point-in-time copy of every entity in the index, safe to enumerate
    /// and filter without holding the store's lock.
    pub fn entities(&self) -> Vec<JsonEntity<T>> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.index.values().cloned().collect()
    }

    /// The directory this store persists into.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

fn data_file_path(dir: &std::path::Path, type_name: &str, id: u32) -> PathBuf {
    dir.join(format!("{:010}_{}.json", id, type_name))
}

/// The unqualified name of `T`, used in the data file naming convention.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
