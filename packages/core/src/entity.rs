//! Serialization envelope binding a typed document to its JSON text.
//!
//! A [`JsonEntity`] carries a store-assigned id plus two representations of
//! the same document: the typed value and its JSON text. Conversion between
//! them is lazy in both directions - setting one representation invalidates
//! the cached other, which is recomputed on the next read.
//!
//! A conversion failure does not abort the caller: the envelope degrades to
//! a record with no content (both representations cleared) and the failure
//! is reported once through [`EntityError::Corrupt`] so it stays observable.

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum EntityError {
    #[error("Entity {id} holds data that does not convert: {message}")]
    Corrupt { id: u32, message: String },
}

/// A document wrapped for storage in a repository.
#[derive(Debug, Clone)]
pub struct JsonEntity<T> {
    id: u32,
    contents: Option<T>,
    json: Option<String>,
}

impl<T> JsonEntity<T> {
    /// Ids are assigned by the owning store; envelopes are never built with
    /// an arbitrary id from outside this crate.
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id,
            contents: None,
            json: None,
        }
    }

    /// The id assigned by the store. Immutable for the envelope's lifetime.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Replace the typed value, invalidating any cached JSON text.
    pub fn set_contents(&mut self, contents: T) {
        self.contents = Some(contents);
        self.json = None;
    }

    /// Replace the JSON text, invalidating any cached typed value.
    pub fn set_json(&mut self, json: String) {
        self.json = Some(json);
        self.contents = None;
    }
}

impl<T: Serialize + DeserializeOwned> JsonEntity<T> {
    /// The typed value, decoding the cached JSON text on demand.
    ///
    /// If the text does not decode, both representations are cleared and
    /// `EntityError::Corrupt` is returned once; further calls see a record
    /// with no content and return `Ok(None)`.
    pub fn contents(&mut self) -> Result<Option<&T>, EntityError> {
        if self.contents.is_none() {
            if let Some(json) = &self.json {
                match serde_json::from_str(json) {
                    Ok(decoded) => self.contents = Some(decoded),
                    Err(err) => {
                        self.json = None;
                        return Err(EntityError::Corrupt {
                            id: self.id,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }
        Ok(self.contents.as_ref())
    }

    /// The JSON text, encoding the typed value on demand.
    ///
    /// Encode failures follow the same degradation rule as [`Self::contents`].
    pub fn json(&mut self) -> Result<Option<&str>, EntityError> {
        if self.json.is_none() {
            if let Some(contents) = &self.contents {
                match serde_json::to_string(contents) {
                    Ok(encoded) => self.json = Some(encoded),
                    Err(err) => {
                        self.contents = None;
                        return Err(EntityError::Corrupt {
                            id: self.id,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }
        Ok(self.json.as_deref())
    }
}
