//! Remote config store over HTTP.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;

use confstore_core::ConfigRoot;
use confstore_data::{ConfigError, ConfigStore};

use crate::error::Error;

/// Root resource of the config service's URL space.
const CONFIG_RESOURCE_ROOT: &str = "Config";

/// A [`ConfigStore`] that talks to a remote config service over HTTP.
///
/// The client is synchronous (blocking); every trait call is one request,
/// sent with `Content-Type: application/json` and no automatic retry.
///
/// # Example
///
/// ```ignore
/// use confstore_http::RemoteConfigStore;
/// use confstore_data::ConfigStore;
///
/// let store = RemoteConfigStore::new("http://localhost:8080/")?;
/// let names = store.list()?;
/// let tacos = store.get("tacos")?;
/// ```
pub struct RemoteConfigStore {
    client: Client,
    base_url: Url,
}

impl RemoteConfigStore {
    /// Create a client for the service rooted at `base_url`, e.g.
    /// `http://localhost:8080/`.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client that reuses an already-configured `reqwest` client
    /// (custom timeouts, proxies, auth).
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    fn collection_url(&self) -> Result<Url, ConfigError> {
        self.join(CONFIG_RESOURCE_ROOT)
    }

    fn component_url(&self, component_name: &str) -> Result<Url, ConfigError> {
        self.join(&format!("{}/{}", CONFIG_RESOURCE_ROOT, component_name))
    }

    fn join(&self, path: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidUrl {
                message: e.to_string(),
            })
            .map_err(ConfigError::from)
    }

    /// Translate a failure status into the shared error taxonomy.
    fn check_status(response: Response, component_name: &str) -> Result<Response, ConfigError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(match status.as_u16() {
            404 => ConfigError::NotFound {
                name: component_name.to_string(),
            },
            400 => ConfigError::Validation {
                message: format!("the config service rejected '{}'", component_name),
            },
            409 => ConfigError::NameConflict {
                message: format!(
                    "the config service reported a name conflict for '{}'",
                    component_name
                ),
            },
            415 => ConfigError::UnsupportedMedia {
                message: "the config service rejected the request content type".to_string(),
            },
            _ => ConfigError::Transport {
                message: format!("Unsuccessful request: {}", status),
            },
        })
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<Response, ConfigError> {
        request.send().map_err(|e| ConfigError::Transport {
            message: format!("HTTP request failed: {}", e),
        })
    }
}

fn decode_body<T: serde::de::DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, ConfigError> {
    response.json().map_err(|e| ConfigError::Transport {
        message: format!("Malformed {} payload: {}", what, e),
    })
}

impl ConfigStore for RemoteConfigStore {
    fn list(&self) -> Result<Vec<String>, ConfigError> {
        let url = self.collection_url()?;
        let response = self.send(self.client.get(url))?;
        let response = Self::check_status(response, CONFIG_RESOURCE_ROOT)?;
        decode_body(response, "component list")
    }

    fn get(&self, component_name: &str) -> Result<ConfigRoot, ConfigError> {
        let url = self.component_url(component_name)?;
        let response = self.send(self.client.get(url))?;
        let response = Self::check_status(response, component_name)?;
        decode_body(response, "component")
    }

    fn create(&self, config: ConfigRoot) -> Result<ConfigRoot, ConfigError> {
        let url = self.collection_url()?;
        let response = self.send(self.client.post(url).json(&config))?;
        let response = Self::check_status(response, &config.component_name)?;
        decode_body(response, "component")
    }

    fn update(&self, component_name: &str, config: ConfigRoot) -> Result<ConfigRoot, ConfigError> {
        let url = self.component_url(component_name)?;
        let response = self.send(self.client.put(url).json(&config))?;
        let response = Self::check_status(response, component_name)?;
        decode_body(response, "component")
    }

    fn delete(&self, component_name: &str) -> Result<(), ConfigError> {
        let url = self.component_url(component_name)?;
        let response = self.send(self.client.delete(url))?;
        Self::check_status(response, component_name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_urls_live_under_the_config_root() {
        let store = RemoteConfigStore::new("https://example.com/api/").unwrap();

        let url = store.component_url("tacos").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/Config/tacos");

        let url = store.collection_url().unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/Config");
    }
}
