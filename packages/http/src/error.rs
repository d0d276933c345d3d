use confstore_data::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },
}

impl From<Error> for ConfigError {
    fn from(error: Error) -> Self {
        ConfigError::Transport {
            message: error.to_string(),
        }
    }
}
