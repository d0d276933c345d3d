use std::io;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}
