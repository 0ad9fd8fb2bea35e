use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("value at {key} is not {expected}")]
    Decode { key: String, expected: &'static str },
}
