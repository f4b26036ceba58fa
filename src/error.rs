use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("save store unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("save record is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("save record has the wrong shape: {0} is not an object")]
    Shape(&'static str),
}

/// Why an action sequence refused to start. No state changes when this is returned.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Rejected {
    #[error("another action is still in progress")]
    Busy,
    #[error("still chewing, feeding is cooling down")]
    Cooldown,
}
