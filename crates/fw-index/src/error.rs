use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("item overlaps a resident neighbor")]
    Collision,

    #[error("slot handle is stale or was never issued")]
    StaleSlot,

    #[error("replacement would break the order with a neighbor")]
    OutOfOrder,

    #[error("slot arena exhausted")]
    Full,

    #[error("index corrupted: {0}")]
    Corrupt(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
