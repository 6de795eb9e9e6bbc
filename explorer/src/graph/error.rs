use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("invalid entity kind '{0}'")]
    InvalidKind(String),

    #[error("unsupported entity kind '{0}' for relation extraction")]
    UnsupportedKind(String),

    #[error("malformed detail payload: {0}")]
    MalformedPayload(String),

    #[error("entity record has no usable numeric id")]
    MissingEntityId,

    #[error("invalid node id '{0}'")]
    InvalidNodeId(String),

    #[error("node '{0}' is not in the graph")]
    UnknownNode(String),

    #[error("payload describes a {actual} but node '{node_id}' is a {expected}")]
    KindMismatch {
        node_id: String,
        expected: String,
        actual: String,
    },

    #[error("graph generation {current} replaced generation {requested}")]
    StaleGeneration { requested: u64, current: u64 },
}
