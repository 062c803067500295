use thiserror::Error;

/// Violations of the data-object invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("array `{name}` must have at least one component")]
    NoComponents { name: String },

    #[error("array `{name}` holds {len} values, not a multiple of {components} components")]
    RaggedArray { name: String, len: usize, components: usize },

    #[error("array `{name}` has {found} tuples but the data object has {expected} points")]
    TupleCountMismatch { name: String, expected: usize, found: usize },

    #[error("points must be 3-component float32 coordinates, got `{name}`")]
    InvalidPoints { name: String },

    #[error("no point array named `{name}`")]
    UnknownArray { name: String },
}
