use thiserror::Error;

/// A vertex layout that is inconsistent, or a vertex that does not fit one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("attribute `{name}` has {components} components (expected 1..=4)")]
    InvalidComponents { name: String, components: u32 },

    #[error("attribute `{name}` at offset {offset} is not 4-byte aligned")]
    Misaligned { name: String, offset: u32 },

    #[error("attribute `{name}` ends at byte {end}, past the {stride}-byte stride")]
    OutOfStride { name: String, end: u32, stride: u32 },

    #[error("attributes `{first}` and `{second}` overlap")]
    Overlap { first: String, second: String },

    #[error("attribute name or location of `{name}` is used twice")]
    Duplicate { name: String },

    #[error("stride {stride} is not a positive multiple of 4")]
    InvalidStride { stride: u32 },

    #[error("tuple for `{name}` has {found} components, layout expects {expected}")]
    Arity { name: String, expected: u32, found: usize },

    #[error("vertex has {found} tuples, layout has {expected} slots")]
    SlotCount { expected: usize, found: usize },
}
