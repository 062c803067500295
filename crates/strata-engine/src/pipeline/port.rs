use std::fmt;
use std::marker::PhantomData;

/// Untyped node address within one [`Pipeline`](super::Pipeline).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Typed node address returned by [`Pipeline::add`](super::Pipeline::add).
///
/// Gives typed access to the algorithm (`pipeline.get_mut(handle)`) so
/// parameter setters can be called after the node joined the graph.
pub struct NodeHandle<T> {
    id: NodeId,
    _algorithm: PhantomData<fn() -> T>,
}

impl<T> NodeHandle<T> {
    #[inline]
    pub(crate) fn new(id: NodeId) -> Self {
        Self { id, _algorithm: PhantomData }
    }

    #[inline]
    pub fn id(self) -> NodeId {
        self.id
    }
}

impl<T> Clone for NodeHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeHandle<T> {}

impl<T> PartialEq for NodeHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for NodeHandle<T> {}

impl<T> fmt::Debug for NodeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeHandle").field(&self.id).finish()
    }
}

impl<T> From<NodeHandle<T>> for NodeId {
    fn from(handle: NodeHandle<T>) -> Self {
        handle.id
    }
}

/// Reference to one output port of a node, usable as another node's input.
///
/// Holding an `OutputPort` does not keep anything alive and does not trigger
/// execution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OutputPort {
    pub node: NodeId,
    pub index: usize,
}
