use thiserror::Error;

/// Errors returned by the fallible operations of a [`Ring`].
///
/// A failed operation never leaves the ring partially mutated.
///
/// [`Ring`]: crate::Ring
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The operation needs at least one linked node.
    #[error("cannot do the specified operation on an empty ring")]
    EmptyRing,

    /// One of the index arguments, or a node reached by following a link,
    /// is not currently part of the ring.
    #[error("cannot do the specified operation on detached nodes")]
    DetachedNodeOperation,

    /// An argument, or a decoded ring structure checked by
    /// [`Ring::check`](crate::Ring::check), is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
