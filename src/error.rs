use displaydoc::Display;

/// Configuration errors reported at the boundary of every solver entry point.
///
/// Structural inconsistencies (e.g. an edge handle used with a graph other
/// than the one that produced it) indicate a caller bug and panic instead of
/// returning a variant of this enum, as do violations of internal algorithmic
/// invariants.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Invalid flow query where source and sink are the same vertex
    SourceIsSink,
    /// Invalid capacity, expected a non-negative value
    NegativeCapacity,
    /// Vertex handle does not belong to the graph
    UnknownVertex,
    /// Arithmetic overflow while accumulating flow
    ArithmeticOverflow,
}
