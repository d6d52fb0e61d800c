//! Dependency resolution engine: newest-first backtracking over the remote
//! catalog, an undoable pin set, conflict reporting, and install ordering.

pub mod conflict;
pub mod graph;
pub mod pinset;
pub mod resolver;
