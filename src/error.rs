//! Error type shared by the placement container, the annealer and the
//! plot writer.

use std::fmt;

/// Which arena an out-of-range handle was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Module,
    Net,
    Pin,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Module => "module",
            EntityKind::Net => "net",
            EntityKind::Pin => "pin",
        };
        f.write_str(name)
    }
}

/// Errors reported by this crate.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// A handle does not address an existing entity.
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: EntityKind,
        index: usize,
        len: usize,
    },

    /// The placement boundary has no interior.
    #[error("invalid boundary [{left}, {right}) x [{bottom}, {top})")]
    InvalidBoundary {
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
    },

    /// A configuration value is out of its legal range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Writing diagnostic output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PlaceError>;
