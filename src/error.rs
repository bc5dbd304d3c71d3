use std::{io, path::PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Which bounded sequence an operation was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Conduit {
    /// The FIFO of pending borrow requests
    BorrowQueue,
    /// The LIFO of returns awaiting processing
    ReturnStack,
}

impl std::fmt::Display for Conduit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BorrowQueue => f.write_str("borrow queue"),
            Self::ReturnStack => f.write_str("return stack"),
        }
    }
}

/// Recoverable rejections produced by the catalog and circulation engine.
///
/// None of these is fatal; the caller decides whether to retry or re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum CirculationError {
    /// No catalog record carries this identifier
    #[error("book with id '{id}' not found in the catalog")]
    NotFound {
        /// The identifier that missed
        id: String,
    },

    /// A conduit is at its fixed capacity and dropped the item
    #[error("{conduit} is full ({capacity} entries)")]
    CapacityExceeded {
        /// The conduit that rejected the item
        conduit: Conduit,
        /// Its fixed bound
        capacity: usize,
    },

    /// Nothing is pending in the conduit
    #[error("{conduit} is empty")]
    Empty {
        /// The conduit that was drained
        conduit: Conduit,
    },

    /// A borrow request lacked a user or a title when it came up for issue
    #[error("malformed borrow request: {request}")]
    Malformed {
        /// The request in `user|title` form
        request: String,
    },

    /// The title is not (or no longer) in the catalog
    #[error("'{title}' is not available in the catalog")]
    Unavailable {
        /// The title as the caller supplied it
        title: String,
    },

    /// The title has no outstanding issue in the ledger
    #[error("'{title}' was not issued")]
    NotIssued {
        /// The title as the caller supplied it
        title: String,
    },
}

/// Errors raised while loading or validating an [`EngineConfig`](crate::EngineConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid JSON for the expected shape
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying parse failure
        #[source]
        source: serde_json::Error,
    },

    /// A field holds a value the engine cannot run with
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Field name as it appears in the file
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
