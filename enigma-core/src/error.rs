// File:    error.rs
// Author:  apezoo
// Date:    2025-08-04
//
// Description: Error type for machine construction, plugboard mutation, scoring input and persistence.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Errors raised by the machine, the scorers and the search strategies.

/// Broad classification of an [`EnigmaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The machine, a table or a search parameter is inconsistent.
    Configuration,
    /// A plugboard mutation broke its precondition. Always a caller bug.
    InvariantViolation,
    /// The ciphertext is too short to be scored.
    EmptyInput,
    /// Reading or writing a file failed.
    Io,
}

/// Error type for all fallible operations in this crate.
#[derive(Debug, thiserror::Error)]
pub enum EnigmaError {
    /// A component does not have the same number of positions as the alphabet.
    #[error("{component} has {actual} positions but the alphabet has {expected}")]
    CardinalityMismatch {
        /// Which component disagreed, e.g. `"rotor 2"` or `"reflector"`.
        component: String,
        /// The alphabet size.
        expected: usize,
        /// The component's size.
        actual: usize,
    },
    /// More plugs were requested than fit on the board.
    #[error("cannot place {requested} swaps on {positions} positions (at most {max})")]
    TooManyPlugs {
        /// Requested number of swaps.
        requested: usize,
        /// Number of positions on the swapper.
        positions: usize,
        /// Largest admissible number of swaps.
        max: usize,
    },
    /// The rotor position vector has the wrong length.
    #[error("expected {expected} rotor positions, got {actual}")]
    PositionCount {
        /// Number of rotors in the machine.
        expected: usize,
        /// Number of positions supplied.
        actual: usize,
    },
    /// A rotor position is outside `[0, N)`.
    #[error("rotor position {position} is out of range for {positions} positions")]
    PositionOutOfRange {
        /// The offending position.
        position: usize,
        /// Number of positions per rotor.
        positions: usize,
    },
    /// A symbol is not part of the configured alphabet.
    #[error("symbol {0:?} is not part of the alphabet")]
    UnknownSymbol(char),
    /// The alphabet definition is unusable.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    /// A language model table is unusable.
    #[error("invalid language model table: {0}")]
    InvalidTable(String),
    /// A search parameter is out of its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Attempted to swap a position with itself.
    #[error("position {0} cannot be swapped with itself")]
    SelfSwap(usize),
    /// Attempted to remove a swap that is not installed.
    #[error("positions {0} and {1} are not swapped with each other")]
    NotPaired(usize, usize),
    /// Attempted to move the endpoint of a swap from a free position.
    #[error("position {0} is not currently swapped")]
    NotSwapped(usize),
    /// Attempted to move a swap endpoint onto an occupied position.
    #[error("position {0} is not free")]
    NotFree(usize),
    /// The text is too short to contain a single scored group.
    #[error("text has {actual} symbols but at least {required} are needed for scoring")]
    EmptyInput {
        /// Minimum number of symbols.
        required: usize,
        /// Number of symbols supplied.
        actual: usize,
    },
    /// An I/O error from the persistence helpers.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A JSON (de)serialization error from the persistence helpers.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EnigmaError {
    /// Returns the broad class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CardinalityMismatch { .. }
            | Self::TooManyPlugs { .. }
            | Self::PositionCount { .. }
            | Self::PositionOutOfRange { .. }
            | Self::UnknownSymbol(_)
            | Self::InvalidAlphabet(_)
            | Self::InvalidTable(_)
            | Self::InvalidParameter(_) => ErrorKind::Configuration,
            Self::SelfSwap(_) | Self::NotPaired(..) | Self::NotSwapped(_) | Self::NotFree(_) => {
                ErrorKind::InvariantViolation
            }
            Self::EmptyInput { .. } => ErrorKind::EmptyInput,
            Self::Io(_) | Self::Json(_) => ErrorKind::Io,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;
