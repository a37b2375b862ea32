//! Diagnostics: advisory warnings and the one fatal error.

use core::error::Error;
use core::fmt;
use fluid_syntax::Position;

/// A non-fatal diagnostic recorded while transforming. Warnings never abort
/// the transform; processing continues with best-effort unit resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// Human-readable warning text.
    pub text: String,
    /// Selector of the rule the warning is attributed to.
    pub selector: String,
    /// Source position of that rule.
    pub position: Position,
}

impl fmt::Display for Warning {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.position, self.text)
    }
}

/// Fatal transform error. Aborts processing of the whole document; the host
/// is expected to not write output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformError {
    /// The minimum size carries no recognizable px/rem/em unit.
    UnitlessSize {
        /// Selector of the offending rule.
        selector: String,
        /// Source position of that rule.
        position: Position,
    },
}

impl TransformError {
    /// Source position of the offending rule.
    pub const fn position(&self) -> Position {
        match self {
            Self::UnitlessSize { position, .. } => *position,
        }
    }

    /// Selector of the offending rule.
    pub fn selector(&self) -> &str {
        match self {
            Self::UnitlessSize { selector, .. } => selector,
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnitlessSize { position, .. } => {
                write!(
                    formatter,
                    "{position}: sizes with unitless values are not supported"
                )
            }
        }
    }
}

impl Error for TransformError {}
