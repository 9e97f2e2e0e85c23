//! Machine-level error type, wrapping the loader and core taxonomies.

use std::fmt;

use format_csav::CsavError;
use format_mcr::McrError;
use format_mic::MicError;
use kl10_ebox::error::EboxError;

/// Anything that can go wrong assembling or loading the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kl10Error {
    /// Definitions-file parse or symbol failure.
    Defs(MicError),
    /// A loaded field dictionary disagrees with the hardware layout.
    FieldMismatch {
        field: String,
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// RAM dump decode failure.
    Dump(McrError),
    /// CSAV image decode failure.
    Image(CsavError),
    /// Core fault.
    Core(EboxError),
}

impl fmt::Display for Kl10Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defs(e) => write!(f, "definitions: {e}"),
            Self::FieldMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field {field:?} is <{}:{}> in the definitions but <{}:{}> in hardware",
                found.0, found.1, expected.0, expected.1
            ),
            Self::Dump(e) => write!(f, "ram dump: {e}"),
            Self::Image(e) => write!(f, "csav image: {e}"),
            Self::Core(e) => write!(f, "core: {e}"),
        }
    }
}

impl std::error::Error for Kl10Error {}

impl From<MicError> for Kl10Error {
    fn from(e: MicError) -> Self {
        Self::Defs(e)
    }
}

impl From<McrError> for Kl10Error {
    fn from(e: McrError) -> Self {
        Self::Dump(e)
    }
}

impl From<CsavError> for Kl10Error {
    fn from(e: CsavError) -> Self {
        Self::Image(e)
    }
}

impl From<EboxError> for Kl10Error {
    fn from(e: EboxError) -> Self {
        Self::Core(e)
    }
}
