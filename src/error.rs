//! Error types reported by the transform stages and angle estimators.
//!
//! Only recoverable runtime conditions are modelled here. Broken caller
//! contracts (wrong buffer lengths, mismatched matrix shapes, parameters
//! outside their documented range) panic at the call site instead.

use snafu::Snafu;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DspError {
    /// The transform primitive cannot be configured for this length
    #[snafu(display("Unsupported transform length {len}"))]
    UnsupportedLength { len: usize },

    /// One or more primitive evaluations inside a batch failed
    #[snafu(display("Argument error in {failures} element(s)"))]
    ArgumentError { failures: usize },
}

pub type Result<T, E = DspError> = std::result::Result<T, E>;
