pub mod error;
pub mod loan;
pub mod pipeline;
pub mod purchase;
pub mod resale;
pub mod time_value;
pub mod types;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::HdbResaleError;
pub use pipeline::{analyze_purchase, compute_all, PurchaseAnalysisInput, PurchaseAnalysisOutput};
pub use types::*;

/// Standard result type for all engine operations
pub type HdbResaleResult<T> = Result<T, HdbResaleError>;
