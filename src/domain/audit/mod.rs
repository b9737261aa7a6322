//! Audit domain
//!
//! Request/response audit records, the statistics derived from them and the
//! exemption rules that decide which requests are recorded at all.

mod entity;
mod exemption;
mod stats;

pub use entity::{LoggedRequest, LoggedResponse};
pub use exemption::{default_exemptions, is_exempt, LoggingExemption};
pub use stats::{Histogram, RequestStats};
