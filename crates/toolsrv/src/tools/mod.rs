//! The three insurance tools served over JSON-RPC.

mod analyze;
mod claim;
mod quote;

pub use analyze::AnalyzeTool;
pub use claim::ClaimTool;
pub use quote::QuoteTool;
