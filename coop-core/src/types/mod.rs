//! Coop Score Types
//!
//! Naming conventions:
//! - `*Spec`: contract definitions fetched from the contract source
//! - `*Snapshot`: point-in-time observations from the coop status source
//! - `*Record` / `*Report`: calculation output

pub mod common;
pub mod contract;
pub mod coop;
pub mod grade;
pub mod record;

pub use contract::*;
pub use coop::*;
pub use grade::*;
pub use record::*;
