//! Supporting utilities used by models.
//!
//! These modules are public because they are useful on their own, but their
//! APIs are not stable.

pub mod catalog;
pub mod constraint;
pub mod electrolyte;
pub mod formulation;
pub mod materials;
pub mod units;
