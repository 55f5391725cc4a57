//! # Haven Server
//!
//! Composition root for the Haven marketplace: the Shaku module and the
//! startup helpers used by the binary.

pub mod di;
pub mod startup;
