//! # Haven REST
//!
//! Axum HTTP surface of the marketplace: auth, profiles, listings,
//! favorites, cache administration and health probes.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
