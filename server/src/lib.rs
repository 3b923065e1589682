//! SurveySeat server
//!
//! Survey management API with a filter/order expression compiler for
//! client-supplied list queries.

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
