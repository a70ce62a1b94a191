//! Core infrastructure for integron detection in Rust.
//!
//! This crate holds what every other `integrs` crate shares:
//!
//! - **Hit records**: [`AttcHit`](models::AttcHit) and [`IntegraseHit`](models::IntegraseHit),
//!   validated at construction and viewed through the [`Hit`](models::Hit) trait
//! - **Replicon context**: size and topology of the replicon under analysis,
//!   passed explicitly to every coordinate computation
//! - **Coordinate model**: forward gaps and boundary shifts that wrap on circular
//!   replicons and clamp on linear ones
//! - **Windows**: the stretches of sequence handed to the exhaustive re-search
//! - **Configuration** and readers for the tab-separated hit tables
//!
//! ## Quick Start
//!
//! ```rust
//! use integrs_core::models::{RepliconContext, Topology};
//!
//! let ctx = RepliconContext::new("plasmid", 1000, Topology::Circular).unwrap();
//!
//! // walking forward from 990 reaches 10 after 20 bases on a circle
//! assert_eq!(ctx.forward_gap(990, 10), 20);
//! assert!(ctx.within_threshold(990, 10, 50));
//! ```

pub mod config;
pub mod consts;
pub mod coords;
pub mod errors;
pub mod io;
pub mod models;
pub mod utils;

// re-exports
pub use self::config::IntegronConfig;
