//! Integron assembly for `integrs`.
//!
//! Two steps turn raw hits of one replicon into integrons:
//!
//! 1. [`search_attc`] groups attC sites of one strand into cassette arrays
//!    whenever consecutive sites are closer than the distance threshold.
//! 2. [`find_integrons`] walks the integrases in position order and binds each
//!    one to the nearest free array, leaving the rest as `In0` and `CALIN`.
//!
//! ```rust
//! use integrs_assembly::{IntegronType, assemble};
//! use integrs_core::IntegronConfig;
//! use integrs_core::models::{AttcHit, IntegraseHit, RepliconContext, Strand, Topology};
//!
//! let ctx = RepliconContext::new("rep", 50_000, Topology::Linear).unwrap();
//! let attc = vec![
//!     AttcHit::new("rep", "RF", 1500, 1560, Strand::Minus, 1e-5).unwrap(),
//!     AttcHit::new("rep", "RF", 1800, 1860, Strand::Minus, 1e-6).unwrap(),
//! ];
//! let integrases =
//!     vec![IntegraseHit::new("rep", "rep_1", 55, 1014, Strand::Plus, 1e-30, "intI_Cterm").unwrap()];
//!
//! let integrons = assemble(&attc, &integrases, &IntegronConfig::default(), &ctx).unwrap();
//! assert_eq!(integrons.len(), 1);
//! assert_eq!(integrons[0].integron_type(), Some(IntegronType::Complete));
//! ```

pub mod assembly;
pub mod attc;
pub mod errors;
pub mod integron;

pub use self::assembly::{
    ArrayPool, Side, assemble, find_integrons, merge_attc_hits, select_integrases,
};
pub use self::attc::{AttcArray, search_attc};
pub use self::errors::AssemblyError;
pub use self::integron::{AttcMember, Integron, IntegronElement, IntegronType};
