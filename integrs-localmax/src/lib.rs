//! Exhaustive attC re-search for `integrs`.
//!
//! The default attC search misses degenerate sites. Around every assembled
//! integron this crate runs a more sensitive search ([`ExhaustiveSearch`],
//! implemented by [`CmsearchRunner`] with `cmsearch --max`) on windows that
//! slide away from the array while they keep yielding new sites. The extra
//! hits are merged in and the replicon is assembled again
//! ([`detect_integrons`]).

pub mod attc_max;
pub mod cmsearch;
pub mod errors;
pub mod expand;
pub mod pipeline;
pub mod search;

pub use self::attc_max::find_attc_max;
pub use self::cmsearch::{CmsearchRunner, parse_tblout};
pub use self::errors::LocalMaxError;
pub use self::expand::{HitAccumulator, expand};
pub use self::pipeline::detect_integrons;
pub use self::search::{ExhaustiveSearch, SearchRequest, StrandSearch, local_max};
