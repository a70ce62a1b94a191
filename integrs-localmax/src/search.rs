//! The exhaustive attC search collaborator and its window translation.

use log::debug;

use integrs_core::models::{AttcHit, Replicon, RepliconContext, Strand, Window};

use crate::errors::LocalMaxError;

/// Strands scanned by one exhaustive search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrandSearch {
    Top,
    Bottom,
    Both,
}

impl StrandSearch {
    /// `cmsearch` flag restricting the scan, if any.
    pub fn cmsearch_flag(&self) -> Option<&'static str> {
        match self {
            StrandSearch::Top => Some("--toponly"),
            StrandSearch::Bottom => Some("--bottomonly"),
            StrandSearch::Both => None,
        }
    }
}

impl From<Strand> for StrandSearch {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Plus => StrandSearch::Top,
            Strand::Minus => StrandSearch::Bottom,
        }
    }
}

///
/// One call to the exhaustive search: a subsequence of a replicon and how to
/// scan it.
///
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub replicon_id: &'a str,
    /// Size of the whole replicon, used to scale e-values.
    pub replicon_size: u32,
    pub sequence: &'a [u8],
    pub strand: StrandSearch,
    pub window: Window,
    pub evalue: f64,
}

///
/// Sensitive attC search over a subsequence.
///
/// Implementations return hits whose positions are 1-based and relative to
/// `request.sequence`, tagged with `request.replicon_id`. `Ok(None)` means
/// nothing was found.
///
pub trait ExhaustiveSearch: Send + Sync {
    fn search(&self, request: &SearchRequest) -> Result<Option<Vec<AttcHit>>, LocalMaxError>;
}

///
/// Run the exhaustive search on one window of a replicon and bring the hits
/// back to replicon coordinates.
///
/// A degenerate window yields no hit and never reaches the searcher.
///
/// # Arguments
/// - searcher: the search collaborator
/// - replicon: the replicon with its sequence loaded
/// - ctx: the topology the replicon is analysed with
/// - window: the stretch to search
/// - strand: strands to scan
/// - evalue: e-value cutoff
pub fn local_max(
    searcher: &dyn ExhaustiveSearch,
    replicon: &Replicon,
    ctx: &RepliconContext,
    window: &Window,
    strand: StrandSearch,
    evalue: f64,
) -> Result<Vec<AttcHit>, LocalMaxError> {
    if window.is_degenerate(ctx) {
        debug!("{}: skipping degenerate window {}", ctx.id, window);
        return Ok(Vec::new());
    }
    if replicon.seq.is_none() {
        return Err(LocalMaxError::MissingSequence(ctx.id.clone()));
    }
    let sequence = replicon.subsequence(window)?;

    let request = SearchRequest {
        replicon_id: &ctx.id,
        replicon_size: ctx.size,
        sequence: &sequence,
        strand,
        window: *window,
        evalue,
    };
    let Some(hits) = searcher.search(&request)? else {
        return Ok(Vec::new());
    };

    Ok(hits
        .into_iter()
        .map(|mut hit| {
            hit.pos_begin = window.to_absolute(ctx, hit.pos_begin);
            hit.pos_end = window.to_absolute(ctx, hit.pos_end);
            hit
        })
        .collect())
}
