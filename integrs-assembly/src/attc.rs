//! Clustering of attC sites into cassette arrays.

use integrs_core::models::hit::first_unsorted;
use integrs_core::models::{AttcHit, Hit, RepliconContext, Strand};

use crate::errors::AssemblyError;

///
/// A cassette array: attC sites on one strand, each within the distance
/// threshold of the next, in physical order along the replicon. An array
/// running over the origin of a circular replicon starts with the sites
/// located before the origin.
///
#[derive(Debug, Clone, PartialEq)]
pub struct AttcArray {
    hits: Vec<AttcHit>,
}

impl TryFrom<Vec<AttcHit>> for AttcArray {
    type Error = AssemblyError;

    fn try_from(hits: Vec<AttcHit>) -> Result<Self, Self::Error> {
        let strand = hits.first().ok_or(AssemblyError::EmptyArray)?.strand;
        if hits.iter().any(|h| h.strand != strand) {
            return Err(AssemblyError::MixedStrands);
        }
        Ok(AttcArray { hits })
    }
}

impl AttcArray {
    pub fn hits(&self) -> &[AttcHit] {
        &self.hits
    }

    pub fn into_hits(self) -> Vec<AttcHit> {
        self.hits
    }

    pub fn first(&self) -> &AttcHit {
        &self.hits[0]
    }

    pub fn last(&self) -> &AttcHit {
        &self.hits[self.hits.len() - 1]
    }

    pub fn strand(&self) -> Strand {
        self.first().strand
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Check the boundary preconditions shared by every entry point of the engine.
pub(crate) fn check_input<H: Hit>(
    hits: &[H],
    kind: &'static str,
    ctx: &RepliconContext,
) -> Result<(), AssemblyError> {
    if let Some(hit) = hits.iter().find(|h| h.replicon_id() != ctx.id) {
        return Err(AssemblyError::MixedReplicons {
            expected: ctx.id.clone(),
            found: hit.replicon_id().to_string(),
        });
    }
    if let Some(index) = first_unsorted(hits) {
        return Err(AssemblyError::UnsortedInput {
            kind,
            replicon_id: ctx.id.clone(),
            index,
        });
    }
    Ok(())
}

///
/// Group attC hits into cassette arrays.
///
/// 1. Unless `keep_palindromes` is set, sites reported at the same `pos_begin`
///    on both strands are collapsed to the best e-value.
/// 2. Hits are split by strand.
/// 3. On each strand a new array starts wherever the gap between a site's end
///    and the next site's begin exceeds `distance_threshold`.
/// 4. On a circular replicon the last array of a strand is prepended to the
///    first one when the gap over the origin is within the threshold.
///
/// Arrays of the `+` strand come first, then those of the `-` strand.
///
/// # Arguments
/// - hits: attC hits of one replicon, sorted by `(pos_begin, e_value)`
/// - keep_palindromes: keep both copies of a site reported on both strands
/// - distance_threshold: maximal gap between two sites of one array
/// - ctx: the replicon the hits belong to
pub fn search_attc(
    hits: &[AttcHit],
    keep_palindromes: bool,
    distance_threshold: u32,
    ctx: &RepliconContext,
) -> Result<Vec<AttcArray>, AssemblyError> {
    if hits.is_empty() {
        return Ok(Vec::new());
    }
    check_input(hits, "attC", ctx)?;

    let kept: Vec<&AttcHit> = if keep_palindromes {
        hits.iter().collect()
    } else {
        drop_palindromes(hits)
    };

    let (plus, minus): (Vec<&AttcHit>, Vec<&AttcHit>) =
        kept.into_iter().partition(|h| h.strand == Strand::Plus);

    let mut arrays = cluster_strand(&plus, distance_threshold, ctx);
    arrays.extend(cluster_strand(&minus, distance_threshold, ctx));
    Ok(arrays)
}

/// Keep the best e-value per `pos_begin`. Relies on the input being sorted.
fn drop_palindromes(hits: &[AttcHit]) -> Vec<&AttcHit> {
    let mut kept: Vec<&AttcHit> = Vec::with_capacity(hits.len());
    for hit in hits {
        match kept.last_mut() {
            Some(last) if last.pos_begin == hit.pos_begin => {
                if hit.e_value < last.e_value {
                    *last = hit;
                }
            }
            _ => kept.push(hit),
        }
    }
    kept
}

/// Gap between two consecutive sites of a sorted strand; overlapping sites
/// are adjacent.
fn gap_between(ctx: &RepliconContext, prev: &AttcHit, next: &AttcHit) -> i64 {
    if next.pos_begin <= prev.pos_end {
        0
    } else {
        ctx.forward_gap(prev.pos_end, next.pos_begin)
    }
}

fn cluster_strand(
    hits: &[&AttcHit],
    distance_threshold: u32,
    ctx: &RepliconContext,
) -> Vec<AttcArray> {
    let Some(first) = hits.first() else {
        return Vec::new();
    };

    let mut groups: Vec<Vec<AttcHit>> = vec![vec![(*first).clone()]];
    for pair in hits.windows(2) {
        if gap_between(ctx, pair[0], pair[1]) > distance_threshold as i64 {
            groups.push(Vec::new());
        }
        if let Some(group) = groups.last_mut() {
            group.push(pair[1].clone());
        }
    }

    if ctx.is_circular() && groups.len() > 1 {
        let first_begin = groups[0][0].pos_begin;
        let last_end = groups
            .last()
            .and_then(|g| g.last())
            .map(|h| h.pos_end)
            .unwrap_or(first_begin);
        if ctx.within_threshold(last_end, first_begin, distance_threshold) {
            if let Some(mut merged) = groups.pop() {
                merged.append(&mut groups[0]);
                groups[0] = merged;
            }
        }
    }

    groups.into_iter().map(|hits| AttcArray { hits }).collect()
}
