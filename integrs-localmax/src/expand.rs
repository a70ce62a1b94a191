use fxhash::FxHashMap;
use log::debug;

use integrs_core::IntegronConfig;
use integrs_core::models::hit::by_position;
use integrs_core::models::{AttcHit, Replicon, RepliconContext, SiteKey, Window};

use crate::errors::LocalMaxError;
use crate::search::{ExhaustiveSearch, StrandSearch, local_max};

///
/// attC hits collected by the exhaustive search of one replicon, one per site.
///
/// A site found again keeps its best e-value.
///
#[derive(Debug, Clone, Default)]
pub struct HitAccumulator {
    sites: FxHashMap<SiteKey, AttcHit>,
}

impl HitAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add hits and return how many of them are sites not seen before.
    pub fn extend(&mut self, hits: Vec<AttcHit>) -> usize {
        let mut added = 0;
        for hit in hits {
            match self.sites.get_mut(&hit.site_key()) {
                Some(current) => {
                    if hit.e_value < current.e_value {
                        *current = hit;
                    }
                }
                None => {
                    self.sites.insert(hit.site_key(), hit);
                    added += 1;
                }
            }
        }
        added
    }

    /// Whether a site starting at `pos_begin` was already found.
    pub fn contains_begin(&self, pos_begin: u32) -> bool {
        self.sites.keys().any(|k| k.pos_begin == pos_begin)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// The collected hits, sorted by `(pos_begin, e_value)`.
    pub fn into_sorted(self) -> Vec<AttcHit> {
        let mut hits: Vec<AttcHit> = self.sites.into_values().collect();
        hits.sort_by(by_position);
        hits
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

///
/// Slide windows away from `window` while they keep yielding new attC sites.
///
/// Each step searches `max_attc_size` bases overlapping the previous window
/// plus `distance_threshold` fresh bases, on both strands. A direction stops
/// when a step finds nothing new, when it has gone once around a circular
/// replicon, or after the window touching the end of a linear replicon.
///
/// # Arguments
/// - searcher: the search collaborator
/// - replicon: the replicon with its sequence loaded
/// - ctx: the topology the replicon is analysed with
/// - window: window already searched, expansion starts at its edges
/// - acc: collected hits, extended in place
/// - search_left: expand towards the origin
/// - search_right: expand away from the origin
/// - config: provides the distance threshold, max attC size and e-value cutoff
#[allow(clippy::too_many_arguments)]
pub fn expand(
    searcher: &dyn ExhaustiveSearch,
    replicon: &Replicon,
    ctx: &RepliconContext,
    window: &Window,
    acc: &mut HitAccumulator,
    search_left: bool,
    search_right: bool,
    config: &IntegronConfig,
) -> Result<(), LocalMaxError> {
    let directions = [
        (Direction::Left, search_left),
        (Direction::Right, search_right),
    ];
    for (direction, enabled) in directions {
        if enabled {
            expand_towards(searcher, replicon, ctx, window, acc, direction, config)?;
        }
    }
    Ok(())
}

fn expand_towards(
    searcher: &dyn ExhaustiveSearch,
    replicon: &Replicon,
    ctx: &RepliconContext,
    window: &Window,
    acc: &mut HitAccumulator,
    direction: Direction,
    config: &IntegronConfig,
) -> Result<(), LocalMaxError> {
    let stride = config.distance_threshold;
    let overlap = config.max_attc_size;
    let mut current = *window;
    let mut advanced: u64 = 0;

    loop {
        if !ctx.is_circular() {
            let at_edge = match direction {
                Direction::Left => current.begin == 0,
                Direction::Right => current.end >= ctx.size,
            };
            if at_edge {
                break;
            }
        }

        let next = match direction {
            Direction::Left => current.slide_left(ctx, overlap, stride),
            Direction::Right => current.slide_right(ctx, overlap, stride),
        };
        if next.is_degenerate(ctx) {
            break;
        }

        let hits = local_max(
            searcher,
            replicon,
            ctx,
            &next,
            StrandSearch::Both,
            config.evalue_attc,
        )?;
        let found = hits.len();
        let added = acc.extend(hits);
        debug!(
            "{}: {:?} window {} gave {} hit(s), {} new",
            ctx.id, direction, next, found, added
        );

        current = next;
        advanced += stride as u64;
        if added == 0 || (ctx.is_circular() && advanced >= ctx.size as u64) {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use integrs_core::models::Strand;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn attc(begin: u32, end: u32, e_value: f64) -> AttcHit {
        AttcHit::new("rep", "RF", begin, end, Strand::Plus, e_value).unwrap()
    }

    #[rstest]
    fn test_accumulator_counts_new_sites() {
        let mut acc = HitAccumulator::new();
        assert_eq!(acc.extend(vec![attc(100, 160, 1e-3), attc(50, 110, 1e-3)]), 2);
        assert_eq!(acc.extend(vec![attc(100, 160, 1e-6), attc(300, 360, 1e-3)]), 1);
        assert!(acc.contains_begin(50));
        assert!(!acc.contains_begin(51));

        let hits = acc.into_sorted();
        let begins: Vec<u32> = hits.iter().map(|h| h.pos_begin).collect();
        assert_eq!(begins, vec![50, 100, 300]);
        assert_eq!(hits[1].e_value, 1e-6);
    }

    #[rstest]
    fn test_accumulator_keeps_strands_apart() {
        let mut acc = HitAccumulator::new();
        let minus = AttcHit::new("rep", "RF", 100, 160, Strand::Minus, 1e-3).unwrap();
        acc.extend(vec![attc(100, 160, 1e-3)]);
        assert_eq!(acc.extend(vec![minus]), 1);
        assert_eq!(acc.len(), 2);
    }
}
