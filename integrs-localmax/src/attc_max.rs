//! Exhaustive re-search of attC sites around assembled integrons.

use log::{debug, info};

use integrs_assembly::assembly::{Side, integrase_side};
use integrs_assembly::{Integron, IntegronType};
use integrs_core::IntegronConfig;
use integrs_core::models::{AttcHit, Replicon, RepliconContext, Window};

use crate::errors::LocalMaxError;
use crate::expand::{HitAccumulator, expand};
use crate::search::{ExhaustiveSearch, StrandSearch, local_max};

///
/// Search attC sites the default search missed next to each integron of a
/// replicon.
///
/// - `complete`: a window of `distance_threshold` bases past the array edge
///   facing away from the integrase, on the array's strand. If the outermost
///   hit found there stays within the threshold of the array, the search keeps
///   expanding in that direction.
/// - `CALIN`: a window of `distance_threshold` bases on both sides of the
///   array, on its strand, then both directions. Skipped when its first site
///   was already found around a previous integron.
/// - `In0`: a window of `distance_threshold` bases around the integrase on
///   both strands, then both directions. Skipped when the integrase was only
///   reported by the broad recombinase profile.
///
/// Returns the deduplicated hits, sorted by `(pos_begin, e_value)`.
pub fn find_attc_max(
    integrons: &[Integron],
    replicon: &Replicon,
    ctx: &RepliconContext,
    searcher: &dyn ExhaustiveSearch,
    config: &IntegronConfig,
) -> Result<Vec<AttcHit>, LocalMaxError> {
    let dt = config.distance_threshold;
    let mut acc = HitAccumulator::new();

    for integron in integrons {
        match integron.integron_type() {
            Some(IntegronType::Complete) => {
                search_complete(integron, replicon, ctx, searcher, config, &mut acc)?
            }
            Some(IntegronType::Calin) => {
                let Some((first, last)) = integron.attc_span() else {
                    continue;
                };
                if acc.contains_begin(first.pos_begin) {
                    debug!("{}: {} already covered", ctx.id, integron.name());
                    continue;
                }
                let window = Window::around(ctx, first.pos_begin, last.pos_end, dt, dt);
                let hits = local_max(
                    searcher,
                    replicon,
                    ctx,
                    &window,
                    StrandSearch::from(first.strand),
                    config.evalue_attc,
                )?;
                if !hits.is_empty() {
                    acc.extend(hits);
                    expand(searcher, replicon, ctx, &window, &mut acc, true, true, config)?;
                }
            }
            Some(IntegronType::In0) => {
                let Some(integrase) = integron.integrase() else {
                    continue;
                };
                if integrase.annotation_source == config.recombinase_model {
                    continue;
                }
                let window = Window::around(ctx, integrase.pos_begin, integrase.pos_end, dt, dt);
                let hits = local_max(
                    searcher,
                    replicon,
                    ctx,
                    &window,
                    StrandSearch::Both,
                    config.evalue_attc,
                )?;
                if !hits.is_empty() {
                    acc.extend(hits);
                    expand(searcher, replicon, ctx, &window, &mut acc, true, true, config)?;
                }
            }
            None => {}
        }
    }

    info!("{}: exhaustive search found {} attC site(s)", ctx.id, acc.len());
    Ok(acc.into_sorted())
}

fn search_complete(
    integron: &Integron,
    replicon: &Replicon,
    ctx: &RepliconContext,
    searcher: &dyn ExhaustiveSearch,
    config: &IntegronConfig,
    acc: &mut HitAccumulator,
) -> Result<(), LocalMaxError> {
    let (Some(integrase), Some((first, last))) = (integron.integrase(), integron.attc_span())
    else {
        return Ok(());
    };
    let dt = config.distance_threshold;
    let side = integrase_side(ctx, integrase, first.pos_begin, last.pos_end)
        .map(|(side, _)| side)
        .unwrap_or(Side::Left);

    // 0-based half-open edges of the array
    let array_begin = first.pos_begin.saturating_sub(1);
    let array_end = last.pos_end.min(ctx.size);
    let window = match side {
        Side::Left => Window::new(array_end, ctx.shift_right(array_end, dt)),
        Side::Right => Window::new(ctx.shift_left(array_begin, dt), array_begin),
    };

    let hits = local_max(
        searcher,
        replicon,
        ctx,
        &window,
        StrandSearch::from(first.strand),
        config.evalue_attc,
    )?;
    if hits.is_empty() {
        return Ok(());
    }

    let (go_left, go_right) = match side {
        Side::Left => {
            let outermost = hits
                .iter()
                .max_by_key(|h| window.offset_of(ctx, h.pos_begin))
                .map(|h| ctx.within_threshold(last.pos_end, h.pos_begin, dt));
            (false, outermost.unwrap_or(false))
        }
        Side::Right => {
            let outermost = hits
                .iter()
                .min_by_key(|h| window.offset_of(ctx, h.pos_begin))
                .map(|h| ctx.within_threshold(h.pos_end, first.pos_begin, dt));
            (outermost.unwrap_or(false), false)
        }
    };
    acc.extend(hits);
    expand(searcher, replicon, ctx, &window, acc, go_left, go_right, config)
}
