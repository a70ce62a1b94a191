use log::info;

use integrs_assembly::{Integron, assemble, merge_attc_hits, select_integrases};
use integrs_core::IntegronConfig;
use integrs_core::models::{AttcHit, IntegraseHit, Replicon};

use crate::attc_max::find_attc_max;
use crate::errors::LocalMaxError;
use crate::search::ExhaustiveSearch;

///
/// Detect the integrons of one replicon.
///
/// Integrase hits are reconciled between the two profiles, attC hits are
/// clustered and paired with the integrases. When `config.local_max` is set
/// and a searcher is given, sites found by the exhaustive search are merged
/// into the attC hits and the replicon is assembled again.
///
/// # Arguments
/// - replicon: the replicon, with its sequence when `local_max` is wanted
/// - attc: attC hits of the replicon, sorted by `(pos_begin, e_value)`
/// - integrases: integrase hits of the replicon from both profiles
/// - config: search parameters
/// - searcher: the exhaustive search collaborator
pub fn detect_integrons(
    replicon: &Replicon,
    attc: &[AttcHit],
    integrases: &[IntegraseHit],
    config: &IntegronConfig,
    searcher: Option<&dyn ExhaustiveSearch>,
) -> Result<Vec<Integron>, LocalMaxError> {
    let ctx = replicon.context.effective(config.distance_threshold);
    let integrases = select_integrases(
        integrases,
        &config.integrase_model,
        &config.recombinase_model,
        config.union_integrases,
    );

    let integrons = assemble(attc, &integrases, config, &ctx)?;

    let integrons = match searcher {
        Some(searcher) if config.local_max => {
            let extra = find_attc_max(&integrons, replicon, &ctx, searcher, config)?;
            if extra.is_empty() {
                integrons
            } else {
                let merged = merge_attc_hits(attc, &extra);
                assemble(&merged, &integrases, config, &ctx)?
            }
        }
        _ => integrons,
    };

    info!(
        "{}: {} integron(s) ({} topology)",
        ctx.id,
        integrons.len(),
        ctx.topology
    );
    Ok(integrons)
}
