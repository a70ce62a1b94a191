//! Pairing of integrases with attC arrays.

use std::collections::BTreeMap;

use log::debug;

use integrs_core::IntegronConfig;
use integrs_core::models::hit::by_position;
use integrs_core::models::{AttcHit, IntegraseHit, RepliconContext, SiteKey};

use crate::attc::{AttcArray, check_input, search_attc};
use crate::errors::AssemblyError;
use crate::integron::Integron;

/// Where an integrase sits relative to an attC array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// Integrase before the first attC site.
    Left,
    /// Integrase after the last attC site.
    Right,
}

///
/// Closest side of the span `[first_begin, last_end]` for an integrase, with
/// the gap separating them.
///
/// Both gaps span the integrase itself: the left gap runs from the integrase
/// begin to the first site's begin, the right gap from the last site's end to
/// the integrase end. On a linear replicon a negative gap is not a candidate.
/// Equal gaps favour the left side.
pub fn integrase_side(
    ctx: &RepliconContext,
    integrase: &IntegraseHit,
    first_begin: u32,
    last_end: u32,
) -> Option<(Side, u32)> {
    let left = ctx.oriented_gap(integrase.pos_begin, first_begin);
    let right = ctx.oriented_gap(last_end, integrase.pos_end);
    match (left, right) {
        (Some(l), Some(r)) if r < l => Some((Side::Right, r)),
        (Some(l), _) => Some((Side::Left, l)),
        (None, Some(r)) => Some((Side::Right, r)),
        (None, None) => None,
    }
}

///
/// The arrays not yet bound to an integrase.
///
#[derive(Debug, Clone, Default)]
pub struct ArrayPool {
    arrays: Vec<AttcArray>,
}

impl ArrayPool {
    pub fn new(arrays: Vec<AttcArray>) -> Self {
        ArrayPool { arrays }
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    ///
    /// Index, side and distance of the array closest to `integrase`.
    ///
    /// Ties are broken by the smallest `pos_begin` of the array's first site,
    /// then by side (left first).
    pub fn nearest(
        &self,
        ctx: &RepliconContext,
        integrase: &IntegraseHit,
    ) -> Option<(usize, Side, u32)> {
        self.arrays
            .iter()
            .enumerate()
            .filter_map(|(idx, array)| {
                integrase_side(ctx, integrase, array.first().pos_begin, array.last().pos_end)
                    .map(|(side, distance)| (idx, side, distance))
            })
            .min_by_key(|(idx, side, distance)| {
                (*distance, self.arrays[*idx].first().pos_begin, *side)
            })
    }

    /// Remove and return the closest array if it lies within `distance_threshold`.
    pub fn take_nearest(
        &mut self,
        ctx: &RepliconContext,
        integrase: &IntegraseHit,
        distance_threshold: u32,
    ) -> Option<(AttcArray, Side, u32)> {
        let (idx, side, distance) = self.nearest(ctx, integrase)?;
        if distance > distance_threshold {
            return None;
        }
        Some((self.arrays.remove(idx), side, distance))
    }

    pub fn into_arrays(self) -> Vec<AttcArray> {
        self.arrays
    }
}

///
/// Assemble integrons from integrases and attC arrays of one replicon.
///
/// Integrases are visited in position order. Each one takes the closest
/// remaining array if it lies within `distance_threshold` (a `complete`
/// integron) and otherwise stands alone (`In0`). Arrays left over become
/// `CALIN`s. Integrons are numbered from 1 in creation order.
///
/// # Arguments
/// - integrases: integrase hits sorted by `(pos_begin, e_value)`
/// - arrays: output of [`search_attc`]
/// - distance_threshold: maximal gap between an integrase and its array
/// - ctx: the replicon under analysis
pub fn find_integrons(
    integrases: &[IntegraseHit],
    arrays: Vec<AttcArray>,
    distance_threshold: u32,
    ctx: &RepliconContext,
) -> Result<Vec<Integron>, AssemblyError> {
    check_input(integrases, "integrase", ctx)?;

    let mut pool = ArrayPool::new(arrays);
    let mut integrons: Vec<Integron> = Vec::with_capacity(integrases.len() + pool.len());

    for integrase in integrases {
        let mut integron = Integron::new(integrons.len() + 1, ctx);
        integron.add_integrase(integrase.clone())?;

        if let Some((array, side, distance)) = pool.take_nearest(ctx, integrase, distance_threshold)
        {
            debug!(
                "{}: {} bound to {} attC ({:?} side, {} bp)",
                ctx.id,
                integrase.protein_id,
                array.len(),
                side,
                distance
            );
            for hit in array.into_hits() {
                integron.add_attc(hit);
            }
        }
        integrons.push(integron);
    }

    for array in pool.into_arrays() {
        let mut integron = Integron::new(integrons.len() + 1, ctx);
        for hit in array.into_hits() {
            integron.add_attc(hit);
        }
        integrons.push(integron);
    }

    Ok(integrons)
}

///
/// Reconcile the hits of the strict integron-integrase profile with those of
/// the broad tyrosine-recombinase profile, one row per protein.
///
/// By default a protein is kept only when both profiles hit it; with `union`
/// a hit from either profile is enough. The strict profile's row is reported
/// whenever it exists. Rows of other profiles are ignored.
pub fn select_integrases(
    hits: &[IntegraseHit],
    integrase_model: &str,
    recombinase_model: &str,
    union: bool,
) -> Vec<IntegraseHit> {
    type Slot<'a> = (Option<&'a IntegraseHit>, Option<&'a IntegraseHit>);

    fn keep_best<'a>(slot: &mut Option<&'a IntegraseHit>, hit: &'a IntegraseHit) {
        match slot {
            Some(current) if current.e_value <= hit.e_value => {}
            _ => *slot = Some(hit),
        }
    }

    let mut by_protein: BTreeMap<(&str, &str), Slot<'_>> = BTreeMap::new();
    for hit in hits {
        let slot = by_protein
            .entry((hit.replicon_id.as_str(), hit.protein_id.as_str()))
            .or_default();
        if hit.annotation_source == integrase_model {
            keep_best(&mut slot.0, hit);
        } else if hit.annotation_source == recombinase_model {
            keep_best(&mut slot.1, hit);
        } else {
            debug!(
                "Ignoring {} hit from profile {}",
                hit.protein_id, hit.annotation_source
            );
        }
    }

    let mut selected: Vec<IntegraseHit> = by_protein
        .into_values()
        .filter_map(|(strict, broad)| match (strict, broad) {
            (Some(s), Some(_)) => Some(s.clone()),
            (Some(s), None) if union => Some(s.clone()),
            (None, Some(b)) if union => Some(b.clone()),
            _ => None,
        })
        .collect();
    selected.sort_by(by_position);
    selected
}

///
/// Merge the hits found by the exhaustive re-search into the default ones.
///
/// Sites found twice (same begin, end and strand) keep the best e-value; the
/// result is sorted by `(pos_begin, e_value)`.
pub fn merge_attc_hits(default: &[AttcHit], extra: &[AttcHit]) -> Vec<AttcHit> {
    let mut sites: BTreeMap<SiteKey, AttcHit> = BTreeMap::new();
    for hit in default.iter().chain(extra) {
        sites
            .entry(hit.site_key())
            .and_modify(|current| {
                if hit.e_value < current.e_value {
                    *current = hit.clone();
                }
            })
            .or_insert_with(|| hit.clone());
    }
    let mut merged: Vec<AttcHit> = sites.into_values().collect();
    merged.sort_by(by_position);
    merged
}

///
/// Cluster attC hits and pair the arrays with integrases.
///
/// `integrases` must already be reconciled with [`select_integrases`].
pub fn assemble(
    attc: &[AttcHit],
    integrases: &[IntegraseHit],
    config: &IntegronConfig,
    ctx: &RepliconContext,
) -> Result<Vec<Integron>, AssemblyError> {
    let arrays = search_attc(
        attc,
        config.keep_palindromes,
        config.distance_threshold,
        ctx,
    )?;
    debug!("{}: {} attC array(s)", ctx.id, arrays.len());
    find_integrons(integrases, arrays, config.distance_threshold, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    use integrs_core::models::{Strand, Topology};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use crate::integron::IntegronType;

    fn integrase(id: &str, begin: u32, end: u32) -> IntegraseHit {
        IntegraseHit::new("rep", id, begin, end, Strand::Plus, 1e-30, "intI_Cterm").unwrap()
    }

    fn attc(begin: u32, end: u32) -> AttcHit {
        AttcHit::new("rep", "RF", begin, end, Strand::Minus, 1e-5).unwrap()
    }

    fn array(positions: &[(u32, u32)]) -> AttcArray {
        AttcArray::try_from(positions.iter().map(|(b, e)| attc(*b, *e)).collect::<Vec<_>>())
            .unwrap()
    }

    fn types(integrons: &[Integron]) -> Vec<IntegronType> {
        integrons
            .iter()
            .map(|i| i.integron_type().unwrap())
            .collect()
    }

    #[fixture]
    fn linear() -> RepliconContext {
        RepliconContext::new("rep", 20301, Topology::Linear).unwrap()
    }

    #[fixture]
    fn circular() -> RepliconContext {
        RepliconContext::new("rep", 100_000, Topology::Circular).unwrap()
    }

    #[rstest]
    fn test_nothing_to_assemble(linear: RepliconContext) {
        assert!(find_integrons(&[], vec![], 4000, &linear).unwrap().is_empty());
    }

    #[rstest]
    fn test_only_integrases(linear: RepliconContext) {
        let integrases = vec![integrase("a", 55, 1014), integrase("b", 5000, 6000)];
        let integrons = find_integrons(&integrases, vec![], 4000, &linear).unwrap();
        assert_eq!(types(&integrons), vec![IntegronType::In0, IntegronType::In0]);
    }

    #[rstest]
    fn test_only_arrays(linear: RepliconContext) {
        let arrays = vec![array(&[(100, 160)]), array(&[(9000, 9060), (9200, 9260)])];
        let integrons = find_integrons(&[], arrays, 4000, &linear).unwrap();
        assert_eq!(types(&integrons), vec![IntegronType::Calin, IntegronType::Calin]);
        assert_eq!(integrons[1].attc().len(), 2);
        assert_eq!(integrons[1].name(), "integron_02");
    }

    #[rstest]
    fn test_complete_integron(linear: RepliconContext) {
        let integrases = vec![integrase("a", 55, 1014)];
        let arrays = vec![array(&[(1500, 1560), (1700, 1760)])];
        let integrons = find_integrons(&integrases, arrays, 4000, &linear).unwrap();
        assert_eq!(types(&integrons), vec![IntegronType::Complete]);
        assert_eq!(integrons[0].integrase().unwrap().protein_id, "a");
    }

    #[rstest]
    fn test_far_array_on_linear_replicon(linear: RepliconContext) {
        // 17825 - 1014 is beyond the threshold and the linear replicon doesn't wrap
        let integrases = vec![integrase("a", 55, 1014)];
        let arrays = vec![array(&[(17825, 17884), (19080, 19149), (19618, 19726)])];
        let integrons = find_integrons(&integrases, arrays, 4000, &linear).unwrap();
        assert_eq!(types(&integrons), vec![IntegronType::In0, IntegronType::Calin]);
        assert_eq!(integrons[1].attc().len(), 3);
    }

    #[rstest]
    fn test_same_array_is_close_over_the_origin() {
        let ctx = RepliconContext::new("rep", 20301, Topology::Circular).unwrap();
        let integrases = vec![integrase("a", 55, 1014)];
        let arrays = vec![array(&[(17825, 17884), (19080, 19149), (19618, 19726)])];
        let integrons = find_integrons(&integrases, arrays, 4000, &ctx).unwrap();
        assert_eq!(types(&integrons), vec![IntegronType::Complete]);
    }

    #[rstest]
    fn test_integrase_takes_nearest_array(linear: RepliconContext) {
        let integrases = vec![integrase("a", 5000, 6000)];
        let arrays = vec![array(&[(1000, 1060)]), array(&[(7000, 7060)])];
        let integrons = find_integrons(&integrases, arrays, 4000, &linear).unwrap();
        assert_eq!(
            types(&integrons),
            vec![IntegronType::Complete, IntegronType::Calin]
        );
        assert_eq!(integrons[0].attc()[0].hit.pos_begin, 7000);
        assert_eq!(integrons[1].attc()[0].hit.pos_begin, 1000);
    }

    #[rstest]
    fn test_array_binds_once(linear: RepliconContext) {
        let integrases = vec![integrase("a", 100, 1100), integrase("b", 3000, 4000)];
        let arrays = vec![array(&[(1500, 1560)])];
        let integrons = find_integrons(&integrases, arrays, 4000, &linear).unwrap();
        assert_eq!(types(&integrons), vec![IntegronType::Complete, IntegronType::In0]);
    }

    #[rstest]
    fn test_tie_prefers_leftmost_array(linear: RepliconContext) {
        let integrases = vec![integrase("a", 5000, 6000)];
        let arrays = vec![array(&[(6500, 6560)]), array(&[(4440, 4500)])];
        let pool = ArrayPool::new(arrays);
        let (idx, side, distance) = pool.nearest(&linear, &integrases[0]).unwrap();
        assert_eq!((idx, side, distance), (1, Side::Right, 1500));
    }

    #[rstest]
    fn test_integrase_side(circular: RepliconContext, linear: RepliconContext) {
        let int = integrase("a", 99_000, 99_900);
        assert_eq!(
            integrase_side(&circular, &int, 200, 900),
            Some((Side::Left, 1200))
        );
        assert_eq!(
            integrase_side(&linear, &integrase("b", 5000, 6000), 200, 900),
            Some((Side::Right, 5100))
        );
        // array spanning the integrase on a linear replicon: neither side applies
        assert_eq!(
            integrase_side(&linear, &integrase("c", 5000, 6000), 4000, 7000),
            None
        );
    }

    #[rstest]
    #[case::right_at_threshold(4100, 5060, 1000, 1060, true)]
    #[case::right_past_threshold(4101, 5061, 1000, 1060, false)]
    #[case::right_counts_integrase_length(4500, 5500, 1000, 1060, false)]
    #[case::left_at_threshold(100, 1000, 4100, 4160, true)]
    #[case::left_past_threshold(100, 1000, 4101, 4161, false)]
    #[case::left_counts_integrase_length(100, 1000, 4500, 4560, false)]
    fn test_binding_threshold(
        circular: RepliconContext,
        #[case] int_begin: u32,
        #[case] int_end: u32,
        #[case] attc_begin: u32,
        #[case] attc_end: u32,
        #[case] bound: bool,
    ) {
        let integrases = vec![integrase("a", int_begin, int_end)];
        let arrays = vec![array(&[(attc_begin, attc_end)])];
        let integrons = find_integrons(&integrases, arrays, 4000, &circular).unwrap();
        let expected = if bound {
            vec![IntegronType::Complete]
        } else {
            vec![IntegronType::In0, IntegronType::Calin]
        };
        assert_eq!(types(&integrons), expected);
    }

    #[rstest]
    fn test_attc_completeness(circular: RepliconContext) {
        let attc_hits: Vec<AttcHit> = [100, 300, 9000, 9100, 50_000, 99_000]
            .iter()
            .map(|p| attc(*p, p + 60))
            .collect();
        let integrases = vec![integrase("a", 8000, 8900), integrase("b", 70_000, 71_000)];
        let config = IntegronConfig::default();
        let integrons = assemble(&attc_hits, &integrases, &config, &circular).unwrap();

        let consumed: usize = integrons.iter().map(|i| i.attc().len()).sum();
        assert_eq!(consumed, attc_hits.len());
        assert!(integrons.iter().all(|i| i.integron_type().is_some()));
    }

    #[rstest]
    fn test_select_integrases_intersection_and_union() {
        let mut broad = integrase("a", 55, 1014);
        broad.annotation_source = "Phage_integrase".to_string();
        broad.e_value = 1e-40;
        let mut broad_only = integrase("b", 3000, 4000);
        broad_only.annotation_source = "Phage_integrase".to_string();
        let strict_only = integrase("c", 8000, 9000);
        let hits = vec![integrase("a", 55, 1014), broad, broad_only, strict_only];

        let inter = select_integrases(&hits, "intI_Cterm", "Phage_integrase", false);
        assert_eq!(inter.len(), 1);
        assert_eq!(inter[0].protein_id, "a");
        assert_eq!(inter[0].annotation_source, "intI_Cterm");

        let union = select_integrases(&hits, "intI_Cterm", "Phage_integrase", true);
        let ids: Vec<&str> = union.iter().map(|h| h.protein_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(union[1].annotation_source, "Phage_integrase");
    }

    #[rstest]
    fn test_merge_attc_hits() {
        let mut better = attc(100, 160);
        better.e_value = 1e-9;
        let merged = merge_attc_hits(&[attc(300, 360), attc(100, 160)], &[better, attc(500, 560)]);
        let begins: Vec<u32> = merged.iter().map(|h| h.pos_begin).collect();
        assert_eq!(begins, vec![100, 300, 500]);
        assert_eq!(merged[0].e_value, 1e-9);
    }
}
