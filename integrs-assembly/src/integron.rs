use std::fmt::{self, Display};

use serde::Serialize;

use integrs_core::models::{AttcHit, IntegraseHit, RepliconContext, Strand, Topology};

use crate::errors::AssemblyError;

/// Classification of an assembled integron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntegronType {
    /// Integrase with an attC array.
    #[serde(rename = "complete")]
    Complete,
    /// Integrase without attC sites nearby.
    #[serde(rename = "In0")]
    In0,
    /// attC array lacking an integrase.
    #[serde(rename = "CALIN")]
    Calin,
}

impl Display for IntegronType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegronType::Complete => write!(f, "complete"),
            IntegronType::In0 => write!(f, "In0"),
            IntegronType::Calin => write!(f, "CALIN"),
        }
    }
}

/// An attC site bound to an integron.
#[derive(Debug, Clone, PartialEq)]
pub struct AttcMember {
    pub hit: AttcHit,
    /// Forward gap from the previous site of the array; `None` for the first one.
    pub distance_to_previous: Option<i64>,
}

///
/// One row of [`Integron::describe`].
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegronElement {
    pub integron_id: String,
    pub replicon_id: String,
    pub element: String,
    pub pos_begin: u32,
    pub pos_end: u32,
    pub strand: Strand,
    pub e_value: f64,
    pub type_elt: &'static str,
    pub annotation: &'static str,
    pub model: String,
    #[serde(rename = "type")]
    pub integron_type: IntegronType,
    #[serde(rename = "distance_2attC")]
    pub distance_to_previous: Option<i64>,
    pub considered_topology: Topology,
}

///
/// An integrase (at most one) and the attC sites of one array.
///
/// The type is derived from the members every time it is asked for:
/// adding an integrase moves an empty integron to `In0` and a `CALIN` to
/// `complete`; adding an attC site moves it to `CALIN` or `complete`.
///
#[derive(Debug, Clone)]
pub struct Integron {
    pub id: usize,
    context: RepliconContext,
    integrase: Option<IntegraseHit>,
    attc: Vec<AttcMember>,
}

impl Integron {
    pub fn new(id: usize, context: &RepliconContext) -> Self {
        Integron {
            id,
            context: context.clone(),
            integrase: None,
            attc: Vec::new(),
        }
    }

    pub fn name(&self) -> String {
        format!("integron_{:02}", self.id)
    }

    pub fn context(&self) -> &RepliconContext {
        &self.context
    }

    pub fn add_integrase(&mut self, hit: IntegraseHit) -> Result<(), AssemblyError> {
        if self.integrase.is_some() {
            return Err(AssemblyError::DuplicateIntegrase(self.name()));
        }
        self.integrase = Some(hit);
        Ok(())
    }

    /// Append an attC site after the ones already bound.
    pub fn add_attc(&mut self, hit: AttcHit) {
        let distance_to_previous = self
            .attc
            .last()
            .map(|prev| self.context.forward_gap(prev.hit.pos_end, hit.pos_begin));
        self.attc.push(AttcMember {
            hit,
            distance_to_previous,
        });
    }

    pub fn integrase(&self) -> Option<&IntegraseHit> {
        self.integrase.as_ref()
    }

    pub fn attc(&self) -> &[AttcMember] {
        &self.attc
    }

    pub fn attc_hits(&self) -> impl Iterator<Item = &AttcHit> {
        self.attc.iter().map(|m| &m.hit)
    }

    pub fn has_integrase(&self) -> bool {
        self.integrase.is_some()
    }

    pub fn has_attc(&self) -> bool {
        !self.attc.is_empty()
    }

    /// `None` only while the integron has no member at all.
    pub fn integron_type(&self) -> Option<IntegronType> {
        match (self.has_integrase(), self.has_attc()) {
            (true, true) => Some(IntegronType::Complete),
            (true, false) => Some(IntegronType::In0),
            (false, true) => Some(IntegronType::Calin),
            (false, false) => None,
        }
    }

    /// First attC site and last attC site, in array order.
    pub fn attc_span(&self) -> Option<(&AttcHit, &AttcHit)> {
        Some((&self.attc.first()?.hit, &self.attc.last()?.hit))
    }

    ///
    /// Flatten the integron into one record per member: the integrase first,
    /// then the attC sites in array order.
    ///
    pub fn describe(&self) -> Vec<IntegronElement> {
        let Some(integron_type) = self.integron_type() else {
            return Vec::new();
        };
        let integron_id = self.name();
        let mut elements = Vec::with_capacity(self.attc.len() + 1);

        if let Some(integrase) = &self.integrase {
            elements.push(IntegronElement {
                integron_id: integron_id.clone(),
                replicon_id: self.context.id.clone(),
                element: integrase.protein_id.clone(),
                pos_begin: integrase.pos_begin,
                pos_end: integrase.pos_end,
                strand: integrase.strand,
                e_value: integrase.e_value,
                type_elt: "protein",
                annotation: "intI",
                model: integrase.annotation_source.clone(),
                integron_type,
                distance_to_previous: None,
                considered_topology: self.context.topology,
            });
        }

        for (idx, member) in self.attc.iter().enumerate() {
            elements.push(IntegronElement {
                integron_id: integron_id.clone(),
                replicon_id: self.context.id.clone(),
                element: format!("{}_attc_{:03}", self.context.id, idx + 1),
                pos_begin: member.hit.pos_begin,
                pos_end: member.hit.pos_end,
                strand: member.hit.strand,
                e_value: member.hit.e_value,
                type_elt: "attC",
                annotation: "attC",
                model: member.hit.model_name.clone(),
                integron_type,
                distance_to_previous: member.distance_to_previous,
                considered_topology: self.context.topology,
            });
        }

        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ctx() -> RepliconContext {
        RepliconContext::new("rep", 10_000, Topology::Circular).unwrap()
    }

    fn integrase() -> IntegraseHit {
        IntegraseHit::new("rep", "rep_1", 100, 1000, Strand::Plus, 1e-30, "intI_Cterm").unwrap()
    }

    fn attc(begin: u32, end: u32) -> AttcHit {
        AttcHit::new("rep", "RF", begin, end, Strand::Minus, 1e-5).unwrap()
    }

    #[rstest]
    fn test_state_machine_integrase_first(ctx: RepliconContext) {
        let mut integron = Integron::new(1, &ctx);
        assert_eq!(integron.integron_type(), None);
        integron.add_integrase(integrase()).unwrap();
        assert_eq!(integron.integron_type(), Some(IntegronType::In0));
        integron.add_attc(attc(1200, 1260));
        assert_eq!(integron.integron_type(), Some(IntegronType::Complete));
    }

    #[rstest]
    fn test_state_machine_attc_first(ctx: RepliconContext) {
        let mut integron = Integron::new(1, &ctx);
        integron.add_attc(attc(1200, 1260));
        assert_eq!(integron.integron_type(), Some(IntegronType::Calin));
        integron.add_integrase(integrase()).unwrap();
        assert_eq!(integron.integron_type(), Some(IntegronType::Complete));
    }

    #[rstest]
    fn test_single_integrase(ctx: RepliconContext) {
        let mut integron = Integron::new(3, &ctx);
        integron.add_integrase(integrase()).unwrap();
        assert_eq!(
            integron.add_integrase(integrase()),
            Err(AssemblyError::DuplicateIntegrase("integron_03".to_string()))
        );
    }

    #[rstest]
    fn test_distance_to_previous_wraps(ctx: RepliconContext) {
        let mut integron = Integron::new(1, &ctx);
        integron.add_attc(attc(9950, 9990));
        integron.add_attc(attc(5, 40));
        integron.add_attc(attc(100, 160));
        let distances: Vec<Option<i64>> =
            integron.attc().iter().map(|m| m.distance_to_previous).collect();
        assert_eq!(distances, vec![None, Some(15), Some(60)]);
    }

    #[rstest]
    fn test_describe(ctx: RepliconContext) {
        let mut integron = Integron::new(1, &ctx);
        integron.add_integrase(integrase()).unwrap();
        integron.add_attc(attc(1200, 1260));
        integron.add_attc(attc(1400, 1460));

        let rows = integron.describe();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].type_elt, "protein");
        assert_eq!(rows[0].element, "rep_1");
        assert_eq!(rows[1].element, "rep_attc_001");
        assert_eq!(rows[2].distance_to_previous, Some(140));
        assert!(rows.iter().all(|r| r.integron_type == IntegronType::Complete));
        assert!(rows.iter().all(|r| r.integron_id == "integron_01"));
    }

    #[rstest]
    fn test_describe_empty(ctx: RepliconContext) {
        assert!(Integron::new(1, &ctx).describe().is_empty());
    }
}
