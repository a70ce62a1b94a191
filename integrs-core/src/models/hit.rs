use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;

use crate::errors::HitError;

///
/// Strand of a hit on the replicon.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "i8")]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn as_i8(&self) -> i8 {
        match self {
            Strand::Plus => 1,
            Strand::Minus => -1,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

impl From<Strand> for i8 {
    fn from(value: Strand) -> Self {
        value.as_i8()
    }
}

impl TryFrom<i8> for Strand {
    type Error = HitError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Strand::Plus),
            -1 => Ok(Strand::Minus),
            _ => Err(HitError::InvalidStrand(value.to_string())),
        }
    }
}

impl FromStr for Strand {
    type Err = HitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "1" | "+1" => Ok(Strand::Plus),
            "-" | "-1" => Ok(Strand::Minus),
            other => Err(HitError::InvalidStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// Common view over the hit records produced by the search collaborators.
///
/// Positions are 1-based and inclusive. A hit translated out of a window that
/// wraps the origin of a circular replicon may have `pos_begin > pos_end`.
pub trait Hit {
    fn replicon_id(&self) -> &str;
    fn pos_begin(&self) -> u32;
    fn pos_end(&self) -> u32;
    fn strand(&self) -> Strand;
    fn e_value(&self) -> f64;
    fn model_name(&self) -> &str;
}

/// Order hits by `pos_begin`, then by `e_value`.
pub fn by_position<H: Hit>(a: &H, b: &H) -> Ordering {
    a.pos_begin()
        .cmp(&b.pos_begin())
        .then_with(|| a.e_value().total_cmp(&b.e_value()))
}

/// Index of the first hit whose `pos_begin` is smaller than its predecessor's,
/// or `None` if the slice is sorted.
pub fn first_unsorted<H: Hit>(hits: &[H]) -> Option<usize> {
    hits.windows(2)
        .position(|pair| pair[1].pos_begin() < pair[0].pos_begin())
        .map(|i| i + 1)
}

fn validate(pos_begin: u32, pos_end: u32, e_value: f64) -> Result<(), HitError> {
    if pos_begin == 0 || pos_end == 0 {
        return Err(HitError::InvalidPosition(pos_begin, pos_end));
    }
    if e_value.is_nan() || e_value < 0.0 {
        return Err(HitError::InvalidEvalue(e_value));
    }
    Ok(())
}

/// Identity of an attC site regardless of score or model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteKey {
    pub pos_begin: u32,
    pub pos_end: u32,
    pub strand: Strand,
}

///
/// An attC site reported by the covariance-model search.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttcHit {
    pub replicon_id: String,
    pub pos_begin: u32,
    pub pos_end: u32,
    pub strand: Strand,
    pub e_value: f64,
    pub model_name: String,
    /// Covariance model accession.
    pub model_family: String,
}

impl AttcHit {
    pub fn new(
        replicon_id: &str,
        model_family: &str,
        pos_begin: u32,
        pos_end: u32,
        strand: Strand,
        e_value: f64,
    ) -> Result<Self, HitError> {
        if replicon_id.is_empty() {
            return Err(HitError::EmptyIdentifier("replicon_id"));
        }
        validate(pos_begin, pos_end, e_value)?;
        Ok(AttcHit {
            replicon_id: replicon_id.to_string(),
            pos_begin,
            pos_end,
            strand,
            e_value,
            model_name: crate::consts::DEFAULT_ATTC_MODEL.to_string(),
            model_family: model_family.to_string(),
        })
    }

    pub fn with_model_name(mut self, model_name: &str) -> Self {
        self.model_name = model_name.to_string();
        self
    }

    pub fn site_key(&self) -> SiteKey {
        SiteKey {
            pos_begin: self.pos_begin,
            pos_end: self.pos_end,
            strand: self.strand,
        }
    }
}

impl Hit for AttcHit {
    fn replicon_id(&self) -> &str {
        &self.replicon_id
    }
    fn pos_begin(&self) -> u32 {
        self.pos_begin
    }
    fn pos_end(&self) -> u32 {
        self.pos_end
    }
    fn strand(&self) -> Strand {
        self.strand
    }
    fn e_value(&self) -> f64 {
        self.e_value
    }
    fn model_name(&self) -> &str {
        &self.model_name
    }
}

///
/// A protein hit reported by the integrase profile search.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegraseHit {
    pub replicon_id: String,
    pub protein_id: String,
    pub pos_begin: u32,
    pub pos_end: u32,
    pub strand: Strand,
    pub e_value: f64,
    /// Name of the profile that matched.
    pub annotation_source: String,
}

impl IntegraseHit {
    pub fn new(
        replicon_id: &str,
        protein_id: &str,
        pos_begin: u32,
        pos_end: u32,
        strand: Strand,
        e_value: f64,
        annotation_source: &str,
    ) -> Result<Self, HitError> {
        if replicon_id.is_empty() {
            return Err(HitError::EmptyIdentifier("replicon_id"));
        }
        if protein_id.is_empty() {
            return Err(HitError::EmptyIdentifier("protein_id"));
        }
        validate(pos_begin, pos_end, e_value)?;
        Ok(IntegraseHit {
            replicon_id: replicon_id.to_string(),
            protein_id: protein_id.to_string(),
            pos_begin,
            pos_end,
            strand,
            e_value,
            annotation_source: annotation_source.to_string(),
        })
    }
}

impl Hit for IntegraseHit {
    fn replicon_id(&self) -> &str {
        &self.replicon_id
    }
    fn pos_begin(&self) -> u32 {
        self.pos_begin
    }
    fn pos_end(&self) -> u32 {
        self.pos_end
    }
    fn strand(&self) -> Strand {
        self.strand
    }
    fn e_value(&self) -> f64 {
        self.e_value
    }
    fn model_name(&self) -> &str {
        &self.annotation_source
    }
}
