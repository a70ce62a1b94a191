use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use bio::io::fasta;
use log::info;
use serde::{Deserialize, Serialize};

use crate::coords;
use crate::errors::RepliconError;
use crate::models::Window;
use crate::utils::get_dynamic_reader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Circular,
    Linear,
}

impl FromStr for Topology {
    type Err = RepliconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circ" | "circular" => Ok(Topology::Circular),
            "lin" | "linear" => Ok(Topology::Linear),
            _ => Err(RepliconError::UnknownTopology(s.to_string())),
        }
    }
}

impl Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Circular => write!(f, "circ"),
            Topology::Linear => write!(f, "lin"),
        }
    }
}

///
/// Size and topology of the replicon under analysis. Every coordinate
/// computation goes through this value; nothing about the replicon is
/// held globally.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepliconContext {
    pub id: String,
    pub size: u32,
    pub topology: Topology,
}

impl RepliconContext {
    pub fn new(id: &str, size: u32, topology: Topology) -> Result<Self, RepliconError> {
        if size == 0 {
            return Err(RepliconError::EmptyReplicon(id.to_string()));
        }
        Ok(RepliconContext {
            id: id.to_string(),
            size,
            topology,
        })
    }

    pub fn is_circular(&self) -> bool {
        self.topology == Topology::Circular
    }

    /// Topology used for the analysis: a circular replicon shorter than four
    /// times the distance threshold is treated as linear.
    pub fn effective(&self, distance_threshold: u32) -> RepliconContext {
        let too_small = (self.size as u64) < 4 * distance_threshold as u64;
        if self.is_circular() && too_small {
            info!(
                "Replicon {} ({} bp) is shorter than 4 x {} bp, analysed as linear",
                self.id, self.size, distance_threshold
            );
            RepliconContext {
                topology: Topology::Linear,
                ..self.clone()
            }
        } else {
            self.clone()
        }
    }

    #[inline]
    pub fn forward_gap(&self, a: u32, b: u32) -> i64 {
        coords::forward_gap(a, b, self.size, self.topology)
    }

    #[inline]
    pub fn within_threshold(&self, a: u32, b: u32, threshold: u32) -> bool {
        coords::within_threshold(a, b, self.size, self.topology, threshold)
    }

    #[inline]
    pub fn oriented_gap(&self, a: u32, b: u32) -> Option<u32> {
        coords::oriented_gap(a, b, self.size, self.topology)
    }

    #[inline]
    pub fn shift_left(&self, pos: u32, by: u32) -> u32 {
        coords::shift_left(pos, by, self.size, self.topology)
    }

    #[inline]
    pub fn shift_right(&self, pos: u32, by: u32) -> u32 {
        coords::shift_right(pos, by, self.size, self.topology)
    }
}

///
/// A replicon with its optional sequence. The sequence is only needed by the
/// exhaustive re-search around found elements.
///
#[derive(Debug, Clone)]
pub struct Replicon {
    pub context: RepliconContext,
    pub seq: Option<Vec<u8>>,
}

impl Replicon {
    pub fn id(&self) -> &str {
        &self.context.id
    }

    ///
    /// Extract the bases covered by a window. A window wrapping the origin
    /// yields the tail of the sequence followed by its head.
    ///
    pub fn subsequence(&self, window: &Window) -> Result<Vec<u8>, RepliconError> {
        let seq = self
            .seq
            .as_ref()
            .ok_or_else(|| RepliconError::MissingSequence(self.context.id.clone()))?;
        let begin = window.begin as usize;
        let end = window.end as usize;
        let out_of_bounds = || RepliconError::WindowOutOfBounds {
            id: self.context.id.clone(),
            begin: window.begin,
            end: window.end,
            size: self.context.size,
        };

        if begin <= end {
            seq.get(begin..end).map(|s| s.to_vec()).ok_or_else(out_of_bounds)
        } else {
            if !self.context.is_circular() {
                return Err(out_of_bounds());
            }
            let tail = seq.get(begin..).ok_or_else(out_of_bounds)?;
            let head = seq.get(..end).ok_or_else(out_of_bounds)?;
            let mut sub = Vec::with_capacity(tail.len() + head.len());
            sub.extend_from_slice(tail);
            sub.extend_from_slice(head);
            Ok(sub)
        }
    }
}

///
/// All replicons of one input, keyed by identifier.
///
#[derive(Debug, Clone, Default)]
pub struct RepliconSet {
    pub replicons: BTreeMap<String, Replicon>,
}

impl RepliconSet {
    ///
    /// Load every record of a (possibly gzipped) FASTA file.
    ///
    /// # Arguments
    /// - path: FASTA file on disk
    /// - topology: topology assigned to every replicon
    pub fn from_fasta(path: &Path, topology: Topology) -> Result<Self, RepliconError> {
        let reader = get_dynamic_reader(path)?;
        let fasta_reader = fasta::Reader::new(reader);

        let mut replicons = BTreeMap::new();
        for record in fasta_reader.records() {
            let record = record.map_err(|e| RepliconError::FastaError(e.to_string()))?;
            let size = u32::try_from(record.seq().len())
                .map_err(|_| RepliconError::FastaError(format!("{} is too long", record.id())))?;
            let context = RepliconContext::new(record.id(), size, topology)?;
            replicons.insert(
                record.id().to_string(),
                Replicon {
                    context,
                    seq: Some(record.seq().to_ascii_uppercase()),
                },
            );
        }
        info!("Loaded {} replicon(s) from {:?}", replicons.len(), path);

        Ok(RepliconSet { replicons })
    }

    ///
    /// Load replicon sizes from a tab-separated `id  size  [circ|lin]` file.
    /// Lines without a topology column get `default_topology`.
    ///
    pub fn from_sizes(path: &Path, default_topology: Topology) -> Result<Self, RepliconError> {
        let reader = get_dynamic_reader(path)?;
        let mut replicons = BTreeMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 2 {
                return Err(RepliconError::SizesParseError(
                    line_no,
                    "expected `id<TAB>size`".to_string(),
                ));
            }
            let size: u32 = parts[1].trim().parse().map_err(|_| {
                RepliconError::SizesParseError(line_no, format!("invalid size `{}`", parts[1]))
            })?;
            let topology = match parts.get(2) {
                Some(t) if !t.trim().is_empty() => t.parse()?,
                _ => default_topology,
            };
            let context = RepliconContext::new(parts[0], size, topology)?;
            replicons.insert(parts[0].to_string(), Replicon { context, seq: None });
        }

        Ok(RepliconSet { replicons })
    }

    pub fn get(&self, id: &str) -> Result<&Replicon, RepliconError> {
        self.replicons
            .get(id)
            .ok_or_else(|| RepliconError::UnknownReplicon(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.replicons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicons.is_empty()
    }
}
