//! [`ExhaustiveSearch`] backed by Infernal's `cmsearch --max`.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::process::Command;

use bio::io::fasta;
use log::debug;

use integrs_core::IntegronConfig;
use integrs_core::models::{AttcHit, Strand};

use crate::errors::LocalMaxError;
use crate::search::{ExhaustiveSearch, SearchRequest};

/// Columns of a `--tblout` row we rely on.
const TBLOUT_MIN_COLUMNS: usize = 17;

///
/// Thresholds applied to the rows of a `cmsearch` table.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitFilter {
    /// Length (`CLEN`) of the covariance model.
    pub model_len: u32,
    pub evalue: f64,
    pub min_attc_size: u32,
    pub max_attc_size: u32,
    /// Length of the searched sequence; extended hits are clamped to it.
    pub seq_len: u32,
}

///
/// Parse a `cmsearch --tblout` table into attC hits on `replicon_id`.
///
/// Partial hits are extended to the full model length using the model
/// coordinates, then rows are kept when `e_value < evalue` and the site length
/// lies strictly between `min_attc_size` and `max_attc_size`. Positions are
/// those of the searched sequence, with `pos_begin < pos_end` on both strands.
pub fn parse_tblout(
    table: &str,
    replicon_id: &str,
    filter: &HitFilter,
) -> Result<Vec<AttcHit>, LocalMaxError> {
    let mut hits = Vec::new();

    for line in table.lines() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < TBLOUT_MIN_COLUMNS {
            return Err(LocalMaxError::Parse(format!(
                "expected at least {} columns, found {}: {}",
                TBLOUT_MIN_COLUMNS,
                fields.len(),
                line
            )));
        }

        let number = |idx: usize| -> Result<u32, LocalMaxError> {
            fields[idx].parse::<u32>().map_err(|_| {
                LocalMaxError::Parse(format!("column {} is not a position: {}", idx + 1, fields[idx]))
            })
        };
        let mdl_from = number(5)?;
        let mdl_to = number(6)?;
        let seq_from = number(7)?;
        let seq_to = number(8)?;
        let strand: Strand = fields[9]
            .parse()
            .map_err(|_| LocalMaxError::Parse(format!("unknown strand: {}", fields[9])))?;
        let e_value: f64 = fields[15]
            .parse()
            .map_err(|_| LocalMaxError::Parse(format!("invalid e-value: {}", fields[15])))?;

        let (begin, end) = (seq_from.min(seq_to), seq_from.max(seq_to));
        let missing_head = mdl_from.saturating_sub(1);
        let missing_tail = filter.model_len.saturating_sub(mdl_to);
        let (begin, end) = match strand {
            Strand::Plus => (begin.saturating_sub(missing_head), end + missing_tail),
            Strand::Minus => (begin.saturating_sub(missing_tail), end + missing_head),
        };
        let begin = begin.max(1);
        let end = end.min(filter.seq_len);

        let len = end.saturating_sub(begin);
        if e_value >= filter.evalue || len <= filter.min_attc_size || len >= filter.max_attc_size {
            continue;
        }

        let hit = AttcHit::new(replicon_id, fields[3], begin, end, strand, e_value)
            .map_err(|e| LocalMaxError::Parse(e.to_string()))?
            .with_model_name(fields[2]);
        hits.push(hit);
    }

    Ok(hits)
}

/// Read the model length from the `CLEN` line of a covariance model file.
pub fn read_model_len(model: &Path) -> Result<u32, LocalMaxError> {
    let content = read_to_string(model)?;
    content
        .lines()
        .find_map(|line| {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("CLEN") => fields.next().and_then(|v| v.parse::<u32>().ok()),
                _ => None,
            }
        })
        .ok_or_else(|| {
            LocalMaxError::Parse(format!("no CLEN line in model {}", model.display()))
        })
}

///
/// Runs `cmsearch` on each window written to a temporary FASTA file.
///
#[derive(Debug, Clone)]
pub struct CmsearchRunner {
    pub binary: PathBuf,
    pub model: PathBuf,
    pub cpu: usize,
    pub model_len: u32,
    pub min_attc_size: u32,
    pub max_attc_size: u32,
}

impl CmsearchRunner {
    pub fn new(
        binary: &Path,
        model: &Path,
        cpu: usize,
        min_attc_size: u32,
        max_attc_size: u32,
    ) -> Result<Self, LocalMaxError> {
        let model_len = read_model_len(model)?;
        Ok(CmsearchRunner {
            binary: binary.to_path_buf(),
            model: model.to_path_buf(),
            cpu,
            model_len,
            min_attc_size,
            max_attc_size,
        })
    }

    pub fn from_config(config: &IntegronConfig) -> Result<Self, LocalMaxError> {
        let model = config
            .attc_model
            .as_deref()
            .ok_or(LocalMaxError::MissingModel)?;
        CmsearchRunner::new(
            &config.cmsearch,
            model,
            config.cpu,
            config.min_attc_size,
            config.max_attc_size,
        )
    }
}

impl ExhaustiveSearch for CmsearchRunner {
    fn search(&self, request: &SearchRequest) -> Result<Option<Vec<AttcHit>>, LocalMaxError> {
        let failure = |reason: String| LocalMaxError::ExternalSearch {
            replicon_id: request.replicon_id.to_string(),
            window: request.window,
            reason,
        };

        let workdir = tempfile::tempdir()?;
        let fasta_path = workdir.path().join("window.fst");
        let tbl_path = workdir.path().join("window.tbl");
        let out_path = workdir.path().join("window.res");

        let mut writer = fasta::Writer::to_file(&fasta_path)?;
        writer.write(request.replicon_id, None, request.sequence)?;
        writer.flush()?;
        drop(writer);

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-Z")
            .arg(format!("{}", request.replicon_size as f64 / 1_000_000.0))
            .arg("--max")
            .arg("--cpu")
            .arg(self.cpu.to_string())
            .arg("-E")
            .arg("10");
        if let Some(flag) = request.strand.cmsearch_flag() {
            cmd.arg(flag);
        }
        cmd.arg("--tblout")
            .arg(&tbl_path)
            .arg("-o")
            .arg(&out_path)
            .arg(&self.model)
            .arg(&fasta_path);

        debug!("Running cmsearch: {:?}", cmd);

        let output = cmd
            .output()
            .map_err(|e| failure(format!("can't run {}: {}", self.binary.display(), e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!(
                "cmsearch exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let table = read_to_string(&tbl_path)?;
        let filter = HitFilter {
            model_len: self.model_len,
            evalue: request.evalue,
            min_attc_size: self.min_attc_size,
            max_attc_size: self.max_attc_size,
            seq_len: request.sequence.len() as u32,
        };
        let hits = parse_tblout(&table, request.replicon_id, &filter)?;
        if hits.is_empty() { Ok(None) } else { Ok(Some(hits)) }
    }
}
