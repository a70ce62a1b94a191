//! Readers for the pre-parsed hit tables consumed by the assembly engine.
//!
//! Both tables are tab-separated, optionally gzipped, and may contain `#`
//! comment lines and a header line starting with `replicon`:
//!
//! ```text
//! # attC table
//! replicon_id  model_family  pos_begin  pos_end  strand  e_value  [model_name]
//! # integrase table
//! replicon_id  protein_id  pos_begin  pos_end  strand  e_value  model_name
//! ```

use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use crate::errors::HitTableError;
use crate::models::hit::by_position;
use crate::models::{AttcHit, IntegraseHit, Strand};
use crate::utils::get_dynamic_reader;

fn parse_field<T: FromStr>(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<T, HitTableError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| HitTableError::FieldParseError {
            line,
            field,
            value: value.to_string(),
        })
}

/// Split the data lines of a table, skipping comments, blank lines and the header.
fn data_lines<R: BufRead>(
    reader: R,
    min_columns: usize,
) -> impl Iterator<Item = Result<(usize, Vec<String>), HitTableError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(move |(idx, line)| {
            let line_no = idx + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(HitTableError::Io(e))),
            };
            if line.trim().is_empty() || line.starts_with('#') || line.starts_with("replicon") {
                return None;
            }
            let parts: Vec<String> = line.split('\t').map(|s| s.to_string()).collect();
            if parts.len() < min_columns {
                return Some(Err(HitTableError::MissingColumns {
                    line: line_no,
                    expected: min_columns,
                    found: parts.len(),
                }));
            }
            Some(Ok((line_no, parts)))
        })
}

///
/// Read attC hits, returned sorted by `(pos_begin, e_value)`.
///
pub fn read_attc_hits<R: BufRead>(reader: R) -> Result<Vec<AttcHit>, HitTableError> {
    let mut hits = Vec::new();
    for row in data_lines(reader, 6) {
        let (line, parts) = row?;
        let strand: Strand = parse_field(&parts[4], "strand", line)?;
        let hit = AttcHit::new(
            parts[0].trim(),
            parts[1].trim(),
            parse_field(&parts[2], "pos_begin", line)?,
            parse_field(&parts[3], "pos_end", line)?,
            strand,
            parse_field(&parts[5], "e_value", line)?,
        )
        .map_err(|source| HitTableError::InvalidHit { line, source })?;
        let hit = match parts.get(6).map(|s| s.trim()) {
            Some(model) if !model.is_empty() => hit.with_model_name(model),
            _ => hit,
        };
        hits.push(hit);
    }
    hits.sort_by(by_position);
    Ok(hits)
}

///
/// Read integrase hits, returned sorted by `(pos_begin, e_value)`.
///
pub fn read_integrase_hits<R: BufRead>(reader: R) -> Result<Vec<IntegraseHit>, HitTableError> {
    let mut hits = Vec::new();
    for row in data_lines(reader, 7) {
        let (line, parts) = row?;
        let strand: Strand = parse_field(&parts[4], "strand", line)?;
        let hit = IntegraseHit::new(
            parts[0].trim(),
            parts[1].trim(),
            parse_field(&parts[2], "pos_begin", line)?,
            parse_field(&parts[3], "pos_end", line)?,
            strand,
            parse_field(&parts[5], "e_value", line)?,
            parts[6].trim(),
        )
        .map_err(|source| HitTableError::InvalidHit { line, source })?;
        hits.push(hit);
    }
    hits.sort_by(by_position);
    Ok(hits)
}

pub fn read_attc_table(path: &Path) -> Result<Vec<AttcHit>, HitTableError> {
    read_attc_hits(get_dynamic_reader(path)?)
}

pub fn read_integrase_table(path: &Path) -> Result<Vec<IntegraseHit>, HitTableError> {
    read_integrase_hits(get_dynamic_reader(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn get_test_path(file_name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../tests/data")
            .join(file_name)
    }

    #[rstest]
    fn test_read_attc_hits_sorts() {
        let table = "# comment\n\
            replicon_id\tmodel_family\tpos_begin\tpos_end\tstrand\te_value\n\
            rep\tRF\t19080\t19149\t-\t1e-4\n\
            rep\tRF\t17825\t17884\t-\t1e-5\tattc_4\n";
        let hits = read_attc_hits(Cursor::new(table)).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].pos_begin, 17825);
        assert_eq!(hits[0].strand, Strand::Minus);
        assert_eq!(hits[1].e_value, 1e-4);
    }

    #[rstest]
    fn test_read_attc_hits_reports_line() {
        let table = "rep\tRF\t10\t60\t+\t1e-4\nrep\tRF\tten\t60\t+\t1e-4\n";
        let err = read_attc_hits(Cursor::new(table)).unwrap_err();
        match err {
            HitTableError::FieldParseError { line, field, .. } => {
                assert_eq!(line, 2);
                assert_eq!(field, "pos_begin");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[rstest]
    fn test_read_attc_hits_missing_columns() {
        let table = "rep\tRF\t10\t60\n";
        assert!(matches!(
            read_attc_hits(Cursor::new(table)),
            Err(HitTableError::MissingColumns { found: 4, .. })
        ));
    }

    #[rstest]
    fn test_read_integrase_hits() {
        let table = "rep\trep_2\t3000\t4000\t-\t1e-20\tPhage_integrase\n\
                     rep\trep_1\t55\t1014\t+\t1e-50\tintI_Cterm\n";
        let hits = read_integrase_hits(Cursor::new(table)).unwrap();
        assert_eq!(hits[0].protein_id, "rep_1");
        assert_eq!(hits[1].annotation_source, "Phage_integrase");
    }

    #[rstest]
    fn test_read_fixture_tables() {
        let attc = read_attc_table(&get_test_path("acba_attc.tsv")).unwrap();
        assert_eq!(attc.len(), 3);
        let integrases = read_integrase_table(&get_test_path("acba_integrases.tsv")).unwrap();
        assert_eq!(integrases.len(), 2);
    }
}
