use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::models::Hit;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to open file {:?}: {}", path, e))
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Split a table of hits by replicon, keeping the input order inside each
/// replicon.
///
pub fn group_by_replicon<H: Hit + Clone>(hits: &[H]) -> BTreeMap<String, Vec<H>> {
    let mut groups: BTreeMap<String, Vec<H>> = BTreeMap::new();
    for hit in hits {
        groups
            .entry(hit.replicon_id().to_string())
            .or_default()
            .push(hit.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::{BufRead, Write};

    use crate::models::{AttcHit, Strand};

    #[rstest]
    fn test_dynamic_reader_gz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"line1\nline2\n").unwrap();
        encoder.finish().unwrap();

        let lines: Vec<String> = get_dynamic_reader(&path)
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["line1".to_string(), "line2".to_string()]);
    }

    #[rstest]
    fn test_dynamic_reader_missing_file() {
        assert!(get_dynamic_reader(Path::new("does/not/exist.tsv")).is_err());
    }

    #[rstest]
    fn test_group_by_replicon() {
        let hits = vec![
            AttcHit::new("b", "RF", 10, 60, Strand::Plus, 1.0).unwrap(),
            AttcHit::new("a", "RF", 20, 70, Strand::Plus, 1.0).unwrap(),
            AttcHit::new("b", "RF", 5, 55, Strand::Minus, 1.0).unwrap(),
        ];
        let groups = group_by_replicon(&hits);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["b"].len(), 2);
        assert_eq!(groups["b"][1].pos_begin, 5);
    }
}
