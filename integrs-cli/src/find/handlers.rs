use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{error, info, warn};
use rayon::prelude::*;

use integrs_assembly::{IntegronElement, IntegronType};
use integrs_core::IntegronConfig;
use integrs_core::io::{read_attc_table, read_integrase_table};
use integrs_core::models::{AttcHit, IntegraseHit, RepliconSet};
use integrs_core::utils::group_by_replicon;
use integrs_localmax::{CmsearchRunner, ExhaustiveSearch, detect_integrons};

use crate::common::{load_config, load_replicons, open_output, or_na, progress_bar};

const TSV_HEADER: [&str; 13] = [
    "ID_integron",
    "ID_replicon",
    "element",
    "pos_beg",
    "pos_end",
    "strand",
    "evalue",
    "type_elt",
    "annotation",
    "model",
    "type",
    "distance_2attC",
    "considered_topology",
];

pub fn run_find(matches: &ArgMatches) -> Result<()> {
    let attc_path = matches
        .get_one::<String>("attc")
        .context("--attc is required")?;
    let integrase_path = matches
        .get_one::<String>("integrases")
        .context("--integrases is required")?;

    let config = load_config(matches)?;
    let replicons = load_replicons(matches)?;

    let attc = read_attc_table(Path::new(attc_path))
        .with_context(|| format!("Failed to read attC hits from {}", attc_path))?;
    let integrases = read_integrase_table(Path::new(integrase_path))
        .with_context(|| format!("Failed to read integrase hits from {}", integrase_path))?;
    info!(
        "{} attC hit(s) and {} integrase hit(s) on {} replicon(s)",
        attc.len(),
        integrases.len(),
        replicons.len()
    );

    let runner = if config.local_max {
        Some(CmsearchRunner::from_config(&config)?)
    } else {
        None
    };
    let searcher = runner.as_ref().map(|r| r as &dyn ExhaustiveSearch);

    let attc_by_replicon = group_by_replicon(&attc);
    let integrases_by_replicon = group_by_replicon(&integrases);
    let ids: Vec<&String> = attc_by_replicon
        .keys()
        .chain(integrases_by_replicon.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let pb = progress_bar(ids.len())?;
    let results: Vec<Vec<IntegronElement>> = ids
        .par_iter()
        .filter_map(|id| {
            let rows = find_in_replicon(
                id,
                &replicons,
                attc_by_replicon.get(*id).map(Vec::as_slice).unwrap_or_default(),
                integrases_by_replicon.get(*id).map(Vec::as_slice).unwrap_or_default(),
                &config,
                searcher,
            );
            pb.inc(1);
            rows
        })
        .collect();
    pb.finish_and_clear();

    let rows: Vec<IntegronElement> = results.into_iter().flatten().collect();
    let mut writer = open_output(matches.get_one::<String>("output"))?;
    if matches.get_flag("json") {
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writeln!(writer)?;
    } else {
        write_tsv(&mut writer, &rows)?;
    }
    writer.flush()?;

    Ok(())
}

/// Integron rows of one replicon, or `None` when the replicon has to be skipped.
fn find_in_replicon(
    id: &str,
    replicons: &RepliconSet,
    attc: &[AttcHit],
    integrases: &[IntegraseHit],
    config: &IntegronConfig,
    searcher: Option<&dyn ExhaustiveSearch>,
) -> Option<Vec<IntegronElement>> {
    let replicon = match replicons.get(id) {
        Ok(replicon) => replicon,
        Err(e) => {
            warn!("Skipping hits of {}: {}", id, e);
            return None;
        }
    };

    match detect_integrons(replicon, attc, integrases, config, searcher) {
        Ok(integrons) => {
            let count = |t: IntegronType| {
                integrons
                    .iter()
                    .filter(|i| i.integron_type() == Some(t))
                    .count()
            };
            info!(
                "{}: {} complete, {} In0, {} CALIN",
                id,
                count(IntegronType::Complete),
                count(IntegronType::In0),
                count(IntegronType::Calin)
            );
            Some(integrons.iter().flat_map(|i| i.describe()).collect())
        }
        Err(e) => {
            error!("Analysis of replicon {} failed: {}", id, e);
            None
        }
    }
}

pub fn write_tsv<W: Write>(writer: &mut W, rows: &[IntegronElement]) -> Result<()> {
    writeln!(writer, "{}", TSV_HEADER.join("\t"))?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{:e}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.integron_id,
            row.replicon_id,
            row.element,
            row.pos_begin,
            row.pos_end,
            row.strand,
            row.e_value,
            row.type_elt,
            row.annotation,
            row.model,
            row.integron_type,
            or_na(row.distance_to_previous),
            row.considered_topology,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use integrs_assembly::Integron;
    use integrs_core::models::{RepliconContext, Strand, Topology};

    #[rstest]
    fn test_write_tsv() {
        let ctx = RepliconContext::new("rep", 10_000, Topology::Linear).unwrap();
        let mut integron = Integron::new(1, &ctx);
        integron
            .add_integrase(
                IntegraseHit::new("rep", "rep_1", 55, 1014, Strand::Plus, 1e-30, "intI_Cterm")
                    .unwrap(),
            )
            .unwrap();
        integron.add_attc(AttcHit::new("rep", "RF", 1500, 1560, Strand::Minus, 1e-5).unwrap());

        let mut out = Vec::new();
        write_tsv(&mut out, &integron.describe()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID_integron\tID_replicon"));
        assert_eq!(
            lines[1],
            "integron_01\trep\trep_1\t55\t1014\t1\t1e-30\tprotein\tintI\tintI_Cterm\tcomplete\tNA\tlin"
        );
        assert_eq!(
            lines[2],
            "integron_01\trep\trep_attc_001\t1500\t1560\t-1\t1e-5\tattC\tattC\tattc_4\tcomplete\tNA\tlin"
        );
    }
}
