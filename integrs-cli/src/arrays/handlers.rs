use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{error, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use integrs_assembly::search_attc;
use integrs_core::IntegronConfig;
use integrs_core::io::read_attc_table;
use integrs_core::models::{AttcHit, RepliconSet, Strand, Topology};
use integrs_core::utils::group_by_replicon;

use crate::common::{load_config, load_replicons, open_output, progress_bar};

/// One attC site with the array it was clustered into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayMember {
    pub replicon_id: String,
    /// 1-based, per replicon.
    pub array: usize,
    pub pos_begin: u32,
    pub pos_end: u32,
    pub strand: Strand,
    pub e_value: f64,
    pub model: String,
    pub considered_topology: Topology,
}

pub fn run_arrays(matches: &ArgMatches) -> Result<()> {
    let attc_path = matches
        .get_one::<String>("attc")
        .context("--attc is required")?;

    let config = load_config(matches)?;
    let replicons = load_replicons(matches)?;
    let attc = read_attc_table(Path::new(attc_path))
        .with_context(|| format!("Failed to read attC hits from {}", attc_path))?;

    let by_replicon: Vec<(String, Vec<AttcHit>)> = group_by_replicon(&attc).into_iter().collect();
    let pb = progress_bar(by_replicon.len())?;
    let results: Vec<Vec<ArrayMember>> = by_replicon
        .par_iter()
        .filter_map(|(id, hits)| {
            let rows = arrays_of_replicon(id, hits, &replicons, &config);
            pb.inc(1);
            rows
        })
        .collect();
    pb.finish_and_clear();

    let rows: Vec<ArrayMember> = results.into_iter().flatten().collect();
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

fn arrays_of_replicon(
    id: &str,
    hits: &[AttcHit],
    replicons: &RepliconSet,
    config: &IntegronConfig,
) -> Option<Vec<ArrayMember>> {
    let replicon = match replicons.get(id) {
        Ok(replicon) => replicon,
        Err(e) => {
            warn!("Skipping hits of {}: {}", id, e);
            return None;
        }
    };
    let ctx = replicon.context.effective(config.distance_threshold);

    match search_attc(hits, config.keep_palindromes, config.distance_threshold, &ctx) {
        Ok(arrays) => {
            info!("{}: {} attC array(s)", id, arrays.len());
            Some(
                arrays
                    .iter()
                    .enumerate()
                    .flat_map(|(idx, array)| {
                        array.hits().iter().map(move |hit| ArrayMember {
                            replicon_id: hit.replicon_id.clone(),
                            array: idx + 1,
                            pos_begin: hit.pos_begin,
                            pos_end: hit.pos_end,
                            strand: hit.strand,
                            e_value: hit.e_value,
                            model: hit.model_name.clone(),
                            considered_topology: ctx.topology,
                        })
                    })
                    .collect(),
            )
        }
        Err(e) => {
            error!("Clustering of replicon {} failed: {}", id, e);
            None
        }
    }
}

pub fn write_tsv<W: Write>(writer: &mut W, rows: &[ArrayMember]) -> Result<()> {
    writeln!(
        writer,
        "ID_replicon\tarray\tpos_beg\tpos_end\tstrand\tevalue\tmodel\tconsidered_topology"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{:e}\t{}\t{}",
            row.replicon_id,
            row.array,
            row.pos_begin,
            row.pos_end,
            row.strand,
            row.e_value,
            row.model,
            row.considered_topology,
        )?;
    }
    Ok(())
}
