use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use integrs_core::IntegronConfig;
use integrs_core::models::{RepliconSet, Topology};

/// Topology requested with `--circular` / `--linear`, if any.
pub fn topology_flag(matches: &ArgMatches) -> Option<Topology> {
    if matches.get_flag("circular") {
        Some(Topology::Circular)
    } else if matches.get_flag("linear") {
        Some(Topology::Linear)
    } else {
        None
    }
}

///
/// Load replicons from `--replicons` or `--sizes`.
///
/// Without a topology flag a FASTA file holding a single sequence is taken as
/// circular and any other input as linear.
///
pub fn load_replicons(matches: &ArgMatches) -> Result<RepliconSet> {
    let flag = topology_flag(matches);
    let default_topology = flag.unwrap_or(Topology::Linear);

    if let Some(fasta) = matches.get_one::<String>("replicons") {
        let mut replicons = RepliconSet::from_fasta(Path::new(fasta), default_topology)
            .with_context(|| format!("Failed to load replicons from {}", fasta))?;
        if flag.is_none() && replicons.len() == 1 {
            for replicon in replicons.replicons.values_mut() {
                replicon.context.topology = Topology::Circular;
            }
        }
        return Ok(replicons);
    }

    let sizes = matches
        .get_one::<String>("sizes")
        .context("Either --replicons or --sizes is required")?;
    RepliconSet::from_sizes(Path::new(sizes), default_topology)
        .with_context(|| format!("Failed to load replicon sizes from {}", sizes))
}

///
/// Build the configuration: the `--config` file (or the defaults), then the
/// command line flags on top of it.
///
pub fn load_config(matches: &ArgMatches) -> Result<IntegronConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => IntegronConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => IntegronConfig::default(),
    };

    if let Some(dt) = matches.get_one::<u32>("dt") {
        config.distance_threshold = *dt;
    }
    if matches.get_flag("keep-palindromes") {
        config.keep_palindromes = true;
    }
    // only `find` knows the flags below
    if matches.try_contains_id("local-max").unwrap_or(false) {
        if matches.get_flag("local-max") {
            config.local_max = true;
        }
        if matches.get_flag("union-integrases") {
            config.union_integrases = true;
        }
        if let Some(model) = matches.get_one::<String>("attc-model") {
            config.attc_model = Some(PathBuf::from(model));
        }
        if let Some(cmsearch) = matches.get_one::<String>("cmsearch") {
            config.cmsearch = PathBuf::from(cmsearch);
        }
        if let Some(cpu) = matches.get_one::<usize>("cpu") {
            config.cpu = *cpu;
        }
        // sizes alone carry no sequence to search
        if config.local_max && matches.get_one::<String>("replicons").is_none() {
            bail!("local_max needs the replicon sequences, use --replicons instead of --sizes");
        }
    }

    config.validate()?;
    Ok(config)
}

/// Buffered writer on `--output`, or on stdout.
pub fn open_output(path: Option<&String>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path))?;
            info!("Writing results to {}", path);
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

pub fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?,
    );
    pb.set_message("Replicons");
    Ok(pb)
}

/// Tab-separated rendering of an optional number.
pub fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::build_parser;

    fn find_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["integrs", "find", "--attc", "a.tsv", "--integrases", "i.tsv"];
        argv.extend_from_slice(args);
        let matches = build_parser().try_get_matches_from(argv).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        sub.clone()
    }

    #[rstest]
    fn test_flags_override_defaults() {
        let matches = find_matches(&["--sizes", "s.tsv", "--dt", "3000", "--union-integrases"]);
        let config = load_config(&matches).unwrap();
        assert_eq!(config.distance_threshold, 3000);
        assert!(config.union_integrases);
        assert!(!config.local_max);
    }

    #[rstest]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("integrs.toml");
        std::fs::write(&path, "distance_threshold = 2000\nmin_attc_size = 30\n").unwrap();
        let matches = find_matches(&[
            "--sizes",
            "s.tsv",
            "--config",
            path.to_str().unwrap(),
            "--keep-palindromes",
        ]);
        let config = load_config(&matches).unwrap();
        assert_eq!(config.distance_threshold, 2000);
        assert_eq!(config.min_attc_size, 30);
        assert!(config.keep_palindromes);
    }

    #[rstest]
    fn test_local_max_needs_a_model() {
        let matches = find_matches(&["--replicons", "r.fst", "--local-max"]);
        assert!(load_config(&matches).is_err());
    }

    #[rstest]
    fn test_local_max_from_config_needs_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("integrs.toml");
        std::fs::write(&path, "local_max = true\nattc_model = \"attc_4.cm\"\n").unwrap();

        let matches = find_matches(&["--sizes", "s.tsv", "--config", path.to_str().unwrap()]);
        let err = load_config(&matches).unwrap_err();
        assert!(err.to_string().contains("--replicons"));

        let matches = find_matches(&["--replicons", "r.fst", "--config", path.to_str().unwrap()]);
        assert!(load_config(&matches).unwrap().local_max);
    }

    #[rstest]
    fn test_single_fasta_record_is_circular() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rep.fst");
        std::fs::write(&path, ">rep\nACGTACGTAC\n").unwrap();

        let matches = find_matches(&["--replicons", path.to_str().unwrap()]);
        let replicons = load_replicons(&matches).unwrap();
        assert_eq!(replicons.get("rep").unwrap().context.topology, Topology::Circular);

        let matches = find_matches(&["--replicons", path.to_str().unwrap(), "--linear"]);
        let replicons = load_replicons(&matches).unwrap();
        assert_eq!(replicons.get("rep").unwrap().context.topology, Topology::Linear);
    }

    #[rstest]
    fn test_or_na() {
        assert_eq!(or_na(Some(42)), "42");
        assert_eq!(or_na::<i64>(None), "NA");
    }
}
