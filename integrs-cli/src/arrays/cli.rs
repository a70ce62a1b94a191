use clap::{Arg, ArgAction, ArgGroup, Command, arg};

pub const ARRAYS_CMD: &str = "arrays";

pub fn create_arrays_cli() -> Command {
    Command::new(ARRAYS_CMD)
        .about("Cluster attC hits into cassette arrays, without integrases.")
        .arg(
            arg!(--attc <ATTC>)
                .required(true)
                .help("Tab-separated attC hits (replicon_id, model_family, pos_begin, pos_end, strand, e_value[, model_name])"),
        )
        .arg(arg!(--replicons <FASTA>).required(false).help("Replicon sequences"))
        .arg(
            arg!(--sizes <SIZES>)
                .required(false)
                .help("Tab-separated replicon sizes (replicon_id, size[, circ|lin])"),
        )
        .group(
            ArgGroup::new("replicon-source")
                .args(["replicons", "sizes"])
                .required(true),
        )
        .arg(
            arg!(--config <CONFIG>)
                .required(false)
                .help("TOML configuration file, overridden by command line flags"),
        )
        .arg(
            arg!(--circular "Default topology of the replicons is circular")
                .conflicts_with("linear"),
        )
        .arg(arg!(--linear "Default topology of the replicons is linear"))
        .arg(
            Arg::new("keep-palindromes")
                .long("keep-palindromes")
                .action(ArgAction::SetTrue)
                .help("Keep attC sites reported at the same position on both strands"),
        )
        .arg(
            arg!(--dt <DT>)
                .required(false)
                .value_parser(clap::value_parser!(u32))
                .help("Maximal distance between two attC sites of an array"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output path (default: stdout)"),
        )
        .arg(arg!(--json "Write JSON instead of a tab-separated table"))
}
