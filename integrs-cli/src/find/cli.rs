use clap::{Arg, ArgAction, ArgGroup, Command, arg};

pub const FIND_CMD: &str = "find";

pub fn create_find_cli() -> Command {
    Command::new(FIND_CMD)
        .about("Assemble integrons from attC and integrase hit tables.")
        .arg(
            arg!(--attc <ATTC>)
                .required(true)
                .help("Tab-separated attC hits (replicon_id, model_family, pos_begin, pos_end, strand, e_value[, model_name])"),
        )
        .arg(
            arg!(--integrases <INTEGRASES>)
                .required(true)
                .help("Tab-separated integrase hits (replicon_id, protein_id, pos_begin, pos_end, strand, e_value, model_name)"),
        )
        .arg(
            arg!(--replicons <FASTA>)
                .required(false)
                .help("Replicon sequences, needed by --local-max"),
        )
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
            Arg::new("local-max")
                .long("local-max")
                .action(ArgAction::SetTrue)
                .requires("replicons")
                .help("Search missed attC sites around each integron with cmsearch --max"),
        )
        .arg(
            Arg::new("union-integrases")
                .long("union-integrases")
                .action(ArgAction::SetTrue)
                .help("Keep proteins hit by either integrase profile instead of both"),
        )
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
                .help("Maximal distance between two attC sites, or an integrase and its array"),
        )
        .arg(
            Arg::new("attc-model")
                .long("attc-model")
                .required(false)
                .help("Covariance model of the attC site, used by --local-max"),
        )
        .arg(
            arg!(--cmsearch <CMSEARCH>)
                .required(false)
                .help("Path to the cmsearch binary"),
        )
        .arg(
            arg!(--cpu <CPU>)
                .required(false)
                .value_parser(clap::value_parser!(usize))
                .help("Threads given to each cmsearch run"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output path (default: stdout)"),
        )
        .arg(arg!(--json "Write JSON instead of a tab-separated table"))
}
