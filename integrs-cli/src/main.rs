mod arrays;
mod common;
mod find;

use anyhow::Result;
use clap::{ArgAction, Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "integrs";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Find integrons, In0 and CALIN elements from attC and integrase hits.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "Log debug messages (RUST_LOG takes precedence)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(find::cli::create_find_cli())
        .subcommand(arrays::cli::create_arrays_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let log_level = if matches.get_flag("verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match matches.subcommand() {
        //
        // FIND INTEGRONS
        //
        Some((find::cli::FIND_CMD, matches)) => {
            find::handlers::run_find(matches)?;
        }

        //
        // ATTC ARRAYS ONLY
        //
        Some((arrays::cli::ARRAYS_CMD, matches)) => {
            arrays::handlers::run_arrays(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
