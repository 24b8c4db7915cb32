//! `catalog-parity` command-line entry point

use anyhow::Context;
use parity_cli::{command, compare, dump, load_config, load_value, CompareOptions};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn path_arg(args: &clap::ArgMatches, name: &str) -> anyhow::Result<PathBuf> {
    args.get_one::<PathBuf>(name)
        .cloned()
        .with_context(|| format!("missing argument <{name}>"))
}

fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("compare", args)) => {
            let direct = load_value(&path_arg(args, "direct")?)?;
            let indirect = load_value(&path_arg(args, "indirect")?)?;
            let config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
            let options = CompareOptions {
                multi: args.get_flag("multi"),
                json: args.get_flag("json"),
            };

            let report = compare(&direct, &indirect, &config, options)?;
            print!("{}", report.output);
            if !report.equivalent {
                std::process::exit(1);
            }
        }
        Some(("dump", args)) => {
            let value = load_value(&path_arg(args, "file")?)?;
            let config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
            print!("{}", dump(&value, &config));
        }
        _ => unreachable!("clap requires a subcommand"),
    }
    Ok(())
}
