mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use commands::install::InstallArgs;
use context::Context;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Context::new(cli.config, cli.bin, cli.verbose).and_then(|ctx| match cli.command {
        Commands::Version { require, json } => {
            commands::version::execute_version(&ctx, require, json)
        }
        Commands::Formats { json } => commands::formats::execute_formats(&ctx, json),
        Commands::Releases {
            since,
            range,
            limit,
            json,
        } => commands::releases::execute_releases(&ctx, since, range, limit, json),
        Commands::Install {
            tag,
            dir,
            arch,
            bin_dir,
            no_extract,
            link,
            dpkg,
        } => commands::install::execute_install(
            &ctx,
            InstallArgs {
                tag,
                dir,
                arch,
                bin_dir,
                no_extract,
                link,
                dpkg,
            },
        ),
        Commands::Exec { args } => commands::exec::execute_exec(&ctx, args),
        Commands::Convert {
            from,
            to,
            input,
            extra,
        } => commands::convert::execute_convert(&ctx, &from, &to, input, &extra),
    });

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs to stderr; `RUST_LOG` overrides the level chosen by `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
