mod down;
mod load;
mod topology;
mod up;

use clap::{
    Parser,
    Subcommand,
    crate_version,
};
use kindenv_core::logging;
use kindenv_core::prelude::*;

#[derive(Parser)]
#[command(about = "command-line app for disposable kind clusters", version, propagate_version = true)]
struct KindenvCommandRoot {
    #[command(subcommand)]
    subcommand: KindenvSubcommand,

    #[arg(short, long, default_value = "warn")]
    verbosity: String,
}

#[derive(Subcommand)]
enum KindenvSubcommand {
    #[command(about = "create a cluster and write its kubeconfig", visible_alias = "create")]
    Up(up::Args),

    #[command(about = "load local images into a cluster")]
    Load(load::Args),

    #[command(about = "delete a cluster", visible_aliases = &["delete", "rm"])]
    Down(down::Args),

    #[command(about = "print the kind cluster config used for new clusters")]
    Topology(topology::Args),

    #[command(about = "kindenvctl version")]
    Version,
}

#[tokio::main]
async fn main() -> EmptyResult {
    let args = KindenvCommandRoot::parse();
    logging::setup_for_cli(&args.verbosity);

    let overrides = EnvOverrides::from_env();
    let engine = KindEngine::new(&overrides.resolve_kind_bin());

    match &args.subcommand {
        KindenvSubcommand::Up(args) => up::cmd(args).await,
        KindenvSubcommand::Load(args) => load::cmd(args, &overrides, &engine).await,
        KindenvSubcommand::Down(args) => down::cmd(args, &overrides, &engine).await,
        KindenvSubcommand::Topology(args) => topology::cmd(args),
        KindenvSubcommand::Version => {
            println!("kindenvctl {}", crate_version!());
            Ok(())
        },
    }
}

#[cfg(test)]
mod tests;
