use kindenv_core::prelude::*;

#[derive(clap::Args, Debug)]
pub struct Args {
    #[arg(long, default_value = "", long_help = "name of the cluster to delete (KIND_CLUSTER takes precedence)")]
    pub name: String,
}

pub async fn cmd(args: &Args, overrides: &EnvOverrides, engine: &dyn ProvisioningEngine) -> EmptyResult {
    let name = overrides.resolve_cluster_name(&args.name)?;
    println!("deleting cluster {name}...");
    engine.delete(&name).await
}
