use kindenv_core::prelude::*;

#[derive(clap::Args, Debug)]
pub struct Args {
    #[arg(long, default_value = "", long_help = "cluster to load the images into (KIND_CLUSTER takes precedence)")]
    pub name: String,

    #[arg(required = true, long_help = "images to load from the local docker daemon")]
    pub images: Vec<String>,
}

pub async fn cmd(args: &Args, overrides: &EnvOverrides, engine: &dyn ProvisioningEngine) -> EmptyResult {
    let name = overrides.resolve_cluster_name(&args.name)?;
    for image in &args.images {
        println!("loading {image} into {name}...");
        engine.load_image(&name, image).await?;
    }
    Ok(())
}
