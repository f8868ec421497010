use std::time::Duration;

use kindenv_core::prelude::*;

#[derive(clap::Args, Debug)]
pub struct Args {
    #[arg(long, default_value = "", long_help = "cluster name (KIND_CLUSTER takes precedence)")]
    pub name: String,

    #[arg(long, default_value = "", long_help = "node image for every node (empty uses kind's default)")]
    pub image: String,

    #[arg(long, long_help = "keep the node containers if creation fails")]
    pub retain: bool,

    #[arg(
        long,
        long_help = "how long to wait for the control plane, e.g. `5m`",
        default_value = "0s",
        value_parser = humantime::parse_duration
    )]
    pub wait: Duration,

    #[arg(long, long_help = "where to write the kubeconfig", default_value = KUBECONFIG_FILENAME)]
    pub kubeconfig: String,

    #[arg(short, long, long_help = "suppress kind's usage hints")]
    pub quiet: bool,
}

impl Args {
    pub fn config(&self) -> ClusterEnvironmentConfig {
        ClusterEnvironmentConfig {
            name: self.name.clone(),
            node_image: self.image.clone(),
            retain: self.retain,
            ready_timeout: self.wait,
            kubeconfig_path: self.kubeconfig.clone(),
            teardown: TeardownPolicy::Keep,
            display: if self.quiet { DisplayOptions::quiet() } else { DisplayOptions::default() },
        }
    }
}

pub async fn cmd(args: &Args) -> EmptyResult {
    let mut env = ClusterEnvironment::new(&args.config()).await?;
    println!("cluster {} is ready; kubeconfig written to {}", env.name(), env.kubeconfig_path().display());

    // the kubeconfig belongs to the caller here, so this only marks the handle closed
    env.close().await
}
