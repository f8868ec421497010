use std::path::PathBuf;
use std::process::{
    Output,
    Stdio,
};
use std::time::Duration;

use async_trait::async_trait;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::*;

use crate::config::DisplayOptions;
use crate::errors::*;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateOptions {
    pub name: String,
    pub raw_config: String,
    pub node_image: Option<String>,
    pub retain: bool,
    pub wait: Duration,
    pub kubeconfig_path: PathBuf,
    pub display: DisplayOptions,
}

/// The narrow slice of the provisioning engine that a cluster environment needs.  `create` must
/// not return until the control plane is ready or `wait` has elapsed.
#[cfg_attr(any(test, feature = "mock"), automock)]
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    async fn create(&self, opts: &CreateOptions) -> EmptyResult;
    async fn get_kubeconfig(&self, name: &str) -> anyhow::Result<Vec<u8>>;
    async fn load_image(&self, name: &str, image: &str) -> EmptyResult;
    async fn delete(&self, name: &str) -> EmptyResult;
}

/// Drives the `kind` binary.
#[derive(Clone, Debug)]
pub struct KindEngine {
    bin: String,
}

impl KindEngine {
    pub fn new(bin: &str) -> KindEngine {
        KindEngine { bin: bin.into() }
    }

    async fn run(&self, args: &[String], stdin: Option<&str>) -> anyhow::Result<Output> {
        debug!("running `{} {}`", self.bin, args.join(" "));
        let mut child = Command::new(&self.bin)
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("could not run {}", self.bin))?;

        if let Some(input) = stdin {
            let mut pipe = child.stdin.take().ok_or(anyhow!("could not take stdin"))?;
            pipe.write_all(input.as_bytes()).await?;
            pipe.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            bail!(
                "`{} {}` exited with {}: {}",
                self.bin,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output)
    }
}

pub fn create_args(opts: &CreateOptions) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "create".into(),
        "cluster".into(),
        "--name".into(),
        opts.name.clone(),
        "--config".into(),
        "-".into(),
        "--kubeconfig".into(),
        opts.kubeconfig_path.to_string_lossy().into_owned(),
    ];
    if let Some(image) = &opts.node_image {
        args.extend(["--image".into(), image.clone()]);
    }
    if opts.retain {
        args.push("--retain".into());
    }
    if !opts.wait.is_zero() {
        // kind parses Go durations, so stick to whole seconds and round up
        let secs = opts.wait.as_secs() + u64::from(opts.wait.subsec_nanos() > 0);
        args.extend(["--wait".into(), format!("{secs}s")]);
    }
    if opts.display.is_quiet() {
        args.push("--quiet".into());
    }
    args
}

#[async_trait]
impl ProvisioningEngine for KindEngine {
    async fn create(&self, opts: &CreateOptions) -> EmptyResult {
        let output = self.run(&create_args(opts), Some(&opts.raw_config)).await?;

        // kind writes its progress and the usage hint to stderr
        for line in String::from_utf8_lossy(&output.stderr).lines().filter(|l| !l.trim().is_empty()) {
            info!("{}", line.trim());
        }
        Ok(())
    }

    async fn get_kubeconfig(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        let args: [String; 4] = ["get".into(), "kubeconfig".into(), "--name".into(), name.into()];
        Ok(self.run(&args, None).await?.stdout)
    }

    async fn load_image(&self, name: &str, image: &str) -> EmptyResult {
        let args: [String; 5] = ["load".into(), "docker-image".into(), "--name".into(), name.into(), image.into()];
        self.run(&args, None).await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> EmptyResult {
        let args: [String; 4] = ["delete".into(), "cluster".into(), "--name".into(), name.into()];
        self.run(&args, None).await?;
        Ok(())
    }
}
