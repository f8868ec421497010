use std::path::{
    Path,
    PathBuf,
};

use tempfile::TempDir;
use tracing::*;

use crate::config::{
    ClusterEnvironmentConfig,
    EnvOverrides,
    KubeconfigDest,
    ResolvedConfig,
    TeardownPolicy,
};
use crate::constants::*;
use crate::engine::{
    CreateOptions,
    KindEngine,
    ProvisioningEngine,
};
use crate::errors::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnvState {
    Ready,
    Closed,
}

/// A running kind cluster plus whatever scratch space we allocated for it.
///
/// A value of this type only exists once the cluster has been created and its kubeconfig has
/// been written, so there is no way to call `load_image` on a failed construction.  If the
/// caller did not ask for a specific kubeconfig location, the kubeconfig lives in a private temp
/// directory that is removed by `close` (or on drop, if `close` is never called).
pub struct ClusterEnvironment {
    work_dir: Option<TempDir>,
    name: String,
    kubeconfig_path: PathBuf,
    teardown: TeardownPolicy,
    state: EnvState,
    engine: Box<dyn ProvisioningEngine>,
    span: Span,
}

impl ClusterEnvironment {
    pub async fn new(config: &ClusterEnvironmentConfig) -> anyhow::Result<ClusterEnvironment> {
        let resolved = config.resolve(&EnvOverrides::from_env())?;
        let engine = Box::new(KindEngine::new(&resolved.kind_bin));
        ClusterEnvironment::start(config, resolved, engine).await
    }

    pub async fn with_engine(
        config: &ClusterEnvironmentConfig,
        overrides: &EnvOverrides,
        engine: Box<dyn ProvisioningEngine>,
    ) -> anyhow::Result<ClusterEnvironment> {
        let resolved = config.resolve(overrides)?;
        ClusterEnvironment::start(config, resolved, engine).await
    }

    async fn start(
        config: &ClusterEnvironmentConfig,
        resolved: ResolvedConfig,
        engine: Box<dyn ProvisioningEngine>,
    ) -> anyhow::Result<ClusterEnvironment> {
        let span = info_span!("kindenv", cluster = %resolved.name);

        // The temp dir has to exist before `create` because kind writes the kubeconfig there too;
        // if anything below fails, dropping it removes the directory again.
        let (work_dir, kubeconfig_path) = match resolved.kubeconfig {
            KubeconfigDest::Explicit(path) => (None, path),
            KubeconfigDest::Allocate { temp_root } => {
                let dir = tempfile::Builder::new()
                    .prefix(WORK_DIR_PREFIX)
                    .tempdir_in(&temp_root)
                    .with_context(|| {
                        ClusterEnvError::ConfigResolution(format!(
                            "could not allocate work dir in {}",
                            temp_root.display()
                        ))
                    })?;
                let path = dir.path().join(KUBECONFIG_FILENAME);
                (Some(dir), path)
            },
        };

        let opts = CreateOptions {
            name: resolved.name.clone(),
            raw_config: resolved.topology,
            node_image: resolved.node_image,
            retain: config.retain,
            wait: config.ready_timeout,
            kubeconfig_path: kubeconfig_path.clone(),
            display: config.display,
        };

        span.in_scope(|| info!("creating cluster with kubeconfig at {}", kubeconfig_path.display()));
        engine
            .create(&opts)
            .instrument(span.clone())
            .await
            .with_context(|| ClusterEnvError::ClusterCreation(resolved.name.clone()))?;
        span.in_scope(|| info!("cluster created"));

        let kubeconfig = engine
            .get_kubeconfig(&resolved.name)
            .instrument(span.clone())
            .await
            .with_context(|| ClusterEnvError::CredentialExtraction(resolved.name.clone()))?;
        if kubeconfig.is_empty() {
            return Err(anyhow!("engine returned an empty kubeconfig")
                .context(ClusterEnvError::CredentialExtraction(resolved.name)));
        }
        persist_kubeconfig(&kubeconfig_path, &kubeconfig, work_dir.is_none())
            .await
            .with_context(|| ClusterEnvError::CredentialExtraction(resolved.name.clone()))?;

        Ok(ClusterEnvironment {
            work_dir,
            name: resolved.name,
            kubeconfig_path,
            teardown: config.teardown,
            state: EnvState::Ready,
            engine,
            span,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kubeconfig_path(&self) -> &Path {
        &self.kubeconfig_path
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_ref().map(TempDir::path)
    }

    pub fn state(&self) -> EnvState {
        self.state
    }

    pub async fn load_image(&self, image: &str) -> EmptyResult {
        if self.state != EnvState::Ready {
            return Err(ClusterEnvError::image_load(&format!("{image} (environment {} is closed)", self.name)));
        }

        self.span.in_scope(|| info!("loading image {image}"));
        self.engine
            .load_image(&self.name, image)
            .instrument(self.span.clone())
            .await
            .with_context(|| ClusterEnvError::ImageLoad(image.into()))
    }

    pub async fn close(&mut self) -> EmptyResult {
        if self.state == EnvState::Closed {
            self.span.in_scope(|| debug!("already closed"));
            return Ok(());
        }
        self.state = EnvState::Closed;

        let delete_res = match self.teardown {
            TeardownPolicy::Keep => Ok(()),
            TeardownPolicy::Delete => {
                self.span.in_scope(|| info!("deleting cluster"));
                self.engine.delete(&self.name).instrument(self.span.clone()).await
            },
        };

        let remove_res = match self.work_dir.take() {
            Some(dir) => {
                let path = dir.path().to_path_buf();
                self.span.in_scope(|| info!("removing work dir {}", path.display()));
                dir.close().with_context(|| format!("could not remove {}", path.display()))
            },
            None => Ok(()),
        };

        delete_res
            .and(remove_res)
            .with_context(|| ClusterEnvError::Teardown(self.name.clone()))
    }
}

// A caller-owned kubeconfig may hold other contexts; kind already merged ours into it during
// `create`, so an existing non-empty file is left alone and only a missing one gets written.
async fn persist_kubeconfig(path: &Path, contents: &[u8], caller_owned: bool) -> EmptyResult {
    if caller_owned && tokio::fs::try_exists(path).await? {
        let meta = tokio::fs::metadata(path).await?;
        ensure!(meta.len() > 0, "kubeconfig at {} is empty", path.display());
        debug!("keeping existing kubeconfig at {}", path.display());
        return Ok(());
    }

    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("could not write {}", path.display()))
}

impl std::fmt::Debug for ClusterEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterEnvironment")
            .field("name", &self.name)
            .field("kubeconfig_path", &self.kubeconfig_path)
            .field("work_dir", &self.work_dir())
            .field("state", &self.state)
            .finish()
    }
}
