use std::path::{
    PathBuf,
    absolute,
};
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::*;
use crate::errors::*;
use crate::topology::render_topology;

lazy_static! {
    static ref CLUSTER_NAME_RE: Regex = Regex::new(r"^[a-z0-9]([-a-z0-9.]*[a-z0-9])?$").unwrap();
}

/// Whether `ClusterEnvironment::close` asks the engine to delete the cluster.  `retain` is a
/// different knob: it only tells kind to keep the node containers around if creation fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TeardownPolicy {
    #[default]
    Keep,
    Delete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DisplayOptions {
    pub usage: bool,
    pub salutation: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions { usage: true, salutation: true }
    }
}

impl DisplayOptions {
    pub fn quiet() -> Self {
        DisplayOptions { usage: false, salutation: false }
    }

    pub fn is_quiet(&self) -> bool {
        !self.usage && !self.salutation
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClusterEnvironmentConfig {
    pub name: String,
    pub node_image: String,
    pub retain: bool,
    pub ready_timeout: Duration,
    pub kubeconfig_path: String,
    pub teardown: TeardownPolicy,
    pub display: DisplayOptions,
}

/// Process-wide defaults, captured once so that nothing downstream reads the environment.
#[derive(Clone, Debug)]
pub struct EnvOverrides {
    pub kind_bin: Option<String>,
    pub cluster_name: Option<String>,
    pub temp_root: PathBuf,
}

impl EnvOverrides {
    pub fn from_env() -> EnvOverrides {
        EnvOverrides {
            kind_bin: non_empty_var(KIND_BIN_ENV_VAR),
            cluster_name: non_empty_var(KIND_CLUSTER_ENV_VAR),
            temp_root: std::env::temp_dir(),
        }
    }

    pub fn resolve_kind_bin(&self) -> String {
        self.kind_bin.clone().unwrap_or_else(|| DEFAULT_KIND_BIN.into())
    }

    /// `KIND_CLUSTER` beats the requested name, which beats the default.
    pub fn resolve_cluster_name(&self, requested: &str) -> anyhow::Result<String> {
        resolve_name(requested, self.cluster_name.as_deref())
    }
}

impl Default for EnvOverrides {
    fn default() -> Self {
        EnvOverrides {
            kind_bin: None,
            cluster_name: None,
            temp_root: std::env::temp_dir(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KubeconfigDest {
    Explicit(PathBuf),
    Allocate { temp_root: PathBuf },
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub name: String,
    pub kind_bin: String,
    pub node_image: Option<String>,
    pub topology: String,
    pub kubeconfig: KubeconfigDest,
}

impl ClusterEnvironmentConfig {
    pub fn resolve(&self, overrides: &EnvOverrides) -> anyhow::Result<ResolvedConfig> {
        let name = overrides.resolve_cluster_name(&self.name)?;
        let kind_bin = overrides.resolve_kind_bin();
        let node_image = (!self.node_image.is_empty()).then(|| self.node_image.clone());
        let topology = render_topology(node_image.as_deref())
            .with_context(|| ClusterEnvError::ConfigResolution("could not render topology".into()))?;

        let kubeconfig = if self.kubeconfig_path.is_empty() {
            KubeconfigDest::Allocate { temp_root: overrides.temp_root.clone() }
        } else {
            let path = absolute(&self.kubeconfig_path).with_context(|| {
                ClusterEnvError::ConfigResolution(format!("invalid kubeconfig path {}", self.kubeconfig_path))
            })?;
            KubeconfigDest::Explicit(path)
        };

        Ok(ResolvedConfig { name, kind_bin, node_image, topology, kubeconfig })
    }
}

fn resolve_name(requested: &str, env_override: Option<&str>) -> anyhow::Result<String> {
    let name = match (env_override, requested) {
        (Some(name), _) => name,
        (None, "") => DEFAULT_CLUSTER_NAME,
        (None, name) => name,
    };

    if name.len() > MAX_CLUSTER_NAME_LEN || !CLUSTER_NAME_RE.is_match(name) {
        return Err(ClusterEnvError::config_resolution(&format!("invalid cluster name {name:?}")));
    }

    Ok(name.into())
}
