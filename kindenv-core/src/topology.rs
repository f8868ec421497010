use serde::{
    Deserialize,
    Serialize,
};

use crate::constants::*;
use crate::errors::*;

// Lets pods mint projected service account tokens with a stable issuer; kind matches the patch
// by kind only, so leaving out apiVersion keeps it working across kubeadm API bumps.
pub const SERVICE_ACCOUNT_ISSUER_PATCH: &str = r#"kind: ClusterConfiguration
metadata:
  name: config
apiServer:
  extraArgs:
    service-account-issuer: kubernetes.default.svc
    service-account-signing-key-file: /etc/kubernetes/pki/sa.key
"#;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    ControlPlane,
    Worker,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KindNode {
    pub role: NodeRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The kind `Cluster` config document handed to `kind create cluster --config`.  Only the node
/// image varies between renders; everything else is fixed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCluster {
    pub kind: String,
    pub api_version: String,
    pub kubeadm_config_patches: Vec<String>,
    pub nodes: Vec<KindNode>,
}

impl KindCluster {
    pub fn new(node_image: Option<&str>) -> KindCluster {
        let node = |role| KindNode { role, image: node_image.map(Into::into) };

        let nodes = std::iter::repeat_n(NodeRole::ControlPlane, CONTROL_PLANE_NODE_COUNT)
            .chain(std::iter::repeat_n(NodeRole::Worker, WORKER_NODE_COUNT))
            .map(node)
            .collect();

        KindCluster {
            kind: KIND_CLUSTER_KIND.into(),
            api_version: KIND_API_VERSION.into(),
            kubeadm_config_patches: vec![SERVICE_ACCOUNT_ISSUER_PATCH.into()],
            nodes,
        }
    }

    pub fn count(&self, role: NodeRole) -> usize {
        self.nodes.iter().filter(|n| n.role == role).count()
    }

    pub fn render(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

pub fn render_topology(node_image: Option<&str>) -> anyhow::Result<String> {
    KindCluster::new(node_image).render()
}
