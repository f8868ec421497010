// Env vars
pub const KIND_BIN_ENV_VAR: &str = "KIND";
pub const KIND_CLUSTER_ENV_VAR: &str = "KIND_CLUSTER";

// Defaults
pub const DEFAULT_KIND_BIN: &str = "kind";
pub const DEFAULT_CLUSTER_NAME: &str = "test";
pub const KUBECONFIG_FILENAME: &str = "kubeconfig";
pub const WORK_DIR_PREFIX: &str = "kindenv";

// kind refuses longer names because they end up in container hostnames
pub const MAX_CLUSTER_NAME_LEN: usize = 50;

// Topology
pub const KIND_CLUSTER_KIND: &str = "Cluster";
pub const KIND_API_VERSION: &str = "kind.x-k8s.io/v1alpha4";
pub const CONTROL_PLANE_ROLE: &str = "control-plane";
pub const WORKER_ROLE: &str = "worker";
pub const CONTROL_PLANE_NODE_COUNT: usize = 3;
pub const WORKER_NODE_COUNT: usize = 3;
