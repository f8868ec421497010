mod topology_test;

use assert_fs::TempDir;
use mockall::predicate::eq;
use rstest::*;
use tracing_test::traced_test;

use super::*;
use crate::engine::MockProvisioningEngine;
use crate::errors::phase_of;
use crate::prelude::*;

const TEST_CLUSTER: &str = "test-env";
const TEST_NODE_IMAGE: &str =
    "kindest/node:v1.30.0@sha256:047357ac0cfea04663786a612ba1eaba9702bef25227a794b52890dd8bcd692e";
const TEST_KUBECONFIG: &str = r#"apiVersion: v1
kind: Config
clusters:
- cluster:
    server: https://127.0.0.1:6443
  name: kind-test-env
"#;

#[fixture]
fn test_config() -> ClusterEnvironmentConfig {
    ClusterEnvironmentConfig {
        name: TEST_CLUSTER.into(),
        ..Default::default()
    }
}

#[fixture]
fn temp_root() -> TempDir {
    TempDir::new().unwrap()
}

fn overrides_in(root: &TempDir) -> EnvOverrides {
    EnvOverrides {
        temp_root: root.path().into(),
        ..Default::default()
    }
}

fn dir_is_empty(root: &TempDir) -> bool {
    std::fs::read_dir(root.path()).unwrap().next().is_none()
}

fn expect_create_ok(engine: &mut MockProvisioningEngine) {
    engine.expect_create().times(1).returning(|_| Ok(()));
}

fn expect_kubeconfig(engine: &mut MockProvisioningEngine, contents: &'static str) {
    engine
        .expect_get_kubeconfig()
        .with(eq(TEST_CLUSTER))
        .times(1)
        .returning(move |_| Ok(contents.as_bytes().to_vec()));
}

// A stand-in for the kind binary that records its invocations in `kind.log`, has exactly one
// image (`myimage:latest`) in its "local image store", and otherwise always succeeds.
#[cfg(unix)]
fn fake_kind(bin_dir: &TempDir) -> String {
    use std::os::unix::fs::PermissionsExt;

    let dir = bin_dir.path().display();
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> {dir}/kind.log
case "$1" in
create)
    cat > {dir}/config.yaml
    ;;
get)
    cat <<'EOF'
{TEST_KUBECONFIG}EOF
    ;;
load)
    if [ "$5" != "myimage:latest" ]; then
        echo "ERROR: image: \"$5\" not present locally" >&2
        exit 1
    fi
    ;;
esac
"#
    );

    let path = bin_dir.path().join("kind");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

#[cfg(unix)]
fn read_log(bin_dir: &TempDir) -> String {
    std::fs::read_to_string(bin_dir.path().join("kind.log")).unwrap_or_default()
}
