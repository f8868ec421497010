// Runs the whole lifecycle against a real kind install; needs `kind` and a docker daemon, and
// `busybox:latest` pulled locally.  Run with `cargo test -p kindenv-core -- --ignored`.
use std::time::Duration;

use kindenv_core::errors::phase_of;
use kindenv_core::prelude::*;
use test_log::test;

const ITEST_IMAGE: &str = "busybox:latest";

async fn before_suite() -> anyhow::Result<ClusterEnvironment> {
    let config = ClusterEnvironmentConfig {
        name: "kindenv-itest".into(),
        ready_timeout: Duration::from_secs(300),
        teardown: TeardownPolicy::Delete,
        display: DisplayOptions::quiet(),
        ..Default::default()
    };
    ClusterEnvironment::new(&config).await
}

async fn after_suite(mut env: ClusterEnvironment) -> EmptyResult {
    env.close().await
}

#[test(tokio::test)]
#[ignore = "requires a local kind install and docker"]
async fn itest_cluster_environment_lifecycle() {
    let env = before_suite().await.unwrap();
    let work_dir = env.work_dir().unwrap().to_path_buf();

    let kubeconfig = std::fs::read_to_string(env.kubeconfig_path()).unwrap();
    assert!(kubeconfig.contains(&format!("kind-{}", env.name())));

    env.load_image(ITEST_IMAGE).await.unwrap();
    let err = env.load_image("kindenv.invalid/does-not-exist:latest").await.unwrap_err();
    assert!(matches!(phase_of(&err), Some(ClusterEnvError::ImageLoad(_))));

    after_suite(env).await.unwrap();
    assert!(!work_dir.exists());
}
