use super::*;
use crate::topology::*;

#[rstest]
fn test_topology_node_counts() {
    let cluster = KindCluster::new(None);

    assert_eq!(cluster.nodes.len(), 6);
    assert_eq!(cluster.count(NodeRole::ControlPlane), 3);
    assert_eq!(cluster.count(NodeRole::Worker), 3);

    // control plane nodes come first
    assert!(cluster.nodes[..3].iter().all(|n| n.role == NodeRole::ControlPlane));
}

#[rstest]
#[case::engine_default(None)]
#[case::pinned(Some(TEST_NODE_IMAGE))]
fn test_topology_node_image(#[case] image: Option<&str>) {
    let cluster = KindCluster::new(image);
    assert!(cluster.nodes.iter().all(|n| n.image.as_deref() == image));
}

#[rstest]
fn test_render_topology_round_trips() {
    let rendered = render_topology(Some(TEST_NODE_IMAGE)).unwrap();
    let parsed: KindCluster = serde_yaml::from_str(&rendered).unwrap();

    assert_eq!(parsed, KindCluster::new(Some(TEST_NODE_IMAGE)));
}

#[rstest]
fn test_render_topology_document() {
    let rendered = render_topology(None).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();

    assert_eq!(doc["kind"], "Cluster");
    assert_eq!(doc["apiVersion"], "kind.x-k8s.io/v1alpha4");
    assert_eq!(doc["nodes"][0]["role"], "control-plane");
    assert_eq!(doc["nodes"][5]["role"], "worker");
    assert!(doc["nodes"][0].get("image").is_none());

    let patches = doc["kubeadmConfigPatches"].as_sequence().unwrap();
    assert_eq!(patches.len(), 1);

    let patch: serde_yaml::Value = serde_yaml::from_str(patches[0].as_str().unwrap()).unwrap();
    assert_eq!(patch["kind"], "ClusterConfiguration");
    assert_eq!(patch["apiServer"]["extraArgs"]["service-account-issuer"], "kubernetes.default.svc");
    assert_eq!(
        patch["apiServer"]["extraArgs"]["service-account-signing-key-file"],
        "/etc/kubernetes/pki/sa.key"
    );
}
