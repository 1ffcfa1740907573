//! Address extraction from state files on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::time::Duration;

use serde_json::json;
use stagehand_cli::application::ports::AddressResolver;
use stagehand_cli::application::services::addresses::extract_host_addresses;
use stagehand_cli::application::services::gather::GatherContext;
use stagehand_cli::domain::stage::address_stage;
use stagehand_cli::domain::{ClusterConfig, Platform};
use stagehand_cli::infra::state::FsStateReader;

struct Unreachable;

impl AddressResolver for Unreachable {
    async fn resolve(&self, reference: &str) -> anyhow::Result<String> {
        anyhow::bail!("no resolver for {reference}")
    }
}

fn write_state(dir: &Path, file: &str, resources: &serde_json::Value) {
    let doc = json!({
        "version": 4,
        "terraform_version": "1.5.7",
        "serial": 3,
        "lineage": "3f1c",
        "outputs": {},
        "resources": resources,
    });
    std::fs::write(dir.join(file), serde_json::to_vec_pretty(&doc).unwrap()).unwrap();
}

#[tokio::test]
async fn test_aws_addresses_from_stage_files() {
    let dir = tempfile::TempDir::new().unwrap();
    write_state(
        dir.path(),
        "cluster.tfstate",
        &json!([{
            "module": "module.masters",
            "mode": "managed",
            "type": "aws_network_interface",
            "name": "master",
            "provider": "provider[\"registry.terraform.io/hashicorp/aws\"]",
            "instances": [
                { "index_key": 0, "attributes": { "private_ip": "10.0.1.4" } },
                { "index_key": 1, "attributes": { "private_ip": "10.0.1.5" } }
            ]
        }]),
    );
    write_state(
        dir.path(),
        "bootstrap.tfstate",
        &json!([{
            "module": "module.bootstrap",
            "mode": "managed",
            "type": "aws_instance",
            "name": "bootstrap",
            "provider": "provider[\"registry.terraform.io/hashicorp/aws\"]",
            "instances": [
                { "attributes": { "public_ip": "", "private_ip": "10.0.0.7" } }
            ]
        }]),
    );
    let cluster = ClusterConfig {
        platform: Platform::Aws,
        control_plane_replicas: 2,
        baremetal: None,
    };
    let ctx = GatherContext {
        cluster: &cluster,
        resolver: &Unreachable,
        wait: Duration::from_secs(1),
    };
    let stage = address_stage(Platform::Aws).unwrap();

    let addrs = extract_host_addresses(&FsStateReader, dir.path(), &stage, &ctx)
        .await
        .unwrap();

    assert_eq!(addrs.bootstrap, "10.0.0.7");
    assert_eq!(addrs.control_plane, ["10.0.1.4", "10.0.1.5"]);
    assert!(addrs.failures.is_empty());
}

#[tokio::test]
async fn test_malformed_state_file_is_error() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("cluster.tfstate"), "{ not json").unwrap();
    let cluster = ClusterConfig {
        platform: Platform::Gcp,
        control_plane_replicas: 1,
        baremetal: None,
    };
    let ctx = GatherContext {
        cluster: &cluster,
        resolver: &Unreachable,
        wait: Duration::from_secs(1),
    };
    let stage = address_stage(Platform::Gcp).unwrap();

    let err = extract_host_addresses(&FsStateReader, dir.path(), &stage, &ctx)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("cluster.tfstate"), "{err:#}");
}
