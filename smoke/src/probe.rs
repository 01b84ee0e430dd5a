/*!

The two smoke checks. Each takes the cluster handle explicitly and either passes, returning what it
observed, or fails with the reason.

!*/

use crate::cluster::ClusterApi;
use crate::error::{self, Result};
use crate::readiness::{ready_replicas, wait_for_ready, WaitParams};
use k8s_openapi::api::apps::v1::Deployment;
use log::info;
use serde::Serialize;
use snafu::ensure;
use std::collections::BTreeMap;

/// The name `api_working` is reported under.
pub const API_WORKING: &str = "api-working";
/// The name `pods_available` is reported under.
pub const PODS_AVAILABLE: &str = "pods-available";

/// The deployments that `pods_available` waits for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentTarget {
    pub namespace: String,
    pub names: Vec<String>,
}

impl DeploymentTarget {
    pub fn new<S, I, N>(namespace: S, names: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for DeploymentTarget {
    /// `happa` in the `giantswarm` namespace.
    fn default() -> Self {
        Self::new("giantswarm", ["happa"])
    }
}

/// Passes if the node list can be read and contains at least one node. Returns the node count.
pub async fn api_working<C>(cluster: &C) -> Result<usize>
where
    C: ClusterApi + ?Sized,
{
    let nodes = cluster.list_nodes().await?.len();
    ensure!(nodes > 0, error::NoNodesSnafu);
    info!("The cluster API is working, found {} nodes", nodes);
    Ok(nodes)
}

/// Passes if every deployment in `target` reports at least one ready replica within
/// `params.timeout`. Returns the ready deployments by name.
pub async fn pods_available<C>(
    cluster: &C,
    target: &DeploymentTarget,
    params: &WaitParams,
) -> Result<BTreeMap<String, Deployment>>
where
    C: ClusterApi + ?Sized,
{
    let deployments = wait_for_ready(
        cluster,
        target.names.iter().cloned(),
        &target.namespace,
        params,
    )
    .await?;
    for (name, deployment) in &deployments {
        let ready = ready_replicas(deployment).unwrap_or_default();
        ensure!(ready > 0, error::NotReadySnafu { name, ready });
        info!(
            "Deployment '{}/{}' has {} ready replicas",
            target.namespace, name, ready
        );
    }
    Ok(deployments)
}
