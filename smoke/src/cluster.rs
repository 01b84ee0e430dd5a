use crate::error::{self, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Node;
use kube::{
    api::ListParams,
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config,
};
use log::trace;
use snafu::ResultExt;
use std::path::Path;

/// The read-only view of a cluster that the smoke checks need. Nothing reachable through this
/// trait can change cluster state.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List every node in the cluster.
    async fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Get the deployment `name` in `namespace`. `Ok(None)` means the API answered that the
    /// deployment does not exist.
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>>;
}

/// A [`ClusterApi`] backed by a `kube` client.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates the client from the default kube configuration, i.e. `KUBECONFIG`,
    /// `~/.kube/config` or the in-cluster service account.
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default()
            .await
            .context(error::ClientCreateSnafu)?;
        Ok(Self::new(client))
    }

    /// Creates the client from the kubeconfig file at `path`.
    pub async fn from_kubeconfig_path(path: &Path) -> Result<Self> {
        let kubeconfig = Kubeconfig::read_from(path).context(error::ConfigReadSnafu { path })?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context(error::ClientCreateKubeconfigSnafu)?;
        let client: Client = config.try_into().context(error::ClientCreateSnafu)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        trace!("listing nodes");
        let node_api = Api::<Node>::all(self.client.clone());
        let nodes = node_api
            .list(&ListParams::default())
            .await
            .context(error::KubeApiCallSnafu {
                method: "list",
                what: "nodes",
            })?;
        Ok(nodes.items)
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        trace!("getting deployment '{}/{}'", namespace, name);
        let deployment_api = Api::<Deployment>::namespaced(self.client.clone(), namespace);
        deployment_api
            .get_opt(name)
            .await
            .context(error::KubeApiCallSnafu {
                method: "get",
                what: format!("deployment '{}/{}'", namespace, name),
            })
    }
}
