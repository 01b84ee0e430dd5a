/*!

This test module provides a mock implementation of [`ClusterApi`] so that the readiness waiter and
the probes can be tested without Kubernetes. Each deployment follows a timeline of states keyed by
the time elapsed since the mock was created, which pairs well with a paused tokio clock.

!*/

#![allow(dead_code)]

use smoke_checks::{ClusterApi, Error, Result};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentStatus};
use k8s_openapi::api::core::v1::Node;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::error::ErrorResponse;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::{Duration, Instant};

/// The state a mocked deployment is in from a point in time onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// The API answers not found.
    Missing,
    /// The deployment exists but has no status yet.
    NoStatus,
    /// The deployment reports this many ready replicas.
    Ready(i32),
    /// The API call fails with this HTTP status code.
    Fail(u16),
}

pub(crate) struct MockCluster {
    start: Instant,
    nodes: usize,
    unreachable: bool,
    timelines: BTreeMap<(String, String), Vec<(Duration, State)>>,
    deployment_calls: AtomicUsize,
}

impl MockCluster {
    /// A cluster with one node and no deployments. Time starts now.
    pub(crate) fn new() -> Self {
        Self {
            start: Instant::now(),
            nodes: 1,
            unreachable: false,
            timelines: BTreeMap::new(),
            deployment_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_nodes(mut self, nodes: usize) -> Self {
        self.nodes = nodes;
        self
    }

    /// Every node list fails as if the API server could not be reached.
    pub(crate) fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Add a deployment that moves through `timeline`, given as `(seconds, state)` pairs. Before
    /// the first entry the deployment is `Missing`.
    pub(crate) fn with_deployment(
        mut self,
        namespace: &str,
        name: &str,
        timeline: &[(u64, State)],
    ) -> Self {
        let timeline = timeline
            .iter()
            .map(|(secs, state)| (Duration::from_secs(*secs), *state))
            .collect();
        self.timelines
            .insert((namespace.to_string(), name.to_string()), timeline);
        self
    }

    /// The number of `get_deployment` calls made so far.
    pub(crate) fn deployment_calls(&self) -> usize {
        self.deployment_calls.load(Ordering::SeqCst)
    }

    fn state(&self, namespace: &str, name: &str) -> State {
        let elapsed = self.start.elapsed();
        self.timelines
            .get(&(namespace.to_string(), name.to_string()))
            .and_then(|timeline| {
                timeline
                    .iter()
                    .rev()
                    .find(|(at, _)| *at <= elapsed)
                    .map(|(_, state)| *state)
            })
            .unwrap_or(State::Missing)
    }
}

pub(crate) fn api_error(method: &str, what: &str, code: u16) -> Error {
    Error::KubeApiCall {
        method: method.to_string(),
        what: what.to_string(),
        source: kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("mock failure {}", code),
            reason: "InternalError".to_string(),
            code,
        }),
    }
}

pub(crate) fn deployment(
    namespace: &str,
    name: &str,
    status: Option<DeploymentStatus>,
) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: None,
        status,
    }
}

#[async_trait::async_trait]
impl ClusterApi for MockCluster {
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        if self.unreachable {
            return Err(api_error("list", "nodes", 503));
        }
        Ok(vec![Node::default(); self.nodes])
    }

    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        self.deployment_calls.fetch_add(1, Ordering::SeqCst);
        match self.state(namespace, name) {
            State::Missing => Ok(None),
            State::NoStatus => Ok(Some(deployment(namespace, name, None))),
            State::Ready(ready) => Ok(Some(deployment(
                namespace,
                name,
                Some(DeploymentStatus {
                    ready_replicas: Some(ready),
                    ..Default::default()
                }),
            ))),
            State::Fail(code) => Err(api_error(
                "get",
                &format!("deployment '{}/{}'", namespace, name),
                code,
            )),
        }
    }
}
