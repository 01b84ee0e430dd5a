/*!

Smoke checks for a Kubernetes cluster running `happa`. The checks only read cluster state: they
confirm the API answers with at least one node and that the `happa` deployment (or any other set of
deployments) reports ready replicas within a time limit.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use cluster::{ClusterApi, KubeCluster};
pub use error::{Error, Result};
pub use probe::{api_working, pods_available, DeploymentTarget, API_WORKING, PODS_AVAILABLE};
pub use readiness::{ready_replicas, wait_for_ready, LastObservation, Unready, WaitParams};
pub use report::{ProbeResult, Report};
pub use retry::{Retried, RetryPolicy};
pub use settings::Settings;
pub use suite::{Selection, Suite};

pub mod cluster;
mod error;
pub mod probe;
pub mod readiness;
mod report;
mod retry;
pub mod settings;
mod suite;
