use crate::cluster::ClusterApi;
use crate::error::{self, Result};
use k8s_openapi::api::apps::v1::Deployment;
use log::{debug, info};
use serde::Serialize;
use snafu::{ensure, OptionExt};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use tokio::time::{sleep, Duration, Instant};

/// How long to wait and how often to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitParams {
    /// Time allowed for every deployment to become ready, measured from the start of the call.
    pub timeout: Duration,
    /// Delay between poll rounds.
    pub poll_interval: Duration,
}

impl WaitParams {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(360);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
}

impl Default for WaitParams {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }
}

/// What the waiter last saw for a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "readyReplicas")]
pub enum LastObservation {
    /// Every request for the deployment came back not found.
    NeverObserved,
    /// The deployment exists but its status has no `readyReplicas`.
    MissingReadyReplicas,
    /// The deployment reported this many ready replicas.
    ReadyReplicas(i32),
}

impl LastObservation {
    fn from_deployment(deployment: &Deployment) -> Self {
        match ready_replicas(deployment) {
            Some(ready) => Self::ReadyReplicas(ready),
            None => Self::MissingReadyReplicas,
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self, Self::ReadyReplicas(ready) if *ready > 0)
    }
}

impl Display for LastObservation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NeverObserved => write!(f, "never observed"),
            Self::MissingReadyReplicas => write!(f, "readyReplicas not reported"),
            Self::ReadyReplicas(ready) => write!(f, "readyReplicas={}", ready),
        }
    }
}

/// A deployment that had not become ready before the deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unready {
    pub name: String,
    pub last_observation: LastObservation,
}

impl Display for Unready {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' ({})", self.name, self.last_observation)
    }
}

/// The `readyReplicas` reported in a deployment's status, if any.
pub fn ready_replicas(deployment: &Deployment) -> Option<i32> {
    deployment.status.as_ref()?.ready_replicas
}

/// Poll until every deployment in `names` reports at least one ready replica, or until
/// `params.timeout` has passed since the call began. On success, returns the deployments as they
/// were observed in the round where all of them were ready.
///
/// A deployment that is not found, or whose status has no `readyReplicas`, counts as not yet ready.
/// Any other API failure ends the wait immediately.
pub async fn wait_for_ready<C, I, S>(
    cluster: &C,
    names: I,
    namespace: &str,
    params: &WaitParams,
) -> Result<BTreeMap<String, Deployment>>
where
    C: ClusterApi + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
    ensure!(
        !names.is_empty(),
        error::InvalidInputSnafu {
            what: "at least one deployment name is required"
        }
    );
    ensure!(
        !params.timeout.is_zero(),
        error::InvalidInputSnafu {
            what: "the timeout must be greater than zero"
        }
    );
    ensure!(
        !params.poll_interval.is_zero(),
        error::InvalidInputSnafu {
            what: "the poll interval must be greater than zero"
        }
    );
    ensure!(
        is_dns_label(namespace),
        error::InvalidInputSnafu {
            what: format!("'{}' is not a valid namespace", namespace)
        }
    );

    if let Some(name) = names.iter().find(|name| !is_dns_subdomain(name)) {
        return error::InvalidInputSnafu {
            what: format!("'{}' is not a valid deployment name", name),
        }
        .fail();
    }

    let deadline = Instant::now()
        .checked_add(params.timeout)
        .context(error::InvalidInputSnafu {
            what: format!("the timeout of {}s is too large", params.timeout.as_secs()),
        })?;
    let mut observations: BTreeMap<&str, LastObservation> = names
        .iter()
        .map(|name| (name.as_str(), LastObservation::NeverObserved))
        .collect();

    loop {
        let mut ready = BTreeMap::new();
        for name in &names {
            match cluster.get_deployment(namespace, name).await? {
                Some(deployment) => {
                    let observation = LastObservation::from_deployment(&deployment);
                    debug!("deployment '{}/{}': {}", namespace, name, observation);
                    observations.insert(name, observation);
                    if observation.is_ready() {
                        ready.insert(name.clone(), deployment);
                    }
                }
                None => debug!("deployment '{}/{}' was not found", namespace, name),
            }
        }

        if ready.len() == names.len() {
            info!(
                "All {} deployments in namespace '{}' are ready",
                names.len(),
                namespace
            );
            return Ok(ready);
        }

        let now = Instant::now();
        if now >= deadline {
            let unready: Vec<Unready> = observations
                .into_iter()
                .filter(|(name, _)| !ready.contains_key(*name))
                .map(|(name, last_observation)| Unready {
                    name: name.to_string(),
                    last_observation,
                })
                .collect();
            return error::TimeoutSnafu {
                namespace,
                timeout: params.timeout,
                unready,
            }
            .fail();
        }

        let pause = params.poll_interval.min(deadline - now);
        info!(
            "{} of {} deployments in namespace '{}' are ready. Sleeping {}s",
            ready.len(),
            names.len(),
            namespace,
            pause.as_secs_f32()
        );
        sleep(pause).await;
    }
}

/// RFC 1123 label: at most 63 lowercase alphanumerics or '-', starting and ending alphanumeric.
fn is_dns_label(s: &str) -> bool {
    let alphanumeric = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    !s.is_empty()
        && s.len() <= 63
        && s.chars().all(|c| alphanumeric(c) || c == '-')
        && s.starts_with(alphanumeric)
        && s.ends_with(alphanumeric)
}

/// RFC 1123 subdomain: at most 253 characters of dot separated labels.
fn is_dns_subdomain(s: &str) -> bool {
    s.len() <= 253 && s.split('.').all(is_dns_label)
}
