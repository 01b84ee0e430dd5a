use crate::error::{self, Result};
use crate::probe::DeploymentTarget;
use crate::readiness::WaitParams;
use crate::retry::RetryPolicy;
use serde::Deserialize;
use snafu::ResultExt;
use tokio::time::Duration;

/// The prefix of every environment variable read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "HAPPA_SMOKE_";

/// Settings provide a way to tune the smoke checks using environment variables. Every field has a
/// default, so an empty environment yields the stock `happa` checks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// The namespace holding the deployments under test.
    ///
    /// # Example
    ///
    /// ```text
    /// HAPPA_SMOKE_NAMESPACE=giantswarm
    /// ```
    #[serde(default = "namespace")]
    pub namespace: String,

    /// Comma separated names of the deployments that must become ready.
    ///
    /// # Example
    ///
    /// ```text
    /// HAPPA_SMOKE_DEPLOYMENTS=happa,happa-api
    /// ```
    #[serde(default = "deployments")]
    pub deployments: Vec<String>,

    /// Seconds allowed for the deployments to become ready.
    #[serde(default = "ready_timeout_secs")]
    pub ready_timeout_secs: u64,

    /// Seconds between readiness polls.
    #[serde(default = "poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// How many times a failed `pods-available` check is run again.
    #[serde(default = "rerun_count")]
    pub rerun_count: u32,

    /// Seconds between reruns.
    #[serde(default = "rerun_delay_secs")]
    pub rerun_delay_secs: u64,
}

impl Settings {
    /// Read settings from `HAPPA_SMOKE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .context(error::SettingsSnafu)
    }

    pub fn target(&self) -> DeploymentTarget {
        DeploymentTarget::new(&self.namespace, self.deployments.iter().cloned())
    }

    pub fn wait_params(&self) -> WaitParams {
        WaitParams {
            timeout: Duration::from_secs(self.ready_timeout_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }

    pub fn pods_retry(&self) -> RetryPolicy {
        RetryPolicy::with_reruns(self.rerun_count, Duration::from_secs(self.rerun_delay_secs))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: namespace(),
            deployments: deployments(),
            ready_timeout_secs: ready_timeout_secs(),
            poll_interval_secs: poll_interval_secs(),
            rerun_count: rerun_count(),
            rerun_delay_secs: rerun_delay_secs(),
        }
    }
}

// We need these to provide defaults for serde.

fn namespace() -> String {
    String::from("giantswarm")
}

fn deployments() -> Vec<String> {
    vec![String::from("happa")]
}

fn ready_timeout_secs() -> u64 {
    WaitParams::DEFAULT_TIMEOUT.as_secs()
}

fn poll_interval_secs() -> u64 {
    WaitParams::DEFAULT_POLL_INTERVAL.as_secs()
}

fn rerun_count() -> u32 {
    5
}

fn rerun_delay_secs() -> u64 {
    10
}
