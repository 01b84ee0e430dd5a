use clap::Parser;
use smoke_checks::Settings;

/// Flags that tune the `pods-available` check. Each one overrides the matching `HAPPA_SMOKE_*`
/// environment variable.
#[derive(Debug, Default, Parser)]
pub(crate) struct Checks {
    /// Namespace of the deployments under test [default: giantswarm]
    #[clap(long = "namespace", short = 'n')]
    namespace: Option<String>,

    /// A deployment that must become ready. Repeat to wait for several [default: happa]
    #[clap(long = "deployment", short = 'd')]
    deployments: Vec<String>,

    /// Seconds allowed for the deployments to become ready [default: 360]
    #[clap(long = "timeout")]
    timeout: Option<u64>,

    /// Seconds between readiness polls [default: 5]
    #[clap(long = "poll-interval")]
    poll_interval: Option<u64>,

    /// How many times a failed `pods-available` check is run again [default: 5]
    #[clap(long = "reruns")]
    reruns: Option<u32>,

    /// Seconds between reruns [default: 10]
    #[clap(long = "rerun-delay")]
    rerun_delay: Option<u64>,
}

impl Checks {
    pub(crate) fn apply(&self, settings: &mut Settings) {
        if let Some(namespace) = &self.namespace {
            settings.namespace = namespace.clone();
        }
        if !self.deployments.is_empty() {
            settings.deployments = self.deployments.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.ready_timeout_secs = timeout;
        }
        if let Some(poll_interval) = self.poll_interval {
            settings.poll_interval_secs = poll_interval;
        }
        if let Some(reruns) = self.reruns {
            settings.rerun_count = reruns;
        }
        if let Some(rerun_delay) = self.rerun_delay {
            settings.rerun_delay_secs = rerun_delay;
        }
    }
}
