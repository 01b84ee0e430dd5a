use crate::cluster::ClusterApi;
use crate::probe::{api_working, pods_available, DeploymentTarget, API_WORKING, PODS_AVAILABLE};
use crate::readiness::{ready_replicas, WaitParams};
use crate::report::{ProbeResult, Report};
use crate::retry::RetryPolicy;
use crate::settings::Settings;
use log::info;

/// Which probes to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    ApiWorking,
    PodsAvailable,
}

/// Everything needed to run the probes. Both probes are independent; a failure in one does not
/// stop the other from running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    pub target: DeploymentTarget,
    pub wait: WaitParams,
    pub api_retry: RetryPolicy,
    pub pods_retry: RetryPolicy,
}

impl Suite {
    pub async fn run<C>(&self, cluster: &C, selection: Selection) -> Report
    where
        C: ClusterApi + ?Sized,
    {
        let mut report = Report::default();
        if matches!(selection, Selection::All | Selection::ApiWorking) {
            info!("Running '{}'", API_WORKING);
            let retried = self
                .api_retry
                .run(API_WORKING, || api_working(cluster))
                .await;
            report.push(ProbeResult::from_retried(API_WORKING, &retried, |nodes| {
                format!("{} nodes", nodes)
            }));
        }
        if matches!(selection, Selection::All | Selection::PodsAvailable) {
            info!(
                "Running '{}' for {:?} in namespace '{}'",
                PODS_AVAILABLE, self.target.names, self.target.namespace
            );
            let retried = self
                .pods_retry
                .run(PODS_AVAILABLE, || {
                    pods_available(cluster, &self.target, &self.wait)
                })
                .await;
            report.push(ProbeResult::from_retried(
                PODS_AVAILABLE,
                &retried,
                |deployments| {
                    deployments
                        .iter()
                        .map(|(name, deployment)| {
                            format!(
                                "{}/{} readyReplicas={}",
                                self.target.namespace,
                                name,
                                ready_replicas(deployment).unwrap_or_default()
                            )
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                },
            ));
        }
        report
    }
}

impl From<&Settings> for Suite {
    fn from(settings: &Settings) -> Self {
        Self {
            target: settings.target(),
            wait: settings.wait_params(),
            api_retry: RetryPolicy::once(),
            pods_retry: settings.pods_retry(),
        }
    }
}

impl Default for Suite {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}
