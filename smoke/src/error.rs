use crate::readiness::Unready;
use snafu::Snafu;
use std::path::PathBuf;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for the smoke checks.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to create client: {}", source))]
    ClientCreate { source: kube::Error },

    #[snafu(display("Unable to create client: {}", source))]
    ClientCreateKubeconfig {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to read kubeconfig '{}': {}", path.display(), source))]
    ConfigRead {
        path: PathBuf,
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Invalid input: {}", what))]
    InvalidInput { what: String },

    #[snafu(display("Unable to {} {}: {}", method, what, source))]
    KubeApiCall {
        method: String,
        what: String,
        source: kube::Error,
    },

    #[snafu(display("The cluster reported no nodes"))]
    NoNodes,

    #[snafu(display("Deployment '{}' has {} ready replicas", name, ready))]
    NotReady { name: String, ready: i32 },

    #[snafu(display("Unable to read settings from the environment: {}", source))]
    Settings { source: envy::Error },

    #[snafu(display(
        "Timed out after {}s waiting for deployments in namespace '{}': {}",
        timeout.as_secs(),
        namespace,
        display_unready(unready)
    ))]
    Timeout {
        namespace: String,
        timeout: Duration,
        unready: Vec<Unready>,
    },
}

impl Error {
    /// The deployments that were still unready when a `Timeout` occurred.
    pub fn unready(&self) -> Option<&[Unready]> {
        match self {
            Error::Timeout { unready, .. } => Some(unready),
            _ => None,
        }
    }
}

fn display_unready(unready: &[Unready]) -> String {
    unready
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
