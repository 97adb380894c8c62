use crate::error::StateErr;
use crate::metrics;
use crate::service::ContainerService;
use axum::extract::FromRef;
use containers_core::ContainerEngine;
use error_stack::{Report, ResultExt};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct ContainerAppState<T: ContainerEngine> {
    pub service: ContainerService<T>,
    /// `None` when metrics are disabled; `/metrics` then answers 503.
    pub metrics: Option<PrometheusHandle>,
}

impl<T: ContainerEngine> ContainerAppState<T> {
    /// Installs the process-wide prometheus recorder, so only call this once.
    pub fn new_with_metrics(engine: T) -> Result<Self, Report<StateErr>> {
        let handle = metrics::setup_recorder().change_context(StateErr)?;
        Ok(Self {
            service: ContainerService::new(engine),
            metrics: Some(handle),
        })
    }

    pub fn new_without_metrics(engine: T) -> Self {
        Self {
            service: ContainerService::new(engine),
            metrics: None,
        }
    }
}

impl<T: ContainerEngine> FromRef<ContainerAppState<T>> for ContainerService<T> {
    fn from_ref(input: &ContainerAppState<T>) -> Self {
        input.service.clone()
    }
}
