#[derive(Debug, thiserror::Error)]
#[error("the container service could not complete the operation")]
pub struct ContainerServiceError;

#[derive(Debug, thiserror::Error)]
#[error("failed to build application state")]
pub struct StateErr;
