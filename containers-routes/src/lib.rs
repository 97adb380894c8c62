use crate::error::ContainerServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<ContainerServiceError>>;
pub type OptServiceResult<T> = Result<Option<T>, Report<ContainerServiceError>>;

pub mod error;
mod metrics;
pub mod routes;
pub mod service;
pub mod state;
