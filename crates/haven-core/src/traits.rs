//! Small traits shared by the domain and infrastructure layers.

use async_trait::async_trait;

/// Entities with a unique identifier.
pub trait Entity<ID> {
    fn id(&self) -> &ID;
}

/// A dependency that can report its own health to the readiness probe.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Name reported alongside the status (e.g. `database`, `cache`).
    fn name(&self) -> &str;

    async fn check(&self) -> HealthStatus;
}

/// Health check status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// Functional, with reduced guarantees (e.g. every cache read misses).
    Degraded(String),
    Unhealthy(String),
}

impl HealthStatus {
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }

    /// Short label used in health responses.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded(_) => "degraded",
            Self::Unhealthy(_) => "unhealthy",
        }
    }
}
