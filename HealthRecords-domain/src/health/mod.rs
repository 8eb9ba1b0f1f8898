//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use health_records_data::database::DatabaseGateway;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database.
    /// Returns an error describing the failure if it is unreachable.
    async fn check_database_status(&self) -> Result<(), String>;
}

/// Health service that pings the configured document store
#[derive(Debug, Clone)]
pub struct DatabaseHealthService {
    gateway: Arc<DatabaseGateway>,
}

impl DatabaseHealthService {
    pub fn new(gateway: Arc<DatabaseGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl HealthServiceTrait for DatabaseHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let db_component = match self.check_database_status().await {
            Ok(()) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: self.gateway.connection_info(),
            },
            Err(e) => {
                warn!("Database health check failed: {}", e);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e),
                }
            }
        };

        let overall_status = if db_component.status == ComponentStatus::Unhealthy {
            SystemStatus::Unhealthy
        } else {
            SystemStatus::Healthy
        };

        SystemHealth {
            status: overall_status,
            components: vec![
                ("database".to_string(), db_component),
            ].into_iter().collect(),
        }
    }

    async fn check_database_status(&self) -> Result<(), String> {
        self.gateway
            .ping()
            .await
            .map_err(|e| format!("Database connection error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_records_data::database::DatabaseConfig;

    #[tokio::test]
    async fn test_healthy_database() {
        let gateway = Arc::new(DatabaseGateway::new(DatabaseConfig::in_memory()));
        let service = DatabaseHealthService::new(gateway);

        let health = service.get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);

        let database = &health.components["database"];
        assert_eq!(database.status, ComponentStatus::Healthy);
        assert!(database.details.as_deref().unwrap_or_default().contains("In-memory"));
    }

    #[tokio::test]
    async fn test_unreachable_database() {
        let config = DatabaseConfig {
            mongodb_uri: "not-a-connection-string".to_string(),
            ..DatabaseConfig::default()
        };
        let service = DatabaseHealthService::new(Arc::new(DatabaseGateway::new(config)));

        let health = service.get_system_health().await;
        assert_eq!(health.status, SystemStatus::Unhealthy);

        let database = &health.components["database"];
        assert_eq!(database.status, ComponentStatus::Unhealthy);
        assert!(database.details.as_deref().unwrap_or_default().starts_with("Database connection error"));
    }
}
