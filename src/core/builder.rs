use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::service::Service;
use crate::{config::ServiceConfig, error::ServiceError, events::Bus, loggers::Logger};

/// Builder for constructing a [`Service`] with optional settings.
pub struct ServiceBuilder {
    name: Arc<str>,
    logger: Arc<dyn Logger>,
    cfg: ServiceConfig,
    bus: Option<Bus>,
    parent: Option<CancellationToken>,
}

impl ServiceBuilder {
    /// Creates a new builder for a service named `name` logging through `logger`.
    pub fn new(name: impl Into<Arc<str>>, logger: Arc<dyn Logger>) -> Self {
        Self {
            name: name.into(),
            logger,
            cfg: ServiceConfig::default(),
            bus: None,
            parent: None,
        }
    }

    /// Replaces the default configuration.
    pub fn with_config(mut self, cfg: ServiceConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Publishes lifecycle events to a shared bus instead of a private one.
    ///
    /// Several services may share one bus; events carry the service name.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Derives the stop signal from `parent`.
    ///
    /// Cancelling `parent` stops the worker without calling [`Service::stop`].
    /// `stop` keeps its own exactly-once guarantee and never cancels the parent.
    pub fn with_parent_token(mut self, parent: &CancellationToken) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Builds the service.
    ///
    /// Allocates the stop signal (a child of the parent token, if any) and the
    /// event bus (unless one was supplied). Nothing is spawned.
    ///
    /// ### Errors
    /// [`ServiceError::EmptyName`] if the name is empty or whitespace.
    pub fn build(self) -> Result<Service, ServiceError> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::EmptyName);
        }
        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));
        let signal = self
            .parent
            .as_ref()
            .map_or_else(CancellationToken::new, CancellationToken::child_token);

        Ok(Service::from_parts(
            self.name,
            self.logger,
            self.cfg,
            bus,
            signal,
        ))
    }
}

impl std::fmt::Debug for ServiceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBuilder")
            .field("name", &self.name)
            .field("cfg", &self.cfg)
            .field("has_bus", &self.bus.is_some())
            .field("has_parent", &self.parent.is_some())
            .finish_non_exhaustive()
    }
}
