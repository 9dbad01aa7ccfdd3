//! # NewsFlash DI
//!
//! Service container and composition root for the NewsFlash networking
//! layer. The container decouples construction from consumption; the
//! [`bootstrap`] module is the one place the network stack is wired
//! together, invoked once at process startup.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use newsflash_di::{bootstrap, NetworkConfig};
//!
//! let services = bootstrap(NetworkConfig::new(cache_dir), auth).await?;
//! let rest = services.rest();
//! ```

pub mod bootstrap;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

pub use bootstrap::{
    bootstrap, BootstrapError, NetworkConfig, NetworkServices, BASE_URL,
};

/// Errors that can occur during container operations
#[derive(Debug, thiserror::Error)]
pub enum DiError {
    #[error("Service not registered: {service_type}")]
    NotRegistered { service_type: String },

    #[error("Service already registered: {service_type}")]
    AlreadyRegistered { service_type: String },

    #[error("Service type mismatch: {message}")]
    TypeMismatch { message: String },
}

pub type DiResult<T> = Result<T, DiError>;

/// Service lifetime management
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// Created once and reused for the entire process lifetime
    Singleton,
    /// Created each time it is resolved
    Transient,
}

struct ServiceDescriptor {
    factory: Box<dyn Fn(&Container) -> DiResult<Arc<dyn Any + Send + Sync>> + Send + Sync>,
    lifetime: ServiceLifetime,
    instance: Option<Arc<dyn Any + Send + Sync>>,
}

/// Type-indexed service registry
pub struct Container {
    services: RwLock<HashMap<TypeId, ServiceDescriptor>>,
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Register a singleton service: the factory runs at most once and
    /// every resolution returns the same instance.
    pub fn register<F, T>(&self, factory: F) -> DiResult<()>
    where
        F: Fn(&Container) -> DiResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.register_with(ServiceLifetime::Singleton, factory)
    }

    /// Register a transient service: the factory runs on every resolution
    pub fn register_transient<F, T>(&self, factory: F) -> DiResult<()>
    where
        F: Fn(&Container) -> DiResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.register_with(ServiceLifetime::Transient, factory)
    }

    fn register_with<F, T>(&self, lifetime: ServiceLifetime, factory: F) -> DiResult<()>
    where
        F: Fn(&Container) -> DiResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        let mut services = self.services.write().unwrap();

        if services.contains_key(&type_id) {
            return Err(DiError::AlreadyRegistered {
                service_type: std::any::type_name::<T>().to_string(),
            });
        }

        let factory = Box::new(
            move |container: &Container| -> DiResult<Arc<dyn Any + Send + Sync>> {
                let service = factory(container)?;
                Ok(service as Arc<dyn Any + Send + Sync>)
            },
        );

        services.insert(
            type_id,
            ServiceDescriptor {
                factory,
                lifetime,
                instance: None,
            },
        );

        debug!("Registered service: {}", std::any::type_name::<T>());
        Ok(())
    }

    /// Resolve a service instance
    pub fn resolve<T>(&self) -> DiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        let mut services = self.services.write().unwrap();

        let descriptor =
            services
                .get_mut(&type_id)
                .ok_or_else(|| DiError::NotRegistered {
                    service_type: std::any::type_name::<T>().to_string(),
                })?;

        match descriptor.lifetime {
            ServiceLifetime::Singleton => {
                if let Some(instance) = &descriptor.instance {
                    if let Ok(existing) = instance.clone().downcast::<T>() {
                        return Ok(existing);
                    }
                }

                let instance = (descriptor.factory)(self)?;
                let instance = instance.downcast::<T>().map_err(|_| DiError::TypeMismatch {
                    message: "service type mismatch during downcast".to_string(),
                })?;
                descriptor.instance = Some(instance.clone());
                Ok(instance)
            }
            ServiceLifetime::Transient => {
                let instance = (descriptor.factory)(self)?;
                instance.downcast::<T>().map_err(|_| DiError::TypeMismatch {
                    message: "service type mismatch during downcast".to_string(),
                })
            }
        }
    }

    /// Check if a service is registered
    pub fn is_registered<T>(&self) -> bool
    where
        T: Send + Sync + 'static,
    {
        let services = self.services.read().unwrap();
        services.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered services
    pub fn service_count(&self) -> usize {
        self.services.read().unwrap().len()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for configuring a container
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Register a singleton service
    pub fn register<F, T>(self, factory: F) -> DiResult<Self>
    where
        F: Fn(&Container) -> DiResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.container.register(factory)?;
        Ok(self)
    }

    /// Register a transient service
    pub fn register_transient<F, T>(self, factory: F) -> DiResult<Self>
    where
        F: Fn(&Container) -> DiResult<Arc<T>> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.container.register_transient(factory)?;
        Ok(self)
    }

    /// Build the container
    pub fn build(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
