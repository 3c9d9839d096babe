//! Remote registry port: the smart-home hub that owns the real switch and
//! contact sensor.
//!
//! Implementations live in adapter crates (HAP over HTTP, virtual hub).
//! The application core only ever resolves services by name, reads their
//! characteristics from the returned snapshots, writes a characteristic, and
//! listens to batched service updates.

use std::future::Future;

use tokio::sync::mpsc;

use garage_bridge_domain::characteristic::CharacteristicValue;
use garage_bridge_domain::error::GarageError;
use garage_bridge_domain::remote::RemoteService;

/// A batch of services whose characteristic values changed.
pub type ServiceUpdates = Vec<RemoteService>;

/// Access to the services exposed by a remote hub.
pub trait RemoteRegistry: Send + Sync {
    /// Enumerate every service currently visible on the hub.
    fn list_services(&self) -> impl Future<Output = Result<Vec<RemoteService>, GarageError>> + Send;

    /// Find a service by its display name.
    ///
    /// Returns `Ok(None)` when the hub answered but no service carries that
    /// name. The default implementation scans [`list_services`](Self::list_services).
    fn service_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<RemoteService>, GarageError>> + Send {
        async move {
            let services = self.list_services().await?;
            Ok(services.into_iter().find(|service| service.is_named(name)))
        }
    }

    /// Write `value` to the characteristic of type `characteristic` on `service`.
    fn set_characteristic(
        &self,
        service: &RemoteService,
        characteristic: &str,
        value: CharacteristicValue,
    ) -> impl Future<Output = Result<(), GarageError>> + Send;

    /// Subscribe to change notifications.
    ///
    /// Every received item is one batch of updated services, delivered in
    /// the order the hub reported them.
    fn monitor(
        &self,
    ) -> impl Future<Output = Result<mpsc::Receiver<ServiceUpdates>, GarageError>> + Send;
}

impl<T: RemoteRegistry> RemoteRegistry for std::sync::Arc<T> {
    fn list_services(&self) -> impl Future<Output = Result<Vec<RemoteService>, GarageError>> + Send {
        (**self).list_services()
    }

    fn service_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<RemoteService>, GarageError>> + Send {
        (**self).service_by_name(name)
    }

    fn set_characteristic(
        &self,
        service: &RemoteService,
        characteristic: &str,
        value: CharacteristicValue,
    ) -> impl Future<Output = Result<(), GarageError>> + Send {
        (**self).set_characteristic(service, characteristic, value)
    }

    fn monitor(
        &self,
    ) -> impl Future<Output = Result<mpsc::Receiver<ServiceUpdates>, GarageError>> + Send {
        (**self).monitor()
    }
}
