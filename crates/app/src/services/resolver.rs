//! Remote service resolution: one attempt, no retry.
//!
//! When a lookup fails the resolver logs what the hub *does* expose so the
//! operator can fix the configured name (or raise `initDelay` when the hub was
//! still enumerating its accessories).

use garage_bridge_domain::error::GarageError;
use garage_bridge_domain::remote::RemoteService;

use crate::ports::RemoteRegistry;

/// Why an accessory could not be wired to the remote hub.
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    /// No service with the configured name is visible on the hub.
    #[error("unable to find {role} service '{service}' on the remote hub")]
    ServiceNotFound {
        /// `"switch"` or `"sensor"`.
        role: &'static str,
        /// Configured service name.
        service: String,
    },

    /// The service exists but lacks the configured characteristic.
    #[error("unable to find characteristic '{characteristic}' on {role} service '{service}'")]
    CharacteristicNotFound {
        /// `"switch"` or `"sensor"`.
        role: &'static str,
        /// Configured service name.
        service: String,
        /// Configured characteristic name.
        characteristic: String,
    },

    /// The hub could not be queried or refused the subscription.
    #[error("remote hub unavailable")]
    Registry(#[source] GarageError),
}

/// Resolve the service called `service_name` and check that it exposes
/// `characteristic`.
///
/// Several services may share a display name (a bridge exposing a switch and
/// a contact sensor under one accessory name). The first one carrying
/// `characteristic` wins.
///
/// # Errors
///
/// Returns an [`ActivationError`] when the service or characteristic is
/// missing or the hub cannot be queried.
pub async fn resolve<R: RemoteRegistry>(
    registry: &R,
    role: &'static str,
    service_name: &str,
    characteristic: &str,
) -> Result<RemoteService, ActivationError> {
    let services = registry
        .list_services()
        .await
        .map_err(ActivationError::Registry)?;
    let mut named = services.into_iter().filter(|s| s.is_named(service_name));
    let first = named.next();
    let service = match first {
        Some(first) if first.characteristic(characteristic).is_none() => {
            Some(named.find(|s| s.characteristic(characteristic).is_some()).unwrap_or(first))
        }
        other => other,
    };

    let Some(service) = service else {
        tracing::warn!(
            role,
            service = service_name,
            "unable to find service, check its name or increase initDelay if the hub is not initialised yet"
        );
        log_available_services(registry).await;
        return Err(ActivationError::ServiceNotFound {
            role,
            service: service_name.to_string(),
        });
    };

    if service.characteristic(characteristic).is_none() {
        tracing::warn!(
            role,
            service = service_name,
            characteristic,
            "unable to find characteristic"
        );
        log_services_with_characteristic(registry, characteristic).await;
        return Err(ActivationError::CharacteristicNotFound {
            role,
            service: service_name.to_string(),
            characteristic: characteristic.to_string(),
        });
    }

    Ok(service)
}

/// Names of every service on the hub, in hub order.
pub(crate) fn service_names(services: &[RemoteService]) -> Vec<&str> {
    services.iter().map(|s| s.service_name.as_str()).collect()
}

async fn log_available_services<R: RemoteRegistry>(registry: &R) {
    match registry.list_services().await {
        Ok(services) => {
            tracing::warn!(available = ?service_names(&services), "available services");
        }
        Err(err) => tracing::warn!(%err, "unable to list remote services"),
    }
}

async fn log_services_with_characteristic<R: RemoteRegistry>(registry: &R, characteristic: &str) {
    match registry.list_services().await {
        Ok(services) => {
            let matching: Vec<&str> = services
                .iter()
                .filter(|s| s.characteristic(characteristic).is_some())
                .map(|s| s.service_name.as_str())
                .collect();
            tracing::warn!(characteristic, services = ?matching, "services exposing characteristic");
        }
        Err(err) => tracing::warn!(%err, "unable to list remote services"),
    }
}
