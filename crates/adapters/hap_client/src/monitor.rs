//! Polling monitor.
//!
//! Homebridge's insecure HTTP API has no push channel, so changes are
//! detected by polling `GET /accessories` and diffing characteristic values.
//! Each poll that finds changes yields one batch.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;

use garage_bridge_app::ports::RemoteRegistry;
use garage_bridge_app::ports::remote::ServiceUpdates;
use garage_bridge_domain::remote::RemoteService;

use crate::HapClient;

type ServiceKey = (u64, u64);

fn index(services: Vec<RemoteService>) -> HashMap<ServiceKey, RemoteService> {
    services
        .into_iter()
        .map(|service| ((service.aid, service.iid), service))
        .collect()
}

/// Services of `current` that are new or whose characteristic values differ
/// from `known`, in hub order.
pub(crate) fn changed_services(
    known: &HashMap<ServiceKey, RemoteService>,
    current: &[RemoteService],
) -> ServiceUpdates {
    current
        .iter()
        .filter(|service| {
            known.get(&(service.aid, service.iid)).is_none_or(|previous| {
                previous.characteristics.len() != service.characteristics.len()
                    || previous
                        .characteristics
                        .iter()
                        .zip(&service.characteristics)
                        .any(|(before, after)| before.iid != after.iid || before.value != after.value)
            })
        })
        .cloned()
        .collect()
}

/// Poll the hub every `interval` until the receiver is dropped.
pub(crate) async fn run(
    client: HapClient,
    interval: Duration,
    baseline: Vec<RemoteService>,
    tx: mpsc::Sender<ServiceUpdates>,
) {
    let mut known = index(baseline);

    loop {
        tokio::time::sleep(interval).await;
        if tx.is_closed() {
            break;
        }

        let services = match client.list_services().await {
            Ok(services) => services,
            Err(err) => {
                tracing::warn!(%err, "HAP poll failed, retrying on next tick");
                continue;
            }
        };

        let changed = changed_services(&known, &services);
        known = index(services);
        if changed.is_empty() {
            continue;
        }

        tracing::debug!(count = changed.len(), "HAP services changed");
        if tx.send(changed).await.is_err() {
            break;
        }
    }

    tracing::debug!("HAP monitor stopped");
}
