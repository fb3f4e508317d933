use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-requests the snapshot on a fixed interval.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, period: Duration) -> Self {
        Self { network_requests, period }
    }

    pub async fn run(self) {
        let mut ticker = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if self.network_requests.send(NetworkRequest::LoadSnapshot).await.is_err() {
                break;
            }
        }
    }
}
