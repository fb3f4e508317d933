use crate::state::messages::{NetworkRequest, NetworkResponse};
use bracket_engine::client::{ClientError, SnapshotClient};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: SnapshotClient,
    source: Option<String>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        source: Option<String>,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: SnapshotClient::new(),
            source,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadSnapshot => self.handle_load_snapshot().await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_snapshot(&self) -> Result<NetworkResponse, String> {
        let Some(source) = self.source.as_deref() else {
            return Err("No snapshot source. Pass a file or URL, or set KNOCKOUT_SOURCE.".into());
        };
        debug!("loading snapshot from {source}");
        let snapshot = self
            .client
            .fetch(source)
            .await
            .map_err(|e: ClientError| e.to_string())?;
        debug!("loaded {} matches for {}", snapshot.matches.len(), snapshot.title);
        Ok(NetworkResponse::SnapshotLoaded { snapshot })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_source_reports_an_error() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        let worker = NetworkWorker::new(None, req_rx, resp_tx);
        let task = tokio::spawn(worker.run());

        req_tx.send(NetworkRequest::LoadSnapshot).await.unwrap();
        let message = loop {
            match resp_rx.recv().await.unwrap() {
                NetworkResponse::Error { message } => break message,
                NetworkResponse::LoadingStateChanged { .. } => continue,
                NetworkResponse::SnapshotLoaded { .. } => panic!("nothing to load"),
            }
        };
        assert!(message.contains("KNOCKOUT_SOURCE"), "{message}");
        task.abort();
    }
}
