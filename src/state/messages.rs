use crate::state::network::LoadingState;
use bracket_engine::Snapshot;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSnapshot,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    SnapshotLoaded { snapshot: Snapshot },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
