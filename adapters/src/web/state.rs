use std::sync::Arc;

use tokio::sync::Mutex as TokioMutex;

use application::ports::in_::MatchmakingService;
use application::ports::out_::RelayNotifier;

use super::websocket::WebSocketNotifier;

/// One lock guards the whole relay state; the registry, queue and match table
/// are never locked separately.
pub struct AppState {
    pub notifier: Arc<WebSocketNotifier>,
    pub matchmaking_service: Arc<TokioMutex<MatchmakingService>>,
}

impl AppState {
    pub fn new(
        notifier: Arc<WebSocketNotifier>,
        matchmaking_service: Arc<TokioMutex<MatchmakingService>>,
    ) -> Self {
        Self {
            notifier,
            matchmaking_service,
        }
    }
}

pub fn create_app_state() -> Arc<AppState> {
    let notifier = Arc::new(WebSocketNotifier::new());
    let relay_notifier: Arc<dyn RelayNotifier> = notifier.clone();
    let matchmaking_service = MatchmakingService::new(relay_notifier);

    Arc::new(AppState::new(notifier, Arc::new(TokioMutex::new(matchmaking_service))))
}
