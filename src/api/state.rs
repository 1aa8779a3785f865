//! Shared state handed to every request handler.

use std::sync::Arc;
use std::time::Duration;

use crate::core::analyzer::FrameAnalyzer;
use crate::core::config::Config;
use crate::core::session_manager::SessionManager;

/// Cheap-to-clone handle on the analyzer and the session registry.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    analyzer: FrameAnalyzer,
    sessions: SessionManager,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionManager::new(config.sessions.clone());
        Self {
            inner: Arc::new(AppStateInner {
                analyzer: FrameAnalyzer::new(config),
                sessions,
            }),
        }
    }

    pub fn analyzer(&self) -> &FrameAnalyzer {
        &self.inner.analyzer
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// Spawn the background task that drops idle sessions
    pub fn spawn_pruner(&self) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        let period = Duration::from_secs(self.sessions().config().prune_interval_seconds);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick fires immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                state.sessions().prune_idle(chrono::Utc::now()).await;
            }
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
