//! Workout sessions and the registry that keeps one per athlete and camera

use crate::core::bicep_curl::BicepCurlCounter;
use crate::core::config::SessionConfig;
use crate::core::pushup::PushupCounter;
use crate::core::rep_counter::RepCounter;
use crate::core::squat::SquatCounter;
use crate::models::error::{AnalysisError, AnalysisResult};
use crate::models::exercise::{Exercise, ExerciseState};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Session used by callers that do not track their own
pub const DEFAULT_SESSION_ID: &str = "default";

// ==============================================================================
// Session Types
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    pub frames_analyzed: u64,
    pub frames_without_pose: u64,
    pub frames_failed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub exercises: Vec<ExerciseState>,
    pub total_reps: u32,
    pub stats: FrameStats,
}

/// Rep counters for one athlete in front of one camera
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    id: String,
    started_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    squat: SquatCounter,
    pushup: PushupCounter,
    bicep_curl: BicepCurlCounter,
    stats: FrameStats,
}

impl WorkoutSession {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            started_at: now,
            last_activity: now,
            squat: SquatCounter::new(),
            pushup: PushupCounter::new(),
            bicep_curl: BicepCurlCounter::new(),
            stats: FrameStats::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn counter(&self, exercise: Exercise) -> &dyn RepCounter {
        match exercise {
            Exercise::Squat => &self.squat,
            Exercise::Pushup => &self.pushup,
            Exercise::BicepCurl => &self.bicep_curl,
        }
    }

    pub fn counter_mut(&mut self, exercise: Exercise) -> &mut dyn RepCounter {
        match exercise {
            Exercise::Squat => &mut self.squat,
            Exercise::Pushup => &mut self.pushup,
            Exercise::BicepCurl => &mut self.bicep_curl,
        }
    }

    pub fn count(&self, exercise: Exercise) -> u32 {
        self.counter(exercise).count()
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Record the outcome of one frame for statistics and idle tracking
    pub fn record_frame<T>(&mut self, result: &AnalysisResult<T>) {
        self.last_activity = Utc::now();
        match result {
            Ok(_) => self.stats.frames_analyzed += 1,
            Err(AnalysisError::NoPoseDetected) => self.stats.frames_without_pose += 1,
            Err(_) => self.stats.frames_failed += 1,
        }
    }

    /// Zero every counter while keeping the session identity
    pub fn reset(&mut self) {
        for exercise in Exercise::ALL {
            self.counter_mut(exercise).reset();
        }
        self.stats = FrameStats::default();
        self.last_activity = Utc::now();
    }

    pub fn summary(&self) -> SessionSummary {
        let exercises: Vec<ExerciseState> = Exercise::ALL
            .iter()
            .map(|&exercise| self.counter(exercise).state())
            .collect();
        let total_reps = exercises.iter().map(ExerciseState::count).sum();

        SessionSummary {
            id: self.id.clone(),
            started_at: self.started_at,
            last_activity: self.last_activity,
            exercises,
            total_reps,
            stats: self.stats.clone(),
        }
    }
}

// ==============================================================================
// Session Manager
// ==============================================================================

pub type SharedSession = Arc<Mutex<WorkoutSession>>;

/// Registry of live workout sessions keyed by session id
///
/// Each session sits behind its own mutex so frames for the same session are
/// applied one at a time while different sessions proceed independently.
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SharedSession>>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start a new session with a generated id
    pub async fn create_session(&self) -> AnalysisResult<String> {
        let id = Uuid::new_v4().to_string();
        self.insert(id.clone()).await?;
        tracing::info!(session_id = %id, "Started workout session");
        Ok(id)
    }

    /// Fetch a session, creating it on first use
    ///
    /// `None` maps to the shared default session.
    pub async fn get_or_create(&self, id: Option<&str>) -> AnalysisResult<(String, SharedSession)> {
        let id = Self::resolve_id(id);

        if let Some(session) = self.touch(&id).await {
            return Ok((id, session));
        }

        let session = self.insert(id.clone()).await?;
        tracing::info!(session_id = %id, "Started workout session");
        Ok((id, session))
    }

    /// Session id a request maps to; blank and missing ids share the default session
    pub fn resolve_id(id: Option<&str>) -> String {
        id.map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID)
            .to_string()
    }

    pub async fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Fetch a session and mark it active
    ///
    /// The registry read lock is held until the session is touched, so the
    /// idle pruner cannot drop a session a caller is about to use.
    pub async fn touch(&self, id: &str) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(id)?.clone();
        session.lock().await.touch();
        Some(session)
    }

    async fn insert(&self, id: String) -> AnalysisResult<SharedSession> {
        let mut sessions = self.sessions.write().await;

        // Another caller may have created it while we waited for the lock
        if let Some(existing) = sessions.get(&id) {
            existing.lock().await.touch();
            return Ok(existing.clone());
        }

        if sessions.len() >= self.config.max_sessions {
            let cutoff = Utc::now() - self.idle_timeout();
            Self::remove_idle(&mut sessions, cutoff);
            if sessions.len() >= self.config.max_sessions {
                return Err(AnalysisError::SessionLimit(self.config.max_sessions));
            }
        }

        let session = Arc::new(Mutex::new(WorkoutSession::new(id.clone())));
        sessions.insert(id, session.clone());
        Ok(session)
    }

    /// End a session and return its final summary
    pub async fn end_session(&self, id: &str) -> Option<SessionSummary> {
        let session = self.sessions.write().await.remove(id)?;
        let summary = session.lock().await.summary();
        tracing::info!(
            session_id = %id,
            total_reps = summary.total_reps,
            "Ended workout session"
        );
        Some(summary)
    }

    pub async fn reset_session(&self, id: &str) -> AnalysisResult<SessionSummary> {
        let session = self
            .get(id)
            .await
            .ok_or_else(|| AnalysisError::SessionNotFound(id.to_string()))?;
        let mut session = session.lock().await;
        session.reset();
        tracing::info!(session_id = %id, "Reset workout session");
        Ok(session.summary())
    }

    pub async fn summary(&self, id: &str) -> Option<SessionSummary> {
        let session = self.get(id).await?;
        let summary = session.lock().await.summary();
        Some(summary)
    }

    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        let sessions: Vec<SharedSession> = self.sessions.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(sessions.len());
        for session in sessions {
            summaries.push(session.lock().await.summary());
        }
        summaries.sort_by(|a, b| a.started_at.cmp(&b.started_at).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    /// Drop sessions with no frames since `now - idle_timeout`
    pub async fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.idle_timeout();
        let mut sessions = self.sessions.write().await;
        let removed = Self::remove_idle(&mut sessions, cutoff);
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Pruned idle sessions");
        }
        removed
    }

    fn remove_idle(sessions: &mut HashMap<String, SharedSession>, cutoff: DateTime<Utc>) -> usize {
        let mut idle = Vec::new();
        for (id, session) in sessions.iter() {
            // Sessions busy with a frame are not idle
            if let Ok(session) = session.try_lock() {
                if session.last_activity() < cutoff {
                    idle.push(id.clone());
                }
            }
        }

        for id in &idle {
            sessions.remove(id);
        }
        idle.len()
    }

    fn idle_timeout(&self) -> Duration {
        Duration::minutes(i64::from(self.config.idle_timeout_minutes))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
