//! Bearer-token sessions

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;
use uuid::Uuid;
use virantis_common::User;

use crate::handlers::{ApiError, AppState};

/// Signed-in users keyed by token
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, User>,
}

impl SessionRegistry {
    pub fn create(&mut self, user: User) -> Uuid {
        let token = Uuid::new_v4();
        debug!("Created session for {}", user.email);
        self.sessions.insert(token, user);
        token
    }

    pub fn get(&self, token: &Uuid) -> Option<&User> {
        self.sessions.get(token)
    }

    pub fn remove(&mut self, token: &Uuid) -> Option<User> {
        self.sessions.remove(token)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub user: User,
}

fn bearer_token(parts: &Parts) -> Option<Uuid> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::unauthorized)?;

        let sessions = state.sessions.lock().await;
        let user = sessions
            .get(&token)
            .cloned()
            .ok_or_else(ApiError::unauthorized)?;

        Ok(Session { token, user })
    }
}
