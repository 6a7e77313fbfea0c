//! Shared types for the API layer.

use std::sync::Arc;

use serde::Serialize;

use crate::core_state::CoreState;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Plain acknowledgement body, e.g. after a delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
