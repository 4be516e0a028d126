use database::services::allocation::SlotAllocator;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub allocator: Arc<SlotAllocator>,
    admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(allocator: SlotAllocator, admin_token: Option<String>) -> Self {
        Self {
            db: allocator.db().clone(),
            allocator: Arc::new(allocator),
            admin_token: admin_token.map(Arc::from),
        }
    }

    /// Whether `token` matches the configured admin token
    pub fn is_admin(&self, token: Option<&str>) -> bool {
        matches!((&self.admin_token, token), (Some(expected), Some(given)) if &**expected == given)
    }
}
