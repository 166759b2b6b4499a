pub mod users;

pub use users::*;

use crate::auth::AuthState;
use crate::store::UserStore;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub auth: Arc<AuthState>,
}
