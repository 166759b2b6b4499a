//! In-memory user records

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: u32,
}

/// Field-wise update; None leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}

/// In-memory user store shared across handlers.
///
/// Ids are assigned as `max(existing ids) + 1`, so an id is only reused once
/// no larger id remains.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All users, in insertion order
    pub async fn list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    /// Insert a new user and assign its id
    pub async fn create(&self, name: String, email: String, age: u32) -> User {
        let mut users = self.users.write().await;
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            name,
            email,
            age,
        };
        users.push(user.clone());
        user
    }

    pub async fn get(&self, id: u64) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    /// Apply a partial update; returns the updated user or None if unknown
    pub async fn update(&self, id: u64, patch: UserPatch) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == id)?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(age) = patch.age {
            user.age = age;
        }

        Some(user.clone())
    }

    /// Remove a user; returns false if the id is unknown
    pub async fn delete(&self, id: u64) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }
}
