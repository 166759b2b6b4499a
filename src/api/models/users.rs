use serde::{Deserialize, Serialize};

// User management API models

/// Create user request. Fields are optional at the serde level so the
/// handler can report every missing one by name in a single error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

impl CreateUserRequest {
    /// Names of required fields the request did not supply
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.email.is_none() {
            missing.push("email");
        }
        if self.age.is_none() {
            missing.push("age");
        }
        missing
    }
}

/// Update user request; any subset of fields
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

/// Response for DELETE /users/{id}
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub message: String,
}
