//! User Service - player account lookup and creation

use quizdash_shared::{CreateUserRequest, EntityId, UserData};

use crate::application::error::ServiceError;
use crate::ports::outbound::ApiPort;

#[derive(Clone)]
pub struct UserService<A: ApiPort> {
    api: A,
}

impl<A: ApiPort> UserService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn list_users(&self) -> Result<Vec<UserData>, ServiceError> {
        let users = self.api.get("/api/users").await?;
        Ok(users)
    }

    pub async fn get_user(&self, id: &EntityId) -> Result<UserData, ServiceError> {
        let path = format!("/api/users/{}", id);
        let user = self.api.get(&path).await?;
        Ok(user)
    }

    /// Create a regular (non-admin) account
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<UserData, ServiceError> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.trim().is_empty()
        {
            return Err(ServiceError::Validation(
                super::auth_service::MSG_ALL_FIELDS_REQUIRED.into(),
            ));
        }
        let user = self.api.post("/api/users", request).await?;
        Ok(user)
    }
}
