use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User};

impl ApiClient {
    /// POST /auth/login
    pub fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        self.post("/auth/login", credentials)
    }

    /// POST /auth/register
    pub fn register(&self, data: &RegisterRequest) -> Result<()> {
        self.post_unit("/auth/register", data)
    }

    /// GET /auth/me - also serves as the token validity check
    pub fn current_user(&self) -> Result<User> {
        self.get("/auth/me")
    }
}
