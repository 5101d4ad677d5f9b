//! The authenticated user, persisted in the local store and mirrored in memory.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{LoginRequest, RegisterRequest, User, UserRole};
use crate::storage::LocalStore;

pub struct Session {
    client: ApiClient,
    user: Option<User>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self { client, user: None }
    }

    /// Open the on-disk store named by `config` and build a client over it.
    pub fn open(config: &Config) -> Result<Self> {
        let store = Arc::new(LocalStore::open(&config.store_path())?);
        Ok(Self::new(ApiClient::new(config, store)?))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &LocalStore {
        self.client.store()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Rebuild the in-memory user from a stored session.
    ///
    /// Only trusted after the backend confirms the token; any failure wipes
    /// the stored session. Returns whether a user is now logged in.
    pub fn restore(&mut self) -> Result<bool> {
        let store = self.client.store();
        if store.token()?.is_none() || store.user()?.is_none() {
            self.user = None;
            return Ok(false);
        }

        match self.client.current_user() {
            Ok(user) => {
                tracing::debug!(email = %user.email, "session restored");
                self.user = Some(user);
                Ok(true)
            }
            Err(err) => {
                tracing::info!(error = %err, "stored session rejected");
                self.client.store().clear_session()?;
                self.user = None;
                Ok(false)
            }
        }
    }

    pub fn login(&mut self, credentials: &LoginRequest) -> Result<&User> {
        let response = self
            .client
            .login(credentials)
            .map_err(ClientError::into_credential_failure)?;
        let user = response.user();

        self.client.store().save_session(&response.token, &user)?;
        tracing::info!(email = %user.email, role = user.role.name(), "logged in");

        Ok(&*self.user.insert(user))
    }

    pub fn register(&self, data: &RegisterRequest) -> Result<()> {
        self.client
            .register(data)
            .map_err(ClientError::into_credential_failure)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.client.store().clear_session()?;
        self.user = None;
        Ok(())
    }

    /// Drop the in-memory user after the client reported a 401; the store
    /// has already been cleared by then.
    pub fn expire(&mut self) {
        self.user = None;
    }

    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        self.user
            .as_ref()
            .map(|user| roles.contains(&user.role))
            .unwrap_or(false)
    }

    pub fn can_approve(&self) -> bool {
        self.has_role(&[UserRole::Manager, UserRole::Admin])
    }

    /// Comments are written by reviewers only.
    pub fn can_comment(&self) -> bool {
        self.can_approve()
    }
}
