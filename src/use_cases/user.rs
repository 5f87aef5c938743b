use log::info;

use crate::auth::AuthClient;
use crate::models::user::User;
use crate::repositories::UserRepository;
use crate::session::SessionStore;
use crate::use_cases::UseCaseError;

/// Profile of whoever the stored id token belongs to.
pub struct GetUser<'a> {
    users: &'a UserRepository,
    session: &'a SessionStore,
}

impl<'a> GetUser<'a> {
    pub fn new(users: &'a UserRepository, session: &'a SessionStore) -> Self {
        GetUser { users, session }
    }

    pub fn execute(&self) -> Result<User, UseCaseError> {
        let id = self.session.current_user_id()?;
        Ok(self.users.get_user(&id)?)
    }
}

pub struct RegisterUser<'a> {
    users: &'a UserRepository,
}

impl<'a> RegisterUser<'a> {
    pub fn new(users: &'a UserRepository) -> Self {
        RegisterUser { users }
    }

    pub fn execute(&self, user: &User) -> Result<(), UseCaseError> {
        Ok(self.users.register_user(&user.to_user_dto())?)
    }
}

pub struct UpdateUser<'a> {
    users: &'a UserRepository,
}

impl<'a> UpdateUser<'a> {
    pub fn new(users: &'a UserRepository) -> Self {
        UpdateUser { users }
    }

    pub fn execute(&self, user: &User) -> Result<User, UseCaseError> {
        self.users
            .update_user(&user.to_put_user_dto())
            .map_err(UseCaseError::UpdateUser)
    }
}

/// Password sign-in; only members with the `User` role get a session.
pub struct Login<'a> {
    auth: &'a AuthClient,
    session: &'a SessionStore,
}

impl<'a> Login<'a> {
    pub fn new(auth: &'a AuthClient, session: &'a SessionStore) -> Self {
        Login { auth, session }
    }

    pub fn execute(&self, email: &str, password: &str) -> Result<(), UseCaseError> {
        let session = self.auth.login(email.trim(), password)?;
        self.session.save(&session)?;
        info!("Signed in as {}", session.subject().unwrap_or_default());
        Ok(())
    }
}

/// Forget the signed-in member: cached profile and stored credentials.
pub struct Logout<'a> {
    users: &'a UserRepository,
    session: &'a SessionStore,
}

impl<'a> Logout<'a> {
    pub fn new(users: &'a UserRepository, session: &'a SessionStore) -> Self {
        Logout { users, session }
    }

    /// No-op without a user.
    pub fn execute(&self, user: Option<&User>) -> Result<(), UseCaseError> {
        let Some(user) = user else {
            return Ok(());
        };
        self.users.delete_user(user)?;
        self.session.clear()?;
        info!("Signed out");
        Ok(())
    }
}
