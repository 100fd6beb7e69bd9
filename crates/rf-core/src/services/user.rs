use std::sync::Arc;

use crate::error::{DuplicateExt, OptionalExt};
use crate::models::{NewUser, User, UserUpdate};
use crate::outcome::{Message, Outcome, Reply};
use crate::traits::Store;

/// Registration and profile management.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registers `nickname`. A clash on nickname or email yields every
    /// clashing user as the conflict payload.
    pub async fn create_user(&self, nickname: &str, profile: NewUser) -> Reply<User, Vec<User>> {
        let existing = self
            .store
            .find_conflicting_users(nickname, &profile.email)
            .await?;
        if !existing.is_empty() {
            log::debug!("user {nickname} clashes with {} existing users", existing.len());
            return Ok(Outcome::Conflict(existing));
        }

        let user = User {
            nickname: nickname.to_string(),
            fullname: profile.fullname,
            about: profile.about,
            email: profile.email,
        };
        if self.store.create_user(&user).await.unless_duplicate()?.is_none() {
            let existing = self.store.find_conflicting_users(nickname, &user.email).await?;
            log::debug!("user {nickname} was registered concurrently");
            return Ok(Outcome::Conflict(existing));
        }
        log::info!("created user {nickname}");
        Ok(Outcome::Created(user))
    }

    pub async fn get_profile(&self, nickname: &str) -> Reply<User> {
        match self.store.get_user(nickname).await.optional()? {
            Some(user) => Ok(Outcome::Ok(user)),
            None => Ok(Outcome::not_found(format!(
                "Can't find user with that nickname: {nickname}"
            ))),
        }
    }

    /// Applies the non-blank fields of `update`. The email may not belong to
    /// another user.
    pub async fn update_profile(&self, nickname: &str, update: UserUpdate) -> Reply<User> {
        if !update.email.trim().is_empty() {
            if let Some(owner) = self.store.get_user_by_email(&update.email).await.optional()? {
                if owner.nickname != nickname {
                    return Ok(email_taken(&owner));
                }
            }
        }

        let Some(current) = self.store.get_user(nickname).await.optional()? else {
            return Ok(Outcome::not_found(format!(
                "Can't find user by nickname: {nickname}"
            )));
        };

        let merged = update.merge_into(&current);
        if merged == current {
            return Ok(Outcome::Ok(current));
        }
        let Some(updated) = self.store.update_user(&merged).await.unless_duplicate()? else {
            let owner = self.store.get_user_by_email(&merged.email).await?;
            return Ok(email_taken(&owner));
        };
        log::info!("updated profile of {nickname}");
        Ok(Outcome::Ok(updated))
    }
}

fn email_taken(owner: &User) -> Outcome<User> {
    Outcome::Conflict(Message::new(format!(
        "This email is already registered by user: {}",
        owner.nickname
    )))
}
