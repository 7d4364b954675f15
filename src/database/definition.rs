use crate::{
    models::{Invitation, User},
    Result, Success,
};

use super::Migration;

/// Store contract required by the invitation logic
///
/// No uniqueness or transactional guarantees are assumed beyond
/// per-operation atomicity; `claim_invitation` is the single conditional
/// update the redemption race depends on.
#[async_trait]
pub trait AbstractDatabase: std::marker::Sync {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success;

    /// Find invitation by id
    async fn find_invitation(&self, id: &str) -> Result<Option<Invitation>>;

    /// Find invitation by redemption code
    async fn find_invitation_by_code(&self, code: &str) -> Result<Option<Invitation>>;

    /// Find all invitations created by a given identity, used and unused
    async fn find_invitations_by_creator(&self, creator_id: &str) -> Result<Vec<Invitation>>;

    /// Save invitation
    async fn save_invitation(&self, invitation: &Invitation) -> Success;

    /// Delete invitation
    async fn delete_invitation(&self, id: &str) -> Success;

    /// Claim an invitation for a user
    ///
    /// Sets `user_id` and `updated_at` iff the stored `user_id` is still
    /// absent (compare-and-set). Returns the updated invitation, or `None`
    /// when the invitation is missing or already claimed.
    async fn claim_invitation(
        &self,
        id: &str,
        user_id: &str,
        updated_at: iso8601_timestamp::Timestamp,
    ) -> Result<Option<Invitation>>;

    /// Find user by id
    async fn find_user(&self, id: &str) -> Result<Option<User>>;

    /// Find user by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Save user
    async fn save_user(&self, user: &User) -> Success;

    /// Record the admitting invitation on the user with the given email
    ///
    /// Returns the updated user, or `None` when no such user exists.
    async fn link_user_invitation(
        &self,
        email: &str,
        invitation_id: &str,
    ) -> Result<Option<User>>;
}
