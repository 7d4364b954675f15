use crate::{
    models::{Invitation, User},
    Result, Success,
};

use futures::lock::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::{definition::AbstractDatabase, Migration};

#[derive(Default, Clone)]
pub struct DummyDb {
    pub invitations: Arc<Mutex<HashMap<String, Invitation>>>,
    pub users: Arc<Mutex<HashMap<String, User>>>,
}

#[async_trait]
impl AbstractDatabase for DummyDb {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success {
        info!("skip migration {:?}", migration);
        Ok(())
    }

    /// Find invitation by id
    async fn find_invitation(&self, id: &str) -> Result<Option<Invitation>> {
        let invitations = self.invitations.lock().await;
        Ok(invitations.get(id).cloned())
    }

    /// Find invitation by redemption code
    async fn find_invitation_by_code(&self, code: &str) -> Result<Option<Invitation>> {
        let invitations = self.invitations.lock().await;
        Ok(invitations
            .values()
            .find(|invitation| invitation.code == code)
            .cloned())
    }

    /// Find all invitations created by a given identity
    async fn find_invitations_by_creator(&self, creator_id: &str) -> Result<Vec<Invitation>> {
        let invitations = self.invitations.lock().await;
        let mut found: Vec<Invitation> = invitations
            .values()
            .filter(|invitation| invitation.creator_id == creator_id)
            .cloned()
            .collect();

        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    /// Save invitation
    async fn save_invitation(&self, invitation: &Invitation) -> Success {
        let mut invitations = self.invitations.lock().await;
        invitations.insert(invitation.id.to_string(), invitation.clone());
        Ok(())
    }

    /// Delete invitation
    async fn delete_invitation(&self, id: &str) -> Success {
        let mut invitations = self.invitations.lock().await;
        invitations.remove(id);
        Ok(())
    }

    /// Claim an invitation for a user, iff still unclaimed
    async fn claim_invitation(
        &self,
        id: &str,
        user_id: &str,
        updated_at: iso8601_timestamp::Timestamp,
    ) -> Result<Option<Invitation>> {
        let mut invitations = self.invitations.lock().await;
        match invitations.get_mut(id) {
            Some(invitation) if invitation.user_id.is_none() => {
                invitation.user_id = Some(user_id.to_string());
                invitation.updated_at = updated_at;
                Ok(Some(invitation.clone()))
            }
            _ => Ok(None),
        }
    }

    /// Find user by id
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.get(id).cloned())
    }

    /// Find user by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    /// Save user
    async fn save_user(&self, user: &User) -> Success {
        let mut users = self.users.lock().await;
        users.insert(user.id.to_string(), user.clone());
        Ok(())
    }

    /// Record the admitting invitation on the user with the given email
    async fn link_user_invitation(
        &self,
        email: &str,
        invitation_id: &str,
    ) -> Result<Option<User>> {
        let mut users = self.users.lock().await;
        Ok(users
            .values_mut()
            .find(|user| user.email == email)
            .map(|user| {
                user.invitation = Some(invitation_id.to_string());
                user.clone()
            }))
    }
}
