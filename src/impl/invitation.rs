use iso8601_timestamp::Timestamp;

use crate::{
    events::InvitifierEvent,
    models::{CreatorProfile, Invitation, InvitationWithCreator, User},
    util::generate_invite_code,
    Error, Invitifier, Result, Success,
};

/// Resolve the authenticated identity or fail
fn require_identity(identity: Option<&User>) -> Result<&User> {
    identity.ok_or(Error::Unauthorized)
}

impl Invitation {
    /// Create a new invitation on behalf of an authenticated creator
    ///
    /// Quota is checked read-then-write without cross-request locking;
    /// concurrent creation from the same creator can admit one invitation
    /// past the quota in a narrow window. Accepted approximation, see
    /// DESIGN.md.
    pub async fn create(invitifier: &Invitifier, creator: Option<&User>) -> Result<Invitation> {
        let creator = require_identity(creator)?;

        let existing = invitifier
            .database
            .find_invitations_by_creator(&creator.id)
            .await?;

        if existing.len() >= invitifier.config.max_invitations {
            return Err(Error::QuotaExceeded);
        }

        let now = Timestamp::now_utc();
        let invitation = Invitation {
            id: ulid::Ulid::new().to_string(),
            code: generate_invite_code(),
            creator_id: creator.id.clone(),
            user_id: None,
            created_at: now,
            updated_at: now,
        };

        invitifier.database.save_invitation(&invitation).await?;

        // Re-read to confirm the store actually produced a record
        let invitation = invitifier
            .database
            .find_invitation(&invitation.id)
            .await?
            .ok_or(Error::CreationFailed)?;

        invitifier
            .publish_event(InvitifierEvent::CreateInvitation {
                invitation: invitation.clone(),
            })
            .await;

        Ok(invitation)
    }

    /// Look up an invitation by code or id, enriched with its creator
    ///
    /// Codes are tried first so public invite links resolve; ids fall back
    /// for internal references. A missing creator is a data-integrity
    /// failure surfaced as `NotFound`.
    pub async fn lookup(invitifier: &Invitifier, identifier: &str) -> Result<InvitationWithCreator> {
        let invitation = match invitifier
            .database
            .find_invitation_by_code(identifier)
            .await
            .map_err(|_| Error::FetchFailed)?
        {
            Some(invitation) => invitation,
            None => invitifier
                .database
                .find_invitation(identifier)
                .await
                .map_err(|_| Error::FetchFailed)?
                .ok_or(Error::NotFound)?,
        };

        let creator = invitifier
            .database
            .find_user(&invitation.creator_id)
            .await
            .map_err(|_| Error::FetchFailed)?
            .ok_or(Error::NotFound)?;

        Ok(InvitationWithCreator {
            invitation,
            creator: CreatorProfile {
                name: creator.name,
                avatar: creator.avatar,
            },
        })
    }

    /// Fetch all invitations created by the authenticated identity
    pub async fn list_by_creator(
        invitifier: &Invitifier,
        creator: Option<&User>,
    ) -> Result<Vec<Invitation>> {
        let creator = require_identity(creator)?;

        invitifier
            .database
            .find_invitations_by_creator(&creator.id)
            .await
            .map_err(|_| Error::FetchFailed)
    }

    /// Revoke an unredeemed invitation
    ///
    /// A redeemed invitation is permanent record and can never be revoked.
    /// Creator-only authorization ships disabled upstream; callers that
    /// need it must check ownership before calling.
    pub async fn revoke(invitifier: &Invitifier, id: &str) -> Success {
        let invitation = invitifier
            .database
            .find_invitation(id)
            .await?
            .ok_or(Error::NotFound)?;

        if invitation.is_redeemed() {
            return Err(Error::AlreadyUsed);
        }

        invitifier.database.delete_invitation(id).await?;

        // Guard against a store that silently no-ops the delete
        if invitifier.database.find_invitation(id).await?.is_some() {
            return Err(Error::RevokeFailed);
        }

        invitifier
            .publish_event(InvitifierEvent::RevokeInvitation {
                invitation_id: id.to_string(),
            })
            .await;

        Ok(())
    }

    /// Reserve phase of redemption: validate a code without mutating state
    ///
    /// Runs before the host creates the account, so an invalid code blocks
    /// creation entirely.
    pub async fn reserve(invitifier: &Invitifier, code: &str) -> Result<Invitation> {
        match invitifier
            .database
            .find_invitation_by_code(code.trim())
            .await?
        {
            Some(invitation) if !invitation.is_redeemed() => Ok(invitation),
            _ => Err(Error::InvalidCode),
        }
    }

    /// Finalize phase of redemption: claim the invitation for a new identity
    ///
    /// The claim is conditioned on the stored `user_id` still being absent;
    /// when two redemptions race on the same code, the loser observes the
    /// winner's claim here and fails with `AlreadyUsed`.
    pub async fn finalize(&self, invitifier: &Invitifier, user_id: &str) -> Success {
        let claimed = invitifier
            .database
            .claim_invitation(&self.id, user_id, Timestamp::now_utc())
            .await?;

        if claimed.is_none() {
            return Err(Error::AlreadyUsed);
        }

        invitifier
            .publish_event(InvitifierEvent::RedeemInvitation {
                invitation_id: self.id.to_string(),
                user_id: user_id.to_string(),
            })
            .await;

        Ok(())
    }
}
