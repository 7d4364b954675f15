//! Registration gate: the two checkpoints straddling account creation
//!
//! Validity must be checked before the host creates the account so invalid
//! codes block creation entirely, but redemption can only be recorded after
//! the new identity exists. `before_sign_up` reserves without mutating any
//! persisted state; only `after_sign_up` writes a durable change, so an
//! in-flight registration cancelled in between needs no rollback.

mod registry;

pub use registry::{hook, registration_gate, HookContext, HookRegistry, SIGN_UP_PATH};

use crate::{models::Invitation, Error, Invitifier, Success};

/// In-flight state of one sign-up request
#[derive(Debug, Clone)]
pub struct SignUpContext {
    /// Email the host will create the account under
    pub email: String,

    /// Invite code submitted with the request, if any
    pub invite_code: Option<String>,

    /// Invitation attached by the before checkpoint
    reserved: Option<Invitation>,
}

impl SignUpContext {
    pub fn new(email: String, invite_code: Option<String>) -> SignUpContext {
        SignUpContext {
            email,
            invite_code,
            reserved: None,
        }
    }

    /// Invitation reserved for this request, if the before checkpoint ran
    pub fn reserved(&self) -> Option<&Invitation> {
        self.reserved.as_ref()
    }

    /// Whether the submitted code matches the configured bypass code
    fn is_bypassed(&self, invitifier: &Invitifier) -> bool {
        match (&invitifier.config.bypass_code, &self.invite_code) {
            (Some(bypass), Some(code)) => bypass == code,
            _ => false,
        }
    }
}

impl Invitifier {
    /// Before checkpoint: validate and reserve an invitation
    ///
    /// No persisted state is mutated here; the window between "looks valid"
    /// and "is consumed" is only as long as the host's own creation step.
    pub async fn before_sign_up(&self, context: &mut SignUpContext) -> Success {
        if context.is_bypassed(self) {
            // Operator escape hatch, no invitation consulted
            return Ok(());
        }

        match &context.invite_code {
            Some(code) if !code.trim().is_empty() => {
                let invitation = Invitation::reserve(self, code)
                    .await
                    .map_err(Error::into_process_failed)?;

                context.reserved = Some(invitation);
                Ok(())
            }
            _ => Err(Error::CodeRequired),
        }
    }

    /// After checkpoint: finalize redemption for the created identity
    ///
    /// Links the new user's invitation back-reference, then claims the
    /// invitation. A failure here leaves the already-created account in
    /// place; there is deliberately no compensation (see DESIGN.md).
    pub async fn after_sign_up(&self, context: &SignUpContext) -> Success {
        if context.is_bypassed(self) {
            return Ok(());
        }

        let invitation = context.reserved().ok_or(Error::ProcessFailed {
            cause: "no invitation was reserved for this request".to_string(),
        })?;

        let user = self
            .database
            .link_user_invitation(&context.email, &invitation.id)
            .await
            .map_err(Error::into_process_failed)?
            .ok_or(Error::UpdateUserFailed)?;

        invitation
            .finalize(self, &user.id)
            .await
            .map_err(Error::into_process_failed)
    }
}

#[cfg(test)]
mod tests {
    use crate::test::*;

    /// Drive one registration the way a host framework would
    async fn register(invitifier: &Invitifier, email: &str, code: Option<&str>) -> Result<User> {
        let mut context = SignUpContext::new(email.to_string(), code.map(str::to_string));

        invitifier.before_sign_up(&mut context).await?;

        // Host framework's own creation step
        let user = User::new(invitifier, email.to_string(), email.to_string()).await?;

        invitifier.after_sign_up(&context).await?;

        invitifier
            .database
            .find_user(&user.id)
            .await?
            .ok_or(Error::NotFound)
    }

    #[async_std::test]
    async fn it_admits_a_registration_with_a_valid_code() {
        let (invitifier, creator, _receiver) = for_test_authenticated().await;

        let invitation = Invitation::create(&invitifier, Some(&creator))
            .await
            .unwrap();

        let user = register(&invitifier, "newcomer@example.com", Some(&invitation.code))
            .await
            .expect("an admitted registration");

        assert_eq!(user.invitation, Some(invitation.id.clone()));

        let kept = Invitation::lookup(&invitifier, &invitation.id)
            .await
            .unwrap();
        assert_eq!(kept.invitation.user_id, Some(user.id));
    }

    #[async_std::test]
    async fn it_requires_a_code() {
        let (invitifier, _) = for_test().await;

        assert_eq!(
            register(&invitifier, "newcomer@example.com", None)
                .await
                .unwrap_err(),
            Error::CodeRequired
        );
        assert_eq!(
            register(&invitifier, "newcomer@example.com", Some("   "))
                .await
                .unwrap_err(),
            Error::CodeRequired
        );

        // Nothing was created
        assert_eq!(
            invitifier
                .database
                .find_user_by_email("newcomer@example.com")
                .await
                .unwrap(),
            None
        );
    }

    #[async_std::test]
    async fn it_blocks_creation_on_an_invalid_code() {
        let (invitifier, _) = for_test().await;

        assert_eq!(
            register(&invitifier, "newcomer@example.com", Some("invite-aaaaa-bbbbb"))
                .await
                .unwrap_err(),
            Error::InvalidCode
        );

        // The before checkpoint failed, so no account exists
        assert_eq!(
            invitifier
                .database
                .find_user_by_email("newcomer@example.com")
                .await
                .unwrap(),
            None
        );
    }

    #[async_std::test]
    async fn it_bypasses_gating_for_the_configured_code() {
        let (invitifier, _) = for_test_with_config(Config {
            bypass_code: Some("letmein".to_string()),
            ..Default::default()
        })
        .await;

        let user = register(&invitifier, "operator@example.com", Some("letmein"))
            .await
            .expect("a bypassed registration");

        // No invitation consulted or mutated
        assert_eq!(user.invitation, None);
        if let Database::Dummy(dummy) = &invitifier.database {
            assert!(dummy.invitations.lock().await.is_empty());
        }
    }

    #[async_std::test]
    async fn it_rejects_the_bypass_code_when_none_is_configured() {
        let (invitifier, _) = for_test().await;

        assert_eq!(
            register(&invitifier, "newcomer@example.com", Some("letmein"))
                .await
                .unwrap_err(),
            Error::InvalidCode
        );
    }

    #[async_std::test]
    async fn it_admits_exactly_one_of_two_racing_registrations() {
        let (invitifier, creator, _receiver) = for_test_authenticated().await;

        let invitation = Invitation::create(&invitifier, Some(&creator))
            .await
            .unwrap();

        // Both requests reserve before either finalizes, the worst-case
        // interleaving for the time-of-check/time-of-use gap
        let mut first = SignUpContext::new(
            "first@example.com".to_string(),
            Some(invitation.code.clone()),
        );
        let mut second = SignUpContext::new(
            "second@example.com".to_string(),
            Some(invitation.code.clone()),
        );

        invitifier.before_sign_up(&mut first).await.unwrap();
        invitifier.before_sign_up(&mut second).await.unwrap();

        let first_user = User::new(
            &invitifier,
            "first@example.com".to_string(),
            "first".to_string(),
        )
        .await
        .unwrap();
        let second_user = User::new(
            &invitifier,
            "second@example.com".to_string(),
            "second".to_string(),
        )
        .await
        .unwrap();

        let outcomes = [
            invitifier.after_sign_up(&first).await,
            invitifier.after_sign_up(&second).await,
        ];

        assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|outcome| outcome == &Err(Error::AlreadyUsed)));

        // The winner's claim stands
        let kept = Invitation::lookup(&invitifier, &invitation.id)
            .await
            .unwrap();
        assert_eq!(kept.invitation.user_id, Some(first_user.id.clone()));

        // The loser's account exists; its back-reference was written before
        // the claim was refused and is left dangling (no compensation)
        let loser = invitifier
            .database
            .find_user(&second_user.id)
            .await
            .unwrap()
            .expect("the loser's account");
        assert_eq!(loser.invitation, Some(invitation.id.clone()));
    }

    #[async_std::test]
    async fn it_admits_exactly_one_of_two_concurrent_registrations() {
        let (invitifier, creator, _receiver) = for_test_authenticated().await;

        let invitation = Invitation::create(&invitifier, Some(&creator))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for email in ["left@example.com", "right@example.com"] {
            let invitifier = invitifier.clone();
            let code = invitation.code.clone();

            handles.push(async_std::task::spawn(async move {
                register(&invitifier, email, Some(&code)).await
            }));
        }

        let mut admitted = 0;
        let mut lost = 0;
        for handle in handles {
            match handle.await {
                Ok(_) => admitted += 1,
                // Lost at finalize, or reserved after the winner finished
                Err(Error::AlreadyUsed) | Err(Error::InvalidCode) => lost += 1,
                Err(error) => panic!("unexpected outcome: {:?}", error),
            }
        }

        assert_eq!((admitted, lost), (1, 1));
    }

    #[async_std::test]
    async fn it_fails_the_after_checkpoint_when_the_user_is_missing() {
        let (invitifier, creator, _receiver) = for_test_authenticated().await;

        let invitation = Invitation::create(&invitifier, Some(&creator))
            .await
            .unwrap();

        let mut context = SignUpContext::new(
            "ghost@example.com".to_string(),
            Some(invitation.code.clone()),
        );
        invitifier.before_sign_up(&mut context).await.unwrap();

        // Host never created the account
        assert_eq!(
            invitifier.after_sign_up(&context).await.unwrap_err(),
            Error::UpdateUserFailed
        );

        // Reservation persisted nothing, so the invitation is still open
        Invitation::reserve(&invitifier, &invitation.code)
            .await
            .expect("the invitation to remain unreserved");
    }
}
