use futures::future::BoxFuture;

use crate::{Invitifier, Success};

use super::SignUpContext;

/// Route key the registration gate intercepts
pub const SIGN_UP_PATH: &str = "/sign-up/email";

/// State threaded through a hook pipeline invocation
pub struct HookContext {
    /// Route being executed
    pub path: String,

    /// Sign-up request state, consumed by the registration gate
    pub sign_up: SignUpContext,
}

impl HookContext {
    pub fn sign_up(email: String, invite_code: Option<String>) -> HookContext {
        HookContext {
            path: SIGN_UP_PATH.to_string(),
            sign_up: SignUpContext::new(email, invite_code),
        }
    }
}

type Matcher = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Handler =
    Box<dyn for<'a> Fn(&'a Invitifier, &'a mut HookContext) -> BoxFuture<'a, Success> + Send + Sync>;

struct Hook {
    matcher: Matcher,
    handler: Handler,
}

/// Pin a closure to the handler signature
///
/// Closures returning boxed futures that borrow their arguments do not
/// unify with the higher-ranked `Fn` bound on their own; funnelling them
/// through this identity function gives inference the expected type.
pub fn hook<F>(f: F) -> F
where
    F: for<'a> Fn(&'a Invitifier, &'a mut HookContext) -> BoxFuture<'a, Success>,
{
    f
}

/// Ordered before/after interceptor registry keyed by route
///
/// Handlers run in registration order; the first error short-circuits the
/// phase and propagates to the caller.
#[derive(Default)]
pub struct HookRegistry {
    before: Vec<Hook>,
    after: Vec<Hook>,
}

impl HookRegistry {
    pub fn register_before<M, H>(&mut self, matcher: M, handler: H)
    where
        M: Fn(&str) -> bool + Send + Sync + 'static,
        H: for<'a> Fn(&'a Invitifier, &'a mut HookContext) -> BoxFuture<'a, Success>
            + Send
            + Sync
            + 'static,
    {
        self.before.push(Hook {
            matcher: Box::new(matcher),
            handler: Box::new(handler),
        });
    }

    pub fn register_after<M, H>(&mut self, matcher: M, handler: H)
    where
        M: Fn(&str) -> bool + Send + Sync + 'static,
        H: for<'a> Fn(&'a Invitifier, &'a mut HookContext) -> BoxFuture<'a, Success>
            + Send
            + Sync
            + 'static,
    {
        self.after.push(Hook {
            matcher: Box::new(matcher),
            handler: Box::new(handler),
        });
    }

    /// Run all matching before hooks in registration order
    pub async fn run_before(&self, invitifier: &Invitifier, context: &mut HookContext) -> Success {
        for hook in &self.before {
            if (hook.matcher)(&context.path) {
                (hook.handler)(invitifier, context).await?;
            }
        }

        Ok(())
    }

    /// Run all matching after hooks in registration order
    pub async fn run_after(&self, invitifier: &Invitifier, context: &mut HookContext) -> Success {
        for hook in &self.after {
            if (hook.matcher)(&context.path) {
                (hook.handler)(invitifier, context).await?;
            }
        }

        Ok(())
    }
}

/// Registry with the registration gate's two checkpoints pre-registered
///
/// Hosts with their own middleware chain can skip this and call
/// `before_sign_up`/`after_sign_up` directly.
pub fn registration_gate() -> HookRegistry {
    let mut registry = HookRegistry::default();

    registry.register_before(
        |path| path == SIGN_UP_PATH,
        hook(|invitifier, context| Box::pin(invitifier.before_sign_up(&mut context.sign_up))),
    );

    registry.register_after(
        |path| path == SIGN_UP_PATH,
        hook(|invitifier, context| Box::pin(invitifier.after_sign_up(&context.sign_up))),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::*;

    #[async_std::test]
    async fn it_only_runs_hooks_for_matching_routes() {
        let (invitifier, _) = for_test().await;
        let registry = registration_gate();

        let mut context = HookContext {
            path: "/sign-in/email".to_string(),
            sign_up: SignUpContext::new("someone@example.com".to_string(), None),
        };

        // No matcher fires, so the missing code is never an error
        registry
            .run_before(&invitifier, &mut context)
            .await
            .expect("an untouched request");
        registry
            .run_after(&invitifier, &mut context)
            .await
            .expect("an untouched request");
    }

    #[async_std::test]
    async fn it_short_circuits_on_the_first_error() {
        let (invitifier, _) = for_test().await;
        let mut registry = registration_gate();

        // Registered after the gate, must never run once the gate fails
        registry.register_before(
            |path| path == SIGN_UP_PATH,
            hook(|_, _| Box::pin(async { panic!("short-circuit skipped a failing hook") })),
        );

        let mut context = HookContext::sign_up("someone@example.com".to_string(), None);

        assert_eq!(
            registry
                .run_before(&invitifier, &mut context)
                .await
                .unwrap_err(),
            Error::CodeRequired
        );
    }

    #[async_std::test]
    async fn it_drives_a_full_registration_through_the_pipeline() {
        let (invitifier, creator, _receiver) = for_test_authenticated().await;
        let registry = registration_gate();

        let invitation = Invitation::create(&invitifier, Some(&creator))
            .await
            .unwrap();

        let mut context = HookContext::sign_up(
            "newcomer@example.com".to_string(),
            Some(invitation.code.clone()),
        );

        registry
            .run_before(&invitifier, &mut context)
            .await
            .expect("a reserved invitation");

        let user = User::new(
            &invitifier,
            "newcomer@example.com".to_string(),
            "newcomer".to_string(),
        )
        .await
        .unwrap();

        registry
            .run_after(&invitifier, &mut context)
            .await
            .expect("a finalized redemption");

        let kept = Invitation::lookup(&invitifier, &invitation.id)
            .await
            .unwrap();
        assert_eq!(kept.invitation.user_id, Some(user.id));
    }
}
