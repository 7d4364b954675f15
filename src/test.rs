pub use crate::{
    config::Config,
    database::{Database, DummyDb},
    hooks::{HookContext, SignUpContext},
    models::{CreatorProfile, Invitation, InvitationWithCreator, User},
    Error, Invitifier, InvitifierEvent, Result, Success,
};

use async_std::channel::{unbounded, Receiver};

pub async fn for_test_with_config(config: Config) -> (Invitifier, Receiver<InvitifierEvent>) {
    let (s, r) = unbounded();

    (
        Invitifier {
            config,
            database: Database::Dummy(DummyDb::default()),
            event_channel: Some(s),
        },
        r,
    )
}

pub async fn for_test() -> (Invitifier, Receiver<InvitifierEvent>) {
    for_test_with_config(Config::default()).await
}

pub async fn for_test_authenticated_with_config(
    config: Config,
) -> (Invitifier, User, Receiver<InvitifierEvent>) {
    let (invitifier, receiver) = for_test_with_config(config).await;

    let creator = User::new(
        &invitifier,
        "creator@example.com".into(),
        "creator".into(),
    )
    .await
    .expect("an authenticated creator");

    (invitifier, creator, receiver)
}

pub async fn for_test_authenticated() -> (Invitifier, User, Receiver<InvitifierEvent>) {
    for_test_authenticated_with_config(Config::default()).await
}
