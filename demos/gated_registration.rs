/// Run with `cargo run --example gated_registration`
use invitifier::{
    hooks::HookContext,
    models::{Invitation, User},
    Config, Invitifier,
};

#[async_std::main]
async fn main() {
    let invitifier = Invitifier {
        config: Config {
            bypass_code: Some("example-bypass".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    // An existing member mints an invitation
    let creator = User::new(
        &invitifier,
        "member@example.com".to_string(),
        "member".to_string(),
    )
    .await
    .unwrap();

    let invitation = Invitation::create(&invitifier, Some(&creator))
        .await
        .unwrap();
    println!("minted code: {}", invitation.code);

    // A newcomer registers with it, driven through the hook pipeline
    let gate = invitifier::hooks::registration_gate();
    let mut context = HookContext::sign_up(
        "newcomer@example.com".to_string(),
        Some(invitation.code.clone()),
    );

    gate.run_before(&invitifier, &mut context).await.unwrap();
    let newcomer = User::new(
        &invitifier,
        "newcomer@example.com".to_string(),
        "newcomer".to_string(),
    )
    .await
    .unwrap();
    gate.run_after(&invitifier, &mut context).await.unwrap();

    let enriched = Invitation::lookup(&invitifier, &invitation.code)
        .await
        .unwrap();
    println!(
        "{} was admitted by {} (claimed: {:?})",
        newcomer.email, enriched.creator.name, enriched.invitation.user_id
    );
}
