use crate::models::Invitation;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event_type")]
pub enum InvitifierEvent {
    CreateInvitation {
        invitation: Invitation,
    },
    RedeemInvitation {
        invitation_id: String,
        user_id: String,
    },
    RevokeInvitation {
        invitation_id: String,
    },
}
