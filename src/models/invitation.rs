use iso8601_timestamp::Timestamp;

/// Single-use invitation admitting exactly one new identity
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct Invitation {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// Redemption code, unique for the lifetime of the system
    pub code: String,

    /// Id of the identity that created this invitation
    pub creator_id: String,

    /// Id of the identity that redeemed this invitation
    ///
    /// Absent until redemption; once set, never reassigned or cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// When the invitation was created
    pub created_at: Timestamp,

    /// When the invitation was last updated (advances on redemption)
    pub updated_at: Timestamp,
}

impl Invitation {
    /// Whether this invitation has been redeemed
    pub fn is_redeemed(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Public display fields of an invitation's creator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct CreatorProfile {
    /// Display name
    pub name: String,

    /// Avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Invitation enriched with its creator's public profile
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct InvitationWithCreator {
    #[serde(flatten)]
    pub invitation: Invitation,

    /// Creator's public display fields
    pub creator: CreatorProfile,
}
