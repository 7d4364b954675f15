/// User model, as relevant to invitation gating
///
/// Account creation itself belongs to the host; this is the slice the
/// gate needs to resolve creators and record the admitting invitation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct User {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// User's email
    pub email: String,

    /// Display name
    pub name: String,

    /// Avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Id of the invitation that admitted this user
    ///
    /// Set exactly once during redemption finalization, never overwritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation: Option<String>,
}
