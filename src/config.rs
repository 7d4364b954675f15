fn default_max_invitations() -> usize {
    3
}

/// Invitifier configuration
#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    /// Maximum number of invitations a single creator may have
    #[serde(default = "default_max_invitations")]
    pub max_invitations: usize,

    /// Code that skips invitation gating entirely when submitted
    ///
    /// Intended as an operator escape hatch; leave unset to require a
    /// real invitation for every registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass_code: Option<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_invitations: default_max_invitations(),
            bypass_code: None,
        }
    }
}
