use crate::{models::User, Invitifier, Result};

impl User {
    /// Create and persist a new user
    ///
    /// Stands in for the host framework's account creation step; the gate
    /// itself never creates users.
    pub async fn new(invitifier: &Invitifier, email: String, name: String) -> Result<User> {
        let user = User {
            id: ulid::Ulid::new().to_string(),
            email,
            name,
            avatar: None,
            invitation: None,
        };

        invitifier.database.save_user(&user).await?;

        Ok(user)
    }
}
