use futures::stream::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use std::ops::Deref;

use bson::Document;

use crate::{
    models::{Invitation, User},
    Error, Result, Success,
};

use super::{definition::AbstractDatabase, Migration};

#[derive(Clone)]
pub struct MongoDb(pub mongodb::Database);

impl Deref for MongoDb {
    type Target = mongodb::Database;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl AbstractDatabase for MongoDb {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success {
        match migration {
            #[cfg(debug_assertions)]
            Migration::WipeAll => {
                // Drop the entire database
                self.drop().await.unwrap();
            }
            Migration::M2026_08_30EnsureIndexes => {
                if self
                    .collection::<Document>("invitations")
                    .list_index_names()
                    .await
                    .unwrap_or_default()
                    .contains(&"code".to_owned())
                {
                    return Ok(());
                }

                // Make sure all collections exist
                let list = self.list_collection_names().await.unwrap();
                let collections = ["invitations", "users"];

                for name in collections {
                    if !list.contains(&name.to_string()) {
                        self.create_collection(name).await.unwrap();
                    }
                }

                // Unique `code` is the backstop for code generation
                self.run_command(doc! {
                    "createIndexes": "invitations",
                    "indexes": [
                        {
                            "key": {
                                "code": 1
                            },
                            "name": "code",
                            "unique": true
                        },
                        {
                            "key": {
                                "creator_id": 1
                            },
                            "name": "creator_id"
                        }
                    ]
                })
                .await
                .unwrap();

                // One admitting invitation per user
                self.run_command(doc! {
                    "createIndexes": "users",
                    "indexes": [
                        {
                            "key": {
                                "email": 1
                            },
                            "name": "email",
                            "unique": true
                        },
                        {
                            "key": {
                                "invitation": 1
                            },
                            "name": "invitation",
                            "unique": true,
                            "sparse": true
                        }
                    ]
                })
                .await
                .unwrap();
            }
        }

        Ok(())
    }

    /// Find invitation by id
    async fn find_invitation(&self, id: &str) -> Result<Option<Invitation>> {
        self.collection("invitations")
            .find_one(doc! {
                "_id": id
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "invitation",
            })
    }

    /// Find invitation by redemption code
    async fn find_invitation_by_code(&self, code: &str) -> Result<Option<Invitation>> {
        self.collection("invitations")
            .find_one(doc! {
                "code": code
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "invitation",
            })
    }

    /// Find all invitations created by a given identity
    async fn find_invitations_by_creator(&self, creator_id: &str) -> Result<Vec<Invitation>> {
        self.collection("invitations")
            .find(doc! {
                "creator_id": creator_id
            })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find",
                with: "invitations",
            })?
            .try_collect()
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "collect",
                with: "invitations",
            })
    }

    /// Save invitation
    async fn save_invitation(&self, invitation: &Invitation) -> Success {
        self.collection::<Invitation>("invitations")
            .replace_one(
                doc! {
                    "_id": &invitation.id
                },
                invitation,
            )
            .upsert(true)
            .await
            .map(|_| ())
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "invitation",
            })
    }

    /// Delete invitation
    async fn delete_invitation(&self, id: &str) -> Success {
        self.collection::<Invitation>("invitations")
            .delete_one(doc! {
                "_id": id
            })
            .await
            .map(|_| ())
            .map_err(|_| Error::DatabaseError {
                operation: "delete_one",
                with: "invitation",
            })
    }

    /// Claim an invitation for a user, iff still unclaimed
    ///
    /// The `user_id: {$exists: false}` filter is the compare-and-set that
    /// makes the losing redemption observe `None`.
    async fn claim_invitation(
        &self,
        id: &str,
        user_id: &str,
        updated_at: iso8601_timestamp::Timestamp,
    ) -> Result<Option<Invitation>> {
        self.collection::<Invitation>("invitations")
            .find_one_and_update(
                doc! {
                    "_id": id,
                    "user_id": {
                        "$exists": false
                    }
                },
                doc! {
                    "$set": {
                        "user_id": user_id,
                        "updated_at": updated_at.format().to_string()
                    }
                },
            )
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one_and_update",
                with: "invitation",
            })
    }

    /// Find user by id
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        self.collection("users")
            .find_one(doc! {
                "_id": id
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "user",
            })
    }

    /// Find user by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.collection("users")
            .find_one(doc! {
                "email": email
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "user",
            })
    }

    /// Save user
    async fn save_user(&self, user: &User) -> Success {
        self.collection::<User>("users")
            .replace_one(
                doc! {
                    "_id": &user.id
                },
                user,
            )
            .upsert(true)
            .await
            .map(|_| ())
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "user",
            })
    }

    /// Record the admitting invitation on the user with the given email
    async fn link_user_invitation(
        &self,
        email: &str,
        invitation_id: &str,
    ) -> Result<Option<User>> {
        self.collection::<User>("users")
            .find_one_and_update(
                doc! {
                    "email": email
                },
                doc! {
                    "$set": {
                        "invitation": invitation_id
                    }
                },
            )
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one_and_update",
                with: "user",
            })
    }
}
