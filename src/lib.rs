#[macro_use]
extern crate serde;
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate nanoid;
#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate serde_json;

#[cfg(feature = "schemas")]
#[macro_use]
extern crate schemars;
#[cfg(feature = "database-mongodb")]
#[macro_use]
extern crate bson;

mod result;
pub use result::*;

pub mod config;
pub mod database;
pub mod events;
pub mod hooks;
pub mod r#impl;
pub mod models;
pub mod util;

#[cfg(any(test, feature = "test"))]
pub mod test;

pub use config::Config;
pub use database::{Database, Migration};
pub use events::InvitifierEvent;

use async_std::channel::Sender;

/// Invitifier state
#[derive(Default, Clone)]
pub struct Invitifier {
    pub config: Config,
    pub database: Database,
    pub event_channel: Option<Sender<InvitifierEvent>>,
}

impl Invitifier {
    pub async fn publish_event(&self, event: InvitifierEvent) {
        if let Some(sender) = &self.event_channel {
            if let Err(err) = sender.send(event).await {
                error!("Failed to publish an Invitifier event: {:?}", err);
            }
        }
    }
}
