mod invitation;
mod user;

pub use invitation::*;
pub use user::*;
