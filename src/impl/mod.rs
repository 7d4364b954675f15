mod invitation;
mod user;
