pub mod prelude;

pub mod activities;
pub mod items;
pub mod users;
