pub mod activity;
pub mod item;
pub mod user;
