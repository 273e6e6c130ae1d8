pub use super::activities::Entity as Activities;
pub use super::items::Entity as Items;
pub use super::users::Entity as Users;
