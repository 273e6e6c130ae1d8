use sea_orm::entity::prelude::*;

/// One logged inventory movement. The `user` and `item_category` fields are
/// free text, not foreign keys; the ledger is append-only apart from status
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// dd/mm/yyyy by frontend convention, stored verbatim
    pub date: String,

    pub action: String,

    pub item_category: Option<String>,

    pub recipient: String,

    /// Display name of the acting user
    pub user: String,

    pub comment: Option<String>,

    /// One of `Pending`, `Approved`, `Rejected`
    pub status: String,

    /// RFC 3339, assigned at insert
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
