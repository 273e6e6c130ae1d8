use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

use crate::entities::prelude::*;
use crate::entities::users;
use crate::models::{Role, UserStatus};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Initial staff accounts. Passwords are placeholders meant to be changed
/// through the user directory after first login.
const SEED_USERS: &[(&str, &str, &str, Role)] = &[
    (
        "maxamed",
        "maxamed123",
        "Mudane Wasiir Maxamed Sh. Aden",
        Role::SeniorOfficial,
    ),
    (
        "abdinur",
        "abdinur123",
        "Abdinur Abdulahi Ali",
        Role::Manager,
    ),
    ("salah", "salah123", "Salah Abdi Ismail", Role::Storekeeper),
    (
        "admin",
        "admin123",
        "System Administrator",
        Role::SeniorOfficial,
    ),
];

fn hash_seed_password(password: &str) -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash seed password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Items)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Activities)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        for (username, password, name, role) in SEED_USERS {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Users)
                .columns([
                    users::Column::Username,
                    users::Column::PasswordHash,
                    users::Column::Name,
                    users::Column::Role,
                    users::Column::Status,
                ])
                .values_panic([
                    (*username).into(),
                    hash_seed_password(password).into(),
                    (*name).into(),
                    role.as_str().into(),
                    UserStatus::Active.as_str().into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activities).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
