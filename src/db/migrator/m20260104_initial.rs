use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Radcheck)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // FreeRADIUS ships radcheck without a uniqueness constraint; we add
        // one so a concurrent duplicate insert fails inside the store instead
        // of slipping past the pre-insert existence check.
        manager
            .create_index(
                Index::create()
                    .name("idx_radcheck_username_attribute")
                    .table(Radcheck)
                    .col(crate::entities::radcheck::Column::Username)
                    .col(crate::entities::radcheck::Column::Attribute)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Radusergroup)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_radusergroup_username")
                    .table(Radusergroup)
                    .col(crate::entities::radusergroup::Column::Username)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Radreply)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Radreply).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Radusergroup).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Radcheck).to_owned())
            .await?;

        Ok(())
    }
}
