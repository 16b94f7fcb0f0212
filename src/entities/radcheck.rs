use sea_orm::entity::prelude::*;

/// Check attributes consulted by the RADIUS server when a principal
/// authenticates. One row per (username, attribute); the password row
/// carries `attribute = "Cleartext-Password"` and `op = ":="`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "radcheck")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub username: String,

    pub attribute: String,

    pub op: String,

    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
