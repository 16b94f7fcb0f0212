use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};

use crate::entities::{prelude::*, radcheck, radreply, radusergroup};

/// Attribute kinds that mark a radcheck row as a password credential.
/// Listing and the delete lookup are restricted to these.
pub const PASSWORD_ATTRIBUTES: [&str; 2] = ["Cleartext-Password", "User-Password"];

/// Operator used for check attributes written by the console.
const CHECK_OP: &str = ":=";

/// One row of the user listing: credential joined against group membership.
/// `groupname` is `None` for users with no radusergroup row.
#[derive(Debug, Clone, FromQueryResult)]
pub struct UserRow {
    pub username: String,
    pub attribute: String,
    pub value: String,
    pub groupname: Option<String>,
    pub priority: Option<i32>,
}

/// Outcome of an insert attempt, distinguishing the store-level uniqueness
/// fallback from other database errors.
#[derive(Debug)]
pub enum InsertOutcome {
    Created,
    DuplicateUsername,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Exact-match existence check, any attribute kind.
    pub async fn exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = Radcheck::find()
            .filter(radcheck::Column::Username.eq(username))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Inserts the credential row and the group membership row in one
    /// transaction. A uniqueness violation on radcheck is reported as
    /// `DuplicateUsername` rather than an error: the pre-insert existence
    /// check races with concurrent creates and the index is the arbiter.
    pub async fn insert_user(
        &self,
        username: &str,
        password: &str,
        groupname: &str,
    ) -> Result<InsertOutcome, DbErr> {
        let txn = self.conn.begin().await?;

        let credential = radcheck::ActiveModel {
            username: Set(username.to_string()),
            attribute: Set("Cleartext-Password".to_string()),
            op: Set(CHECK_OP.to_string()),
            value: Set(password.to_string()),
            ..Default::default()
        };

        if let Err(err) = Radcheck::insert(credential).exec(&txn).await {
            txn.rollback().await?;
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return Ok(InsertOutcome::DuplicateUsername);
            }
            return Err(err);
        }

        let membership = radusergroup::ActiveModel {
            username: Set(username.to_string()),
            groupname: Set(groupname.to_string()),
            priority: Set(1),
            ..Default::default()
        };
        Radusergroup::insert(membership).exec(&txn).await?;

        txn.commit().await?;
        Ok(InsertOutcome::Created)
    }

    /// Removes the user from all three tables in one transaction and
    /// returns the number of radcheck rows deleted.
    pub async fn delete_user(&self, username: &str) -> Result<u64, DbErr> {
        let txn = self.conn.begin().await?;

        Radusergroup::delete_many()
            .filter(radusergroup::Column::Username.eq(username))
            .exec(&txn)
            .await?;

        let credentials = Radcheck::delete_many()
            .filter(radcheck::Column::Username.eq(username))
            .exec(&txn)
            .await?;

        Radreply::delete_many()
            .filter(radreply::Column::Username.eq(username))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(credentials.rows_affected)
    }

    /// Password-kind credentials left-joined with group membership,
    /// ordered by username ascending.
    pub async fn list(&self) -> Result<Vec<UserRow>, DbErr> {
        Self::list_query().into_model().all(&self.conn).await
    }

    /// Paged variant of [`Self::list`]. Pages are 1-based; returns the rows
    /// of the requested page and the total page count.
    pub async fn list_page(&self, page: u64, page_size: u64) -> Result<(Vec<UserRow>, u64), DbErr> {
        let paginator = Self::list_query()
            .into_model::<UserRow>()
            .paginate(&self.conn, page_size);

        let total_pages = paginator.num_pages().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((rows, total_pages))
    }

    fn list_query() -> sea_orm::Select<Radcheck> {
        Radcheck::find()
            .select_only()
            .column(radcheck::Column::Username)
            .column(radcheck::Column::Attribute)
            .column(radcheck::Column::Value)
            .column(radusergroup::Column::Groupname)
            .column(radusergroup::Column::Priority)
            .join(
                JoinType::LeftJoin,
                radcheck::Entity::belongs_to(radusergroup::Entity)
                    .from(radcheck::Column::Username)
                    .to(radusergroup::Column::Username)
                    .into(),
            )
            .filter(radcheck::Column::Attribute.is_in(PASSWORD_ATTRIBUTES))
            .order_by_asc(radcheck::Column::Username)
    }
}
