//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it runs on a `DatabaseConnection` or on a
//! transaction handle.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::contract::model::{ConsultantClientLink, LinkedClient, User, UserId};
use crate::domain::filter::{fold_case, UserPredicate};
use crate::domain::repo::{NewUserRecord, UsersRepository};
use crate::infra::storage::entity::{consultant_client, user};
use crate::infra::storage::mapper::{entity_to_contract, link_to_contract};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Escapes LIKE wildcards so user input matches literally (escape char `\`).
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `users.<folded col> LIKE '%needle%'`; `needle` is already folded.
///
/// SQL `LOWER()` only folds ASCII on SQLite, so the folded copy is written by
/// `insert`/`update` instead.
fn contains_ci(col: user::Column, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(needle));
    Expr::col((user::Entity, col)).like(LikeExpr::new(pattern).escape('\\'))
}

/// Translates the domain predicate into a SeaORM condition (all parts AND-ed).
pub fn predicate_to_condition(predicate: &UserPredicate) -> Condition {
    Condition::all()
        .add_option(
            predicate
                .user_type
                .map(|t| user::Column::UserType.eq(t.as_str())),
        )
        .add_option(
            predicate
                .name_contains
                .as_deref()
                .map(|n| contains_ci(user::Column::NameFolded, n)),
        )
        .add_option(
            predicate
                .email_contains
                .as_deref()
                .map(|e| contains_ci(user::Column::EmailFolded, e)),
        )
        .add_option(predicate.created_from.map(|from| user::Column::CreatedAt.gte(from)))
        .add_option(predicate.created_to.map(|to| user::Column::CreatedAt.lte(to)))
}

fn rows_to_users(rows: Vec<user::Model>) -> anyhow::Result<Vec<User>> {
    rows.into_iter().map(entity_to_contract).collect()
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        found.map(entity_to_contract).transpose()
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        let rows = user::Entity::find()
            .order_by_desc(user::Column::Id)
            .all(&self.conn)
            .await
            .context("list_all failed")?;
        rows_to_users(rows)
    }

    async fn find_users(&self, predicate: &UserPredicate) -> anyhow::Result<Vec<User>> {
        let rows = user::Entity::find()
            .filter(predicate_to_condition(predicate))
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(&self.conn)
            .await
            .context("find_users failed")?;
        rows_to_users(rows)
    }

    async fn clients_of(
        &self,
        consultant_ids: &[UserId],
    ) -> anyhow::Result<Vec<(UserId, LinkedClient)>> {
        let rows = consultant_client::Entity::find()
            .filter(consultant_client::Column::ConsultantId.is_in(consultant_ids.iter().copied()))
            .find_also_related(user::Entity)
            .order_by_asc(consultant_client::Column::CreatedAt)
            .order_by_asc(consultant_client::Column::Id)
            .all(&self.conn)
            .await
            .context("clients_of failed")?;

        rows.into_iter()
            .filter_map(|(link, client)| client.map(|c| (link, c)))
            .map(|(link, client)| {
                Ok((
                    link.consultant_id,
                    LinkedClient {
                        client: entity_to_contract(client)?,
                        linked_at: link.created_at,
                    },
                ))
            })
            .collect()
    }

    async fn insert(&self, record: NewUserRecord) -> anyhow::Result<User> {
        let NewUserRecord {
            user: u,
            user_type,
            created_at,
        } = record;
        let m = user::ActiveModel {
            id: NotSet,
            name_folded: Set(fold_case(&u.name)),
            email_folded: Set(fold_case(&u.email)),
            name: Set(u.name),
            email: Set(u.email),
            user_type: Set(user_type.as_str().to_owned()),
            phone: Set(u.phone),
            age: Set(u.age),
            cpf: Set(u.cpf),
            zip_code: Set(u.zip_code),
            state: Set(u.state),
            address: Set(u.address),
            complement: Set(u.complement),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };
        let inserted = m.insert(&self.conn).await.context("insert failed")?;
        entity_to_contract(inserted)
    }

    async fn update(&self, u: User) -> anyhow::Result<()> {
        // Only the editable columns are written.
        let m = user::ActiveModel {
            id: Set(u.id),
            name_folded: Set(fold_case(&u.name)),
            email_folded: Set(fold_case(&u.email)),
            name: Set(u.name),
            email: Set(u.email),
            updated_at: Set(u.updated_at),
            ..Default::default()
        };
        let _ = m.update(&self.conn).await.context("update failed")?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> anyhow::Result<bool> {
        let res = user::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn insert_link(
        &self,
        consultant_id: UserId,
        client_id: UserId,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<ConsultantClientLink> {
        let m = consultant_client::ActiveModel {
            id: NotSet,
            consultant_id: Set(consultant_id),
            client_id: Set(client_id),
            created_at: Set(created_at),
        };
        let inserted = m.insert(&self.conn).await.context("insert_link failed")?;
        Ok(link_to_contract(inserted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    use crate::contract::model::{ConsultantFilter, UserType};
    use crate::domain::filter::build_predicate;

    fn sql_for(predicate: &UserPredicate) -> String {
        user::Entity::find()
            .filter(predicate_to_condition(predicate))
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn consultant_only_condition_has_no_date_bounds() {
        let sql = sql_for(&UserPredicate::all_consultants());
        assert!(sql.contains(r#""user_type" = 'CONSULTANT'"#), "{sql}");
        assert!(!sql.contains("created_at\" >="), "{sql}");
        assert!(!sql.contains("LIKE"), "{sql}");
    }

    #[test]
    fn text_filters_use_folded_columns() {
        let predicate = build_predicate(&ConsultantFilter {
            name: Some("Jo".into()),
            ..Default::default()
        });
        let sql = sql_for(&predicate);
        assert!(sql.contains(r#""users"."name_folded" LIKE '%jo%'"#), "{sql}");
        assert!(!sql.contains("LOWER("), "{sql}");
        assert_eq!(predicate.user_type, Some(UserType::Consultant));
    }
}
