//! PostgreSQL actor store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::model::{Actor, ActorList, ListQuery, NewActor};
use crate::service::ActorRepository;
use crate::sql::{Ordering, Page, Predicates, ACTOR_COLUMNS};

const ACTOR_FIELDS: &str = "id, first_name, last_name, role, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct ActorStore {
    pool: PgPool,
    max_page_limit: i64,
}

impl ActorStore {
    pub fn new(pool: PgPool, config: &CatalogConfig) -> Self {
        ActorStore {
            pool,
            max_page_limit: config.max_page_limit,
        }
    }
}

#[async_trait]
impl ActorRepository for ActorStore {
    async fn create(&self, actor: &NewActor) -> Result<Actor, CatalogError> {
        let created: Actor = sqlx::query_as(&format!(
            "INSERT INTO actors (first_name, last_name, role) VALUES ($1, $2, $3) RETURNING {}",
            ACTOR_FIELDS
        ))
        .bind(&actor.first_name)
        .bind(&actor.last_name)
        .bind(actor.role_or_default())
        .fetch_one(&self.pool)
        .await?;
        tracing::info!(actor_id = created.id, "actor created");
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<Actor, CatalogError> {
        sqlx::query_as::<_, Actor>(&format!("SELECT {} FROM actors WHERE id = $1", ACTOR_FIELDS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::not_found("actor", id))
    }

    async fn update(&self, id: i32, actor: &NewActor) -> Result<Actor, CatalogError> {
        let updated: Actor = sqlx::query_as(&format!(
            r#"
            UPDATE actors
            SET first_name = $1, last_name = $2, role = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            ACTOR_FIELDS
        ))
        .bind(&actor.first_name)
        .bind(&actor.last_name)
        .bind(actor.role_or_default())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CatalogError::not_found("actor", id))?;
        tracing::info!(actor_id = id, "actor updated");
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            tracing::debug!(actor_id = id, "delete of absent actor");
        } else {
            tracing::info!(actor_id = id, "actor deleted");
        }
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<ActorList, CatalogError> {
        let predicates = Predicates::compile(&query.filters, &ACTOR_COLUMNS)?;
        let ordering = Ordering::compile(&query.order_by, &ACTOR_COLUMNS)?;
        let page = Page::new(query.page, query.limit, self.max_page_limit);

        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", ACTOR_COLUMNS.table));
        predicates.push_where(&mut count);
        tracing::debug!(sql = %count.sql(), "query");
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM {}", ACTOR_FIELDS, ACTOR_COLUMNS.table));
        predicates.push_where(&mut select);
        ordering.push_order_by(&mut select);
        page.push_limit_offset(&mut select);
        tracing::debug!(sql = %select.sql(), "query");
        let actors: Vec<Actor> = select.build_query_as().fetch_all(&self.pool).await?;

        Ok(ActorList { actors, total })
    }
}
