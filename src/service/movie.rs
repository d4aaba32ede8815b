//! PostgreSQL movie store. Writes that touch the cast run in one transaction.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::model::{
    ListQuery, Movie, MovieList, MovieRow, MovieUpdate, NewMovie, RowsAffected, UpdateFieldRequest,
};
use crate::service::cast::{load_cast, load_casts, sync_cast, CastMode};
use crate::service::MovieRepository;
use crate::sql::{BindValue, ColumnSpec, Ordering, Page, Predicates, MOVIE_COLUMNS};

const MOVIE_FIELDS: &str = "id, title, director, year, plot, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct MovieStore {
    pool: PgPool,
    max_page_limit: i64,
}

impl MovieStore {
    pub fn new(pool: PgPool, config: &CatalogConfig) -> Self {
        MovieStore {
            pool,
            max_page_limit: config.max_page_limit,
        }
    }

    async fn insert_with_cast(conn: &mut PgConnection, movie: &NewMovie) -> Result<Movie, CatalogError> {
        let row: MovieRow = sqlx::query_as(&format!(
            "INSERT INTO movies (title, director, year, plot) VALUES ($1, $2, $3, $4) RETURNING {}",
            MOVIE_FIELDS
        ))
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(movie.year)
        .bind(&movie.plot)
        .fetch_one(&mut *conn)
        .await?;

        sync_cast(&mut *conn, row.id, &movie.cast_ids(), CastMode::Create).await?;
        let cast = load_cast(&mut *conn, row.id).await?;
        Ok(row.with_cast(cast))
    }

    async fn update_with_cast(
        conn: &mut PgConnection,
        id: i32,
        update: &MovieUpdate,
    ) -> Result<Movie, CatalogError> {
        let row: MovieRow = sqlx::query_as(&format!(
            r#"
            UPDATE movies
            SET title = $1, director = $2, year = $3, plot = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {}
            "#,
            MOVIE_FIELDS
        ))
        .bind(&update.title)
        .bind(&update.director)
        .bind(update.year)
        .bind(&update.plot)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| CatalogError::not_found("movie", id))?;

        if let Some(ids) = update.cast_ids() {
            let diff = sync_cast(&mut *conn, id, &ids, CastMode::Replace).await?;
            tracing::info!(movie_id = id, added = ?diff.added, removed = ?diff.removed, "cast replaced");
        }
        let cast = load_cast(&mut *conn, id).await?;
        Ok(row.with_cast(cast))
    }

    async fn delete_with_links(conn: &mut PgConnection, id: i32) -> Result<u64, CatalogError> {
        let links = sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        let rows = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        if rows == 0 {
            return Err(CatalogError::not_found("movie", id));
        }
        Ok(links)
    }
}

/// Logs and wraps a failure that rolled back `operation`'s transaction.
fn aborted(operation: &'static str) -> impl FnOnce(CatalogError) -> CatalogError {
    move |e| {
        tracing::warn!(operation, error = %e, "transaction rolled back");
        CatalogError::aborted(operation, e)
    }
}

#[async_trait]
impl MovieRepository for MovieStore {
    async fn create(&self, movie: &NewMovie) -> Result<Movie, CatalogError> {
        const OP: &str = "create movie";
        let mut tx = self.pool.begin().await?;
        let created = Self::insert_with_cast(&mut tx, movie).await.map_err(aborted(OP))?;
        tx.commit().await.map_err(|e| aborted(OP)(e.into()))?;
        tracing::info!(movie_id = created.id, cast = created.cast.len(), "movie created");
        Ok(created)
    }

    async fn get(&self, id: i32) -> Result<Movie, CatalogError> {
        let row = sqlx::query_as::<_, MovieRow>(&format!("SELECT {} FROM movies WHERE id = $1", MOVIE_FIELDS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::not_found("movie", id))?;
        let cast = load_cast(&self.pool, id).await?;
        Ok(row.with_cast(cast))
    }

    async fn update(&self, id: i32, update: &MovieUpdate) -> Result<Movie, CatalogError> {
        const OP: &str = "update movie";
        let mut tx = self.pool.begin().await?;
        let updated = Self::update_with_cast(&mut tx, id, update).await.map_err(aborted(OP))?;
        tx.commit().await.map_err(|e| aborted(OP)(e.into()))?;
        tracing::info!(movie_id = id, "movie updated");
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        const OP: &str = "delete movie";
        let mut tx = self.pool.begin().await?;
        let links = Self::delete_with_links(&mut tx, id).await.map_err(aborted(OP))?;
        tx.commit().await.map_err(|e| aborted(OP)(e.into()))?;
        tracing::info!(movie_id = id, links, "movie deleted");
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<MovieList, CatalogError> {
        let predicates = Predicates::compile(&query.filters, &MOVIE_COLUMNS)?;
        let ordering = Ordering::compile(&query.order_by, &MOVIE_COLUMNS)?;
        let page = Page::new(query.page, query.limit, self.max_page_limit);

        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", MOVIE_COLUMNS.table));
        predicates.push_where(&mut count);
        tracing::debug!(sql = %count.sql(), "query");
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM {}", MOVIE_FIELDS, MOVIE_COLUMNS.table));
        predicates.push_where(&mut select);
        ordering.push_order_by(&mut select);
        page.push_limit_offset(&mut select);
        tracing::debug!(sql = %select.sql(), "query");
        let rows: Vec<MovieRow> = select.build_query_as().fetch_all(&self.pool).await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut casts = load_casts(&self.pool, &ids).await?;
        let movies = rows
            .into_iter()
            .map(|row| {
                let cast = casts.remove(&row.id).unwrap_or_default();
                row.with_cast(cast)
            })
            .collect();

        Ok(MovieList { movies, count: total })
    }

    async fn update_fields(&self, req: &UpdateFieldRequest) -> Result<RowsAffected, CatalogError> {
        let mut qb = field_update_query(req)?;
        tracing::debug!(sql = %qb.sql(), "query");
        let rows_affected = qb.build().execute(&self.pool).await?.rows_affected();
        tracing::info!(rows_affected, "movie fields updated");
        Ok(RowsAffected { rows_affected })
    }
}

/// `UPDATE movies SET ... WHERE ...` for a bulk field update. Needs at least
/// one item and one filter; each column at most once.
fn field_update_query(req: &UpdateFieldRequest) -> Result<QueryBuilder<'static, Postgres>, CatalogError> {
    if req.items.is_empty() {
        return Err(CatalogError::Validation("no fields to update".into()));
    }
    let predicates = Predicates::compile(&req.filter, &MOVIE_COLUMNS)?;
    if predicates.is_empty() {
        return Err(CatalogError::Validation(
            "field update requires at least one filter".into(),
        ));
    }

    let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", MOVIE_COLUMNS.table));
    let mut assigned = HashSet::new();
    for item in &req.items {
        let spec = MOVIE_COLUMNS.resolve_writable(&item.column)?;
        if !assigned.insert(spec.column) {
            return Err(CatalogError::Validation(format!(
                "column '{}' assigned more than once",
                spec.key
            )));
        }
        let value = BindValue::from_json(spec, &item.value)?;
        check_assignment(spec, &value)?;
        qb.push(spec.column);
        qb.push(" = ");
        value.push_bind(&mut qb);
        qb.push(", ");
    }
    qb.push("updated_at = NOW()");
    predicates.push_where(&mut qb);
    Ok(qb)
}

/// Same bounds a full create or update enforces on the scalar columns.
fn check_assignment(spec: &ColumnSpec, value: &BindValue) -> Result<(), CatalogError> {
    match (spec.column, value) {
        ("title" | "director", BindValue::Text(s)) => {
            if s.trim().is_empty() {
                return Err(CatalogError::Validation(format!("{} is required", spec.column)));
            }
            if s.chars().count() > 255 {
                return Err(CatalogError::Validation(format!(
                    "{} must be at most 255 characters",
                    spec.column
                )));
            }
        }
        ("year", BindValue::Int(year)) if *year <= 0 => {
            return Err(CatalogError::Validation("year must be positive".into()));
        }
        _ => {}
    }
    Ok(())
}
