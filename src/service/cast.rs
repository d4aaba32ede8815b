//! Keeps a movie's `movie_actors` links equal to a desired actor-id set.
//! Runs on the caller's transaction; the caller decides commit or rollback.

use std::collections::{BTreeSet, HashMap};

use sqlx::{Executor, PgConnection, Postgres};

use crate::error::CatalogError;
use crate::model::Actor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastMode {
    /// Fresh movie: only inserts, duplicates ignored.
    Create,
    /// Existing movie: the link set becomes exactly the desired set.
    Replace,
}

/// Links added and removed by one sync, in ascending id order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastDiff {
    pub added: Vec<i32>,
    pub removed: Vec<i32>,
}

impl CastDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn plan_cast(existing: &BTreeSet<i32>, desired: &BTreeSet<i32>) -> CastDiff {
    CastDiff {
        added: desired.difference(existing).copied().collect(),
        removed: existing.difference(desired).copied().collect(),
    }
}

/// Reconcile the links of `movie_id` with `desired`. Duplicate ids collapse.
/// Fails with [`CatalogError::ActorNotFound`] naming the smallest missing id
/// before any link is written.
pub async fn sync_cast(
    conn: &mut PgConnection,
    movie_id: i32,
    desired: &[i32],
    mode: CastMode,
) -> Result<CastDiff, CatalogError> {
    let desired: BTreeSet<i32> = desired.iter().copied().collect();
    ensure_actors_exist(&mut *conn, &desired).await?;

    let existing = match mode {
        CastMode::Create => BTreeSet::new(),
        CastMode::Replace => linked_actor_ids(&mut *conn, movie_id).await?,
    };
    let diff = plan_cast(&existing, &desired);

    if !diff.removed.is_empty() {
        sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1 AND actor_id = ANY($2)")
            .bind(movie_id)
            .bind(diff.removed.as_slice())
            .execute(&mut *conn)
            .await?;
    }
    if !diff.added.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO movie_actors (movie_id, actor_id)
            SELECT $1, actor_id FROM UNNEST($2::int4[]) AS t (actor_id)
            ON CONFLICT (movie_id, actor_id) DO NOTHING
            "#,
        )
        .bind(movie_id)
        .bind(diff.added.as_slice())
        .execute(&mut *conn)
        .await?;
    }

    tracing::debug!(movie_id, ?mode, added = ?diff.added, removed = ?diff.removed, "cast synced");
    Ok(diff)
}

async fn ensure_actors_exist(conn: &mut PgConnection, ids: &BTreeSet<i32>) -> Result<(), CatalogError> {
    if ids.is_empty() {
        return Ok(());
    }
    let wanted: Vec<i32> = ids.iter().copied().collect();
    let found: BTreeSet<i32> = sqlx::query_scalar::<_, i32>("SELECT id FROM actors WHERE id = ANY($1)")
        .bind(wanted.as_slice())
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();
    match ids.difference(&found).next() {
        Some(&id) => Err(CatalogError::ActorNotFound { id }),
        None => Ok(()),
    }
}

async fn linked_actor_ids(conn: &mut PgConnection, movie_id: i32) -> Result<BTreeSet<i32>, CatalogError> {
    let ids = sqlx::query_scalar::<_, i32>("SELECT actor_id FROM movie_actors WHERE movie_id = $1")
        .bind(movie_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids.into_iter().collect())
}

#[derive(sqlx::FromRow)]
struct CastRow {
    movie_id: i32,
    #[sqlx(flatten)]
    actor: Actor,
}

/// Casts of all `movie_ids` in one join query, keyed by movie id. Movies
/// without links are absent from the map.
pub async fn load_casts<'e, E>(executor: E, movie_ids: &[i32]) -> Result<HashMap<i32, Vec<Actor>>, CatalogError>
where
    E: Executor<'e, Database = Postgres>,
{
    if movie_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<CastRow> = sqlx::query_as(
        r#"
        SELECT ma.movie_id, a.id, a.first_name, a.last_name, a.role, a.created_at, a.updated_at
        FROM movie_actors ma
        JOIN actors a ON a.id = ma.actor_id
        WHERE ma.movie_id = ANY($1)
        ORDER BY ma.movie_id, a.id
        "#,
    )
    .bind(movie_ids)
    .fetch_all(executor)
    .await?;

    let mut casts: HashMap<i32, Vec<Actor>> = HashMap::new();
    for row in rows {
        casts.entry(row.movie_id).or_default().push(row.actor);
    }
    Ok(casts)
}

pub async fn load_cast<'e, E>(executor: E, movie_id: i32) -> Result<Vec<Actor>, CatalogError>
where
    E: Executor<'e, Database = Postgres>,
{
    let mut casts = load_casts(executor, &[movie_id]).await?;
    Ok(casts.remove(&movie_id).unwrap_or_default())
}
