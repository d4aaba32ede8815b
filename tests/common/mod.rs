#![allow(dead_code)]

use movie_catalog::model::Actor;
use movie_catalog::{
    ensure_catalog_tables, ActorRepository, ActorStore, CatalogConfig, MovieStore, NewActor,
};
use sqlx::PgPool;

pub async fn stores(pool: &PgPool) -> (MovieStore, ActorStore) {
    ensure_catalog_tables(pool).await.expect("catalog tables");
    let config = CatalogConfig::default();
    (
        MovieStore::new(pool.clone(), &config),
        ActorStore::new(pool.clone(), &config),
    )
}

pub async fn actor(actors: &ActorStore, first: &str, last: &str) -> Actor {
    actors
        .create(&NewActor::new(first, last))
        .await
        .expect("create actor")
}

pub async fn link_count(pool: &PgPool, movie_id: i32) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM movie_actors WHERE movie_id = $1")
        .bind(movie_id)
        .fetch_one(pool)
        .await
        .expect("count links")
}
