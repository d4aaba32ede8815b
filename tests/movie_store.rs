//! MovieStore against a live PostgreSQL. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

mod common;

use std::collections::BTreeSet;

use common::{actor, link_count, stores};
use movie_catalog::model::{FilterDescriptor, FilterOperator, SortDirection, UpdateFieldItem};
use movie_catalog::{
    ActorRepository, CatalogError, ErrorKind, ListQuery, MovieRepository, MovieUpdate, NewMovie, UpdateFieldRequest,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn create_with_cast_then_get(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let a = actor(&actors, "Timothee", "Chalamet").await;
    let b = actor(&actors, "Zendaya", "Coleman").await;

    let created = movies
        .create(&NewMovie::new("Dune", "Villeneuve", 2021).with_plot("Spice.").with_cast([a.id, b.id]))
        .await
        .unwrap();
    assert_eq!(created.cast_ids(), BTreeSet::from([a.id, b.id]));

    let fetched = movies.get(created.id).await.unwrap();
    assert_eq!(fetched.title, "Dune");
    assert_eq!(fetched.plot, "Spice.");
    assert_eq!(fetched.cast_ids(), BTreeSet::from([a.id, b.id]));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn duplicate_cast_ids_collapse(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let a = actor(&actors, "Amy", "Adams").await;
    let b = actor(&actors, "Jeremy", "Renner").await;

    let created = movies
        .create(&NewMovie::new("Arrival", "Villeneuve", 2016).with_cast([a.id, a.id, b.id]))
        .await
        .unwrap();
    assert_eq!(created.cast.len(), 2);
    assert_eq!(link_count(&pool, created.id).await, 2);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn missing_actor_rolls_back_create(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let a = actor(&actors, "Ana", "de Armas").await;
    let missing = a.id + 1000;

    let err = movies
        .create(&NewMovie::new("Blade Runner 2049", "Villeneuve", 2017).with_cast([a.id, missing]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransactionAborted);
    assert!(matches!(err.root(), CatalogError::ActorNotFound { id } if *id == missing));

    let list = movies.list(&ListQuery::default()).await.unwrap();
    assert_eq!(list.count, 0);
    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movie_actors")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 0);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn replace_cast_is_exact_and_idempotent(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let a = actor(&actors, "A", "One").await;
    let b = actor(&actors, "B", "Two").await;
    let c = actor(&actors, "C", "Three").await;

    let movie = movies
        .create(&NewMovie::new("Sicario", "Villeneuve", 2015).with_cast([a.id, b.id]))
        .await
        .unwrap();

    let update = MovieUpdate::new("Sicario", "Villeneuve", 2015).with_cast([b.id, c.id]);
    let first = movies.update(movie.id, &update).await.unwrap();
    assert_eq!(first.cast_ids(), BTreeSet::from([b.id, c.id]));

    let second = movies.update(movie.id, &update).await.unwrap();
    assert_eq!(second.cast_ids(), first.cast_ids());
    assert_eq!(link_count(&pool, movie.id).await, 2);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn update_without_cast_keeps_links(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let a = actor(&actors, "Jake", "Gyllenhaal").await;
    let movie = movies
        .create(&NewMovie::new("Enemy", "Villeneuve", 2013).with_cast([a.id]))
        .await
        .unwrap();

    let updated = movies
        .update(movie.id, &MovieUpdate::new("Enemy", "Denis Villeneuve", 2014))
        .await
        .unwrap();
    assert_eq!(updated.director, "Denis Villeneuve");
    assert_eq!(updated.year, 2014);
    assert_eq!(updated.cast_ids(), BTreeSet::from([a.id]));

    let cleared = movies
        .update(movie.id, &MovieUpdate::new("Enemy", "Denis Villeneuve", 2014).with_cast([]))
        .await
        .unwrap();
    assert!(cleared.cast.is_empty());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn failed_replace_keeps_previous_state(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let a = actor(&actors, "Hugh", "Jackman").await;
    let movie = movies
        .create(&NewMovie::new("Prisoners", "Villeneuve", 2013).with_cast([a.id]))
        .await
        .unwrap();

    let err = movies
        .update(movie.id, &MovieUpdate::new("Renamed", "Someone", 2000).with_cast([a.id + 500]))
        .await
        .unwrap_err();
    assert_eq!(err.root_kind(), ErrorKind::Validation);

    let unchanged = movies.get(movie.id).await.unwrap();
    assert_eq!(unchanged.title, "Prisoners");
    assert_eq!(unchanged.cast_ids(), BTreeSet::from([a.id]));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn update_of_missing_movie_is_not_found(pool: PgPool) {
    let (movies, _) = stores(&pool).await;
    let err = movies
        .update(4242, &MovieUpdate::new("X", "Y", 2000))
        .await
        .unwrap_err();
    assert_eq!(err.root_kind(), ErrorKind::NotFound);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn delete_removes_links_and_row(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let a = actor(&actors, "Josh", "Brolin").await;
    let movie = movies
        .create(&NewMovie::new("Dune: Part Two", "Villeneuve", 2024).with_cast([a.id]))
        .await
        .unwrap();

    movies.delete(movie.id).await.unwrap();
    assert_eq!(link_count(&pool, movie.id).await, 0);
    assert_eq!(movies.get(movie.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(movies.delete(movie.id).await.unwrap_err().root_kind(), ErrorKind::NotFound);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn pages_partition_the_filtered_set(pool: PgPool) {
    let (movies, _) = stores(&pool).await;
    for year in 2001..=2012 {
        movies
            .create(&NewMovie::new(format!("Movie {}", year), "Anon", year))
            .await
            .unwrap();
    }
    // Equal sort keys: the id tie-breaker keeps pages stable.
    movies.create(&NewMovie::new("Twin", "Anon", 2005)).await.unwrap();

    let base = ListQuery::default()
        .filter("year", FilterOperator::Gte, "2004")
        .order("year", SortDirection::Desc);
    let mut seen = BTreeSet::new();
    let mut total = None;
    for page in 1..=3 {
        let list = movies
            .list(&ListQuery { page, limit: 4, ..base.clone() })
            .await
            .unwrap();
        total = Some(list.count);
        for m in list.movies {
            assert!(m.year >= 2004);
            assert!(seen.insert(m.id), "movie {} on two pages", m.id);
        }
    }
    assert_eq!(total, Some(10));
    assert_eq!(seen.len(), 10);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn list_search_and_cast_loading(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let a = actor(&actors, "Rebecca", "Ferguson").await;
    movies
        .create(&NewMovie::new("Dune", "Villeneuve", 2021).with_cast([a.id]))
        .await
        .unwrap();
    movies.create(&NewMovie::new("Dunkirk", "Nolan", 2017)).await.unwrap();
    movies.create(&NewMovie::new("Tenet", "Nolan", 2020)).await.unwrap();

    let list = movies
        .list(&ListQuery::default().filter("title", FilterOperator::Search, "DUN").order("title", SortDirection::Asc))
        .await
        .unwrap();
    assert_eq!(list.count, 2);
    let titles: Vec<&str> = list.movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Dunkirk"]);
    assert_eq!(list.movies[0].cast_ids(), BTreeSet::from([a.id]));
    assert!(list.movies[1].cast.is_empty());

    let by_year = movies
        .list(&ListQuery::default().filter("year", FilterOperator::Search, "202"))
        .await
        .unwrap();
    assert_eq!(by_year.count, 2);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn list_rejects_unknown_columns(pool: PgPool) {
    let (movies, _) = stores(&pool).await;
    let err = movies
        .list(&ListQuery::default().filter("title; DROP TABLE movies", FilterOperator::Eq, "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::UnknownColumn { .. }));

    let err = movies
        .list(&ListQuery::default().order("budget", SortDirection::Asc))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::UnknownColumn { .. }));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn update_fields_touches_only_matching_rows(pool: PgPool) {
    let (movies, _) = stores(&pool).await;
    let tenet = movies.create(&NewMovie::new("Tenet", "Nolan", 2020)).await.unwrap();
    let heat = movies.create(&NewMovie::new("Heat", "Mann", 1995)).await.unwrap();

    let req = UpdateFieldRequest {
        filter: vec![FilterDescriptor::new("director", FilterOperator::Eq, "Nolan")],
        items: vec![
            UpdateFieldItem { column: "plot".into(), value: json!("Inversion.") },
            UpdateFieldItem { column: "year".into(), value: json!(2021) },
        ],
    };
    let affected = movies.update_fields(&req).await.unwrap();
    assert_eq!(affected.rows_affected, 1);

    let tenet = movies.get(tenet.id).await.unwrap();
    assert_eq!((tenet.plot.as_str(), tenet.year), ("Inversion.", 2021));
    let heat = movies.get(heat.id).await.unwrap();
    assert_eq!((heat.plot.as_str(), heat.year), ("", 1995));
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn update_fields_rejects_unsafe_requests(pool: PgPool) {
    let (movies, _) = stores(&pool).await;
    let no_filter = UpdateFieldRequest {
        filter: vec![],
        items: vec![UpdateFieldItem { column: "plot".into(), value: json!("x") }],
    };
    assert_eq!(movies.update_fields(&no_filter).await.unwrap_err().kind(), ErrorKind::Validation);

    let identity = UpdateFieldRequest {
        filter: vec![FilterDescriptor::new("year", FilterOperator::Gt, "0")],
        items: vec![UpdateFieldItem { column: "id".into(), value: json!(7) }],
    };
    assert_eq!(movies.update_fields(&identity).await.unwrap_err().kind(), ErrorKind::Validation);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn cast_grows_then_shrinks_without_touching_actors(pool: PgPool) {
    let (movies, actors) = stores(&pool).await;
    let paul = actor(&actors, "Timothee", "Chalamet").await;
    let chani = actor(&actors, "Zendaya", "Coleman").await;

    let dune = movies
        .create(&NewMovie::new("Dune", "Villeneuve", 2021).with_cast([paul.id]))
        .await
        .unwrap();

    let grown = movies
        .update(dune.id, &MovieUpdate::new("Dune", "Villeneuve", 2021).with_cast([paul.id, chani.id]))
        .await
        .unwrap();
    assert_eq!(grown.cast_ids(), BTreeSet::from([paul.id, chani.id]));

    let shrunk = movies
        .update(dune.id, &MovieUpdate::new("Dune", "Villeneuve", 2021).with_cast([chani.id]))
        .await
        .unwrap();
    assert_eq!(shrunk.cast_ids(), BTreeSet::from([chani.id]));

    assert_eq!(actors.get(paul.id).await.unwrap().last_name, "Chalamet");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn unfiltered_total_counts_every_row(pool: PgPool) {
    let (movies, _) = stores(&pool).await;
    for i in 0..13 {
        movies
            .create(&NewMovie::new(format!("Short {}", i), "Various", 1990 + i))
            .await
            .unwrap();
    }
    let first = movies.list(&ListQuery::default()).await.unwrap();
    assert_eq!(first.count, 13);
    assert_eq!(first.movies.len(), 10);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(first.count, rows);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn search_treats_wildcards_literally(pool: PgPool) {
    let (movies, _) = stores(&pool).await;
    movies
        .create(&NewMovie::new("Sale", "Anon", 2001).with_plot("50% off"))
        .await
        .unwrap();
    movies
        .create(&NewMovie::new("Bulk", "Anon", 2002).with_plot("500 off"))
        .await
        .unwrap();

    let list = movies
        .list(&ListQuery::default().filter("plot", FilterOperator::Search, "50%"))
        .await
        .unwrap();
    assert_eq!(list.count, 1);
    assert_eq!(list.movies[0].title, "Sale");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn update_fields_rejects_blank_title(pool: PgPool) {
    let (movies, _) = stores(&pool).await;
    let heat = movies.create(&NewMovie::new("Heat", "Mann", 1995)).await.unwrap();
    let req = UpdateFieldRequest {
        filter: vec![FilterDescriptor::new("director", FilterOperator::Eq, "Mann")],
        items: vec![UpdateFieldItem { column: "title".into(), value: json!("") }],
    };
    assert_eq!(movies.update_fields(&req).await.unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(movies.get(heat.id).await.unwrap().title, "Heat");
}
