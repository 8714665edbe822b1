use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Months, NaiveDate, Utc};
use mockall::{mock, predicate::eq};
use serde_json::{json, Value};

use screamscore_api::{
    db::{InMemoryStore, MovieStore},
    error::{AppError, AppResult},
    models::{Movie, NewMovie, TmdbMovie},
    routes::{create_router, AppState},
    services::providers::MetadataProvider,
};

mock! {
    pub Metadata {}

    #[async_trait::async_trait]
    impl MetadataProvider for Metadata {
        async fn search_movies(&self, query: &str) -> AppResult<Vec<TmdbMovie>>;
        async fn fetch_movie(&self, tmdb_id: i64) -> AppResult<NewMovie>;
        fn name(&self) -> &'static str;
    }
}

struct TestApp {
    server: TestServer,
    store: Arc<InMemoryStore>,
}

fn create_test_app(metadata: MockMetadata) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(store.clone(), Arc::new(metadata));
    let server = TestServer::new(create_router(state)).unwrap();
    TestApp { server, store }
}

fn new_movie(title: &str) -> NewMovie {
    NewMovie {
        title: title.to_string(),
        ..Default::default()
    }
}

async fn seed(store: &InMemoryStore, movie: NewMovie) -> Movie {
    store.insert_movie(movie).await.unwrap()
}

fn tmdb_result(id: i64, title: &str) -> TmdbMovie {
    TmdbMovie {
        id,
        title: title.to_string(),
        overview: None,
        release_date: None,
        poster_path: None,
        backdrop_path: None,
        vote_average: None,
        vote_count: None,
        genre_ids: None,
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(MockMetadata::new());
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app(MockMetadata::new());
    let response = app.server.get("/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_create_manual_movie_and_list() {
    let app = create_test_app(MockMetadata::new());

    let response = app
        .server
        .post("/api/movies")
        .json(&json!({
            "title": "  The Witch  ",
            "year": 2015,
            "description": "A family in 1630s New England."
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["title"], "The Witch");
    assert_eq!(created["year"], 2015);
    assert_eq!(created["averages"]["spookScore"], 0);
    assert_eq!(created["ratings"].as_array().unwrap().len(), 0);

    let response = app.server.get("/api/movies").await;
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["title"], "The Witch");
}

#[tokio::test]
async fn test_create_movie_requires_title() {
    let app = create_test_app(MockMetadata::new());

    let response = app
        .server
        .post("/api/movies")
        .json(&json!({ "title": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Title is required");
    assert!(app.store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_from_metadata_provider_is_idempotent() {
    let mut metadata = MockMetadata::new();
    metadata
        .expect_fetch_movie()
        .with(eq(694))
        .times(1)
        .returning(|_| {
            Ok(NewMovie {
                title: "The Shining".to_string(),
                year: Some(1980),
                genres: Some("Horror,Thriller".to_string()),
                trailer_key: Some("S014oGZiSdI".to_string()),
                tmdb_rating: Some(8.2),
                ..Default::default()
            })
        });
    metadata.expect_name().returning(|| "mock");

    let app = create_test_app(metadata);

    let first = app
        .server
        .post("/api/movies")
        .json(&json!({ "tmdbId": 694 }))
        .await;
    first.assert_status(StatusCode::CREATED);
    let first: Value = first.json();
    assert_eq!(first["title"], "The Shining");
    assert_eq!(first["tmdbId"], 694);
    assert_eq!(first["trailerUrl"], "https://www.youtube.com/embed/S014oGZiSdI");

    // Second import hits the stored row, not the provider
    let second = app
        .server
        .post("/api/movies")
        .json(&json!({ "tmdbId": 694 }))
        .await;
    second.assert_status(StatusCode::CREATED);
    assert_eq!(second.json::<Value>()["id"], first["id"]);
    assert_eq!(app.store.list_movies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_import_failure_is_generic_500() {
    let mut metadata = MockMetadata::new();
    metadata
        .expect_fetch_movie()
        .returning(|_| Err(AppError::ExternalApi("TMDB API returned status 404".to_string())));

    let app = create_test_app(metadata);
    let response = app
        .server
        .post("/api/movies")
        .json(&json!({ "tmdbId": 1 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"], "Internal server error");
}

#[tokio::test]
async fn test_get_and_delete_movie() {
    let app = create_test_app(MockMetadata::new());
    let movie = seed(&app.store, new_movie("Sinister")).await;

    let response = app.server.get(&format!("/api/movies/{}", movie.id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["title"], "Sinister");

    let response = app.server.delete(&format!("/api/movies/{}", movie.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = app.server.get(&format!("/api/movies/{}", movie.id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Movie not found");

    let response = app.server.delete(&format!("/api/movies/{}", movie.id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_rating_and_spook_score() {
    let app = create_test_app(MockMetadata::new());
    let movie = seed(&app.store, new_movie("The Exorcist")).await;

    let response = app
        .server
        .post("/api/ratings")
        .json(&json!({
            "movieId": movie.id,
            "scream": 70,
            "psychological": 92,
            "suspense": 85,
            "review": "  A classic that still holds up.  "
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let rating: Value = response.json();
    assert_eq!(rating["author"], "Anonymous");
    assert_eq!(rating["review"], "A classic that still holds up.");
    assert_eq!(rating["movieId"], movie.id.to_string());

    let response = app.server.get(&format!("/api/movies/{}", movie.id)).await;
    let view: Value = response.json();
    assert_eq!(view["averages"]["spookScore"], 82);
    assert_eq!(view["averages"]["scream"], 70);
    assert_eq!(view["ratings"].as_array().unwrap().len(), 1);

    let response = app
        .server
        .get(&format!("/api/movies/{}/ratings", movie.id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 1);
}

#[tokio::test]
async fn test_rating_validation_rejects_without_creating_rows() {
    let app = create_test_app(MockMetadata::new());
    let movie = seed(&app.store, new_movie("Hereditary")).await;

    let cases = vec![
        (
            json!({ "scream": 50, "psychological": 50, "suspense": 50 }),
            "Movie ID is required",
        ),
        (
            json!({ "movieId": movie.id, "scream": 50, "suspense": 50 }),
            "All rating values are required",
        ),
        (
            json!({ "movieId": movie.id, "scream": 0, "psychological": 50, "suspense": 50 }),
            "Rating values must be between 1 and 100",
        ),
        (
            json!({ "movieId": movie.id, "scream": 50, "psychological": 101, "suspense": 50 }),
            "Rating values must be between 1 and 100",
        ),
    ];

    for (body, expected) in cases {
        let response = app.server.post("/api/ratings").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], expected);
    }

    assert!(app.store.list_ratings(movie.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rating_accepts_numeric_string_scores() {
    let app = create_test_app(MockMetadata::new());
    let movie = seed(&app.store, new_movie("The Ring")).await;

    let response = app
        .server
        .post("/api/ratings")
        .json(&json!({
            "movieId": movie.id,
            "scream": "70",
            "psychological": "92",
            "suspense": 85
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["scream"], 70);

    let response = app
        .server
        .post("/api/ratings")
        .json(&json!({
            "movieId": movie.id,
            "scream": "loud",
            "psychological": 50,
            "suspense": 50
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Rating values must be between 1 and 100"
    );
}

#[tokio::test]
async fn test_malformed_bodies_get_json_400() {
    let app = create_test_app(MockMetadata::new());
    let movie = seed(&app.store, new_movie("Scream")).await;

    let bodies = vec![
        json!({ "movieId": movie.id, "scream": true, "psychological": 50, "suspense": 50 }),
        json!({ "movieId": 42, "scream": 50, "psychological": 50, "suspense": 50 }),
    ];
    for body in bodies {
        let response = app.server.post("/api/ratings").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    let response = app
        .server
        .post("/api/movies")
        .json(&json!({ "tmdbId": "694" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    let response = app.server.post("/api/ratings").text("not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    assert!(app.store.list_ratings(movie.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_path_and_query_get_json_400() {
    let app = create_test_app(MockMetadata::new());
    let movie = seed(&app.store, new_movie("Candyman")).await;

    for path in ["/api/movies/not-a-uuid", "/api/movies/not-a-uuid/ratings"] {
        let response = app.server.get(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string(), "{}", path);
    }

    let response = app
        .server
        .get(&format!("/api/movies/{}/similar", movie.id))
        .add_query_param("limit", "lots")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    let response = app
        .server
        .get("/api/home")
        .add_query_param("minYear", "soon")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    let response = app.server.delete("/api/movies/not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_listed_movie_ratings_are_newest_first() {
    let app = create_test_app(MockMetadata::new());
    let movie = seed(&app.store, new_movie("It Follows")).await;

    for author in ["Early", "Late"] {
        let response = app
            .server
            .post("/api/ratings")
            .json(&json!({
                "movieId": movie.id,
                "scream": 60,
                "psychological": 80,
                "suspense": 90,
                "author": author
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    let movies: Vec<Value> = app.server.get("/api/movies").await.json();
    let authors: Vec<&str> = movies[0]["ratings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["author"].as_str().unwrap())
        .collect();
    assert_eq!(authors, vec!["Late", "Early"]);
}

#[tokio::test]
async fn test_rating_for_unknown_movie_is_404() {
    let app = create_test_app(MockMetadata::new());

    let response = app
        .server
        .post("/api/ratings")
        .json(&json!({
            "movieId": uuid::Uuid::new_v4(),
            "scream": 50,
            "psychological": 50,
            "suspense": 50
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_author_defaults_to_anonymous() {
    let app = create_test_app(MockMetadata::new());
    let movie = seed(&app.store, new_movie("Midsommar")).await;

    let response = app
        .server
        .post("/api/ratings")
        .json(&json!({
            "movieId": movie.id,
            "scream": 35,
            "psychological": 96,
            "suspense": 74,
            "author": "   "
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["author"], "Anonymous");
}

#[tokio::test]
async fn test_dropdown_search_is_capped() {
    let app = create_test_app(MockMetadata::new());
    for i in 0..12 {
        let mut movie = new_movie(&format!("Paranormal Activity {}", i));
        movie.poster_path = Some(format!("/pa{}.jpg", i));
        seed(&app.store, movie).await;
    }
    seed(&app.store, new_movie("Saw")).await;

    let response = app.server.get("/api/search").add_query_param("q", "paranormal").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 8);
    assert!(movies[0]["posterUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://image.tmdb.org/t/p/w185/"));
    assert!(movies[0].get("description").is_none());

    let response = app.server.get("/api/search").add_query_param("q", "  ").await;
    assert!(response.json::<Value>()["movies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_metadata_search_proxy() {
    let mut metadata = MockMetadata::new();
    metadata
        .expect_search_movies()
        .withf(|q| q == "the conjuring")
        .times(1)
        .returning(|_| Ok((0..15).map(|i| tmdb_result(i, "The Conjuring")).collect()));

    let app = create_test_app(metadata);

    let response = app
        .server
        .get("/api/tmdb/search")
        .add_query_param("q", "  the conjuring ")
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["results"].as_array().unwrap().len(), 10);

    // Blank queries never reach the provider
    let response = app.server.get("/api/tmdb/search").await;
    response.assert_status_ok();
    assert!(response.json::<Value>()["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_metadata_search_caps_query_length() {
    let mut metadata = MockMetadata::new();
    metadata
        .expect_search_movies()
        .withf(|q| q.chars().count() == 100)
        .times(1)
        .returning(|_| Ok(vec![]));

    let app = create_test_app(metadata);
    let long_query = "a".repeat(250);
    let response = app
        .server
        .get("/api/tmdb/search")
        .add_query_param("q", &long_query)
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_similar_movies_excludes_subject_and_tops_up() {
    let app = create_test_app(MockMetadata::new());

    let subject = seed(
        &app.store,
        NewMovie {
            genres: Some("Horror,Supernatural".to_string()),
            imdb_rating: Some(7.0),
            ..new_movie("Insidious")
        },
    )
    .await;
    seed(
        &app.store,
        NewMovie {
            genres: Some("supernatural".to_string()),
            imdb_rating: Some(6.0),
            ..new_movie("Sinister")
        },
    )
    .await;
    seed(
        &app.store,
        NewMovie {
            genres: Some("Science Fiction".to_string()),
            imdb_rating: Some(8.5),
            ..new_movie("Alien")
        },
    )
    .await;
    seed(
        &app.store,
        NewMovie {
            genres: Some("Comedy".to_string()),
            ..new_movie("Unrated Comedy")
        },
    )
    .await;

    let response = app
        .server
        .get(&format!("/api/movies/{}/similar", subject.id))
        .add_query_param("limit", 3)
        .await;
    response.assert_status_ok();

    let similar: Vec<Value> = response.json();
    let titles: Vec<&str> = similar.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Sinister", "Alien"]);
    assert!(similar.iter().all(|m| m["id"] != subject.id.to_string()));
}

#[tokio::test]
async fn test_list_movies_with_filters() {
    let app = create_test_app(MockMetadata::new());
    seed(
        &app.store,
        NewMovie {
            year: Some(1978),
            imdb_rating: Some(7.7),
            ..new_movie("Halloween")
        },
    )
    .await;
    seed(
        &app.store,
        NewMovie {
            year: Some(2018),
            imdb_rating: Some(5.6),
            ..new_movie("Halloween 2018")
        },
    )
    .await;

    let response = app
        .server
        .get("/api/movies")
        .add_query_param("q", "halloween")
        .add_query_param("minImdb", 7)
        .await;
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["year"], 1978);
}

#[tokio::test]
async fn test_home_sections() {
    let app = create_test_app(MockMetadata::new());
    let today = Utc::now().date_naive();
    let next_month = today.checked_add_months(Months::new(1)).unwrap();
    let last_week = today - chrono::Duration::days(7);

    seed(
        &app.store,
        NewMovie {
            release_date: Some(next_month),
            trailer_key: Some("soon".to_string()),
            ..new_movie("Coming Soon")
        },
    )
    .await;
    seed(
        &app.store,
        NewMovie {
            release_date: Some(last_week),
            imdb_rating: Some(6.1),
            trailer_key: Some("fresh".to_string()),
            ..new_movie("Just Released")
        },
    )
    .await;
    seed(
        &app.store,
        NewMovie {
            year: Some(1922),
            release_date: NaiveDate::from_ymd_opt(1922, 3, 4),
            imdb_rating: Some(7.9),
            trailer_key: Some("old".to_string()),
            ..new_movie("Nosferatu")
        },
    )
    .await;
    seed(
        &app.store,
        NewMovie {
            imdb_rating: Some(9.9),
            ..new_movie("No Trailer")
        },
    )
    .await;

    let response = app.server.get("/api/home").await;
    response.assert_status_ok();
    let home: Value = response.json();

    assert_eq!(home["upcoming"][0]["title"], "Coming Soon");
    assert_eq!(home["recent"][0]["title"], "Just Released");
    assert_eq!(home["highestRated"][0]["title"], "Nosferatu");
    assert_eq!(home["classics"].as_array().unwrap().len(), 0);
    assert_eq!(home["totalMovies"], 3);
    assert_eq!(home["filtersActive"], false);

    let response = app
        .server
        .get("/api/home")
        .add_query_param("maxYear", 1950)
        .await;
    let home: Value = response.json();
    assert_eq!(home["totalMovies"], 1);
    assert_eq!(home["filtersActive"], true);
}
