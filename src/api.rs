//! JSON endpoints mounted under `/api/movies`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Multipart, Path, State, multipart::MultipartRejection, rejection::JsonRejection,
    },
    routing::{get, post},
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    import,
    models::{
        DeleteManyRequest, DeletedMoviesResponse, ImportResponse, Movie, MovieInput,
        MovieListResponse, MovieResponse,
    },
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route("/delete-multiple", post(delete_many))
        .route("/upload", post(upload))
        .route(
            "/{id}",
            get(get_movie).patch(update_movie).put(replace_movie).delete(delete_movie),
        )
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

pub async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Movie>>> {
    Ok(Json(state.catalog.list().await?))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    Ok(Json(state.catalog.get(&id).await?))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<Json<MovieResponse>> {
    let new = body(payload)?.validate()?;
    let movie = state.catalog.create(new).await?;
    Ok(Json(MovieResponse { message: "Movie added successfully", movie }))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<Json<MovieResponse>> {
    let new = body(payload)?.validate()?;
    let movie = state.catalog.replace(&id, new).await?;
    Ok(Json(MovieResponse { message: "Movie updated successfully", movie }))
}

pub async fn replace_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<MovieInput>, JsonRejection>,
) -> AppResult<Json<MovieResponse>> {
    let new = body(payload)?.validate()?;
    let movie = state.catalog.replace(&id, new).await?;
    Ok(Json(MovieResponse { message: "Movie replaced successfully", movie }))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieListResponse>> {
    let movies = state.catalog.delete(&id).await?;
    Ok(Json(MovieListResponse { message: "Movie deleted successfully", movies }))
}

pub async fn delete_many(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DeleteManyRequest>, JsonRejection>,
) -> AppResult<Json<DeletedMoviesResponse>> {
    let request = body(payload)?;
    let deleted_movies = state.catalog.delete_many(&request.ids).await?;
    Ok(Json(DeletedMoviesResponse { message: "Movies deleted successfully", deleted_movies }))
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ImportResponse>> {
    let imported =
        import::import_multipart(&state.catalog, multipart, &state.config.upload_dir).await?;
    Ok(Json(ImportResponse { message: "Movies added successfully from Excel", imported }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    use crate::testing::{
        dir_is_empty, multipart_body, multipart_content_type, send, send_json, state, workbook,
    };

    async fn create(state: &std::sync::Arc<crate::AppState>, name: &str) -> Value {
        let (status, body) = send_json(
            state,
            Method::POST,
            "/api/movies",
            Some(json!({"Movie_Name": name, "Description": "desc", "Casting": "cast"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["movie"].clone()
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let state = state().await;
        let created = create(&state, "Heat").await;
        let id = created["id"].as_str().unwrap();

        let (status, fetched) =
            send_json(&state, Method::GET, &format!("/api/movies/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(fetched["movie_name"], "Heat");
        assert_eq!(fetched["description"], "desc");
        assert_eq!(fetched["casting"], "cast");
    }

    #[tokio::test]
    async fn list_returns_every_record() {
        let state = state().await;
        create(&state, "Heat").await;
        create(&state, "Alien").await;

        let (status, body) = send_json(&state, Method::GET, "/api/movies", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_with_missing_field_is_rejected() {
        let state = state().await;
        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/movies",
            Some(json!({"Movie_Name": "Heat", "Description": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "All fields (Movie_Name, Description, Casting) are required");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let state = state().await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/movies",
            Some("application/json"),
            b"{not json".to_vec(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let state = state().await;
        let (status, body) = send_json(&state, Method::GET, "/api/movies/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Movie not found");
    }

    #[tokio::test]
    async fn patch_and_put_replace_all_fields() {
        let state = state().await;
        let id = create(&state, "Heat").await["id"].as_str().unwrap().to_string();

        let cases = [
            (Method::PATCH, "Movie updated successfully"),
            (Method::PUT, "Movie replaced successfully"),
        ];
        for (method, message) in cases {
            let name = format!("Heat {method}");
            let (status, body) = send_json(
                &state,
                method.clone(),
                &format!("/api/movies/{id}"),
                Some(json!({"Movie_Name": name, "Description": "new", "Casting": "new"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], message);
            assert_eq!(body["movie"]["id"], id.as_str());
            assert_eq!(body["movie"]["movie_name"], name.as_str());
        }
    }

    #[tokio::test]
    async fn updates_validate_before_checking_existence() {
        let state = state().await;
        let id = create(&state, "Heat").await["id"].as_str().unwrap().to_string();
        let partial = [
            json!({"Description": "d", "Casting": "c"}),
            json!({"Movie_Name": "n", "Casting": "c"}),
            json!({"Movie_Name": "n", "Description": "d"}),
            json!({"Movie_Name": "", "Description": "d", "Casting": "c"}),
            json!({}),
        ];

        for method in [Method::PATCH, Method::PUT] {
            for body in &partial {
                for target in [id.as_str(), "ghost"] {
                    let (status, _) = send_json(
                        &state,
                        method.clone(),
                        &format!("/api/movies/{target}"),
                        Some(body.clone()),
                    )
                    .await;
                    assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {target} {body}");
                }
            }

            let (status, _) = send_json(
                &state,
                method.clone(),
                "/api/movies/ghost",
                Some(json!({"Movie_Name": "n", "Description": "d", "Casting": "c"})),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        let (_, unchanged) =
            send_json(&state, Method::GET, &format!("/api/movies/{id}"), None).await;
        assert_eq!(unchanged["movie_name"], "Heat");
    }

    #[tokio::test]
    async fn delete_returns_remaining_records() {
        let state = state().await;
        let keep = create(&state, "Keep").await;
        let gone = create(&state, "Gone").await;
        let gone_id = gone["id"].as_str().unwrap();

        let (status, body) =
            send_json(&state, Method::DELETE, &format!("/api/movies/{gone_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movies"], json!([keep]));

        let (status, _) =
            send_json(&state, Method::DELETE, &format!("/api/movies/{gone_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_multiple_handles_empty_partial_and_unmatched_sets() {
        let state = state().await;
        let a = create(&state, "A").await;
        let b = create(&state, "B").await;

        let (status, body) =
            send_json(&state, Method::POST, "/api/movies/delete-multiple", Some(json!({"ids": []})))
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "No movie IDs provided");

        let (status, body) =
            send_json(&state, Method::POST, "/api/movies/delete-multiple", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "No movie IDs provided");

        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/movies/delete-multiple",
            Some(json!({"ids": [a["id"], "ghost"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedMovies"], json!([a]));

        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/movies/delete-multiple",
            Some(json!({"ids": ["ghost", a["id"]]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No movies found to delete");

        let (_, remaining) = send_json(&state, Method::GET, "/api/movies", None).await;
        assert_eq!(remaining, json!([b]));
    }

    #[tokio::test]
    async fn upload_imports_rows_with_fresh_ids() {
        let state = state().await;
        let bytes = workbook(&[
            &["id", "Movie_Name", "Description", "Casting"],
            &["same-id", "Heat", "Crime epic", "Pacino"],
            &["same-id", "Alien", "Space horror", "Weaver"],
            &["same-id", "Up", "Balloons", "Asner"],
        ]);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/movies/upload",
            Some(&multipart_content_type()),
            multipart_body("file", "movies.xlsx", &bytes),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["imported"], 3);

        let (_, listed) = send_json(&state, Method::GET, "/api/movies", None).await;
        let ids: std::collections::HashSet<&str> =
            listed.as_array().unwrap().iter().map(|m| m["id"].as_str().unwrap()).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains("same-id"));
        assert!(dir_is_empty(&state.config.upload_dir));
    }

    #[tokio::test]
    async fn upload_aborts_on_incomplete_row_without_committing() {
        let state = state().await;
        let bytes = workbook(&[
            &["Movie_Name", "Description", "Casting"],
            &["One", "d", "c"],
            &["Two", "d", "c"],
            &["Three", "d", "c"],
            &["Four", "d", ""],
        ]);

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/movies/upload",
            Some(&multipart_content_type()),
            multipart_body("file", "movies.xlsx", &bytes),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["message"].as_str().unwrap().contains("row 5"));

        let (_, listed) = send_json(&state, Method::GET, "/api/movies", None).await;
        assert_eq!(listed, json!([]));
        assert!(dir_is_empty(&state.config.upload_dir));
    }

    #[tokio::test]
    async fn upload_without_file_field_is_bad_request() {
        let state = state().await;
        let (status, body) = send(
            &state,
            Method::POST,
            "/api/movies/upload",
            Some(&multipart_content_type()),
            multipart_body("attachment", "movies.xlsx", b"irrelevant"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "No file uploaded");
        assert!(dir_is_empty(&state.config.upload_dir));
    }

    #[tokio::test]
    async fn upload_that_is_not_multipart_is_json_bad_request() {
        let state = state().await;
        let (status, body) = send_json(
            &state,
            Method::POST,
            "/api/movies/upload",
            Some(json!({"file": "movies.xlsx"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "No file uploaded");
        assert!(dir_is_empty(&state.config.upload_dir));
    }
}
