use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, State, multipart::MultipartRejection,
        rejection::FormRejection,
    },
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::{Form as MultiForm, Query};
use serde::Deserialize;

use crate::{
    AppState, api,
    error::{AppError, PageResult},
    import,
    models::{Movie, MovieInput},
    templates::{self, MovieFormValues},
    view::{CatalogView, NOTHING_SELECTED},
};

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/movies/listing", get(listing))
        .route("/movies/new", get(new_movie).post(create_movie))
        .route("/movies/{id}/edit", get(edit_movie).post(update_movie))
        .route("/movies/{id}/delete", get(confirm_delete).post(delete_movie))
        .route("/movies/delete-selected", post(confirm_delete_selected))
        .route("/movies/delete-selected/confirm", post(delete_selected))
        .route("/movies/import", post(import_movies))
        .nest("/api/movies", api::router())
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    selected: Vec<String>,
    imported: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectionForm {
    #[serde(default)]
    q: String,
    #[serde(default)]
    selected: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmedIds {
    #[serde(default)]
    ids: Vec<String>,
}

fn listing_view(records: Vec<Movie>, query: &str, selected: &[String]) -> CatalogView {
    let mut view = CatalogView::new(records);
    view.filter(query);
    for id in selected {
        if !view.is_selected(id) {
            view.toggle(id);
        }
    }
    view
}

/// Link back to the listing that restores the search and checked rows.
fn listing_href(query: &str, selected: &[String]) -> String {
    let params: Vec<String> = (!query.is_empty())
        .then(|| format!("q={}", urlencoding::encode(query)))
        .into_iter()
        .chain(selected.iter().map(|id| format!("selected={}", urlencoding::encode(id))))
        .collect();

    if params.is_empty() { "/".to_string() } else { format!("/?{}", params.join("&")) }
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> PageResult<Html<String>> {
    let view = listing_view(state.catalog.list().await?, &query.q, &query.selected);
    Ok(Html(templates::index_page(&view, query.imported)))
}

/// Listing fragment for the live search box, swapped over `#listing`.
pub async fn listing(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> PageResult<Response> {
    let view = listing_view(state.catalog.list().await?, &query.q, &query.selected);

    let mut resp = Html(templates::listing_fragment(&view)).into_response();
    *resp.status_mut() = StatusCode::OK;
    resp.headers_mut().insert("datastar-selector", HeaderValue::from_static("#listing"));
    resp.headers_mut().insert("datastar-mode", HeaderValue::from_static("outer"));
    Ok(resp)
}

fn form_input(payload: Result<Form<MovieInput>, FormRejection>) -> PageResult<MovieInput> {
    payload
        .map(|Form(input)| input)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()).into())
}

pub async fn new_movie() -> Html<String> {
    Html(templates::movie_form_page("Add Movie", "/movies/new", MovieFormValues::default()))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<MovieInput>, FormRejection>,
) -> PageResult<Redirect> {
    state.catalog.create(form_input(payload)?.validate()?).await?;
    Ok(Redirect::to("/"))
}

pub async fn edit_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let movie = state.catalog.get(&id).await?;
    let action = format!("/movies/{}/edit", movie.id);
    Ok(Html(templates::movie_form_page("Edit Movie", &action, MovieFormValues::from(&movie))))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Form<MovieInput>, FormRejection>,
) -> PageResult<Redirect> {
    state.catalog.replace(&id, form_input(payload)?.validate()?).await?;
    Ok(Redirect::to("/"))
}

pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let movie = state.catalog.get(&id).await?;
    Ok(Html(templates::confirm_delete_page(&movie, "/")))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> PageResult<Redirect> {
    state.catalog.delete(&id).await?;
    Ok(Redirect::to("/"))
}

pub async fn confirm_delete_selected(
    State(state): State<Arc<AppState>>,
    MultiForm(form): MultiForm<SelectionForm>,
) -> PageResult<Html<String>> {
    if form.selected.is_empty() {
        return Err(AppError::BadRequest(NOTHING_SELECTED.to_string()).into());
    }

    let view = listing_view(state.catalog.list().await?, &form.q, &form.selected);
    let ids = view.bulk_delete_ids().map_err(|msg| AppError::BadRequest(msg.to_string()))?;
    let back = listing_href(view.query(), &ids);
    Ok(Html(templates::confirm_bulk_delete_page(&view.selected_movies(), &back)))
}

pub async fn delete_selected(
    State(state): State<Arc<AppState>>,
    MultiForm(form): MultiForm<ConfirmedIds>,
) -> PageResult<Redirect> {
    state.catalog.delete_many(&form.ids).await?;
    Ok(Redirect::to("/"))
}

pub async fn import_movies(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PageResult<Redirect> {
    let imported =
        import::import_multipart(&state.catalog, multipart, &state.config.upload_dir).await?;
    Ok(Redirect::to(&format!("/?imported={imported}")))
}
