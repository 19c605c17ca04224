use serde::{Deserialize, Serialize};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
};

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "All fields (Movie_Name, Description, Casting) are required";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub movie_name: String,
    pub description: String,
    pub casting: String,
}

impl From<movie::Model> for Movie {
    fn from(model: movie::Model) -> Self {
        Self {
            id: model.id,
            movie_name: model.movie_name,
            description: model.description,
            casting: model.casting,
        }
    }
}

/// Record fields as submitted by a client, before validation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieInput {
    #[serde(rename = "Movie_Name", alias = "movie_name", default)]
    pub movie_name: Option<String>,
    #[serde(rename = "Description", alias = "description", default)]
    pub description: Option<String>,
    #[serde(rename = "Casting", alias = "casting", default)]
    pub casting: Option<String>,
}

impl MovieInput {
    pub fn validate(self) -> AppResult<NewMovie> {
        NewMovie::from_parts(self.movie_name, self.description, self.casting)
            .ok_or_else(|| AppError::ValidationFailed(REQUIRED_FIELDS_MESSAGE.to_string()))
    }
}

/// Validated content fields: all three present and non-blank.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewMovie {
    pub movie_name: String,
    pub description: String,
    pub casting: String,
}

impl NewMovie {
    pub fn from_parts(
        movie_name: Option<String>,
        description: Option<String>,
        casting: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            movie_name: required(movie_name)?,
            description: required(description)?,
            casting: required(casting)?,
        })
    }
}

fn required(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub message: &'static str,
    pub movie: Movie,
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub message: &'static str,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct DeletedMoviesResponse {
    pub message: &'static str,
    #[serde(rename = "deletedMovies")]
    pub deleted_movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: &'static str,
    pub imported: usize,
}
