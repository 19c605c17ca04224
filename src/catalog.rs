use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{Movie, NewMovie, REQUIRED_FIELDS_MESSAGE},
    spreadsheet::SheetRow,
};

pub const MOVIE_NOT_FOUND: &str = "Movie not found";
pub const NO_IDS_PROVIDED: &str = "No movie IDs provided";
pub const NONE_FOUND_TO_DELETE: &str = "No movies found to delete";

/// Movie records backed by the `movies` table.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Movie>> {
        let rows = movie::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn get(&self, id: &str) -> AppResult<Movie> {
        movie::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(Movie::from)
            .ok_or(AppError::NotFound(MOVIE_NOT_FOUND))
    }

    pub async fn create(&self, new: NewMovie) -> AppResult<Movie> {
        let model = new_active_model(new).insert(&self.db).await?;
        debug!(id = %model.id, "movie created");
        Ok(model.into())
    }

    /// Overwrites all three content fields of an existing record.
    pub async fn replace(&self, id: &str, new: NewMovie) -> AppResult<Movie> {
        let existing = movie::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound(MOVIE_NOT_FOUND))?;

        let mut active: movie::ActiveModel = existing.into();
        active.movie_name = Set(new.movie_name);
        active.description = Set(new.description);
        active.casting = Set(new.casting);
        let model = active.update(&self.db).await?;

        debug!(id = %model.id, "movie replaced");
        Ok(model.into())
    }

    /// Removes one record and returns what remains.
    pub async fn delete(&self, id: &str) -> AppResult<Vec<Movie>> {
        let result = movie::Entity::delete_by_id(id.to_string()).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(MOVIE_NOT_FOUND));
        }
        debug!(id = %id, "movie deleted");
        self.list().await
    }

    /// Removes every record whose id is listed, returning the ones that existed.
    pub async fn delete_many(&self, ids: &[String]) -> AppResult<Vec<Movie>> {
        let ids: BTreeSet<&String> = ids.iter().collect();
        if ids.is_empty() {
            return Err(AppError::BadRequest(NO_IDS_PROVIDED.to_string()));
        }

        let txn = self.db.begin().await?;

        let doomed = movie::Entity::find()
            .filter(movie::Column::Id.is_in(ids.iter().copied().cloned()))
            .all(&txn)
            .await?;

        if doomed.is_empty() {
            txn.rollback().await?;
            return Err(AppError::NotFound(NONE_FOUND_TO_DELETE));
        }

        movie::Entity::delete_many()
            .filter(movie::Column::Id.is_in(doomed.iter().map(|m| m.id.clone())))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        debug!(requested = ids.len(), deleted = doomed.len(), "movies deleted");
        Ok(doomed.into_iter().map(Movie::from).collect())
    }

    /// Inserts spreadsheet rows in order inside one transaction.
    ///
    /// The first row missing a field aborts the import and nothing from the
    /// upload is kept.
    pub async fn import(&self, rows: Vec<SheetRow>) -> AppResult<usize> {
        let txn = self.db.begin().await?;
        let mut inserted = 0;

        for row in rows {
            let line = row.row;
            let Some(new) = row.into_new_movie() else {
                txn.rollback().await?;
                debug!(row = line, inserted, "import aborted on incomplete row");
                return Err(AppError::ValidationFailed(format!(
                    "{REQUIRED_FIELDS_MESSAGE} in Excel (row {line} is incomplete)"
                )));
            };
            movie::Entity::insert(new_active_model(new)).exec(&txn).await?;
            inserted += 1;
        }

        txn.commit().await?;

        debug!(inserted, "import committed");
        Ok(inserted)
    }
}

fn new_active_model(new: NewMovie) -> movie::ActiveModel {
    movie::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        movie_name: Set(new.movie_name),
        description: Set(new.description),
        casting: Set(new.casting),
    }
}
