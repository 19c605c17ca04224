//! View-model behind the listing page.
//!
//! Built fresh from a full fetch on every request: mutations never patch it in
//! place, they redirect back to the listing which fetches again.

use std::collections::BTreeSet;

use crate::models::Movie;

pub const NOTHING_SELECTED: &str = "No movies selected!";

#[derive(Clone, Debug, Default)]
pub struct CatalogView {
    records: Vec<Movie>,
    query: String,
    visible: Vec<usize>,
    selected: BTreeSet<String>,
}

impl CatalogView {
    pub fn new(records: Vec<Movie>) -> Self {
        let mut view = Self { records, ..Self::default() };
        view.apply_filter();
        view
    }

    pub fn filter(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        let needle = self.query.to_lowercase();
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, movie)| matches(movie, &needle))
            .map(|(idx, _)| idx)
            .collect();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Movie> {
        self.visible.iter().map(|&idx| &self.records[idx])
    }

    pub fn find(&self, id: &str) -> Option<&Movie> {
        self.records.iter().find(|m| m.id == id)
    }

    /// Flips the checked state of `id`. Returns whether it is now checked.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            return false;
        }
        if self.find(id).is_none() {
            return false;
        }
        self.selected.insert(id.to_string())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Checked records, in table order.
    pub fn selected_movies(&self) -> Vec<&Movie> {
        self.records.iter().filter(|m| self.selected.contains(&m.id)).collect()
    }

    /// Checked records the current filter hides.
    pub fn hidden_selection(&self) -> impl Iterator<Item = &Movie> {
        self.records
            .iter()
            .enumerate()
            .filter(|(idx, movie)| {
                self.selected.contains(&movie.id) && !self.visible.contains(idx)
            })
            .map(|(_, movie)| movie)
    }

    /// Ids to send for a bulk delete. Refused locally when nothing is checked.
    pub fn bulk_delete_ids(&self) -> Result<Vec<String>, &'static str> {
        if self.selected.is_empty() {
            return Err(NOTHING_SELECTED);
        }
        Ok(self.selected.iter().cloned().collect())
    }
}

/// Case-insensitive substring match over all three content fields.
/// `needle` must already be lower-cased.
pub fn matches(movie: &Movie, needle: &str) -> bool {
    needle.is_empty()
        || [&movie.movie_name, &movie.description, &movie.casting]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}
