//! Client-side orchestration of search and saved recipes.
//!
//! [`BrowserState`] is a plain value: every user action produces a new
//! snapshot through the update functions below, and the network work lives
//! in [`Browser`], which never touches the state itself.

use crate::{
    directory::{sort_by_ingredient_count, DirectoryClient},
    error::{BrowserError, DirectoryError, StoreClientError},
    recipe::RecipeRecord,
    store_client::StoreClient,
};

pub const DEFAULT_QUERY: &str = "Arrabiata";

/// Identifies one started search so that late answers to older searches are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserState {
    pub query: String,
    /// `None` until a search has completed.
    pub results: Option<Vec<RecipeRecord>>,
    pub saved: Vec<RecipeRecord>,
    last_ticket: u64,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY)
    }
}

/// What to show in place of the search results.
#[derive(Debug, PartialEq)]
pub enum ResultsView<'a> {
    NoResults { query: &'a str },
    Recipes(&'a [RecipeRecord]),
}

#[derive(Debug, PartialEq)]
pub enum SavedView<'a> {
    Empty,
    Recipes(&'a [RecipeRecord]),
}

impl BrowserState {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            results: None,
            saved: Vec::new(),
            last_ticket: 0,
        }
    }

    pub fn with_query(self, query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            ..self
        }
    }

    pub fn begin_search(self) -> (Self, SearchTicket) {
        let ticket = self.last_ticket + 1;
        (
            Self {
                last_ticket: ticket,
                ..self
            },
            SearchTicket(ticket),
        )
    }

    /// Replaces the results unless a newer search was started after `ticket`.
    pub fn apply_search_results(self, ticket: SearchTicket, recipes: Vec<RecipeRecord>) -> Self {
        if !self.is_current(ticket) {
            log::debug!(
                "Dropping results of search {} superseded by {}",
                ticket.0,
                self.last_ticket
            );
            return self;
        }
        Self {
            results: Some(sort_by_ingredient_count(recipes)),
            ..self
        }
    }

    /// Whether `ticket` belongs to the most recently started search.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.last_ticket
    }

    pub fn with_saved(self, saved: Vec<RecipeRecord>) -> Self {
        Self { saved, ..self }
    }

    /// 1-based lookup into the current results.
    pub fn result(&self, number: usize) -> Option<&RecipeRecord> {
        let index = number.checked_sub(1)?;
        self.results.as_ref()?.get(index)
    }

    pub fn results_view(&self) -> ResultsView<'_> {
        match self.results.as_deref() {
            Some(recipes) if !recipes.is_empty() => ResultsView::Recipes(recipes),
            _ => ResultsView::NoResults { query: &self.query },
        }
    }

    pub fn saved_view(&self) -> SavedView<'_> {
        if self.saved.is_empty() {
            SavedView::Empty
        } else {
            SavedView::Recipes(&self.saved)
        }
    }
}

/// The outbound side of the browser: directory search and the saved-recipe store.
pub struct Browser {
    directory: DirectoryClient,
    store: StoreClient,
}

impl Browser {
    pub fn new(directory: DirectoryClient, store: StoreClient) -> Self {
        Self { directory, store }
    }

    /// Runs one directory lookup. Failures are logged and returned.
    pub async fn find(&self, query: &str) -> Result<Vec<RecipeRecord>, DirectoryError> {
        self.directory.search(query).await.inspect_err(|e| {
            log::error!("Search for {query:?} failed: {e}");
        })
    }

    /// Searches for the state's current query and applies the sorted results.
    ///
    /// `state` is only read, so on failure the caller still holds the prior snapshot.
    pub async fn search(&self, state: &BrowserState) -> Result<BrowserState, DirectoryError> {
        let (next, ticket) = state.clone().begin_search();
        let recipes = self.find(&next.query).await?;
        Ok(next.apply_search_results(ticket, recipes))
    }

    /// Saves a recipe, then refreshes the saved list from the store.
    pub async fn save(
        &self,
        state: &BrowserState,
        record: &RecipeRecord,
    ) -> Result<BrowserState, BrowserError> {
        if let Err(e) = self.store.save_recipe(record).await {
            log::error!("Failed to save recipe {:?}: {e}", record.name);
            return Err(e.into());
        }
        Ok(self.load_saved(state).await?)
    }

    /// Saves the `number`-th (1-based) current search result.
    pub async fn save_result(
        &self,
        state: &BrowserState,
        number: usize,
    ) -> Result<BrowserState, BrowserError> {
        let record = state
            .result(number)
            .ok_or(BrowserError::NoSuchResult(number))?;
        self.save(state, record).await
    }

    pub async fn load_saved(&self, state: &BrowserState) -> Result<BrowserState, StoreClientError> {
        match self.store.list_saved().await {
            Ok(saved) => Ok(state.clone().with_saved(saved)),
            Err(e) => {
                log::error!("Failed to fetch saved recipes: {e}");
                Err(e)
            }
        }
    }
}
