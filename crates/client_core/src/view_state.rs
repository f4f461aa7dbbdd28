//! The single state object the controller owns and the projector reads.
//!
//! Only [`crate::controller::AggregationController`] mutates a `ViewState`;
//! the transition helpers here are crate-private for that reason.

use serde::Serialize;
use shared::{
    domain::Category,
    protocol::{CatalogItem, PersonItem},
};

use crate::{error::FetchError, PopularResults};

/// Initial-load lifecycle. `Ready` and `PartiallyFailed` are terminal until
/// an explicit reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    PartiallyFailed,
}

impl LoadPhase {
    pub fn is_settled(self) -> bool {
        matches!(self, LoadPhase::Ready | LoadPhase::PartiallyFailed)
    }
}

/// Popular lists in server rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogLists {
    pub movies: Vec<CatalogItem>,
    pub tv_shows: Vec<CatalogItem>,
    pub people: Vec<PersonItem>,
}

/// Error descriptor per category whose initial fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadErrors {
    pub movies: Option<FetchError>,
    pub tv_shows: Option<FetchError>,
    pub people: Option<FetchError>,
}

impl LoadErrors {
    pub fn get(&self, category: Category) -> Option<&FetchError> {
        match category {
            Category::Movies => self.movies.as_ref(),
            Category::Tv => self.tv_shows.as_ref(),
            Category::People => self.people.as_ref(),
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<FetchError> {
        match category {
            Category::Movies => &mut self.movies,
            Category::Tv => &mut self.tv_shows,
            Category::People => &mut self.people,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &FetchError)> + '_ {
        Category::ALL
            .into_iter()
            .filter_map(move |category| self.get(category).map(|err| (category, err)))
    }

    pub fn first(&self) -> Option<(Category, &FetchError)> {
        self.iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub status: SearchStatus,
    pub results: Vec<CatalogItem>,
    pub error: Option<FetchError>,
}

impl SearchState {
    /// Previous results stay visible until the new response lands.
    pub(crate) fn begin(&mut self, query: &str) {
        self.query = query.to_string();
        self.status = SearchStatus::Pending;
        self.error = None;
    }

    pub(crate) fn settle(&mut self, result: Result<Vec<CatalogItem>, FetchError>) -> SearchStatus {
        match result {
            Ok(results) => {
                self.results = results;
                self.error = None;
                self.status = SearchStatus::Succeeded;
            }
            Err(err) => {
                self.results.clear();
                self.error = Some(err);
                self.status = SearchStatus::Failed;
            }
        }
        self.status
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub phase: LoadPhase,
    pub lists: CatalogLists,
    pub featured: Option<CatalogItem>,
    pub search: SearchState,
    pub load_errors: LoadErrors,
}

/// What applying one category response changed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryApplied {
    pub outcome: Result<usize, FetchError>,
    pub featured: Option<CatalogItem>,
}

impl ViewState {
    /// True until all three initial requests have settled.
    pub fn is_loading(&self) -> bool {
        !self.phase.is_settled()
    }

    pub fn load_error(&self) -> Option<&FetchError> {
        self.load_errors.first().map(|(_, err)| err)
    }

    pub(crate) fn apply_popular(
        &mut self,
        category: Category,
        result: Result<PopularResults, FetchError>,
    ) -> CategoryApplied {
        let result = match (category, result) {
            (Category::Movies, Ok(PopularResults::Titles(items))) => {
                let count = items.len();
                self.lists.movies = items;
                Ok(count)
            }
            (Category::Tv, Ok(PopularResults::Titles(items))) => {
                let count = items.len();
                self.lists.tv_shows = items;
                Ok(count)
            }
            (Category::People, Ok(PopularResults::People(people))) => {
                let count = people.len();
                self.lists.people = people;
                Ok(count)
            }
            (_, Ok(other)) => Err(FetchError::decode(format!(
                "{} records returned for category {category}",
                match other {
                    PopularResults::Titles(_) => "title",
                    PopularResults::People(_) => "person",
                }
            ))),
            (_, Err(err)) => Err(err),
        };

        if let Err(err) = &result {
            self.clear_list(category);
            *self.load_errors.slot_mut(category) = Some(err.clone());
        }

        let mut featured = None;
        if category == Category::Movies && self.featured.is_none() {
            if let Some(first) = self.lists.movies.first() {
                self.featured = Some(first.clone());
                featured = self.featured.clone();
            }
        }

        CategoryApplied {
            outcome: result,
            featured,
        }
    }

    pub(crate) fn finish_load(&mut self) -> LoadPhase {
        self.phase = if self.load_errors.is_empty() {
            LoadPhase::Ready
        } else {
            LoadPhase::PartiallyFailed
        };
        self.phase
    }

    fn clear_list(&mut self, category: Category) {
        match category {
            Category::Movies => self.lists.movies.clear(),
            Category::Tv => self.lists.tv_shows.clear(),
            Category::People => self.lists.people.clear(),
        }
    }
}
