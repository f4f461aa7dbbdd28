//! Pure mapping from [`ViewState`] to display-ready sections.
//!
//! Nothing here mutates state or fails: short lists are sliced to whatever is
//! available and missing fields resolve to explicit fallbacks.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Category, PersonId, TitleId},
    protocol::{CatalogItem, PersonItem},
};

use crate::view_state::{SearchStatus, ViewState};

pub const MAX_STARS: u8 = 5;
pub const MISSING_YEAR: &str = "N/A";

/// How many items each section shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLimits {
    pub row: usize,
    pub grid: usize,
    pub spotlight_index: usize,
    pub more_start: usize,
    pub more_end: usize,
}

impl Default for SectionLimits {
    fn default() -> Self {
        Self {
            row: 10,
            grid: 12,
            spotlight_index: 10,
            more_start: 12,
            more_end: 18,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum ImageRef {
    Url(String),
    /// Render a placeholder instead of an image.
    Missing,
}

impl ImageRef {
    fn from_url(url: Option<&str>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => ImageRef::Url(url.to_string()),
            _ => ImageRef::Missing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRow {
    pub filled: u8,
    pub empty: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingBadge {
    /// Average with one decimal, e.g. `"7.3"`.
    pub average: String,
    pub stars: StarRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleCard {
    pub id: TitleId,
    pub title: String,
    pub year: String,
    pub poster: ImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingBadge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonCard {
    pub id: PersonId,
    pub name: String,
    pub profile: ImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroCard {
    pub id: TitleId,
    pub title: String,
    pub overview: String,
    pub backdrop: ImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<StarRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpotlightCard {
    pub id: TitleId,
    pub title: String,
    pub overview: String,
    pub poster: ImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingBadge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section<T> {
    pub title: String,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSection {
    pub title: String,
    pub status: SearchStatus,
    pub results: Vec<TitleCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub category: Category,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogScreen {
    pub hero: Option<HeroCard>,
    pub search: Option<SearchSection>,
    pub popular_movies: Section<TitleCard>,
    pub popular_tv: Section<TitleCard>,
    pub movie_grid: Vec<TitleCard>,
    pub people: Section<PersonCard>,
    pub spotlight: Option<SpotlightCard>,
    pub more_movies: Vec<TitleCard>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Catalog(CatalogScreen),
}

pub fn project(state: &ViewState, limits: &SectionLimits) -> Screen {
    if state.is_loading() {
        return Screen::Loading;
    }

    let movies = &state.lists.movies;
    Screen::Catalog(CatalogScreen {
        hero: state.featured.as_ref().map(hero_card),
        search: search_section(state),
        popular_movies: Section {
            title: Category::Movies.label().to_string(),
            items: top(movies, limits.row).iter().map(title_card).collect(),
        },
        popular_tv: Section {
            title: Category::Tv.label().to_string(),
            items: top(&state.lists.tv_shows, limits.row)
                .iter()
                .map(title_card)
                .collect(),
        },
        movie_grid: top(movies, limits.grid).iter().map(title_card).collect(),
        people: Section {
            title: Category::People.label().to_string(),
            items: top(&state.lists.people, limits.row)
                .iter()
                .map(person_card)
                .collect(),
        },
        spotlight: movies.get(limits.spotlight_index).map(spotlight_card),
        more_movies: window(movies, limits.more_start, limits.more_end)
            .iter()
            .map(title_card)
            .collect(),
        notices: state
            .load_errors
            .iter()
            .map(|(category, err)| Notice {
                category,
                message: format!("{} unavailable: {err}", category.label()),
            })
            .collect(),
    })
}

/// First `n` items, or fewer when the list is shorter.
pub fn top<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

/// Items in `start..end`, clamped to the list.
pub fn window<T>(items: &[T], start: usize, end: usize) -> &[T] {
    let end = end.min(items.len());
    let start = start.min(end);
    &items[start..end]
}

/// `floor(rating / 2)` clamped to `0..=5`.
pub fn star_count(rating: f64) -> u8 {
    if !rating.is_finite() {
        return 0;
    }
    (rating / 2.0).floor().clamp(0.0, f64::from(MAX_STARS)) as u8
}

pub fn star_row(rating: f64) -> StarRow {
    let filled = star_count(rating);
    StarRow {
        filled,
        empty: MAX_STARS - filled,
    }
}

pub fn rating_badge(vote_average: Option<f64>) -> Option<RatingBadge> {
    let average = vote_average.filter(|v| v.is_finite())?;
    Some(RatingBadge {
        average: format!("{average:.1}"),
        stars: star_row(average),
    })
}

/// Year of an ISO 8601 date or timestamp, or `"N/A"`.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, RFC 3339 timestamps and local
/// `YYYY-MM-DDTHH:MM:SS` timestamps.
pub fn release_year(release_date: Option<&str>) -> String {
    release_date
        .and_then(|raw| parse_year(raw.trim()))
        .map(|year| year.to_string())
        .unwrap_or_else(|| MISSING_YEAR.to_string())
}

fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.year());
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.year());
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at.year());
    }
    match raw.len() {
        4 if raw.bytes().all(|b| b.is_ascii_digit()) => raw.parse().ok(),
        7 => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
            .ok()
            .map(|date| date.year()),
        _ => None,
    }
}

pub fn title_card(item: &CatalogItem) -> TitleCard {
    TitleCard {
        id: item.id,
        title: item.title.clone(),
        year: release_year(item.release_date.as_deref()),
        poster: ImageRef::from_url(item.poster_url.as_deref()),
        rating: rating_badge(item.vote_average),
    }
}

pub fn person_card(person: &PersonItem) -> PersonCard {
    PersonCard {
        id: person.id,
        name: person.name.clone(),
        profile: ImageRef::from_url(person.profile_url.as_deref()),
        department: person.known_for_department.clone(),
    }
}

fn hero_card(item: &CatalogItem) -> HeroCard {
    HeroCard {
        id: item.id,
        title: item.title.clone(),
        overview: item.overview.clone(),
        backdrop: ImageRef::from_url(item.backdrop_url.as_deref()),
        stars: rating_badge(item.vote_average).map(|badge| badge.stars),
    }
}

fn spotlight_card(item: &CatalogItem) -> SpotlightCard {
    SpotlightCard {
        id: item.id,
        title: item.title.clone(),
        overview: item.overview.clone(),
        poster: ImageRef::from_url(item.poster_url.as_deref()),
        rating: rating_badge(item.vote_average),
    }
}

fn search_section(state: &ViewState) -> Option<SearchSection> {
    let search = &state.search;
    if search.status == SearchStatus::Idle {
        return None;
    }
    Some(SearchSection {
        title: format!("Results for \"{}\"", search.query),
        status: search.status,
        results: search.results.iter().map(title_card).collect(),
        error: search.error.as_ref().map(ToString::to_string),
    })
}

#[cfg(test)]
#[path = "tests/projector_tests.rs"]
mod tests;
