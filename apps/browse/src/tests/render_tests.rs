use super::*;

use client_core::{
    projector::{project, SectionLimits},
    FetchError, LoadPhase, ViewState,
};
use shared::{domain::TitleId, protocol::CatalogItem};

fn movie(id: i64, vote_average: Option<f64>) -> CatalogItem {
    CatalogItem {
        id: TitleId(id),
        title: format!("Movie {id}"),
        overview: "An overview".to_string(),
        release_date: Some("2010-01-01".to_string()),
        poster_url: None,
        backdrop_url: None,
        vote_average,
    }
}

#[test]
fn loading_screen_renders_placeholder() {
    assert_eq!(render_text(&Screen::Loading).expect("render"), "Loading...\n");
}

#[test]
fn catalog_screen_lists_sections_and_fallbacks() {
    let mut state = ViewState {
        phase: LoadPhase::PartiallyFailed,
        ..Default::default()
    };
    state.lists.movies = vec![movie(1, Some(7.0)), movie(2, None)];
    state.featured = state.lists.movies.first().cloned();
    state.load_errors.tv_shows = Some(FetchError::http_status(500));

    let text = render_text(&project(&state, &SectionLimits::default())).expect("render");

    assert!(text.starts_with(APP_TITLE));
    assert!(text.contains("== Featured: Movie 1"));
    assert!(text.contains("***.. 7.0"));
    assert!(text.contains(" - Movie 2 (2010)  [no image]"));
    assert!(text.contains("== Popular TV Shows\n   (nothing to show)"));
    assert!(text.contains("! Popular TV Shows unavailable"));
}
