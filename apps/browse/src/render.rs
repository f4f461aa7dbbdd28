//! Plain-text rendering of a projected [`Screen`].

use std::fmt::{self, Write};

use client_core::projector::{
    CatalogScreen, ImageRef, PersonCard, RatingBadge, Screen, Section, StarRow, TitleCard,
};

pub const APP_TITLE: &str = "CINEBUSCA";

pub fn render_text(screen: &Screen) -> Result<String, fmt::Error> {
    match screen {
        Screen::Loading => Ok("Loading...\n".to_string()),
        Screen::Catalog(catalog) => {
            let mut out = String::new();
            write_catalog(&mut out, catalog)?;
            Ok(out)
        }
    }
}

fn write_catalog(out: &mut impl Write, screen: &CatalogScreen) -> fmt::Result {
    writeln!(out, "{APP_TITLE}")?;

    if let Some(hero) = &screen.hero {
        writeln!(out, "\n== Featured: {}", hero.title)?;
        if let Some(stars) = hero.stars {
            writeln!(out, "   {}", stars_text(stars))?;
        }
        if !hero.overview.is_empty() {
            writeln!(out, "   {}", hero.overview)?;
        }
        writeln!(out, "   backdrop: {}", image_text(&hero.backdrop))?;
    }

    if let Some(search) = &screen.search {
        writeln!(out, "\n== {} [{:?}]", search.title, search.status)?;
        if let Some(error) = &search.error {
            writeln!(out, "   ! {error}")?;
        }
        write_title_lines(out, &search.results)?;
    }

    write_title_section(out, &screen.popular_movies)?;
    write_title_section(out, &screen.popular_tv)?;

    if !screen.movie_grid.is_empty() {
        writeln!(out, "\n== Trending")?;
        write_title_lines(out, &screen.movie_grid)?;
    }

    write_people_section(out, &screen.people)?;

    if let Some(spotlight) = &screen.spotlight {
        writeln!(out, "\n== Spotlight: {}", spotlight.title)?;
        if let Some(rating) = &spotlight.rating {
            writeln!(out, "   {}", rating_text(rating))?;
        }
        if !spotlight.overview.is_empty() {
            writeln!(out, "   {}", spotlight.overview)?;
        }
    }

    if !screen.more_movies.is_empty() {
        writeln!(out, "\n== More Movies")?;
        write_title_lines(out, &screen.more_movies)?;
    }

    if !screen.notices.is_empty() {
        writeln!(out)?;
        for notice in &screen.notices {
            writeln!(out, "! {}", notice.message)?;
        }
    }
    Ok(())
}

fn write_title_section(out: &mut impl Write, section: &Section<TitleCard>) -> fmt::Result {
    writeln!(out, "\n== {}", section.title)?;
    if section.items.is_empty() {
        writeln!(out, "   (nothing to show)")?;
    }
    write_title_lines(out, &section.items)
}

fn write_title_lines(out: &mut impl Write, cards: &[TitleCard]) -> fmt::Result {
    for card in cards {
        writeln!(out, "{}", title_line(card))?;
    }
    Ok(())
}

fn write_people_section(out: &mut impl Write, section: &Section<PersonCard>) -> fmt::Result {
    writeln!(out, "\n== {}", section.title)?;
    if section.items.is_empty() {
        writeln!(out, "   (nothing to show)")?;
    }
    for person in &section.items {
        match &person.department {
            Some(department) => writeln!(out, " - {} ({department})", person.name)?,
            None => writeln!(out, " - {}", person.name)?,
        }
    }
    Ok(())
}

fn title_line(card: &TitleCard) -> String {
    let mut line = format!(" - {} ({})", card.title, card.year);
    if let Some(rating) = &card.rating {
        line.push_str("  ");
        line.push_str(&rating_text(rating));
    }
    if card.poster == ImageRef::Missing {
        line.push_str("  [no image]");
    }
    line
}

fn rating_text(rating: &RatingBadge) -> String {
    format!("{} {}", stars_text(rating.stars), rating.average)
}

fn stars_text(stars: StarRow) -> String {
    let mut text = "*".repeat(usize::from(stars.filled));
    text.push_str(&".".repeat(usize::from(stars.empty)));
    text
}

fn image_text(image: &ImageRef) -> &str {
    match image {
        ImageRef::Url(url) => url.as_str(),
        ImageRef::Missing => "none",
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
