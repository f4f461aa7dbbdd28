use serde::{Deserialize, Serialize};

use crate::domain::{PersonId, TitleId};

/// `{ "results": [...] }` body returned by every list endpoint.
///
/// A missing or `null` `results` field decodes to an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsEnvelope<T> {
    results: Option<Vec<T>>,
}

impl<T> ResultsEnvelope<T> {
    pub fn into_results(self) -> Vec<T> {
        self.results.unwrap_or_default()
    }
}

/// A movie or TV show record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatalogItemWire")]
pub struct CatalogItem {
    pub id: TitleId,
    pub title: String,
    pub overview: String,
    pub release_date: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersonItemWire")]
pub struct PersonItem {
    pub id: PersonId,
    pub name: String,
    pub profile_url: Option<String>,
    pub known_for_department: Option<String>,
}

// Movies carry `title`/`release_date`, TV shows carry `name`/`first_air_date`.
// Our own serialized field names are accepted as aliases.
#[derive(Debug, Deserialize)]
struct CatalogItemWire {
    id: TitleId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default, alias = "poster_url")]
    poster_path: Option<String>,
    #[serde(default, alias = "backdrop_url")]
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

impl From<CatalogItemWire> for CatalogItem {
    fn from(wire: CatalogItemWire) -> Self {
        Self {
            id: wire.id,
            title: non_empty(wire.title)
                .or_else(|| non_empty(wire.name))
                .unwrap_or_default(),
            overview: wire.overview.unwrap_or_default(),
            release_date: non_empty(wire.release_date).or_else(|| non_empty(wire.first_air_date)),
            poster_url: non_empty(wire.poster_path),
            backdrop_url: non_empty(wire.backdrop_path),
            vote_average: wire.vote_average,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersonItemWire {
    id: PersonId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "profile_url")]
    profile_path: Option<String>,
    #[serde(default)]
    known_for_department: Option<String>,
}

impl From<PersonItemWire> for PersonItem {
    fn from(wire: PersonItemWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name.unwrap_or_default(),
            profile_url: non_empty(wire.profile_path),
            known_for_department: non_empty(wire.known_for_department),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_fields_map_from_tmdb_names() {
        let raw = r#"{"results":[{"id":1,"title":"X","overview":"o","release_date":"2024-05-01",
            "poster_path":"https://img/p.jpg","backdrop_path":"","vote_average":7.25,"popularity":9.9}]}"#;
        let items = serde_json::from_str::<ResultsEnvelope<CatalogItem>>(raw)
            .expect("decode")
            .into_results();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, TitleId(1));
        assert_eq!(item.title, "X");
        assert_eq!(item.release_date.as_deref(), Some("2024-05-01"));
        assert_eq!(item.poster_url.as_deref(), Some("https://img/p.jpg"));
        assert_eq!(item.backdrop_url, None);
        assert_eq!(item.vote_average, Some(7.25));
    }

    #[test]
    fn tv_show_falls_back_to_name_and_first_air_date() {
        let raw = r#"{"id":7,"name":"Show","first_air_date":"2019-01-01"}"#;
        let item: CatalogItem = serde_json::from_str(raw).expect("decode");

        assert_eq!(item.title, "Show");
        assert_eq!(item.release_date.as_deref(), Some("2019-01-01"));
        assert_eq!(item.overview, "");
        assert_eq!(item.vote_average, None);
    }

    #[test]
    fn absent_or_null_results_is_empty() {
        let absent: ResultsEnvelope<PersonItem> =
            serde_json::from_str(r#"{"page":1}"#).expect("decode");
        let null: ResultsEnvelope<PersonItem> =
            serde_json::from_str(r#"{"results":null}"#).expect("decode");

        assert!(absent.into_results().is_empty());
        assert!(null.into_results().is_empty());
    }

    #[test]
    fn item_without_id_is_rejected() {
        let err = serde_json::from_str::<ResultsEnvelope<CatalogItem>>(
            r#"{"results":[{"title":"no id"}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn person_optional_fields_default_to_none() {
        let person: PersonItem =
            serde_json::from_str(r#"{"id":3,"name":"Ana","profile_path":null}"#).expect("decode");

        assert_eq!(person.id, PersonId(3));
        assert_eq!(person.name, "Ana");
        assert_eq!(person.profile_url, None);
        assert_eq!(person.known_for_department, None);
    }

    #[test]
    fn serialized_item_decodes_back_through_wire_aliases() {
        let item = CatalogItem {
            id: TitleId(5),
            title: "Y".into(),
            overview: String::new(),
            release_date: None,
            poster_url: Some("https://img/y.jpg".into()),
            backdrop_url: None,
            vote_average: Some(6.0),
        };
        let json = serde_json::to_string(&item).expect("encode");
        let decoded: CatalogItem = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, item);
    }
}
