use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(TitleId);
id_newtype!(PersonId);

/// Popular list exposed by the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Movies,
    Tv,
    People,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Movies, Category::Tv, Category::People];

    /// Path segment under `/popular/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            Category::Movies => "movies",
            Category::Tv => "tv",
            Category::People => "people",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Movies => "Popular Movies",
            Category::Tv => "Popular TV Shows",
            Category::People => "Popular People",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}
