use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(UserId);

/// Catalog entry. Seeded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl Product {
    pub fn new(id: i64, name: &str, price: f64, category: &str) -> Self {
        Self {
            id: ProductId(id),
            name: name.to_string(),
            price,
            category: category.to_string(),
        }
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Case-insensitive substring match that also ignores accents on vowels,
    /// so "portatil" and "a" both find "Portátil". This is deliberately looser
    /// than a plain lowercase comparison: unaccented search terms still reach
    /// accented product names. Category matching does not fold accents.
    pub fn name_contains(&self, term: &str) -> bool {
        fold_for_search(&self.name).contains(&fold_for_search(term))
    }
}

fn fold_for_search(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Registration data before the registry assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i64,
    pub city: String,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub city: String,
    pub interests: Vec<String>,
}

impl User {
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
            age: new_user.age,
            city: new_user.city,
            interests: new_user.interests,
        }
    }
}
