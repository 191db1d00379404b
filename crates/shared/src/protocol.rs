use serde::{de, Deserialize, Deserializer, Serialize};

use crate::domain::{NewUser, Product, User};

/// A form field that may be submitted once or repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        value.into_vec()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(rename = "categoria")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "mensaje")]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationForm {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "edad")]
    pub age: i64,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "intereses")]
    pub interests: OneOrMany<String>,
}

impl From<RegistrationForm> for NewUser {
    fn from(form: RegistrationForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            age: form.age,
            city: form.city,
            interests: form.interests.into_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
    #[serde(rename = "termino")]
    pub term: String,
    #[serde(rename = "precio_min", default, deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    #[serde(rename = "precio_max", default, deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
}

/// HTML forms submit untouched number inputs as empty strings.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<f64>().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
}

/// Result of a product lookup. A missing product is a renderable state,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProductLookup {
    Found { product: Product },
    NotFound { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<Product>,
    pub term: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactReceipt {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub user: User,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
