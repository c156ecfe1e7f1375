//! Structural validators for submitted records.
//!
//! The `validate_*` functions turn loosely typed request input into drafts,
//! collecting every field problem. The `check_*` functions apply the same
//! rules to an already typed draft and are what the store runs before each
//! write, so both layers share one rule set.

use serde::{Deserialize, Deserializer};

use crate::error::FieldErrors;
use crate::id::RecordId;
use crate::model::{Category, FarmDraft, ProductDraft};

/// Product fields as submitted by a form or JSON body.
///
/// Every field accepts text, numbers or booleans; conversion happens during
/// validation so a bad value becomes a field message rather than a parse
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductInput {
    /// Product name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Price as text or number.
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    /// Category name, any case.
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    /// Owning farm id.
    #[serde(default, deserialize_with = "lenient_text")]
    pub farm: Option<String>,
}

/// Farm fields as submitted by a form or JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FarmInput {
    /// Farm name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Town or city.
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    /// Contact email.
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
}

/// Validates product input, returning a draft or every field message.
pub fn validate_product(input: &ProductInput) -> Result<ProductDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = match input.name.as_deref() {
        None => {
            errors.add("name", required("name"));
            None
        }
        Some(raw) => {
            let name = raw.trim();
            match name_rule("name", name) {
                Some(msg) => {
                    errors.add("name", msg);
                    None
                }
                None => Some(name.to_string()),
            }
        }
    };

    let price = match input.price.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("price", required("price"));
            None
        }
        Some(raw) => match raw.parse::<f64>() {
            Ok(price) => match price_rule(price) {
                Some(msg) => {
                    errors.add("price", msg);
                    None
                }
                None => Some(price),
            },
            Err(_) => {
                errors.add("price", "\"price\" must be a number");
                None
            }
        },
    };

    let category = match input.category.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("category", required("category"));
            None
        }
        Some(raw) => {
            let category = Category::normalize(raw);
            if category.is_none() {
                errors.add("category", category_message());
            }
            category
        }
    };

    let farm = match input.farm.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<RecordId>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add("farm", "\"farm\" must be a valid id");
                None
            }
        },
    };

    match (name, price, category) {
        (Some(name), Some(price), Some(category)) if errors.is_empty() => Ok(ProductDraft {
            name,
            price,
            category,
            farm,
        }),
        _ => Err(errors),
    }
}

/// Re-checks a typed product draft before it is written.
pub fn check_product(draft: &ProductDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Some(msg) = name_rule("name", draft.name.trim()) {
        errors.add("name", msg);
    }
    if let Some(msg) = price_rule(draft.price) {
        errors.add("price", msg);
    }
    errors.into_result(())
}

/// Validates farm input, returning a draft or every field message.
pub fn validate_farm(input: &FarmInput) -> Result<FarmDraft, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = input.name.as_deref().map(str::trim);
    match name {
        None => errors.add("name", required("name")),
        Some(name) => {
            if let Some(msg) = name_rule("name", name) {
                errors.add("name", msg);
            }
        }
    }

    let draft = FarmDraft {
        name: name.unwrap_or_default().to_string(),
        city: non_blank(input.city.as_deref()),
        email: non_blank(input.email.as_deref()),
    };
    if let Some(msg) = email_rule(draft.email.as_deref()) {
        errors.add("email", msg);
    }
    errors.into_result(draft)
}

/// Re-checks a typed farm draft before it is written.
pub fn check_farm(draft: &FarmDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Some(msg) = name_rule("name", draft.name.trim()) {
        errors.add("name", msg);
    }
    if let Some(msg) = email_rule(draft.email.as_deref()) {
        errors.add("email", msg);
    }
    errors.into_result(())
}

fn required(field: &str) -> String {
    format!("\"{field}\" is required")
}

fn name_rule(field: &str, value: &str) -> Option<String> {
    value
        .is_empty()
        .then(|| format!("\"{field}\" is not allowed to be empty"))
}

fn price_rule(price: f64) -> Option<String> {
    if !price.is_finite() {
        Some("\"price\" must be a number".to_string())
    } else if price < 0.0 {
        Some("\"price\" must be greater than or equal to 0".to_string())
    } else {
        None
    }
}

fn email_rule(email: Option<&str>) -> Option<String> {
    let valid = email.map_or(true, |email| {
        email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && !domain.is_empty())
    });
    (!valid).then(|| "\"email\" must be a valid email".to_string())
}

fn category_message() -> String {
    format!(
        "\"category\" must be one of [{}]",
        Category::names().join(", ")
    )
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Accepts strings, numbers, booleans and null as optional text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientText;

    impl<'de> serde::de::Visitor<'de> for LenientText {
        type Value = Option<String>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(LenientText)
        }
    }

    deserializer.deserialize_any(LenientText)
}
