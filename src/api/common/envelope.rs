//
//  octane-cli
//  api/common/envelope.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Response envelope normalization and field projection.
//!
//! Octane wraps values in a `{"data": value}` envelope twice over: once around
//! the whole response, and once around every relationship field of an entity.
//!
//! ```json
//! {
//!   "total_count": 1,
//!   "data": [
//!     {"id": "1001", "name": "Login fails", "phase": {"data": {"id": "phase.defect.new"}}}
//!   ]
//! }
//! ```
//!
//! [`normalize`] strips both layers so callers see flat entities:
//!
//! ```json
//! [{"id": "1001", "name": "Login fails", "phase": {"id": "phase.defect.new"}}]
//! ```
//!
//! [`project`] then restricts an entity to the fields the caller asked for.
//!
//! # Example
//!
//! ```rust
//! use octane_cli::api::{normalize, FieldSet, Normalized};
//! use serde_json::json;
//!
//! let raw = json!({"data": {"a": {"data": 5}, "b": 3}});
//! let normalized = normalize(raw).unwrap();
//! assert_eq!(normalized, Normalized::One(json!({"a": 5, "b": 3}).as_object().unwrap().clone()));
//!
//! let fields: FieldSet = "id,name".parse().unwrap();
//! assert_eq!(fields.to_query(), "id,name");
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{ApiError, Result};

/// A flat Octane entity: field name to value.
pub type Entity = Map<String, Value>;

const DATA_KEY: &str = "data";

/// A normalized response: one entity or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    One(Entity),
    Many(Vec<Entity>),
}

impl Normalized {
    /// Restricts every entity to `fields`.
    pub fn project(self, fields: &FieldSet) -> Self {
        match self {
            Self::One(entity) => Self::One(project(&entity, fields)),
            Self::Many(entities) => {
                Self::Many(entities.iter().map(|e| project(e, fields)).collect())
            }
        }
    }

    /// Reduces a single-element collection to that element.
    pub fn collapse(self) -> Self {
        match self {
            Self::Many(mut entities) if entities.len() == 1 => Self::One(entities.remove(0)),
            other => other,
        }
    }

    pub fn first(&self) -> Option<&Entity> {
        match self {
            Self::One(entity) => Some(entity),
            Self::Many(entities) => entities.first(),
        }
    }

    pub fn into_vec(self) -> Vec<Entity> {
        match self {
            Self::One(entity) => vec![entity],
            Self::Many(entities) => entities,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(entities) => entities.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unwraps the top-level envelope and flattens every entity.
///
/// Accepts a bare object, a bare array, or either one wrapped in
/// `{"data": ...}`. Array order is preserved and nothing is deduplicated.
///
/// # Errors
///
/// Returns [`ApiError::UnexpectedShape`] when the payload (or an array
/// element) is not a JSON object.
pub fn normalize(raw: Value) -> Result<Normalized> {
    let payload = match raw {
        Value::Object(mut obj) if obj.contains_key(DATA_KEY) => {
            obj.remove(DATA_KEY).unwrap_or(Value::Null)
        }
        other => other,
    };

    match payload {
        Value::Object(entity) => Ok(Normalized::One(expand(entity))),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(entity) => Ok(expand(entity)),
                other => Err(ApiError::UnexpectedShape(format!(
                    "element {} is {}, expected an object",
                    i,
                    kind_of(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Normalized::Many),
        other => Err(ApiError::UnexpectedShape(format!(
            "payload is {}, expected an object or array",
            kind_of(&other)
        ))),
    }
}

/// Replaces every `{"data": value}` field with `value`.
///
/// Scalars, nulls, arrays and objects without a `data` key pass through.
pub fn expand(entity: Entity) -> Entity {
    entity
        .into_iter()
        .map(|(key, value)| match value {
            Value::Object(mut inner) if inner.contains_key(DATA_KEY) => {
                let data = inner.remove(DATA_KEY).unwrap_or(Value::Null);
                (key, data)
            }
            other => (key, other),
        })
        .collect()
}

/// Keeps only the fields of `entity` that are listed in `fields`.
///
/// A listed field that is absent from the entity is omitted, never
/// defaulted to `null`. A field that is present with a `null` value is kept.
pub fn project(entity: &Entity, fields: &FieldSet) -> Entity {
    fields
        .iter()
        .filter_map(|field| {
            entity
                .get(field)
                .map(|value| (field.to_string(), value.clone()))
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The set of field names requested from Octane.
///
/// Order is preserved for the `fields` query parameter and duplicates are
/// dropped. An empty set is replaced by the default `id,name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet(Vec<String>);

impl FieldSet {
    pub const DEFAULT: [&'static str; 2] = ["id", "name"];

    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into().trim().to_string();
            if !field.is_empty() && !names.contains(&field) {
                names.push(field);
            }
        }

        if names.is_empty() {
            Self::default()
        } else {
            Self(names)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|f| f == field)
    }

    /// Value of the `fields` query parameter.
    pub fn to_query(&self) -> String {
        self.0.join(",")
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self(Self::DEFAULT.iter().map(|f| f.to_string()).collect())
    }
}

impl FromStr for FieldSet {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s.split(',')))
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: Value) -> Entity {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_normalize_single_object() {
        let raw = json!({"data": {"a": {"data": 5}, "b": 3}});
        assert_eq!(
            normalize(raw).unwrap(),
            Normalized::One(entity(json!({"a": 5, "b": 3})))
        );
    }

    #[test]
    fn test_normalize_array_preserves_order() {
        let raw = json!({"data": [{"x": {"data": 1}}, {"x": 2}]});
        assert_eq!(
            normalize(raw).unwrap(),
            Normalized::Many(vec![entity(json!({"x": 1})), entity(json!({"x": 2}))])
        );
    }

    #[test]
    fn test_normalize_without_top_level_envelope() {
        let raw = json!([{"id": "1"}, {"id": "1"}]);
        assert_eq!(normalize(raw).unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_is_idempotent_on_flat_entities() {
        let flat = json!({"id": "1001", "name": "Story", "story_points": 3});
        let once = normalize(flat.clone()).unwrap();
        assert_eq!(once, Normalized::One(entity(flat)));

        let twice = normalize(serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_keeps_nulls_and_plain_objects() {
        let raw = json!({
            "owner": null,
            "phase": {"type": "phase", "id": "phase.story.new"},
            "release": {"data": null},
            "tags": [{"data": 1}]
        });
        let normalized = normalize(raw).unwrap();
        assert_eq!(
            normalized,
            Normalized::One(entity(json!({
                "owner": null,
                "phase": {"type": "phase", "id": "phase.story.new"},
                "release": null,
                "tags": [{"data": 1}]
            })))
        );
    }

    #[test]
    fn test_normalize_rejects_scalars() {
        assert!(matches!(
            normalize(json!({"data": 42})),
            Err(ApiError::UnexpectedShape(_))
        ));
        assert!(matches!(
            normalize(json!([{"id": 1}, "oops"])),
            Err(ApiError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_project_keeps_requested_fields() {
        let e = entity(json!({"id": 1, "name": "n", "extra": "z"}));
        let fields = FieldSet::new(["id", "name"]);
        assert_eq!(project(&e, &fields), entity(json!({"id": 1, "name": "n"})));
    }

    #[test]
    fn test_project_omits_missing_fields() {
        let e = entity(json!({"id": 1}));
        let fields = FieldSet::new(["id", "name"]);
        let projected = project(&e, &fields);
        assert!(!projected.contains_key("name"));
        assert_eq!(projected.len(), 1);
    }

    #[test]
    fn test_collapse_single_element() {
        let many = Normalized::Many(vec![entity(json!({"id": 1}))]);
        assert_eq!(many.collapse(), Normalized::One(entity(json!({"id": 1}))));

        let empty = Normalized::Many(vec![]);
        assert_eq!(empty.collapse(), Normalized::Many(vec![]));
    }

    #[test]
    fn test_field_set_parsing() {
        let fields: FieldSet = "id, name,,phase,id".parse().unwrap();
        assert_eq!(fields.to_query(), "id,name,phase");
        assert!(fields.contains("phase"));

        let empty: FieldSet = "".parse().unwrap();
        assert_eq!(empty, FieldSet::default());
    }
}
