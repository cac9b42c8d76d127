//! Structured predicates over entity fields.
//!
//! A [`Filter`] is built at the call site and forwarded to the store
//! untouched. The Mongo backend translates it into a query document with
//! [`Filter::to_document`]; the in-memory backend evaluates it directly with
//! [`Filter::matches`]. Both follow the same semantics, so a filter behaves
//! identically against either backend.
//!
//! ```ignore
//! use spalce_common::store::Filter;
//!
//! let filter = Filter::eq("status", "open")
//!     .and(Filter::gte("priority", 3))
//!     .and(!Filter::exists("archived_at"));
//! ```

use std::cmp::Ordering;

use mongodb::bson::{doc, Bson, Document};
use uuid::Uuid;

use crate::models::ID_FIELD;

/// A predicate over document fields. Field names may be dotted paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    Eq(String, Bson),
    Ne(String, Bson),
    Gt(String, Bson),
    Gte(String, Bson),
    Lt(String, Bson),
    Lte(String, Bson),
    /// Field equals any of the values.
    In(String, Vec<Bson>),
    /// Field is present (`true`) or absent (`false`).
    Exists(String, bool),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Gt(field.into(), value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Gte(field.into(), value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Lt(field.into(), value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Lte(field.into(), value.into())
    }

    pub fn is_in<V: Into<Bson>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Filter::Exists(field.into(), true)
    }

    /// Identifier equality, using the string form the codecs persist.
    pub fn id(id: Uuid) -> Self {
        Filter::Eq(ID_FIELD.to_string(), Bson::String(id.to_string()))
    }

    /// Identifier membership in `ids`.
    pub fn id_in(ids: &[Uuid]) -> Self {
        Filter::is_in(ID_FIELD, ids.iter().map(|id| id.to_string()))
    }

    /// Conjunction, flattening nested `And`s.
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, other) | (other, Filter::All) => other,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), other) => {
                left.push(other);
                Filter::And(left)
            }
            (this, other) => Filter::And(vec![this, other]),
        }
    }

    /// Disjunction, flattening nested `Or`s.
    pub fn or(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::Or(mut left), Filter::Or(right)) => {
                left.extend(right);
                Filter::Or(left)
            }
            (Filter::Or(mut left), other) => {
                left.push(other);
                Filter::Or(left)
            }
            (this, other) => Filter::Or(vec![this, other]),
        }
    }

    /// Translates the predicate into a MongoDB query document.
    pub fn to_document(&self) -> Document {
        match self {
            Filter::All => Document::new(),
            Filter::Eq(field, value) => field_op(field, "$eq", value.clone()),
            Filter::Ne(field, value) => field_op(field, "$ne", value.clone()),
            Filter::Gt(field, value) => field_op(field, "$gt", value.clone()),
            Filter::Gte(field, value) => field_op(field, "$gte", value.clone()),
            Filter::Lt(field, value) => field_op(field, "$lt", value.clone()),
            Filter::Lte(field, value) => field_op(field, "$lte", value.clone()),
            Filter::In(field, values) => field_op(field, "$in", Bson::Array(values.clone())),
            Filter::Exists(field, present) => field_op(field, "$exists", Bson::Boolean(*present)),
            Filter::And(filters) if filters.is_empty() => Document::new(),
            Filter::And(filters) => doc! { "$and": documents(filters) },
            // $or rejects an empty array; an empty disjunction matches nothing
            Filter::Or(filters) if filters.is_empty() => doc! { "$expr": false },
            Filter::Or(filters) => doc! { "$or": documents(filters) },
            Filter::Not(filter) => doc! { "$nor": [filter.to_document()] },
        }
    }

    /// Evaluates the predicate against a document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => field_eq(lookup(document, field), value),
            Filter::Ne(field, value) => !field_eq(lookup(document, field), value),
            Filter::Gt(field, value) => field_cmp(lookup(document, field), value, Ordering::is_gt),
            Filter::Gte(field, value) => field_cmp(lookup(document, field), value, Ordering::is_ge),
            Filter::Lt(field, value) => field_cmp(lookup(document, field), value, Ordering::is_lt),
            Filter::Lte(field, value) => field_cmp(lookup(document, field), value, Ordering::is_le),
            Filter::In(field, values) => {
                let actual = lookup(document, field);
                values.iter().any(|value| field_eq(actual, value))
            }
            Filter::Exists(field, present) => lookup(document, field).is_some() == *present,
            Filter::And(filters) => filters.iter().all(|f| f.matches(document)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(document)),
            Filter::Not(filter) => !filter.matches(document),
        }
    }
}

impl std::ops::Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        match self {
            Filter::Not(inner) => *inner,
            other => Filter::Not(Box::new(other)),
        }
    }
}

fn field_op(field: &str, op: &str, value: Bson) -> Document {
    let mut condition = Document::new();
    condition.insert(op, value);

    let mut document = Document::new();
    document.insert(field, condition);
    document
}

fn documents(filters: &[Filter]) -> Vec<Document> {
    filters.iter().map(Filter::to_document).collect()
}

/// Resolves a dotted path through embedded documents.
fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Equality with query semantics: a missing field equals null, and an array
/// field equals a scalar when any element does.
fn field_eq(actual: Option<&Bson>, expected: &Bson) -> bool {
    match actual {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| values_eq(item, expected))
        }
        Some(actual) => values_eq(actual, expected),
    }
}

fn values_eq(actual: &Bson, expected: &Bson) -> bool {
    match compare(actual, expected) {
        Some(ordering) => ordering.is_eq(),
        None => actual == expected,
    }
}

fn field_cmp(actual: Option<&Bson>, expected: &Bson, accept: fn(Ordering) -> bool) -> bool {
    match actual {
        Some(Bson::Array(items)) => items
            .iter()
            .any(|item| compare(item, expected).is_some_and(accept)),
        Some(actual) => compare(actual, expected).is_some_and(accept),
        None => false,
    }
}

/// Orders two values of the same kind. Numbers compare across int32, int64
/// and double; other kinds never compare with each other.
fn compare(left: &Bson, right: &Bson) -> Option<Ordering> {
    match (left, right) {
        (Bson::String(l), Bson::String(r)) => Some(l.cmp(r)),
        (Bson::Boolean(l), Bson::Boolean(r)) => Some(l.cmp(r)),
        (Bson::DateTime(l), Bson::DateTime(r)) => Some(l.cmp(r)),
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        _ => match (integer(left), integer(right)) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => number(left)?.partial_cmp(&number(right)?),
        },
    }
}

fn integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        _ => None,
    }
}

fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        doc! {
            "_id": "a1",
            "name": "widget",
            "price": 12.5,
            "stock": 4_i32,
            "tags": ["blue", "sale"],
            "vendor": { "country": "NZ", "rating": 5_i64 },
            "discontinued": false,
        }
    }

    #[test]
    fn test_all_matches_and_translates_to_empty() {
        assert!(Filter::All.matches(&sample()));
        assert!(Filter::All.to_document().is_empty());
    }

    #[test]
    fn test_eq_translation() {
        assert_eq!(
            Filter::eq("name", "widget").to_document(),
            doc! { "name": { "$eq": "widget" } }
        );
    }

    #[test]
    fn test_id_uses_string_form() {
        let id = Uuid::new_v4();
        assert_eq!(
            Filter::id(id).to_document(),
            doc! { "_id": { "$eq": id.to_string() } }
        );
    }

    #[test]
    fn test_id_in_translation() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        assert_eq!(
            Filter::id_in(&ids).to_document(),
            doc! { "_id": { "$in": [ids[0].to_string(), ids[1].to_string()] } }
        );
    }

    #[test]
    fn test_combinators_flatten() {
        let filter = Filter::eq("a", 1).and(Filter::eq("b", 2)).and(Filter::eq("c", 3));
        match &filter {
            Filter::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }

        let filter = Filter::eq("a", 1).or(Filter::eq("b", 2)).or(Filter::eq("c", 3));
        match &filter {
            Filter::Or(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn test_and_with_all_is_identity() {
        assert_eq!(Filter::All.and(Filter::eq("a", 1)), Filter::eq("a", 1));
    }

    #[test]
    fn test_double_negation_cancels() {
        assert_eq!(!!Filter::eq("a", 1), Filter::eq("a", 1));
    }

    #[test]
    fn test_not_translates_to_nor() {
        assert_eq!(
            (!Filter::eq("a", 1)).to_document(),
            doc! { "$nor": [{ "a": { "$eq": 1 } }] }
        );
    }

    #[test]
    fn test_empty_or_matches_nothing() {
        assert!(!Filter::Or(Vec::new()).matches(&sample()));
        assert_eq!(Filter::Or(Vec::new()).to_document(), doc! { "$expr": false });
    }

    #[test]
    fn test_numeric_comparisons_cross_types() {
        let document = sample();
        assert!(Filter::gt("price", 12_i32).matches(&document));
        assert!(Filter::lte("stock", 4.0).matches(&document));
        assert!(Filter::eq("stock", 4_i64).matches(&document));
        assert!(!Filter::lt("stock", 4_i32).matches(&document));
    }

    #[test]
    fn test_mismatched_kinds_never_compare() {
        assert!(!Filter::gt("name", 1_i32).matches(&sample()));
        assert!(!Filter::eq("stock", "4").matches(&sample()));
    }

    #[test]
    fn test_dotted_paths() {
        let document = sample();
        assert!(Filter::eq("vendor.country", "NZ").matches(&document));
        assert!(Filter::gte("vendor.rating", 5_i32).matches(&document));
        assert!(!Filter::exists("vendor.city").matches(&document));
        assert!(!Filter::exists("name.first").matches(&document));
    }

    #[test]
    fn test_array_membership() {
        let document = sample();
        assert!(Filter::eq("tags", "sale").matches(&document));
        assert!(Filter::is_in("tags", ["red", "blue"]).matches(&document));
        assert!(!Filter::eq("tags", "red").matches(&document));
    }

    #[test]
    fn test_missing_field_equals_null() {
        let document = sample();
        assert!(Filter::eq("archived_at", Bson::Null).matches(&document));
        assert!(Filter::ne("archived_at", "x").matches(&document));
        assert!(!Filter::gt("archived_at", 0_i32).matches(&document));
    }

    #[test]
    fn test_boolean_logic() {
        let document = sample();
        let filter = Filter::eq("discontinued", false)
            .and(Filter::eq("name", "gadget").or(Filter::lt("stock", 10_i32)));
        assert!(filter.matches(&document));
        assert!(!(!filter).matches(&document));
    }
}
