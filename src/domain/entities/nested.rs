//! Nested child collections of content entities.
//!
//! A payload carries each collection as a [`NestedField`], which keeps the
//! difference between "not sent" and "sent empty" in the type instead of in
//! the presence of a JSON key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::value_objects::RowShape;

/// Three-state payload value for one nested collection.
///
/// JSON mapping: a missing key or `null` is [`NestedField::Unset`], `[]` is
/// [`NestedField::Clear`] and a non-empty array is [`NestedField::Set`].
/// Struct fields of this type need `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NestedField<T> {
    /// Leave the stored collection untouched.
    #[default]
    Unset,
    /// Remove every stored row.
    Clear,
    /// Replace the stored rows with these, in order.
    Set(Vec<T>),
}

impl<T> NestedField<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Rows the collection should hold afterwards, or `None` when untouched.
    pub fn into_rows(self) -> Option<Vec<T>> {
        match self {
            Self::Unset => None,
            Self::Clear => Some(Vec::new()),
            Self::Set(rows) => Some(rows),
        }
    }
}

impl<T> From<Option<Vec<T>>> for NestedField<T> {
    fn from(value: Option<Vec<T>>) -> Self {
        match value {
            None => Self::Unset,
            Some(rows) if rows.is_empty() => Self::Clear,
            Some(rows) => Self::Set(rows),
        }
    }
}

impl<T> From<Vec<T>> for NestedField<T> {
    fn from(rows: Vec<T>) -> Self {
        Some(rows).into()
    }
}

impl<'de, T> Deserialize<'de> for NestedField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Vec<T>>::deserialize(deserializer).map(Self::from)
    }
}

impl<T: Serialize> Serialize for NestedField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset => serializer.serialize_none(),
            Self::Clear => Vec::<T>::new().serialize(serializer),
            Self::Set(rows) => rows.serialize(serializer),
        }
    }
}

/// Owned child row of `service_deliverables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Owned child row of `service_process_steps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Owned child row of `service_faqs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// The ordered rows of one collection, typed by row shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChildRows {
    /// Target ids of a link table.
    Links(Vec<i64>),
    Deliverables(Vec<Deliverable>),
    ProcessSteps(Vec<ProcessStep>),
    Faqs(Vec<Faq>),
}

/// Borrowed view of a single row inside [`ChildRows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRow<'a> {
    Link(i64),
    Deliverable(&'a Deliverable),
    ProcessStep(&'a ProcessStep),
    Faq(&'a Faq),
}

impl ChildRows {
    /// An empty row list of the given shape.
    pub fn empty(shape: RowShape) -> Self {
        match shape {
            RowShape::Link => Self::Links(Vec::new()),
            RowShape::Deliverable => Self::Deliverables(Vec::new()),
            RowShape::ProcessStep => Self::ProcessSteps(Vec::new()),
            RowShape::Faq => Self::Faqs(Vec::new()),
        }
    }

    pub fn shape(&self) -> RowShape {
        match self {
            Self::Links(_) => RowShape::Link,
            Self::Deliverables(_) => RowShape::Deliverable,
            Self::ProcessSteps(_) => RowShape::ProcessStep,
            Self::Faqs(_) => RowShape::Faq,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Links(rows) => rows.len(),
            Self::Deliverables(rows) => rows.len(),
            Self::ProcessSteps(rows) => rows.len(),
            Self::Faqs(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows in array order.
    pub fn rows(&self) -> Vec<ChildRow<'_>> {
        match self {
            Self::Links(ids) => ids.iter().map(|id| ChildRow::Link(*id)).collect(),
            Self::Deliverables(rows) => rows.iter().map(ChildRow::Deliverable).collect(),
            Self::ProcessSteps(rows) => rows.iter().map(ChildRow::ProcessStep).collect(),
            Self::Faqs(rows) => rows.iter().map(ChildRow::Faq).collect(),
        }
    }

    pub fn as_links(&self) -> Option<&[i64]> {
        match self {
            Self::Links(ids) => Some(ids),
            _ => None,
        }
    }
}
