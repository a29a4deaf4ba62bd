use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered list of selections against a single object-typed position in
/// an operation document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SelectionSet {
    pub items: Vec<SelectionItem>,
}

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum SelectionItem {
    Field(FieldSelection),
    InlineFragment(InlineFragmentSelection),
    FragmentSpread(FragmentSpread),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSelection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "SelectionSet::is_empty")]
    pub selections: SelectionSet,
}

impl FieldSelection {
    /// The key this field is written under in a response object: the alias
    /// if present, otherwise the field name itself.
    pub fn response_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFragmentSelection {
    #[serde(default)]
    pub type_condition: Option<String>,
    pub selections: SelectionSet,
}

/// A reference to a named fragment, resolved against an operation's
/// fragment table. Plan-internal selection sets (requires, entity fetch
/// selections) never contain these — they are only expected in the
/// client's own operation document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FragmentSpread(pub String);

impl fmt::Display for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for item in &self.items {
            write!(f, "{} ", item)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for SelectionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionItem::Field(field) => write!(f, "{}", field),
            SelectionItem::InlineFragment(fragment) => write!(f, "{}", fragment),
            SelectionItem::FragmentSpread(FragmentSpread(name)) => write!(f, "...{}", name),
        }
    }
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}: {}", alias, self.name)?,
            None => write!(f, "{}", self.name)?,
        }
        if !self.selections.is_empty() {
            write!(f, " {}", self.selections)?;
        }
        Ok(())
    }
}

impl fmt::Display for InlineFragmentSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_condition {
            Some(type_condition) => write!(f, "... on {} {}", type_condition, self.selections),
            None => write!(f, "... {}", self.selections),
        }
    }
}
