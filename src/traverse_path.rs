//! Walks a `ResponsePath` against the working tree, descending through
//! object fields by name and fanning out over arrays at the `@` marker.
//!
//! Two entry points share one shape of logic: [`flatten_ref`] for building
//! representations (read-only) and [`flatten_mut`] for writing fetch
//! results back (exclusive). They're kept as separate hand-written
//! functions rather than one generic over reference mutability — chasing
//! that abstraction through `serde_json::Value`'s API isn't worth it here.

use serde_json::Value;
use tracing::instrument;

use crate::plan::LIST_MARKER;

/// The result of flattening a path: either a single value (the common
/// case — a plain field chain with no `@` segments) or a list produced by
/// one or more array fan-outs along the way.
pub enum Flattened<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> Flattened<T> {
    /// Entity-normalize: a single value becomes a one-element list, a list
    /// stays as-is.
    pub fn into_entities(self) -> Vec<T> {
        match self {
            Flattened::Single(v) => vec![v],
            Flattened::Many(vs) => vs,
        }
    }
}

#[instrument(level = "trace", skip_all, fields(remaining_path = ?path))]
pub fn flatten_ref<'a>(value: &'a Value, path: &[String]) -> Flattened<&'a Value> {
    let Some((head, tail)) = path.split_first() else {
        return Flattened::Single(value);
    };
    if value.is_null() {
        return Flattened::Single(value);
    }
    if head == LIST_MARKER {
        let items = value.as_array().map(|a| a.as_slice()).unwrap_or(&[]);
        let mut out = Vec::new();
        for item in items {
            match flatten_ref(item, tail) {
                Flattened::Single(v) => out.push(v),
                Flattened::Many(vs) => out.extend(vs),
            }
        }
        return Flattened::Many(out);
    }
    match value.get(head.as_str()) {
        Some(child) => flatten_ref(child, tail),
        None => Flattened::Single(value),
    }
}

#[instrument(level = "trace", skip_all, fields(remaining_path = ?path))]
pub fn flatten_mut<'a>(value: &'a mut Value, path: &[String]) -> Flattened<&'a mut Value> {
    let Some((head, tail)) = path.split_first() else {
        return Flattened::Single(value);
    };
    if value.is_null() {
        return Flattened::Single(value);
    }
    if head == LIST_MARKER {
        let items = value.as_array_mut().map(|a| a.as_mut_slice()).unwrap_or(&mut []);
        let mut out = Vec::new();
        for item in items {
            match flatten_mut(item, tail) {
                Flattened::Single(v) => out.push(v),
                Flattened::Many(vs) => out.extend(vs),
            }
        }
        return Flattened::Many(out);
    }
    if !value.is_object() {
        return Flattened::Single(value);
    }
    let entry = value
        .as_object_mut()
        .unwrap()
        .entry(head.as_str())
        .or_insert(Value::Null);
    flatten_mut(entry, tail)
}
