//! Recursive key-wise merge of fetch replies into the working result tree.
//! Sub-objects merge in place; scalars, lists, and nulls arriving from
//! `source` always overwrite whatever `target` held — lists are replaced
//! wholesale, never concatenated element-wise.

use serde_json::Value;
use tracing::{instrument, trace};

#[instrument(level = "trace", name = "deep_merge", skip_all)]
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            trace!(
                target_keys = target_map.len(),
                source_keys = source_map.len(),
                "merging objects"
            );
            for (key, source_value) in source_map {
                match target_map.get_mut(&key) {
                    Some(target_value) => deep_merge(target_value, source_value),
                    None => {
                        target_map.insert(key, source_value);
                    }
                }
            }
        }
        (target, source) => {
            *target = source;
        }
    }
}
