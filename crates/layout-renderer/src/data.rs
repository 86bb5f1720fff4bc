//! Global and page data merging.

use serde_json::{Map, Value};

/// Top-level template data: string keys to arbitrary JSON values.
pub type DataMap = Map<String, Value>;

/// Overlay `page` onto a copy of `global`.
///
/// Page entries win on key collision. Only top-level keys are merged; nested
/// objects are replaced wholesale. A missing or non-object `page` contributes
/// nothing. Neither input is modified.
pub fn merge(global: &DataMap, page: Option<&Value>) -> DataMap {
    let mut merged = global.clone();
    if let Some(Value::Object(page)) = page {
        for (key, value) in page {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
