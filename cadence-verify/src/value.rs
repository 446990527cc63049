//! Dot-path lookup over step output.
//!
//! Step output is a `serde_json::Value` — the tagged union of
//! null/bool/number/string/list/map — so field access never relies on
//! duck typing. Paths look like `"groups[0].id"`: segments split on `.`,
//! each segment optionally followed by one or more `[index]` suffixes.

use serde_json::Value;

/// Resolve `path` inside `root`.
///
/// Returns `None` when any segment is missing, indexes out of range, or a
/// segment is applied to the wrong shape. The empty path resolves to the
/// root itself.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for segment in path.split('.') {
        let (name, indices) = parse_segment(segment)?;
        if !name.is_empty() {
            current = current.as_object()?.get(name)?;
        }
        for index in indices {
            current = current.as_array()?.get(index)?;
        }
    }
    Some(current)
}

/// `"groups[0][1]"` → `("groups", [0, 1])`; `"[2]"` → `("", [2])`.
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let Some(bracket) = segment.find('[') else {
        return Some((segment, Vec::new()));
    };
    let name = &segment[..bracket];
    let mut indices = Vec::new();
    let mut rest = &segment[bracket..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let close = stripped.find(']')?;
        indices.push(stripped[..close].parse().ok()?);
        rest = &stripped[close + 1..];
    }
    if !rest.is_empty() {
        return None;
    }
    Some((name, indices))
}
