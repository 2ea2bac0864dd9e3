//! Style and include expansion over raw JSON, ahead of decoding.
//!
//! Resolution happens on `serde_json::Value` so included fragments and
//! style defaults go through exactly the same decode path as inline
//! nodes. Caches are plain injected structs; nothing here is global.

use std::collections::HashMap;
use std::time::SystemTime;

use serde_json::{Map, Value};
use tracing::warn;

use crate::binding::{StateStore, StateValue};

/// Bound on transitive include nesting. Exceeding it drops the node,
/// which is what breaks self-inclusion loops.
const MAX_INCLUDE_DEPTH: usize = 8;

const STYLE_KEY: &str = "style";
const INCLUDE_KEY: &str = "include";
/// Include payload keys, in merge order (later wins).
const INCLUDE_DATA_KEYS: &[&str] = &["shared_data", "sharedData", "variables", "data"];

/// Provider of raw layout and style documents by name.
pub trait DocumentSource {
    fn load_layout(&self, name: &str) -> Option<String>;
    fn load_style(&self, name: &str) -> Option<String>;
    /// Modification stamp used for development-mode revalidation.
    fn layout_stamp(&self, _name: &str) -> Option<SystemTime> {
        None
    }
    fn style_stamp(&self, _name: &str) -> Option<SystemTime> {
        None
    }
}

/// Parsed style fragments keyed by name.
///
/// In development mode every hit is revalidated against the source's
/// modification stamp; in release mode a loaded entry lives until
/// [`StyleCache::clear`]. The invalidation methods are the public
/// contract hosts use when a reload notification arrives.
pub struct StyleCache {
    entries: HashMap<String, StyleEntry>,
    development: bool,
}

struct StyleEntry {
    fragment: Value,
    stamp: Option<SystemTime>,
}

impl StyleCache {
    pub fn new(development: bool) -> StyleCache {
        StyleCache { entries: HashMap::new(), development }
    }

    pub fn fragment(&mut self, name: &str, source: &dyn DocumentSource) -> Option<Value> {
        if self.development {
            let current = source.style_stamp(name);
            let stale = match self.entries.get(name) {
                Some(entry) => entry.stamp != current,
                None => false,
            };
            if stale {
                self.entries.remove(name);
            }
        }
        if let Some(entry) = self.entries.get(name) {
            return Some(entry.fragment.clone());
        }
        let text = source.load_style(name)?;
        let fragment = match serde_json::from_str::<Value>(&text) {
            Ok(v) => v,
            Err(e) => {
                warn!(style = name, "unparseable style fragment: {e}");
                return None;
            }
        };
        let stamp = source.style_stamp(name);
        self.entries
            .insert(name.to_string(), StyleEntry { fragment: fragment.clone(), stamp });
        Some(fragment)
    }

    pub fn invalidate(&mut self, name: &str) {
        self.entries.remove(name);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deep object merge: `over` wins per key, object values merge
/// recursively, everything else is replaced wholesale.
pub fn deep_merge(base: &Value, over: &Value) -> Value {
    match (base, over) {
        (Value::Object(b), Value::Object(o)) => Value::Object(deep_merge_maps(b, o)),
        _ => over.clone(),
    }
}

fn deep_merge_maps(base: &Map<String, Value>, over: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (key, value) in over {
        let merged = match (base.get(key), value) {
            (Some(prev @ Value::Object(_)), Value::Object(_)) => deep_merge(prev, value),
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

/// Walks a raw layout document expanding `style` and `include` nodes.
pub struct Resolver<'a> {
    source: &'a dyn DocumentSource,
    styles: &'a mut StyleCache,
}

impl<'a> Resolver<'a> {
    pub fn new(source: &'a dyn DocumentSource, styles: &'a mut StyleCache) -> Resolver<'a> {
        Resolver { source, styles }
    }

    /// `state` is the parent screen's live state, consulted one-shot for
    /// include variables of the exact form `"@{prop}"`.
    pub fn resolve(&mut self, value: &Value, state: &StateStore) -> Value {
        self.resolve_at(value, state, 0)
    }

    fn resolve_at(&mut self, value: &Value, state: &StateStore, depth: usize) -> Value {
        match value {
            Value::Object(map) => self.resolve_object(map, state, depth),
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.resolve_at(v, state, depth)).collect())
            }
            other => other.clone(),
        }
    }

    fn resolve_object(&mut self, map: &Map<String, Value>, state: &StateStore, depth: usize) -> Value {
        // Styles merge first: the styled node may itself be an include.
        let node = match map.get(STYLE_KEY).and_then(Value::as_str) {
            Some(style_name) => {
                let style_name = style_name.to_string();
                let mut stripped = map.clone();
                stripped.remove(STYLE_KEY);
                match self.styles.fragment(&style_name, self.source) {
                    Some(Value::Object(fragment)) => deep_merge_maps(&fragment, &stripped),
                    Some(_) => {
                        warn!(style = %style_name, "style fragment is not an object, ignoring");
                        stripped
                    }
                    None => {
                        warn!(style = %style_name, "style not found, leaving node unstyled");
                        stripped
                    }
                }
            }
            None => map.clone(),
        };

        if let Some(include_name) = node.get(INCLUDE_KEY).and_then(Value::as_str) {
            let include_name = include_name.to_string();
            return self.resolve_include(&include_name, &node, state, depth);
        }

        let mut out = Map::new();
        for (key, value) in &node {
            out.insert(key.clone(), self.resolve_at(value, state, depth));
        }
        Value::Object(out)
    }

    /// Inlines another named document in place of the include node.
    /// Missing targets resolve to `Null`, which the decoder then drops.
    fn resolve_include(
        &mut self,
        name: &str,
        node: &Map<String, Value>,
        state: &StateStore,
        depth: usize,
    ) -> Value {
        if depth >= MAX_INCLUDE_DEPTH {
            warn!(include = name, depth, "include nesting too deep, dropping node");
            return Value::Null;
        }
        let Some(text) = self.source.load_layout(name) else {
            warn!(include = name, "included layout not found, dropping node");
            return Value::Null;
        };
        let fragment = match serde_json::from_str::<Value>(&text) {
            Ok(v) => v,
            Err(e) => {
                warn!(include = name, "included layout is not valid JSON: {e}");
                return Value::Null;
            }
        };

        // Substitute before descending so variables reach the data
        // payloads of includes nested inside the fragment.
        let variables = include_variables(node, state);
        let substituted = substitute_variables(&fragment, &variables);
        let resolved = self.resolve_at(&substituted, state, depth + 1);

        // Keys besides the include machinery override the fragment root.
        let mut overrides = Map::new();
        for (key, value) in node {
            if key == INCLUDE_KEY || INCLUDE_DATA_KEYS.contains(&key.as_str()) {
                continue;
            }
            overrides.insert(key.clone(), self.resolve_at(value, state, depth));
        }
        if overrides.is_empty() {
            resolved
        } else {
            deep_merge(&resolved, &Value::Object(overrides))
        }
    }
}

/// Builds the variable dictionary for one include node. Payload tiers
/// merge shared-data first and caller `data` last, so explicit data wins.
/// A value that is exactly `"@{prop}"` snapshots the parent screen's
/// state entry at resolve time.
fn include_variables(node: &Map<String, Value>, state: &StateStore) -> HashMap<String, Value> {
    let mut variables = HashMap::new();
    for key in INCLUDE_DATA_KEYS {
        if let Some(Value::Object(map)) = node.get(*key) {
            for (name, value) in map {
                variables.insert(name.clone(), variable_value(value, state));
            }
        }
    }
    variables
}

fn variable_value(value: &Value, state: &StateStore) -> Value {
    if let Some(reference) = value.as_str().and_then(whole_reference) {
        return state.get(reference).map(StateValue::to_json).unwrap_or(Value::Null);
    }
    value.clone()
}

fn whole_reference(text: &str) -> Option<&str> {
    let inner = text.trim().strip_prefix("@{")?.strip_suffix('}')?;
    Some(crate::binding::trim_reference(inner))
}

/// Replaces `@{name}` references that match include-supplied variables.
/// A string that IS exactly one reference keeps the variable's JSON type;
/// embedded references splice in display text. Unknown names stay
/// verbatim for the render-time interpolation pass.
fn substitute_variables(value: &Value, variables: &HashMap<String, Value>) -> Value {
    if variables.is_empty() {
        return value.clone();
    }
    match value {
        Value::String(s) => substitute_in_string(s, variables),
        Value::Array(items) => {
            Value::Array(items.iter().map(|v| substitute_variables(v, variables)).collect())
        }
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), substitute_variables(v, variables));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn substitute_in_string(text: &str, variables: &HashMap<String, Value>) -> Value {
    if let Some(name) = whole_reference(text) {
        return match variables.get(name) {
            Some(replacement) => replacement.clone(),
            None => Value::String(text.to_string()),
        };
    }
    if !text.contains("@{") {
        return Value::String(text.to_string());
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("@{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = crate::binding::trim_reference(&after[..end]);
                match variables.get(name) {
                    Some(replacement) => out.push_str(&display_text(replacement)),
                    // Not ours: leave for render-time interpolation.
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Value::String(out)
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct MapSource {
        layouts: HashMap<String, String>,
        styles: HashMap<String, String>,
    }

    impl MapSource {
        fn with_layout(mut self, name: &str, value: &Value) -> Self {
            self.layouts.insert(name.to_string(), value.to_string());
            self
        }

        fn with_style(mut self, name: &str, value: &Value) -> Self {
            self.styles.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl DocumentSource for MapSource {
        fn load_layout(&self, name: &str) -> Option<String> {
            self.layouts.get(name).cloned()
        }

        fn load_style(&self, name: &str) -> Option<String> {
            self.styles.get(name).cloned()
        }
    }

    fn resolve(source: &MapSource, doc: Value) -> Value {
        let mut styles = StyleCache::new(false);
        let state = StateStore::new();
        Resolver::new(source, &mut styles).resolve(&doc, &state)
    }

    #[test]
    fn component_keys_win_over_style_keys() {
        let source = MapSource::default().with_style(
            "card",
            &json!({"background": "#EEEEEE", "cornerRadius": 8, "padding": 12}),
        );
        let resolved = resolve(
            &source,
            json!({"type": "View", "style": "card", "background": "#FF0000"}),
        );
        assert_eq!(resolved["background"], json!("#FF0000"));
        assert_eq!(resolved["cornerRadius"], json!(8));
        assert_eq!(resolved.get("style"), None);
    }

    #[test]
    fn nested_style_objects_merge_recursively() {
        let source = MapSource::default()
            .with_style("boxed", &json!({"shadow": {"color": "black", "radius": 6}}));
        let resolved = resolve(
            &source,
            json!({"type": "View", "style": "boxed", "shadow": {"radius": 2}}),
        );
        assert_eq!(resolved["shadow"], json!({"color": "black", "radius": 2}));
    }

    #[test]
    fn missing_style_leaves_node_unstyled() {
        let source = MapSource::default();
        let resolved = resolve(&source, json!({"type": "View", "style": "ghost", "padding": 4}));
        assert_eq!(resolved, json!({"type": "View", "padding": 4}));
    }

    #[test]
    fn include_inlines_and_substitutes_variables() {
        let source = MapSource::default().with_layout(
            "row",
            &json!({
                "type": "View",
                "child": [{"type": "Label", "text": "Hi @{user}", "maxLines": "@{lines}"}],
            }),
        );
        let resolved = resolve(
            &source,
            json!({"include": "row", "data": {"user": "Ada", "lines": 3}}),
        );
        assert_eq!(resolved["type"], json!("View"));
        assert_eq!(resolved["child"][0]["text"], json!("Hi Ada"));
        // Whole-string reference keeps the JSON type.
        assert_eq!(resolved["child"][0]["maxLines"], json!(3));
    }

    #[test]
    fn caller_data_wins_over_shared_data() {
        let source = MapSource::default()
            .with_layout("badge", &json!({"type": "Label", "text": "@{label}"}));
        let resolved = resolve(
            &source,
            json!({
                "include": "badge",
                "shared_data": {"label": "shared"},
                "data": {"label": "explicit"},
            }),
        );
        assert_eq!(resolved["text"], json!("explicit"));
    }

    #[test]
    fn include_resolves_state_references_one_shot() {
        let source = MapSource::default()
            .with_layout("greeting", &json!({"type": "Label", "text": "@{who}"}));
        let mut styles = StyleCache::new(false);
        let mut state = StateStore::new();
        state.set("currentUser", StateValue::Text("Grace".to_string()));
        let resolved = Resolver::new(&source, &mut styles).resolve(
            &json!({"include": "greeting", "data": {"who": "@{currentUser}"}}),
            &state,
        );
        assert_eq!(resolved["text"], json!("Grace"));
    }

    #[test]
    fn unknown_variables_stay_for_render_time() {
        let source = MapSource::default()
            .with_layout("late", &json!({"type": "Label", "text": "Hello @{name}"}));
        let resolved = resolve(&source, json!({"include": "late", "data": {"other": 1}}));
        assert_eq!(resolved["text"], json!("Hello @{name}"));
    }

    #[test]
    fn include_node_keys_override_fragment_root() {
        let source = MapSource::default()
            .with_layout("panel", &json!({"type": "View", "background": "#FFFFFF"}));
        let resolved = resolve(
            &source,
            json!({"include": "panel", "background": "#000000", "id": "p1"}),
        );
        assert_eq!(resolved["background"], json!("#000000"));
        assert_eq!(resolved["id"], json!("p1"));
    }

    #[test]
    fn missing_include_drops_the_node() {
        let source = MapSource::default();
        let resolved = resolve(&source, json!({"include": "ghost"}));
        assert_eq!(resolved, Value::Null);
    }

    #[test]
    fn self_inclusion_is_bounded() {
        let source =
            MapSource::default().with_layout("loop", &json!({"include": "loop"}));
        // Each nesting level re-expands the same node; the depth bound
        // must collapse the whole chain instead of spinning forever.
        let resolved = resolve(&source, json!({"include": "loop"}));
        assert_eq!(resolved, Value::Null);
    }

    #[test]
    fn style_cache_counts_entries() {
        let source = MapSource::default().with_style("a", &json!({"padding": 1}));
        let mut styles = StyleCache::new(false);
        let state = StateStore::new();
        let doc = json!({"type": "View", "style": "a"});
        Resolver::new(&source, &mut styles).resolve(&doc, &state);
        assert_eq!(styles.len(), 1);
        styles.clear();
        assert!(styles.is_empty());
    }
}
