//! Runtime state, `@{name}` interpolation, and binding descriptors.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Dynamic value held by the state store, mirroring JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<StateValue>),
    Map(HashMap<String, StateValue>),
}

impl StateValue {
    pub fn from_json(value: &Value) -> StateValue {
        match value {
            Value::Null => StateValue::Null,
            Value::Bool(b) => StateValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(StateValue::Number).unwrap_or(StateValue::Null),
            Value::String(s) => StateValue::Text(s.clone()),
            Value::Array(items) => {
                StateValue::List(items.iter().map(StateValue::from_json).collect())
            }
            Value::Object(map) => StateValue::Map(
                map.iter().map(|(k, v)| (k.clone(), StateValue::from_json(v))).collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            StateValue::Null => Value::Null,
            StateValue::Bool(b) => Value::Bool(*b),
            StateValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            StateValue::Text(s) => Value::String(s.clone()),
            StateValue::List(items) => Value::Array(items.iter().map(StateValue::to_json).collect()),
            StateValue::Map(map) => {
                let mut out = serde_json::Map::new();
                for (k, v) in map {
                    out.insert(k.clone(), v.to_json());
                }
                Value::Object(out)
            }
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            StateValue::Number(n) => Some(*n != 0.0),
            StateValue::Text(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StateValue::Number(n) => Some(*n),
            StateValue::Text(s) => s.trim().parse().ok(),
            StateValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Rendering of this value inside interpolated text. Whole numbers
    /// print without a fractional part.
    pub fn display(&self) -> String {
        match self {
            StateValue::Null => String::new(),
            StateValue::Bool(b) => b.to_string(),
            StateValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            StateValue::Number(n) => n.to_string(),
            StateValue::Text(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

/// Callback invoked when a named action fires.
pub type ActionFn = Rc<dyn Fn(&mut StateStore)>;

/// Host hook for action names with no registered closure. Typically the
/// host posts an out-of-band notification; the store does not care.
pub trait ActionHandler {
    fn handle(&self, action: &str, store: &mut StateStore);
}

/// Handler that logs unclaimed actions and otherwise drops them.
pub struct LogActions;

impl ActionHandler for LogActions {
    fn handle(&self, action: &str, _store: &mut StateStore) {
        debug!(action, "no handler registered for action");
    }
}

/// Per-screen mutable state: named values plus registered actions.
///
/// Every effective mutation bumps a monotonically increasing generation,
/// so hosts can tell whether a rebuild is due without diffing values.
/// Included screens receive a merged snapshot, never a live reference.
#[derive(Default)]
pub struct StateStore {
    values: HashMap<String, StateValue>,
    actions: HashMap<String, ActionFn>,
    generation: u64,
}

impl StateStore {
    pub fn new() -> StateStore {
        StateStore::default()
    }

    pub fn from_json(map: &serde_json::Map<String, Value>) -> StateStore {
        let mut store = StateStore::new();
        for (k, v) in map {
            store.values.insert(k.clone(), StateValue::from_json(v));
        }
        store
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Writes a value, bumping the generation only when it changed.
    pub fn set(&mut self, key: impl Into<String>, value: StateValue) {
        let key = key.into();
        if self.values.get(&key) == Some(&value) {
            return;
        }
        self.values.insert(key, value);
        self.generation += 1;
    }

    pub fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.generation += 1;
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn register_action(&mut self, name: impl Into<String>, action: ActionFn) {
        self.actions.insert(name.into(), action);
    }

    /// Fires a named action: a closure stored here wins, anything else is
    /// forwarded to the host's handler. Returns whether a stored closure
    /// claimed it.
    pub fn dispatch(&mut self, action: &str, fallback: &dyn ActionHandler) -> bool {
        if let Some(f) = self.actions.get(action).cloned() {
            f(self);
            true
        } else {
            fallback.handle(action, self);
            false
        }
    }

    /// Snapshot merge for an included screen: this store's values with
    /// `local` values winning on collision. Actions do not cross screens.
    pub fn snapshot_with(&self, local: &HashMap<String, StateValue>) -> StateStore {
        let mut merged = self.values.clone();
        for (k, v) in local {
            merged.insert(k.clone(), v.clone());
        }
        StateStore { values: merged, actions: HashMap::new(), generation: 0 }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("values", &self.values)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("generation", &self.generation)
            .finish()
    }
}

/// Fallbacks for well-known binding names with no bound value.
const BINDING_DEFAULTS: &[(&str, &str)] = &[("title", "Dynamic Title")];

/// Expands `@{name}` references, left to right. Lookup order: the
/// request-scoped data, then the store, then the defaults table, then
/// the empty string. Never fails; unterminated references stay verbatim.
///
/// A trailing `?` or `?? ''` inside the braces is reference syntax, not
/// part of the name.
pub fn interpolate(
    text: &str,
    request: Option<&HashMap<String, StateValue>>,
    store: &StateStore,
) -> String {
    if !text.contains("@{") {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("@{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = trim_reference(&after[..end]);
                out.push_str(&resolve_name(name, request, store));
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve_name(
    name: &str,
    request: Option<&HashMap<String, StateValue>>,
    store: &StateStore,
) -> String {
    if let Some(value) = request.and_then(|r| r.get(name)) {
        return value.display();
    }
    if let Some(value) = store.get(name) {
        return value.display();
    }
    BINDING_DEFAULTS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, fallback)| (*fallback).to_string())
        .unwrap_or_default()
}

/// Strips the optional-marker suffix forms from a reference body.
pub(crate) fn trim_reference(raw: &str) -> &str {
    let mut name = raw.trim();
    for suffix in ["?? ''", "?? \"\""] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.trim_end();
        }
    }
    name.trim_end_matches('?').trim()
}

/// The value kinds a control can bind two-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    Bool,
    Scalar,
    Index,
}

/// A resolved two-way binding: the single store key a control reads and
/// writes. Resolved once when the render tree is built, so per-frame
/// work never probes candidate key spellings again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub key: String,
    pub kind: BindingKind,
}

impl Binding {
    /// Probes the conventional key spellings for `id` in priority order
    /// and binds to the first that exists. `None` means the control
    /// falls back to its own declared attribute, read-only.
    pub fn resolve(id: &str, kind: BindingKind, store: &StateStore) -> Option<Binding> {
        candidate_keys(id, kind)
            .find(|key| store.contains(key))
            .map(|key| Binding { key, kind })
    }

    pub fn bool_value(&self, store: &StateStore) -> Option<bool> {
        store.get(&self.key).and_then(StateValue::as_bool)
    }

    pub fn number_value(&self, store: &StateStore) -> Option<f64> {
        store.get(&self.key).and_then(StateValue::as_f64)
    }

    pub fn index_value(&self, store: &StateStore) -> Option<usize> {
        store
            .get(&self.key)
            .and_then(StateValue::as_f64)
            .filter(|v| *v >= 0.0)
            .map(|v| v as usize)
    }

    pub fn text_value(&self, store: &StateStore) -> Option<String> {
        store.get(&self.key).map(StateValue::display)
    }

    pub fn write(&self, store: &mut StateStore, value: StateValue) {
        store.set(self.key.clone(), value);
    }
}

fn candidate_keys(id: &str, kind: BindingKind) -> impl Iterator<Item = String> + '_ {
    let suffixes: &'static [&'static str] = match kind {
        BindingKind::Bool => &["IsOn", "_isOn", "Checked", "_checked", ""],
        BindingKind::Scalar => &["Value", "_value", ""],
        BindingKind::Index => &["SelectedIndex", "_selectedIndex", "Index", ""],
    };
    suffixes.iter().map(move |suffix| format!("{id}{suffix}"))
}

/// One section of a collection/table payload.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Section {
    pub header: Option<StateValue>,
    pub cells: Vec<StateValue>,
    pub footer: Option<StateValue>,
}

/// Resolves the sectioned data payload for a collection id, probing
/// `{id}Sections`, `{id}_sections`, then the bare id.
///
/// A list of maps carrying any of `header`/`cells`/`footer` becomes one
/// section per map; any other list becomes a single section of cells.
pub fn sections_for(id: &str, store: &StateStore) -> Vec<Section> {
    let keys = [format!("{id}Sections"), format!("{id}_sections"), id.to_string()];
    let Some(value) = keys.iter().find_map(|k| store.get(k)) else {
        return Vec::new();
    };
    let StateValue::List(items) = value else {
        return Vec::new();
    };
    let sectioned = !items.is_empty()
        && items.iter().all(|item| {
            matches!(item, StateValue::Map(m)
                if m.contains_key("header") || m.contains_key("cells") || m.contains_key("footer"))
        });
    if !sectioned {
        return vec![Section { header: None, cells: items.clone(), footer: None }];
    }
    let mut sections = Vec::new();
    for item in items {
        if let StateValue::Map(map) = item {
            let cells = match map.get("cells") {
                Some(StateValue::List(cells)) => cells.clone(),
                _ => Vec::new(),
            };
            sections.push(Section {
                header: map.get("header").cloned(),
                cells,
                footer: map.get("footer").cloned(),
            });
        }
    }
    sections
}
