//! Dotted-path locators over request bodies and headers.
//!
//! A locator names a value location inside an outbound request or an inbound
//! callback payload: `body.user.id` walks a nested JSON object, while
//! `headers.X-Correlation-Id` names a single HTTP header. Injectors write
//! through locators, pickers read through them.

use serde_json::{Map, Value};


/// Where a locator path is rooted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootKind {
    Body,
    Header,
    Unknown,
}

/// A parsed path descriptor: root selector plus nested key sequence.
///
/// Immutable once parsed; an `Unknown` root is a configuration error that
/// callers surface during validation, before any network activity.
#[derive(Clone, Debug)]
pub struct Locator {
    path: String,
    root: RootKind,
    keys: Vec<String>,
}

impl Locator {
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let (root, rest) = if let Some(rest) = path.strip_prefix("body.") {
            (RootKind::Body, rest)
        } else if let Some(rest) = path.strip_prefix("headers.") {
            (RootKind::Header, rest)
        } else {
            (RootKind::Unknown, "")
        };
        let keys = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('.').map(str::to_owned).collect()
        };
        Self {
            path: path.to_owned(),
            root,
            keys,
        }
    }

    #[must_use]
    pub fn root_kind(&self) -> RootKind {
        self.root
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn key_path(&self) -> &[String] {
        &self.keys
    }

    /// Header name for `headers.`-rooted locators: everything after the root
    /// segment, separators restored verbatim.
    #[must_use]
    pub fn header_name(&self) -> String {
        self.keys.join(".")
    }

    /// Writes `value` at this locator's key path inside a JSON object tree.
    ///
    /// Intermediate keys holding non-object values are replaced with fresh
    /// empty objects; the last writer wins.
    pub fn set(&self, tree: &mut Map<String, Value>, value: Value) {
        let Some((last, parents)) = self.keys.split_last() else {
            return;
        };
        let mut current = tree;
        for key in parents {
            let slot = current
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(map) = slot {
                current = map;
            } else {
                return;
            }
        }
        current.insert(last.clone(), value);
    }

    /// Reads the value at this locator's key path, if the whole chain of
    /// intermediate objects exists.
    #[must_use]
    pub fn get<'tree>(&self, tree: &'tree Map<String, Value>) -> Option<&'tree Value> {
        let (last, parents) = self.keys.split_last()?;
        let mut current = tree;
        for key in parents {
            current = current.get(key)?.as_object()?;
        }
        current.get(last)
    }
}
