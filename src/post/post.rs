//! Post: One liveblog entry and the assets it declares.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// JSON scalar that may arrive as a number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Text(String),
}

/// Stable identifier of a post.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(String);

impl PostId {
    /// Create an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Int(n) => Self(n.to_string()),
            Scalar::Text(s) => Self(s),
        })
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creation timestamp (seconds), used for ordering and as the page cursor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct Created(pub i64);

impl<'de> Deserialize<'de> for Created {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Scalar::deserialize(deserializer)? {
            Scalar::Int(n) => Ok(Self(n)),
            Scalar::Text(s) => s.trim().parse().map(Self).map_err(|e| {
                serde::de::Error::custom(format!("invalid created timestamp {s:?}: {e}"))
            }),
        }
    }
}

impl fmt::Display for Created {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a script/style library, e.g. `core/drupal.dialog`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Deserialize)]
#[serde(transparent)]
pub struct LibraryId(String);

impl LibraryId {
    /// Create a library identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A library reference together with the asset files it groups.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Library {
    /// Library identifier.
    pub id: LibraryId,
    /// Asset paths (css/js) belonging to the library, possibly empty.
    pub assets: Vec<String>,
}

impl Library {
    /// A library with no asset list attached.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: LibraryId::new(id),
            assets: Vec::new(),
        }
    }

    /// Attach asset paths.
    #[must_use]
    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }
}

/// Post-render instruction, passed unexamined to the asset runtime.
///
/// The `command` key names the instruction; every other key is an argument.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Command {
    /// Instruction name.
    #[serde(rename = "command")]
    pub name: String,
    /// Remaining fields of the command object.
    #[serde(flatten)]
    pub arguments: Map<String, Value>,
}

impl Command {
    /// A command without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Map::new(),
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn with_argument(mut self, key: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }
}

/// A liveblog post.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct Post {
    /// Unique identifier.
    pub id: PostId,
    /// Creation time; newest first within a stream.
    pub created: Created,
    /// Pre-rendered, trusted markup.
    #[serde(default, alias = "rendered_entity")]
    pub content: String,
    /// Libraries this post needs, in declaration order.
    #[serde(default, deserialize_with = "deserialize_libraries")]
    pub libraries: Vec<Library>,
    /// Post-render commands, in execution order.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub commands: Vec<Command>,
}

impl Post {
    /// Create a post without assets.
    pub fn new(id: impl Into<PostId>, created: i64, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: Created(created),
            content: content.into(),
            libraries: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Add a required library.
    #[must_use]
    pub fn with_library(mut self, library: Library) -> Self {
        self.libraries.push(library);
        self
    }

    /// Add a post-render command.
    #[must_use]
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Decode a post from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the decoding error when a required field is missing or mistyped.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// The backend sends either an array of ids or a map of
/// `library id -> assets`, where assets is a `{path: path}` object or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum LibrariesRepr {
    List(Vec<LibraryId>),
    Grouped(BTreeMap<String, AssetGroup>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AssetGroup {
    Paths(BTreeMap<String, String>),
    List(Vec<String>),
}

pub(crate) fn deserialize_libraries<'de, D>(deserializer: D) -> Result<Vec<Library>, D::Error>
where
    D: Deserializer<'de>,
{
    let libraries = match Option::<LibrariesRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(LibrariesRepr::List(ids)) => ids
            .into_iter()
            .map(|id| Library {
                id,
                assets: Vec::new(),
            })
            .collect(),
        Some(LibrariesRepr::Grouped(groups)) => groups
            .into_iter()
            .map(|(id, group)| Library {
                id: LibraryId::new(id),
                assets: match group {
                    AssetGroup::Paths(paths) => paths.into_values().collect(),
                    AssetGroup::List(list) => list,
                },
            })
            .collect(),
    };
    Ok(dedup_libraries(libraries))
}

pub(crate) fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep the first occurrence of every library id.
pub(crate) fn dedup_libraries(libraries: Vec<Library>) -> Vec<Library> {
    let mut seen = HashSet::new();
    libraries
        .into_iter()
        .filter(|lib| seen.insert(lib.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_decode_numeric_and_string_fields() {
        let post = Post::from_value(&json!({
            "id": 12,
            "created": "1500000000",
            "content": "<p>hi</p>",
        }))
        .unwrap();

        assert_eq!(post.id, PostId::new("12"));
        assert_eq!(post.created, Created(1_500_000_000));
        assert!(post.libraries.is_empty());
        assert!(post.commands.is_empty());
    }

    #[test]
    fn test_post_decode_rendered_entity_alias() {
        let post = Post::from_value(&json!({
            "id": "7",
            "created": 1,
            "rendered_entity": "<div>x</div>",
        }))
        .unwrap();
        assert_eq!(post.content, "<div>x</div>");
    }

    #[test]
    fn test_post_decode_missing_id_fails() {
        assert!(Post::from_value(&json!({ "created": 1 })).is_err());
        assert!(Post::from_value(&json!({ "id": 1, "created": "soon" })).is_err());
    }

    #[test]
    fn test_libraries_as_list_dedup() {
        let post = Post::from_value(&json!({
            "id": 1,
            "created": 1,
            "libraries": ["core/jquery", "twitter/embed", "core/jquery"],
        }))
        .unwrap();

        let ids: Vec<_> = post.libraries.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["core/jquery", "twitter/embed"]);
    }

    #[test]
    fn test_libraries_grouped_by_assets() {
        let post = Post::from_value(&json!({
            "id": 1,
            "created": 1,
            "libraries": {
                "twitter/embed": { "widgets.js": "widgets.js" },
                "core/drupal": ["misc/drupal.js"],
            },
            "commands": null,
        }))
        .unwrap();

        assert_eq!(post.libraries.len(), 2);
        assert_eq!(post.libraries[0].id.as_str(), "core/drupal");
        assert_eq!(post.libraries[0].assets, ["misc/drupal.js"]);
        assert_eq!(post.libraries[1].assets, ["widgets.js"]);
    }

    #[test]
    fn test_command_keeps_arguments() {
        let post = Post::from_value(&json!({
            "id": 1,
            "created": 1,
            "commands": [{ "command": "settings", "merge": true }],
        }))
        .unwrap();

        assert_eq!(post.commands[0].name, "settings");
        assert_eq!(post.commands[0].arguments.get("merge"), Some(&json!(true)));
    }
}
