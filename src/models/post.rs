//! Post record and search payload structures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::{AppError, Result};

/// Separator between fields of a serialized post.
pub const FIELD_SEPARATOR: &str = "%%";

/// A post surfaced by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Post ID, assigned monotonically by the source
    pub id: u64,

    /// Author handle with newlines removed
    pub author: String,

    /// Post body with newlines removed
    pub text: String,
}

impl Post {
    /// Create a post, stripping embedded newlines from author and text so the
    /// serialized record stays on one line.
    pub fn new(id: u64, author: impl AsRef<str>, text: impl AsRef<str>) -> Self {
        Self {
            id,
            author: author.as_ref().replace('\n', ""),
            text: text.as_ref().replace('\n', ""),
        }
    }

    /// Serialize as a single backlog line: `id%%author%%text`.
    pub fn serialize(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.id,
            self.author,
            self.text,
            sep = FIELD_SEPARATOR
        )
    }

    /// Parse a backlog line back into a post.
    ///
    /// The text keeps any separator that appears after the second one.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.splitn(3, FIELD_SEPARATOR);
        let (Some(id), Some(author), Some(text)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::validation(format!(
                "expected id{sep}author{sep}text, got {line:?}",
                sep = FIELD_SEPARATOR
            )));
        };

        let id = id
            .trim()
            .parse::<u64>()
            .map_err(|e| AppError::validation(format!("invalid post id {id:?}: {e}")))?;

        Ok(Self {
            id,
            author: author.to_string(),
            text: text.to_string(),
        })
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for Post {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Body returned by the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Matching posts; absent in the payload means none
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    /// Convert raw results into posts, dropping entries without a usable id.
    pub fn into_posts(self) -> Vec<Post> {
        self.results
            .into_iter()
            .filter_map(|result| match result.id {
                Some(id) => Some(Post::new(id, &result.from_user, &result.text)),
                None => {
                    log::warn!("Skipping result from {} without a numeric id", result.from_user);
                    None
                }
            })
            .collect()
    }
}

/// A single entry of the `results` array.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "de_post_id")]
    pub id: Option<u64>,

    #[serde(default)]
    pub from_user: String,

    #[serde(default)]
    pub text: String,
}

/// Accepts the id as a JSON number or a numeric string.
fn de_post_id<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Some(n),
        RawId::Text(s) => s.trim().parse().ok(),
        RawId::Other(_) => None,
    })
}
