//! The operation vocabulary and the entities it applies to.
//!
//! An [`Operation`] only gains meaning once paired with an [`Entity`]: `Create` on an
//! index creates the index, `Create` on a document indexes that document. `Search` and
//! `Update` belong to the vocabulary but no entity handles them yet, so resolving them
//! fails with [`Error::UnsupportedOperation`](crate::Error::UnsupportedOperation).
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Operation codes, numbered the way scripting layers pass them around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create = 0,
    Delete = 1,
    Search = 2,
    Update = 3,
    Index = 4,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Search => "search",
            Operation::Update => "update",
            Operation::Index => "index",
        }
    }

    pub fn code(&self) -> i64 {
        *self as i64
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for Operation {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Operation::Create),
            1 => Ok(Operation::Delete),
            2 => Ok(Operation::Search),
            3 => Ok(Operation::Update),
            4 => Ok(Operation::Index),
            other => Err(Error::UnknownOperation(other.to_string())),
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "delete" => Ok(Operation::Delete),
            "search" => Ok(Operation::Search),
            "update" => Ok(Operation::Update),
            "index" => Ok(Operation::Index),
            _ => Err(Error::UnknownOperation(s.to_string())),
        }
    }
}

/// The object an operation acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// Shard and replica counts are passed through verbatim, including zero or
    /// negative values; validating them is the caller's business.
    Index {
        name: String,
        shards: i64,
        replicas: i64,
    },
    /// A missing (or blank) `id`/`body` is synthesized when the document is created.
    Document {
        index: String,
        id: Option<String>,
        body: Option<String>,
    },
}

impl Entity {
    pub fn index(name: impl Into<String>, shards: i64, replicas: i64) -> Self {
        Entity::Index {
            name: name.into(),
            shards,
            replicas,
        }
    }

    /// Blank strings are normalized to `None`.
    pub fn document(index: impl Into<String>, id: Option<&str>, body: Option<&str>) -> Self {
        let present = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
        Entity::Document {
            index: index.into(),
            id: present(id),
            body: present(body),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Index { .. } => EntityKind::Index,
            Entity::Document { .. } => EntityKind::Document,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Index,
    Document,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Index => f.write_str("index"),
            EntityKind::Document => f.write_str("document"),
        }
    }
}
