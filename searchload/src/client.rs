//! The surface a virtual user scripts against.
use std::sync::{Mutex, PoisonError};

use crate::config::ConnectionConfig;
use crate::connection::{Connection, Transport};
use crate::error::Result;
use crate::instrument::execute;
use crate::metric::Statistics;
use crate::operation::{Entity, Operation};
use crate::random::RandomSource;
use crate::request::Request;
use crate::resolve::resolve;

/// One virtual user's handle: its connection plus its own random source.
///
/// Calls take `&self` and are meant to be issued one after another; share the handle
/// behind an `Arc` within a single virtual user, not across users.
#[derive(Debug)]
pub struct OpenSearch<T = Connection> {
    transport: T,
    random: Mutex<RandomSource>,
}

impl OpenSearch<Connection> {
    /// Connect to the configured cluster, seeding the random source from the config.
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        Ok(Self::new(Connection::open(config)?, config.random_source()))
    }
}

impl<T: Transport> OpenSearch<T> {
    pub fn new(transport: T, random: RandomSource) -> Self {
        Self {
            transport,
            random: Mutex::new(random),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn create_index(&self, name: &str, shards: i64, replicas: i64) -> Result<Statistics> {
        self.index(Operation::Create, name, shards, replicas).await
    }

    pub async fn delete_index(&self, name: &str) -> Result<Statistics> {
        self.index(Operation::Delete, name, 0, 0).await
    }

    /// `None` or blank `id`/`body` are synthesized.
    pub async fn create_document(
        &self,
        index: &str,
        id: Option<&str>,
        body: Option<&str>,
    ) -> Result<Statistics> {
        self.document(Operation::Create, index, id, body).await
    }

    pub async fn delete_document(&self, index: &str, id: &str) -> Result<Statistics> {
        self.document(Operation::Delete, index, Some(id), None).await
    }

    /// Index-level entry point; `shards`/`replicas` only matter for `Create`.
    pub async fn index(
        &self,
        operation: Operation,
        name: &str,
        shards: i64,
        replicas: i64,
    ) -> Result<Statistics> {
        self.dispatch(operation, Entity::index(name, shards, replicas))
            .await
    }

    /// Document-level entry point.
    pub async fn document(
        &self,
        operation: Operation,
        index: &str,
        id: Option<&str>,
        body: Option<&str>,
    ) -> Result<Statistics> {
        let entity = match operation {
            // a blank id is kept as-is when deleting
            Operation::Delete => Entity::Document {
                index: index.to_string(),
                id: id.map(str::to_string),
                body: None,
            },
            _ => Entity::document(index, id, body),
        };
        self.dispatch(operation, entity).await
    }

    /// Resolve then execute. Unsupported pairs fail before anything is sent.
    pub async fn dispatch(&self, operation: Operation, entity: Entity) -> Result<Statistics> {
        let request = self.resolve(operation, &entity)?;
        tracing::debug!(%operation, method = %request.method(), path = %request.path(), "dispatching");
        execute(&self.transport, &request).await.inspect_err(|e| {
            tracing::warn!(%operation, path = %request.path(), error = %e, "call failed");
        })
    }

    fn resolve(&self, operation: Operation, entity: &Entity) -> Result<Request> {
        let mut random = self.random.lock().unwrap_or_else(PoisonError::into_inner);
        resolve(operation, entity, &mut random)
    }
}
