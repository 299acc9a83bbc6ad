//! Operation Resolver: (operation, entity) -> [`Request`].
//!
//! Pure apart from drawing from the [`RandomSource`] when a document id or body has to
//! be synthesized. Only the four supported pairings resolve; everything else is
//! rejected, never guessed.
use serde::Serialize;

use crate::error::{Error, Result};
use crate::operation::{Entity, Operation};
use crate::random::RandomSource;
use crate::request::{Method, Request, RequestBody, ResponseKind};

pub const GENERATED_ID_PREFIX: &str = "id-";
pub const GENERATED_ID_LEN: usize = 6;
pub const GENERATED_BODY_LEN: usize = 100;

#[derive(Serialize)]
struct IndexSettings {
    settings: Settings,
}

#[derive(Serialize)]
struct Settings {
    index: ShardLayout,
}

// Field order is the wire order.
#[derive(Serialize)]
struct ShardLayout {
    number_of_shards: i64,
    number_of_replicas: i64,
}

#[derive(Serialize)]
struct Document<'a> {
    data: &'a str,
}

pub fn resolve(operation: Operation, entity: &Entity, random: &mut RandomSource) -> Result<Request> {
    match (operation, entity) {
        (
            Operation::Create,
            Entity::Index {
                name,
                shards,
                replicas,
            },
        ) => {
            let body = RequestBody::json(&IndexSettings {
                settings: Settings {
                    index: ShardLayout {
                        number_of_shards: *shards,
                        number_of_replicas: *replicas,
                    },
                },
            })?;
            Ok(Request::new(Method::Put, vec![name.clone()], ResponseKind::IndexCreated).with_body(body))
        }
        (Operation::Delete, Entity::Index { name, .. }) => Ok(Request::new(
            Method::Delete,
            vec![name.clone()],
            ResponseKind::IndexDeleted,
        )),
        (Operation::Create, Entity::Document { index, id, body }) => {
            let id = match id {
                Some(id) => id.clone(),
                None => generate_id(random),
            };
            let data = match body {
                Some(body) => body.clone(),
                None => random.alphanumeric(GENERATED_BODY_LEN),
            };
            let body = RequestBody::json(&Document { data: &data })?;
            Ok(Request::new(
                Method::Put,
                vec![index.clone(), "_create".into(), id],
                ResponseKind::DocumentCreated,
            )
            .with_body(body))
        }
        // The id is passed through as given, blank included.
        (Operation::Delete, Entity::Document { index, id, .. }) => Ok(Request::new(
            Method::Delete,
            vec![index.clone(), "_doc".into(), id.clone().unwrap_or_default()],
            ResponseKind::DocumentDeleted,
        )),
        (operation, entity) => Err(Error::UnsupportedOperation {
            operation,
            entity: entity.kind(),
        }),
    }
}

pub fn generate_id(random: &mut RandomSource) -> String {
    format!("{GENERATED_ID_PREFIX}{}", random.alphanumeric(GENERATED_ID_LEN))
}
