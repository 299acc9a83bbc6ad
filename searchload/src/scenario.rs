use std::sync::Arc;

use typed_builder::TypedBuilder;

use crate::client::OpenSearch;
use crate::connection::Transport;
use crate::error::Result;
use crate::metric::Statistics;

/// What every virtual user does.
///
/// `connect` is called once per virtual user with its index, so each user gets its own
/// connection and random source. `action` is one iteration: it receives the user's
/// handle and returns the statistics of the call it made.
///
/// NEVER build clients inside `action`: connecting belongs in `connect`.
#[derive(TypedBuilder)]
pub struct Scenario<T, C, F, Fut>
where
    T: Transport + 'static,
    C: Fn(usize) -> Result<OpenSearch<T>>,
    F: Fn(Arc<OpenSearch<T>>) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<Statistics>> + Send,
{
    #[builder(setter(into))]
    pub name: String,
    pub connect: C,
    pub action: F,
}
