//! Runs a [`Scenario`] with a fixed number of virtual users.
//!
//! Every virtual user is one tokio task owning one [`OpenSearch`] handle. Inside a task
//! calls are strictly sequential; across tasks they run in parallel, so one user
//! waiting on the network never holds up another.
//!
//! # Flow
//! 1. `connect` is called for every user up front. Any failure aborts the run before a
//!    single request is sent.
//! 2. One task per user loops over `action`, folding each result into a task-local
//!    [`Aggregate`]: `consume` on success, `record_failure` on error.
//! 3. A user stops after `iterations` calls, or when the shutdown signal fires once
//!    `duration` has elapsed, whichever comes first.
//! 4. Task-local aggregates are merged into the final result.
use std::sync::Arc;
use std::time::Duration;

use futures::future::{Either, join_all, select};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use typed_builder::TypedBuilder;

use crate::aggregate::Aggregate;
use crate::client::OpenSearch;
use crate::connection::Transport;
use crate::error::{Error, Result};
use crate::metric::Statistics;
use crate::scenario::Scenario;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ConstantVus {
    /// Number of virtual users
    pub vus: usize,
    /// Wall-clock bound for the whole run
    #[builder(default, setter(strip_option))]
    pub duration: Option<Duration>,
    /// Calls per virtual user
    #[builder(default, setter(strip_option))]
    pub iterations: Option<u64>,
}

impl ConstantVus {
    pub async fn run<A, T, C, F, Fut>(&self, scenario: &Scenario<T, C, F, Fut>) -> Result<A>
    where
        A: Aggregate<Metric = Statistics> + 'static,
        T: Transport + 'static,
        C: Fn(usize) -> Result<OpenSearch<T>>,
        F: Fn(Arc<OpenSearch<T>>) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<Statistics>> + Send,
    {
        if self.vus == 0 {
            return Err(Error::Config("at least one virtual user is required".into()));
        }
        if self.duration.is_none() && self.iterations.is_none() {
            return Err(Error::Config(
                "a run needs a duration, an iteration count, or both".into(),
            ));
        }

        let users = (0..self.vus)
            .map(|i| (scenario.connect)(i).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tracing::info!("Spawning {} virtual users...", self.vus);
        let handles: Vec<JoinHandle<A>> = users
            .into_iter()
            .enumerate()
            .map(|(i, user)| {
                spawn_user(
                    i,
                    user,
                    scenario.action.clone(),
                    self.iterations,
                    shutdown_rx.clone(),
                )
            })
            .collect();

        tracing::info!("Running scenario: {}!", scenario.name);
        let all = Box::pin(join_all(handles));
        let results = match self.duration {
            None => all.await,
            Some(duration) => {
                match select(all, Box::pin(tokio::time::sleep(duration))).await {
                    Either::Left((results, _)) => results,
                    Either::Right(((), all)) => {
                        tracing::info!("Duration elapsed, signaling shutdown...");
                        shutdown_tx.send_replace(true);
                        all.await
                    }
                }
            }
        };

        tracing::info!("Processing results...");
        let mut final_agg = A::new();
        for (i, res) in results.into_iter().enumerate() {
            match res {
                Ok(agg) => final_agg.merge(agg),
                Err(e) => {
                    // keep everyone else's data
                    tracing::error!("Virtual user {i} panicked: {e}");
                }
            }
        }

        tracing::info!("Done running scenario: {}!", scenario.name);
        Ok(final_agg)
    }
}

fn spawn_user<A, T, F, Fut>(
    i: usize,
    user: Arc<OpenSearch<T>>,
    action: F,
    iterations: Option<u64>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<A>
where
    A: Aggregate<Metric = Statistics> + 'static,
    T: Transport + 'static,
    F: Fn(Arc<OpenSearch<T>>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Statistics>> + Send,
{
    tokio::spawn(async move {
        let mut agg = A::new();
        tracing::debug!("Virtual user {i} started.");

        let main_task = async {
            let mut done = 0u64;
            while iterations.is_none_or(|n| done < n) {
                match action(user.clone()).await {
                    Ok(stats) => agg.consume(&stats),
                    Err(e) => agg.record_failure(&e),
                }
                done += 1;
                // an action that never waits would otherwise starve the shutdown branch
                tokio::task::yield_now().await;
            }
        };

        tokio::select! {
            _ = main_task => {},
            _ = shutdown.wait_for(|stop| *stop) => {},
        };

        tracing::debug!("Virtual user {i} shutting down.");
        agg
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::StatisticsAggregate;
    use crate::random::RandomSource;
    use crate::test_utils::{MockTransport, Outcome};

    fn connect_ok(_: usize) -> Result<OpenSearch<MockTransport>> {
        Ok(OpenSearch::new(
            MockTransport::new(Outcome::ok(201, b"{}")),
            RandomSource::seeded(5),
        ))
    }

    #[tokio::test]
    async fn every_user_runs_its_iterations() {
        let scenario = Scenario::builder()
            .name("create documents")
            .connect(connect_ok)
            .action(|os: Arc<OpenSearch<MockTransport>>| async move {
                os.create_document("logs", None, None).await
            })
            .build();

        let agg: StatisticsAggregate = ConstantVus::builder()
            .vus(4)
            .iterations(5)
            .build()
            .run(&scenario)
            .await
            .unwrap();

        assert_eq!(agg.count, 20);
        assert_eq!(agg.statuses[&201], 20);
        assert_eq!(agg.failure_count(), 0);
    }

    #[tokio::test]
    async fn failures_are_folded_not_raised() {
        let scenario = Scenario::builder()
            .name("search is reserved")
            .connect(connect_ok)
            .action(|os: Arc<OpenSearch<MockTransport>>| async move {
                os.document(crate::Operation::Search, "logs", None, None).await
            })
            .build();

        let agg: StatisticsAggregate = ConstantVus::builder()
            .vus(2)
            .iterations(3)
            .build()
            .run(&scenario)
            .await
            .unwrap();

        assert_eq!(agg.count, 0);
        assert_eq!(agg.failures["unsupported_operation"], 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn duration_stops_users_whose_action_never_waits() {
        let scenario = Scenario::builder()
            .name("search is reserved, forever")
            .connect(connect_ok)
            .action(|os: Arc<OpenSearch<MockTransport>>| async move {
                os.document(crate::Operation::Search, "logs", None, None).await
            })
            .build();
        let vus = ConstantVus::builder()
            .vus(1)
            .duration(Duration::from_millis(200))
            .build();

        let agg: StatisticsAggregate = tokio::time::timeout(
            Duration::from_secs(5),
            vus.run(&scenario),
        )
        .await
        .expect("run outlived its duration")
        .unwrap();

        assert_eq!(agg.count, 0);
        assert!(agg.failures["unsupported_operation"] > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn duration_stops_unbounded_users() {
        let scenario = Scenario::builder()
            .name("timed")
            .connect(|_: usize| -> Result<OpenSearch<MockTransport>> {
                Ok(OpenSearch::new(
                    MockTransport::new(Outcome::ok(200, b"{}"))
                        .with_delay(Duration::from_millis(100)),
                    RandomSource::seeded(1),
                ))
            })
            .action(|os: Arc<OpenSearch<MockTransport>>| async move {
                os.create_index("logs", 1, 0).await
            })
            .build();

        let agg: StatisticsAggregate = ConstantVus::builder()
            .vus(3)
            .duration(Duration::from_millis(1050))
            .build()
            .run(&scenario)
            .await
            .unwrap();

        // ten full round-trips fit per user before the cut
        assert_eq!(agg.count, 30);
    }

    #[tokio::test]
    async fn connect_failure_aborts_before_any_call() {
        let scenario = Scenario::builder()
            .name("unreachable")
            .connect(|i: usize| -> Result<OpenSearch<MockTransport>> {
                if i == 1 {
                    Err(Error::Config("no address".into()))
                } else {
                    connect_ok(i)
                }
            })
            .action(|os: Arc<OpenSearch<MockTransport>>| async move {
                os.delete_index("logs").await
            })
            .build();

        let res: Result<StatisticsAggregate> = ConstantVus::builder()
            .vus(2)
            .iterations(1)
            .build()
            .run(&scenario)
            .await;

        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn unbounded_run_is_rejected() {
        let scenario = Scenario::builder()
            .name("forever")
            .connect(connect_ok)
            .action(|os: Arc<OpenSearch<MockTransport>>| async move {
                os.delete_index("logs").await
            })
            .build();

        let res: Result<StatisticsAggregate> =
            ConstantVus::builder().vus(1).build().run(&scenario).await;
        assert!(matches!(res, Err(Error::Config(_))));
    }
}
