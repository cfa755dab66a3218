use crate::core::report::BatchReport;
use crate::domain::model::{
    AvailabilityResult, Outcome, ProviderReply, RequestTemplate, RestaurantRecord, Slot,
};
use crate::domain::ports::ClientRouter;
use crate::utils::error::{CheckError, QueryResult, Result};
use crate::utils::validation;
use futures::StreamExt;
use serde_json::Value;

type TimeOutcome = (String, QueryResult<ProviderReply>);

/// Fans the Cartesian product of restaurants and requested times out as
/// independent query tasks under a bounded worker pool, then folds the
/// per-time answers back into one result per restaurant.
pub struct BatchDispatcher<R: ClientRouter> {
    router: R,
}

impl<R: ClientRouter> BatchDispatcher<R> {
    pub fn new(router: R) -> Self {
        Self { router }
    }

    /// One task per (restaurant, time) pair. A task's failure is converted
    /// into data at the task boundary; it never aborts siblings or the pool.
    /// Fatal only on an empty selection or a non-positive worker count.
    pub async fn run(
        &self,
        restaurants: &[RestaurantRecord],
        template: &RequestTemplate,
        max_workers: usize,
    ) -> Result<BatchReport> {
        validation::validate_worker_count(max_workers)?;
        if restaurants.is_empty() {
            return Err(CheckError::EmptyBatch);
        }

        let times = template.times();
        tracing::debug!(
            restaurants = restaurants.len(),
            times = times.len(),
            workers = max_workers,
            "dispatching availability tasks"
        );

        let tasks = restaurants.iter().enumerate().flat_map(|(ri, restaurant)| {
            times
                .iter()
                .enumerate()
                .map(move |(ti, time)| (ri, ti, restaurant, time))
        });

        let mut pending = futures::stream::iter(tasks.map(|(ri, ti, restaurant, time)| {
            let request = template.for_restaurant_at(restaurant, time);
            let client = self.router.client_for(restaurant.provider);
            let time = time.clone();
            async move {
                let outcome = client.query(&request).await;
                (ri, ti, time, outcome)
            }
        }))
        .buffer_unordered(max_workers);

        // Each task owns exactly one (restaurant, time) cell, so completion
        // order does not matter and no synchronization is needed here.
        let mut cells: Vec<Vec<Option<TimeOutcome>>> = (0..restaurants.len())
            .map(|_| (0..times.len()).map(|_| None).collect())
            .collect();
        while let Some((ri, ti, time, outcome)) = pending.next().await {
            cells[ri][ti] = Some((time, outcome));
        }
        drop(pending);

        let results = restaurants
            .iter()
            .zip(cells)
            .map(|(restaurant, row)| {
                let had_error = row
                    .iter()
                    .any(|cell| matches!(cell, Some((_, Err(_)))));
                let per_time: Vec<TimeOutcome> = row.into_iter().flatten().collect();
                let (outcome, raw) = merge_outcomes(per_time);
                if had_error && outcome == Outcome::NoAvailability {
                    tracing::warn!(
                        restaurant = %restaurant.name,
                        "provider error at one or more times downgraded to no-availability"
                    );
                }
                AvailabilityResult {
                    restaurant: restaurant.clone(),
                    outcome,
                    raw,
                }
            })
            .collect();

        Ok(BatchReport { results })
    }
}

/// Fold one restaurant's per-time answers: any slots win and are unioned in
/// requested-time order; otherwise one reachable answer means no
/// availability; only when every time errored does the restaurant error,
/// carrying the first error's message.
fn merge_outcomes(per_time: Vec<TimeOutcome>) -> (Outcome, Option<Value>) {
    let mut slots: Vec<Slot> = Vec::new();
    let mut reachable = false;
    let mut first_error: Option<String> = None;
    let mut raw = serde_json::Map::new();

    for (time, outcome) in per_time {
        match outcome {
            Ok(reply) => {
                reachable = true;
                slots.extend(reply.slots);
                match reply.raw {
                    Some(Value::Object(map)) => raw.extend(map),
                    Some(value) => {
                        raw.insert(time, value);
                    }
                    None => {}
                }
            }
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err.to_string());
                }
            }
        }
    }

    let raw = if raw.is_empty() {
        None
    } else {
        Some(Value::Object(raw))
    };
    let outcome = if !slots.is_empty() {
        Outcome::Slots(slots)
    } else if reachable {
        Outcome::NoAvailability
    } else {
        Outcome::ProviderError(
            first_error.unwrap_or_else(|| "no query was executed".to_string()),
        )
    };
    (outcome, raw)
}
