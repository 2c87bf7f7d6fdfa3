// ============================================================================
// CRM Aggregator
// ============================================================================
//
// Joins the two CRM backends: for each customer returned by the customer
// service, fetches its profile over the messaging channel and yields the
// pairing.
//
// Contract:
// - Strictly sequential join: the profile call for customer n+1 is not
//   issued until the pairing for customer n has completed.
// - Output order equals the order the customer service emits customers.
// - Fail-fast: the first failure terminates the stream; no partial results
//   are buffered or retried, already-yielded pairings stay valid.
// - No caching: every consumption re-fetches the list and every profile.
//
// ============================================================================

use crate::error::AppResult;
use crate::model::{Customer, CustomerProfile, Profile};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::{stream, StreamExt};
use std::sync::Arc;

/// Source of the customer sequence.
///
/// The returned stream is lazy, finite and non-restartable; customers arrive
/// in backend emission order.
pub trait CustomerSource: Send + Sync {
    fn customers(&self) -> BoxStream<'static, AppResult<Customer>>;
}

/// Source of profiles, one request/response exchange per call.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn profile_for_customer(&self, customer_id: i64) -> AppResult<Profile>;
}

/// The aggregator over the two CRM backends.
#[derive(Clone)]
pub struct Crm {
    customers: Arc<dyn CustomerSource>,
    profiles: Arc<dyn ProfileSource>,
}

struct JoinState {
    customers: BoxStream<'static, AppResult<Customer>>,
    profiles: Arc<dyn ProfileSource>,
    done: bool,
}

impl Crm {
    pub fn new(customers: Arc<dyn CustomerSource>, profiles: Arc<dyn ProfileSource>) -> Self {
        Self {
            customers,
            profiles,
        }
    }

    /// The customer sequence, one backend call per consumption.
    pub fn customers(&self) -> BoxStream<'static, AppResult<Customer>> {
        self.customers.customers()
    }

    /// One profile lookup, addressed by customer id.
    pub async fn profile_for_customer(&self, customer_id: i64) -> AppResult<Profile> {
        self.profiles.profile_for_customer(customer_id).await
    }

    /// For each customer, in order, exactly one profile call; yields the
    /// pairing before advancing to the next customer. Dropping the stream
    /// cancels the in-flight call and issues no further ones.
    pub fn customer_profiles(&self) -> BoxStream<'static, AppResult<CustomerProfile>> {
        let state = JoinState {
            customers: self.customers.customers(),
            profiles: Arc::clone(&self.profiles),
            done: false,
        };

        Box::pin(stream::unfold(state, |mut state| async move {
            if state.done {
                return None;
            }
            match state.customers.next().await {
                None => None,
                Some(Err(e)) => {
                    state.done = true;
                    Some((Err(e), state))
                }
                Some(Ok(customer)) => {
                    match state.profiles.profile_for_customer(customer.id).await {
                        Ok(profile) => Some((Ok(CustomerProfile { customer, profile }), state)),
                        Err(e) => {
                            state.done = true;
                            Some((Err(e), state))
                        }
                    }
                }
            }
        }))
    }
}
