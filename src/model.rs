use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// Customer record as emitted by the customer service. Immutable once
/// received; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[graphql(complex)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

/// Profile record produced by the profile service on demand, keyed by
/// `customer_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub customer_id: i64,
}

/// Transient pairing of a customer with its profile. Exists only for the
/// duration of one response. Invariant: `profile.customer_id == customer.id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer: Customer,
    pub profile: Profile,
}
