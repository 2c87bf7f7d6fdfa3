// ============================================================================
// GraphQL Surface
// ============================================================================
//
// Thin translator over the same aggregator the REST route uses:
// - `customers` root field returns the customer sequence
// - `Customer.profile` is resolved lazily, one backend call per customer
//   actually selected
//
// ============================================================================

use async_graphql::{
    ComplexObject, Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema,
};
use futures_util::TryStreamExt;

use crate::crm::Crm;
use crate::model::{Customer, Profile};

pub type CrmSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The customer sequence; profiles are only fetched for customers whose
    /// `profile` field is selected.
    async fn customers(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Customer>> {
        let crm = ctx.data_unchecked::<Crm>();
        crm.customers()
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| e.extend())
    }
}

#[ComplexObject]
impl Customer {
    /// One profile lookup per customer, same failure kinds as the REST join.
    async fn profile(&self, ctx: &Context<'_>) -> async_graphql::Result<Profile> {
        let crm = ctx.data_unchecked::<Crm>();
        crm.profile_for_customer(self.id)
            .await
            .map_err(|e| e.extend())
    }
}

pub fn build_schema(crm: Crm) -> CrmSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(crm)
        .finish()
}
