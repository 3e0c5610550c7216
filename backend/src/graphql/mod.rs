//! GraphQL API
//!
//! Served at `POST /api/graphql` behind the same bearer-token middleware as
//! the REST routes. Resolvers call the same services as the REST handlers,
//! so admin checks and validation behave identically on both surfaces.

mod mutation;
mod query;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};

pub use mutation::MutationRoot;
pub use query::QueryRoot;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::repositories::Repositories;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(repos: Repositories) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(repos)
        .finish()
}

/// Caller attached to the request by the HTTP handler
fn caller<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a AuthUser> {
    ctx.data_opt::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()).extend())
}

fn repos<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a Repositories> {
    ctx.data::<Repositories>()
}

/// Surface an `AppError` with its `extensions.code`
fn gql<T>(result: AppResult<T>) -> async_graphql::Result<T> {
    result.map_err(|e| e.extend())
}
