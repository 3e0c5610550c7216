use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html};

use crate::middleware::CurrentUser;
use crate::AppState;

/// Execute a GraphQL request on behalf of the authenticated caller
pub async fn graphql_handler(
    State(state): State<AppState>,
    current_user: CurrentUser,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state
        .schema
        .execute(request.into_inner().data(current_user.0))
        .await
        .into()
}

/// GraphiQL explorer page
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/api/graphql").finish())
}
