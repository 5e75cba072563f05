use async_graphql::{Context, Object, Result};

use super::error::port_error;
use super::types::TodoNode;
use super::database;

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Every todo in the store, regardless of who is asking.
    async fn todos(&self, ctx: &Context<'_>) -> Result<Vec<TodoNode>> {
        let todos = database(ctx)?.list_todos().await.map_err(port_error)?;
        Ok(todos.into_iter().map(TodoNode).collect())
    }
}
