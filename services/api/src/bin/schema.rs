//! services/api/src/bin/schema.rs
//!
//! This binary prints the GraphQL schema in SDL form and saves it to a file
//! named `schema.graphql`, for client code generation.

use api_lib::graph::{MutationRoot, QueryRoot};
use async_graphql::{EmptySubscription, Schema};

/// Renders the schema and writes it to a file.
fn generate_schema(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let sdl = Schema::new(QueryRoot, MutationRoot, EmptySubscription).sdl();
    std::fs::write(path, sdl)?;
    println!("GraphQL schema generated at {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    generate_schema("schema.graphql")?;
    Ok(())
}
