//! services/api/src/graph/mod.rs
//!
//! The GraphQL schema served at `/query`: todo queries, todo creation and the
//! account mutations used by the frontend.
//!
//! Long-lived services (database, password hasher, session manager) are attached
//! to the schema once at startup. Per-request values (the [`Viewer`] and the
//! response cookie jar) are attached to each request by the HTTP handler.

pub mod error;
pub mod mutation;
pub mod query;
pub mod types;

use std::sync::Arc;

use async_graphql::extensions::apollo_persisted_queries::{ApolloPersistedQueries, LruCacheStorage};
use async_graphql::{Context, EmptySubscription, Result, Schema};
use todo_core::domain::UserId;
use todo_core::ports::{DatabaseService, PasswordService};

use crate::web::session::SessionManager;

pub use error::GraphError;
pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// Capacity of the automatic persisted query cache.
pub const PERSISTED_QUERY_CACHE_SIZE: usize = 100;

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// The authenticated user behind a request, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer(pub Option<UserId>);

pub fn build_schema(
    db: Arc<dyn DatabaseService>,
    passwords: Arc<dyn PasswordService>,
    sessions: SessionManager,
) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .data(passwords)
        .data(sessions)
        .extension(ApolloPersistedQueries::new(LruCacheStorage::new(
            PERSISTED_QUERY_CACHE_SIZE,
        )))
        .finish()
}

fn database<'a>(ctx: &Context<'a>) -> Result<&'a Arc<dyn DatabaseService>> {
    ctx.data::<Arc<dyn DatabaseService>>()
}

fn viewer(ctx: &Context<'_>) -> Option<UserId> {
    ctx.data_opt::<Viewer>().and_then(|v| v.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Argon2PasswordService;
    use async_graphql::{Request, Variables};
    use serde_json::{json, Value};
    use todo_core::memory::InMemoryDatabase;

    fn setup() -> (TodoSchema, Arc<InMemoryDatabase>) {
        let db = Arc::new(InMemoryDatabase::new());
        let sessions = SessionManager::new(b"graph-tests", false).unwrap();
        let schema = build_schema(db.clone(), Arc::new(Argon2PasswordService::new()), sessions);
        (schema, db)
    }

    async fn run(schema: &TodoSchema, request: Request) -> Value {
        let response = schema.execute(request).await;
        assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
        response.data.into_json().unwrap()
    }

    fn error_code(response: &async_graphql::Response) -> Option<String> {
        let error = serde_json::to_value(response.errors.first()?).ok()?;
        error["extensions"]["code"].as_str().map(str::to_string)
    }

    const CREATE_TODO: &str = r#"
        mutation CreateTodo($input: NewTodo!) {
            createTodo(input: $input) { id text done user { id name } }
        }"#;

    #[tokio::test]
    async fn create_todo_for_explicit_user() {
        let (schema, db) = setup();
        let user = db.create_user("Alice", "a@example.com", "h").await.unwrap();
        let user_id = user.id.to_string();

        let data = run(
            &schema,
            Request::new(CREATE_TODO).variables(Variables::from_json(json!({
                "input": { "text": "New Todo Item", "userId": user_id }
            }))),
        )
        .await;

        let todo = &data["createTodo"];
        assert_eq!(todo["text"], "New Todo Item");
        assert_eq!(todo["done"], false);
        assert_eq!(todo["user"]["id"], user_id);
        assert_eq!(todo["user"]["name"], "Alice");
    }

    #[tokio::test]
    async fn create_todo_for_unknown_user_fails_without_writing() {
        let (schema, db) = setup();
        db.create_user("Alice", "a@example.com", "h").await.unwrap();

        for user_id in ["999", "not-a-number"] {
            let response = schema
                .execute(Request::new(CREATE_TODO).variables(Variables::from_json(json!({
                    "input": { "text": "orphan", "userId": user_id }
                }))))
                .await;
            assert_eq!(error_code(&response).as_deref(), Some("OWNER_NOT_FOUND"));
        }
        assert!(db.list_todos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_todo_defaults_to_viewer() {
        let (schema, db) = setup();
        let user = db.create_user("Alice", "a@example.com", "h").await.unwrap();

        let data = run(
            &schema,
            Request::new(CREATE_TODO)
                .variables(Variables::from_json(json!({ "input": { "text": "mine" } })))
                .data(Viewer(Some(user.id))),
        )
        .await;
        assert_eq!(data["createTodo"]["user"]["id"], user.id.to_string());
    }

    #[tokio::test]
    async fn create_todo_without_owner_or_session_is_rejected() {
        let (schema, db) = setup();

        let response = schema
            .execute(
                Request::new(CREATE_TODO)
                    .variables(Variables::from_json(json!({ "input": { "text": "mine" } })))
                    .data(Viewer(None)),
            )
            .await;
        assert_eq!(error_code(&response).as_deref(), Some("NOT_AUTHENTICATED"));
        assert!(db.list_todos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn todos_resolve_their_owner() {
        let (schema, db) = setup();
        let user = db.create_user("Alice", "a@example.com", "h").await.unwrap();
        db.create_todo("buy milk", user.id).await.unwrap();

        let data = run(
            &schema,
            Request::new("{ todos { text done user { id name email createdAt updatedAt } } }"),
        )
        .await;

        let todos = data["todos"].as_array().unwrap();
        assert_eq!(todos.len(), 1);
        let owner = &todos[0]["user"];
        assert_eq!(owner["id"], user.id.to_string());
        assert_eq!(owner["name"], "Alice");
        assert_eq!(owner["email"], "a@example.com");
        let timestamp = |field: &str| owner[field].as_str().unwrap().parse::<chrono::DateTime<chrono::Utc>>().unwrap();
        assert_eq!(timestamp("createdAt"), user.created_at);
        assert_eq!(timestamp("updatedAt"), user.updated_at);
    }

    #[tokio::test]
    async fn todos_are_not_filtered_by_viewer() {
        let (schema, db) = setup();
        let alice = db.create_user("Alice", "a@example.com", "h").await.unwrap();
        let bob = db.create_user("Bob", "b@example.com", "h").await.unwrap();
        db.create_todo("alice's", alice.id).await.unwrap();
        db.create_todo("bob's", bob.id).await.unwrap();

        let data = run(
            &schema,
            Request::new("{ todos { text } }").data(Viewer(Some(alice.id))),
        )
        .await;
        assert_eq!(data["todos"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn created_todos_round_trip_through_todos_query() {
        let (schema, db) = setup();
        let user = db.create_user("Alice", "a@example.com", "h").await.unwrap();
        let user_id = user.id.to_string();

        let mut created = Vec::new();
        for text in ["first", "second"] {
            let data = run(
                &schema,
                Request::new(CREATE_TODO).variables(Variables::from_json(json!({
                    "input": { "text": text, "userId": user_id }
                }))),
            )
            .await;
            created.push(data["createTodo"].clone());
        }

        let data = run(&schema, Request::new("{ todos { id text done user { id name } } }")).await;
        assert_eq!(data["todos"], Value::Array(created));
    }

    #[tokio::test]
    async fn user_resolves_its_todos() {
        let (schema, db) = setup();
        let alice = db.create_user("Alice", "a@example.com", "h").await.unwrap();
        let bob = db.create_user("Bob", "b@example.com", "h").await.unwrap();
        db.create_todo("one", alice.id).await.unwrap();
        db.create_todo("two", bob.id).await.unwrap();
        db.create_todo("three", alice.id).await.unwrap();

        let data = run(&schema, Request::new("{ todos { user { name todos { text } } } }")).await;
        let first_owner = &data["todos"][0]["user"];
        assert_eq!(first_owner["name"], "Alice");
        assert_eq!(first_owner["todos"], json!([{ "text": "one" }, { "text": "three" }]));
    }

    const REGISTER: &str = r#"
        mutation RegisterUser($input: RegisterUserInput!) {
            registerUser(input: $input) { success message user { id name email createdAt } }
        }"#;

    const LOGIN: &str = r#"
        mutation LoginUser($input: LoginUserInput!) {
            loginUser(input: $input) { success message user { id email } }
        }"#;

    #[tokio::test]
    async fn register_then_login() {
        let (schema, _db) = setup();

        let data = run(
            &schema,
            Request::new(REGISTER).variables(Variables::from_json(json!({
                "input": { "name": "Alice", "email": "a@example.com", "password": "password123" }
            }))),
        )
        .await;
        let payload = &data["registerUser"];
        assert_eq!(payload["success"], true);
        assert_eq!(payload["user"]["name"], "Alice");

        let data = run(
            &schema,
            Request::new(LOGIN).variables(Variables::from_json(json!({
                "input": { "email": "a@example.com", "password": "password123" }
            }))),
        )
        .await;
        assert_eq!(data["loginUser"]["success"], true);
        assert_eq!(data["loginUser"]["user"]["id"], payload["user"]["id"]);
    }

    #[tokio::test]
    async fn register_reports_duplicate_email() {
        let (schema, _db) = setup();
        let input = json!({
            "input": { "name": "Alice", "email": "a@example.com", "password": "password123" }
        });
        run(&schema, Request::new(REGISTER).variables(Variables::from_json(input.clone()))).await;

        let data = run(&schema, Request::new(REGISTER).variables(Variables::from_json(input))).await;
        assert_eq!(data["registerUser"]["success"], false);
        assert_eq!(data["registerUser"]["message"], "This email address is already registered");
        assert_eq!(data["registerUser"]["user"], Value::Null);
    }

    #[tokio::test]
    async fn register_checks_confirmation_when_given() {
        let (schema, _db) = setup();

        let data = run(
            &schema,
            Request::new(REGISTER).variables(Variables::from_json(json!({
                "input": {
                    "name": "Alice",
                    "email": "a@example.com",
                    "password": "abc",
                    "confirmPassword": "abd"
                }
            }))),
        )
        .await;
        assert_eq!(data["registerUser"]["success"], false);
        assert_eq!(data["registerUser"]["message"], "Passwords do not match");
    }

    #[tokio::test]
    async fn login_failure_is_generic() {
        let (schema, _db) = setup();
        run(
            &schema,
            Request::new(REGISTER).variables(Variables::from_json(json!({
                "input": { "name": "Alice", "email": "a@example.com", "password": "password123" }
            }))),
        )
        .await;

        let mut messages = Vec::new();
        for (email, password) in [("a@example.com", "wrong-password"), ("b@example.com", "password123")] {
            let data = run(
                &schema,
                Request::new(LOGIN).variables(Variables::from_json(json!({
                    "input": { "email": email, "password": password }
                }))),
            )
            .await;
            assert_eq!(data["loginUser"]["success"], false);
            messages.push(data["loginUser"]["message"].clone());
        }
        assert_eq!(messages[0], messages[1]);
        assert_eq!(messages[0], "Invalid email or password");
    }

    fn persisted(query: &str, hash: &str) -> Request {
        serde_json::from_value(json!({
            "query": query,
            "extensions": { "persistedQuery": { "version": 1, "sha256Hash": hash } }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn persisted_queries_are_remembered_by_hash() {
        use sha2::{Digest, Sha256};

        let (schema, _db) = setup();
        let query = "{ todos { id } }";
        let hash = format!("{:x}", Sha256::digest(query.as_bytes()));

        // Unknown hash: the client has to send the full text once.
        let response = schema.execute(persisted("", &hash)).await;
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "PersistedQueryNotFound");

        let data = run(&schema, persisted(query, &hash)).await;
        assert_eq!(data, json!({ "todos": [] }));

        let data = run(&schema, persisted("", &hash)).await;
        assert_eq!(data, json!({ "todos": [] }));
    }

    #[tokio::test]
    async fn persisted_query_with_wrong_hash_is_rejected() {
        let (schema, _db) = setup();
        let response = schema
            .execute(persisted("{ todos { id } }", &"0".repeat(64)))
            .await;
        assert!(!response.errors.is_empty());
        assert_eq!(response.data, async_graphql::Value::Null);
    }

    #[test]
    fn sdl_exposes_camel_case_fields() {
        let (schema, _db) = setup();
        let sdl = schema.sdl();
        assert!(sdl.contains("createTodo(input: NewTodo!): Todo!"));
        assert!(sdl.contains("registerUser(input: RegisterUserInput!): AuthPayload!"));
        assert!(sdl.contains("createdAt: DateTime!"));
    }
}
