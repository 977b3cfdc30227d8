pub mod models;
mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRef;
use axum::routing::{get, put};
use axum::Router;
use serde_json::json;

use libris_auth::SessionIssuer;
use libris_kernel::{InitCtx, Module};

use self::store::BookStore;

/// Shared state for book routes.
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<BookStore>,
    pub sessions: Arc<SessionIssuer>,
}

impl FromRef<BooksState> for Arc<SessionIssuer> {
    fn from_ref(state: &BooksState) -> Self {
        state.sessions.clone()
    }
}

/// Catalog module: session-gated CRUD over the persisted book collection,
/// with mutations restricted to each record's creator.
pub struct BooksModule {
    store: Arc<BookStore>,
    sessions: Arc<SessionIssuer>,
}

impl BooksModule {
    pub fn new(store: Arc<BookStore>, sessions: Arc<SessionIssuer>) -> Self {
        Self { store, sessions }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let records = self.store.count().await;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            records = records,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let state = BooksState {
            store: self.store.clone(),
            sessions: self.sessions.clone(),
        };
        Router::new()
            .route("/", get(routes::list_books).post(routes::create_book))
            .route("/mine", get(routes::my_books))
            .route(
                "/{id}",
                put(routes::update_book).delete(routes::delete_book),
            )
            .with_state(state)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List all books",
                        "tags": ["Books"],
                        "security": [{ "bearerAuth": [] }],
                        "responses": {
                            "200": {
                                "description": "All records, in insertion order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Missing, malformed, or expired session token",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "security": [{ "bearerAuth": [] }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created record with server-assigned id and creator",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure naming the offending field",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "401": {
                                "description": "Unauthenticated",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/mine": {
                    "get": {
                        "summary": "List books created by the caller",
                        "tags": ["Books"],
                        "security": [{ "bearerAuth": [] }],
                        "responses": {
                            "200": {
                                "description": "Records with createdBy equal to the caller identity",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Unauthenticated",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "put": {
                        "summary": "Update a book (creator only)",
                        "tags": ["Books"],
                        "security": [{ "bearerAuth": [] }],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string", "format": "uuid" }
                        }],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": { "description": "Updated record" },
                            "400": { "description": "Invalid field values" },
                            "401": { "description": "Unauthenticated" },
                            "403": { "description": "Caller is not the creator" },
                            "404": { "description": "Unknown record id" }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book (creator only)",
                        "tags": ["Books"],
                        "security": [{ "bearerAuth": [] }],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string", "format": "uuid" }
                        }],
                        "responses": {
                            "200": { "description": "Deletion confirmation message" },
                            "401": { "description": "Unauthenticated" },
                            "403": { "description": "Caller is not the creator" },
                            "404": { "description": "Unknown record id" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "yearPublished": { "type": "integer" },
                            "createdBy": { "type": "string" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "author", "genre", "yearPublished", "createdBy", "createdAt"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "yearPublished": {
                                "description": "Integer year, or a numeric string",
                                "oneOf": [{ "type": "integer" }, { "type": "string" }]
                            }
                        },
                        "required": ["title", "author", "genre", "yearPublished"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "yearPublished": {
                                "oneOf": [{ "type": "integer" }, { "type": "string" }]
                            }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module.
pub fn create_module(store: Arc<BookStore>, sessions: Arc<SessionIssuer>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store, sessions))
}
