use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use todo_core::{ObjectId, TodoChanges, TodoRecord};

use super::{StoreError, TodoStore};

/// MongoDB-backed store holding one typed collection handle.
///
/// `Client` is internally reference counted, so cloning the store or sharing
/// it behind an `Arc` reuses the same connection pool.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    todos: Collection<TodoRecord>,
}

impl MongoStore {
    /// Connects to `uri` and verifies the server answers a ping.
    ///
    /// Parsing, connecting and the ping share the single `timeout` budget.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let attempt = async {
            let mut options = ClientOptions::parse(uri)
                .await
                .map_err(|error| StoreError::Connect(error.to_string()))?;
            options.connect_timeout = Some(timeout);
            options.server_selection_timeout = Some(timeout);

            let client = Client::with_options(options)
                .map_err(|error| StoreError::Connect(error.to_string()))?;
            let store = Self::from_client(client, database, collection);
            store
                .ping()
                .await
                .map_err(|error| StoreError::Connect(error.to_string()))?;
            Ok::<_, StoreError>(store)
        };

        let store = tokio::time::timeout(timeout, attempt)
            .await
            .map_err(|_| StoreError::Timeout(timeout))??;

        tracing::info!(database, collection, "Connected to MongoDB");
        Ok(store)
    }

    /// Wraps an existing client without contacting the server.
    pub fn from_client(client: Client, database: &str, collection: &str) -> Self {
        let todos = client.database(database).collection(collection);
        Self { client, todos }
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<TodoRecord>, StoreError> {
        let cursor = self.todos.find(doc! {}).await?;
        let records = cursor.try_collect().await?;
        Ok(records)
    }

    async fn insert(&self, record: &TodoRecord) -> Result<ObjectId, StoreError> {
        let result = self.todos.insert_one(record).await?;
        Ok(result.inserted_id.as_object_id().unwrap_or(record.id))
    }

    async fn update(&self, id: ObjectId, changes: &TodoChanges) -> Result<u64, StoreError> {
        let update = doc! {
            "$set": {
                "title": changes.title.as_str(),
                "completed": changes.completed,
            }
        };
        let result = self.todos.update_one(doc! { "_id": id }, update).await?;
        Ok(result.modified_count)
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError> {
        let result = self.todos.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
