use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool sizing
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .next_back()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("Bucketlist");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the query paths rely on. The unique email index
    /// also backstops the duplicate-registration check at the storage level.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.db.collection::<mongodb::bson::Document>("users");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email, unique)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let user_id_index = IndexModel::builder().keys(doc! { "user_id": 1 }).build();

        match users.create_index(user_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for bucketlists: (user_id) - every list/get query is owner-scoped
        let bucketlists = self.db.collection::<mongodb::bson::Document>("bucketlists");

        let owner_index = IndexModel::builder().keys(doc! { "user_id": 1 }).build();

        match bucketlists.create_index(owner_index).await {
            Ok(_) => log::info!("   ✅ Index created: bucketlists(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for items: (bucketlist_id) - items are reached through the parent
        let items = self
            .db
            .collection::<mongodb::bson::Document>("bucketlist_items");

        let parent_index = IndexModel::builder()
            .keys(doc! { "bucketlist_id": 1 })
            .build();

        match items.create_index(parent_index).await {
            Ok(_) => log::info!("   ✅ Index created: bucketlist_items(bucketlist_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_connection_and_indexes() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bucketlist-test".to_string());
        let db = MongoDB::new(&uri).await;
        assert!(db.is_ok());
    }
}
