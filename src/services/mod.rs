pub mod auth_service;
pub mod bucketlist_item_service;
pub mod bucketlist_service;
pub mod scoped_query;
pub mod user_service;
