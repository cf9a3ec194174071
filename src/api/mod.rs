pub mod auth;
pub mod bucketlist_items;
pub mod bucketlists;
pub mod health;
pub mod swagger;
pub mod users;
