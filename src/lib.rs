pub mod error;
pub mod demo_seeder;
pub mod db {
    pub mod models;
    pub mod repository;
    pub mod tag_repository;
}
pub mod search {
    pub mod client;
    pub mod sync;
}
pub mod forms;
pub mod admin;
pub mod api {
    pub mod errors;
    pub mod search;
}

#[cfg(feature = "server")]
pub mod app;
#[cfg(feature = "server")]
pub mod config;
