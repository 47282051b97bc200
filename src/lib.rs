//! Film catalog: films, users, their likes and friendships, and a
//! popularity ranking over the likes.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
