pub mod auth;
pub mod coffee;
pub mod review;
pub mod roastery;
pub mod shared;
pub mod shop;
pub mod stats;
pub mod user;
