pub mod coffee;
pub mod review;
pub mod roastery;
pub mod shop;
pub mod user;
