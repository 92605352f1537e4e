
mod review;
mod seed;
