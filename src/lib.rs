pub mod controller;
pub mod shared;
