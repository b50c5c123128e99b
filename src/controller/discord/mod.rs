pub mod interaction;
pub mod ping;
