pub mod errors;
pub mod ids;
pub mod db;
pub mod song;
pub mod user;
pub mod favorite;

#[cfg(test)]
mod tests;
