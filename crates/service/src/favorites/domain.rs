use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub favorite_songs: Vec<String>,
}

/// Input for creating a user; `id` is generated when absent.
#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
}
