use serde::{Deserialize, Serialize};

/// Song as exposed over the API: `{id, title, artist}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Empty on input means "let the store assign one".
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub artist: String,
}

impl From<models::song::Model> for Song {
    fn from(m: models::song::Model) -> Self {
        Song { id: m.id, title: m.title, artist: m.artist }
    }
}
