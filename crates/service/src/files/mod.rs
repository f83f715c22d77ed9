//! File transfer: receiving uploads into the upload directory and opening
//! stored songs for streaming.

pub mod transfer;

pub use transfer::{PendingUpload, SongFile, SongFiles};
