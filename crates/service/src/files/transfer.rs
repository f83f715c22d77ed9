use std::path::PathBuf;

use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::ids::SongId;

use crate::errors::ServiceError;

/// Upload and songs directories.
///
/// Uploads land at `<upload_dir>/<file name>`; streams are read from
/// `<songs_dir>/<song id>.mp3`.
#[derive(Clone, Debug)]
pub struct SongFiles {
    upload_dir: PathBuf,
    songs_dir: PathBuf,
}

/// An opened song ready to stream.
#[derive(Debug)]
pub struct SongFile {
    pub file: File,
    pub len: u64,
}

/// Keep only the final path component of a client supplied file name.
pub fn sanitize_file_name(raw: &str) -> Result<String, ServiceError> {
    // 兼容 Windows 客户端的反斜杠路径
    let last = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("").trim();
    if last.is_empty() || last == "." || last == ".." || last.starts_with('.') {
        return Err(ServiceError::Validation(format!("invalid file name: {raw:?}")));
    }
    if last.chars().any(|c| c.is_control()) {
        return Err(ServiceError::Validation(format!("invalid file name: {raw:?}")));
    }
    Ok(last.to_string())
}

impl SongFiles {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(upload_dir: P, songs_dir: Q) -> Self {
        Self { upload_dir: upload_dir.into(), songs_dir: songs_dir.into() }
    }

    fn song_path(&self, song_id: &SongId) -> PathBuf {
        self.songs_dir.join(song_id.file_name())
    }

    /// Start an upload: validates the name and opens a hidden temp file next
    /// to the destination. Nothing is visible under the final name until
    /// [`PendingUpload::commit`].
    pub async fn begin_upload(&self, file_name: &str) -> Result<PendingUpload, ServiceError> {
        let name = sanitize_file_name(file_name)?;
        let final_path = self.upload_dir.join(&name);
        let tmp_path = self.upload_dir.join(format!(".{}.{}.part", name, Uuid::new_v4()));
        let file = File::create(&tmp_path).await?;
        debug!(tmp = %tmp_path.display(), "upload_started");
        Ok(PendingUpload { tmp_path, final_path, file: Some(file), written: 0, done: false })
    }

    /// Copy a whole reader into `<upload_dir>/<file_name>`. Returns bytes written.
    #[instrument(skip(self, reader))]
    pub async fn receive_upload<R>(&self, file_name: &str, reader: &mut R) -> Result<u64, ServiceError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut upload = self.begin_upload(file_name).await?;
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    upload.abort().await;
                    return Err(e.into());
                }
            };
            if let Err(e) = upload.write_chunk(&buf[..n]).await {
                upload.abort().await;
                return Err(e);
            }
        }
        upload.commit().await
    }

    /// Open `<songs_dir>/<song_id>.mp3`. A missing file (or a non-file at that
    /// path) is `NotFound`; anything else is an I/O error.
    #[instrument(skip(self), fields(song_id = %song_id))]
    pub async fn open_song(&self, song_id: &SongId) -> Result<SongFile, ServiceError> {
        let path = self.song_path(song_id);
        let file = match File::open(&path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ServiceError::NotFound("Song not found".into()));
            }
            Err(e) => return Err(e.into()),
        };
        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(ServiceError::NotFound("Song not found".into()));
        }
        Ok(SongFile { file, len: meta.len() })
    }
}

/// An upload in progress, written to a temp file and renamed on commit.
/// Dropping it without committing removes the temp file.
#[derive(Debug)]
pub struct PendingUpload {
    tmp_path: PathBuf,
    final_path: PathBuf,
    file: Option<File>,
    written: u64,
    done: bool,
}

impl PendingUpload {
    pub fn written(&self) -> u64 { self.written }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), ServiceError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| ServiceError::Io(std::io::Error::other("upload already finished")))?;
        file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush to disk and atomically move into place.
    pub async fn commit(mut self) -> Result<u64, ServiceError> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        fs::rename(&self.tmp_path, &self.final_path).await?;
        self.done = true;
        info!(path = %self.final_path.display(), bytes = self.written, "upload_committed");
        Ok(self.written)
    }

    pub async fn abort(mut self) {
        self.file.take();
        if let Err(e) = fs::remove_file(&self.tmp_path).await {
            warn!(tmp = %self.tmp_path.display(), error = %e, "upload_temp_cleanup_failed");
        }
        self.done = true;
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if !self.done {
            self.file.take();
            let _ = std::fs::remove_file(&self.tmp_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_dir;
    use std::path::Path;
    use tokio::io::AsyncReadExt;

    async fn files_in(dir: &Path) -> Vec<String> {
        let mut out = Vec::new();
        let mut rd = fs::read_dir(dir).await.unwrap();
        while let Some(e) = rd.next_entry().await.unwrap() {
            out.push(e.file_name().to_string_lossy().to_string());
        }
        out.sort();
        out
    }

    #[test]
    fn sanitize_keeps_last_component() {
        assert_eq!(sanitize_file_name("song.mp3").unwrap(), "song.mp3");
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("C:\\music\\a.mp3").unwrap(), "a.mp3");
        assert!(sanitize_file_name("").is_err());
        assert!(sanitize_file_name("..").is_err());
        assert!(sanitize_file_name("dir/").is_err());
        assert!(sanitize_file_name(".hidden").is_err());
    }

    #[tokio::test]
    async fn upload_then_stream_round_trips() -> anyhow::Result<()> {
        let dir = temp_dir("transfer_rt");
        fs::create_dir_all(&dir).await?;
        let files = SongFiles::new(&dir, &dir);

        let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let n = files.receive_upload("abc123.mp3", &mut payload.as_slice()).await?;
        assert_eq!(n, payload.len() as u64);
        assert_eq!(files_in(&dir).await, vec!["abc123.mp3".to_string()]);

        let mut song = files.open_song(&SongId::parse("abc123")?).await?;
        assert_eq!(song.len, payload.len() as u64);
        let mut back = Vec::new();
        song.file.read_to_end(&mut back).await?;
        assert_eq!(back, payload);

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_song_is_not_found() -> anyhow::Result<()> {
        let dir = temp_dir("transfer_missing");
        fs::create_dir_all(&dir).await?;
        let files = SongFiles::new(&dir, &dir);
        let err = files.open_song(&SongId::parse("nope")?).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Song not found"));

        // a directory named like a song is not a song
        fs::create_dir_all(dir.join("folder.mp3")).await?;
        let err = files.open_song(&SongId::parse("folder")?).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // songs directory itself missing
        let gone = SongFiles::new(&dir, dir.join("does-not-exist"));
        assert!(matches!(gone.open_song(&SongId::parse("x")?).await, Err(ServiceError::NotFound(_))));

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn dropped_upload_leaves_no_file() -> anyhow::Result<()> {
        let dir = temp_dir("transfer_drop");
        fs::create_dir_all(&dir).await?;
        let files = SongFiles::new(&dir, &dir);

        let mut up = files.begin_upload("partial.mp3").await?;
        up.write_chunk(b"half of it").await?;
        assert_eq!(up.written(), 10);
        drop(up);
        assert!(files_in(&dir).await.is_empty());

        let mut up = files.begin_upload("aborted.mp3").await?;
        up.write_chunk(b"x").await?;
        up.abort().await;
        assert!(files_in(&dir).await.is_empty());

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn failing_reader_leaves_no_file() -> anyhow::Result<()> {
        struct Broken;
        impl AsyncRead for Broken {
            fn poll_read(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
                _buf: &mut tokio::io::ReadBuf<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Ready(Err(std::io::Error::other("connection reset")))
            }
        }

        let dir = temp_dir("transfer_broken");
        fs::create_dir_all(&dir).await?;
        let files = SongFiles::new(&dir, &dir);
        let err = files.receive_upload("x.mp3", &mut Broken).await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
        assert!(files_in(&dir).await.is_empty());

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_upload_dir_is_io_error() {
        let dir = temp_dir("transfer_nodir");
        let files = SongFiles::new(&dir, &dir);
        let err = files.receive_upload("a.mp3", &mut &b"data"[..]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
    }

    #[tokio::test]
    async fn reupload_replaces_content() -> anyhow::Result<()> {
        let dir = temp_dir("transfer_replace");
        fs::create_dir_all(&dir).await?;
        let files = SongFiles::new(&dir, &dir);
        files.receive_upload("s.mp3", &mut &b"first version"[..]).await?;
        files.receive_upload("s.mp3", &mut &b"second"[..]).await?;
        assert_eq!(fs::read(dir.join("s.mp3")).await?, b"second");
        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
