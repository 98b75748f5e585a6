//! Content-addressed lookaside cache for synthesized pronunciations.
//!
//! Files live at `{dir}/{md5_hex(word)}.mp3`. There is no expiry and no size
//! bound; a stale pronunciation is dropped only through [`AudioCache::invalidate`].

use crate::api::SynthesisClient;
use crate::error::MenuError;
use crate::prefs::Credential;
use crate::types::synthesis::RemoteReply;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Remote speech synthesis, as seen by the cache.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(
        &self,
        word: &str,
        email: &str,
        token: &str,
    ) -> impl Future<Output = Result<RemoteReply, MenuError>> + Send;
}

impl SpeechSynthesizer for SynthesisClient {
    fn synthesize(
        &self,
        word: &str,
        email: &str,
        token: &str,
    ) -> impl Future<Output = Result<RemoteReply, MenuError>> + Send {
        SynthesisClient::synthesize(self, word, email, token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSource {
    Cache,
    Remote,
}

#[derive(Debug, Clone)]
pub struct CachedAudio {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub source: AudioSource,
}

/// Stable cache key for `word`: lowercase hex MD5 of its UTF-8 bytes.
pub fn audio_key(word: &str) -> String {
    format!("{:x}", md5::compute(word.as_bytes()))
}

pub struct AudioCache<S = SynthesisClient> {
    dir: PathBuf,
    synth: S,
}

impl<S: SpeechSynthesizer> AudioCache<S> {
    pub fn new(dir: impl Into<PathBuf>, synth: S) -> Self {
        Self {
            dir: dir.into(),
            synth,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, word: &str) -> PathBuf {
        self.dir.join(format!("{}.mp3", audio_key(word)))
    }

    pub async fn contains(&self, word: &str) -> Result<bool, MenuError> {
        Ok(fs::try_exists(self.path_for(word)).await?)
    }

    /// Serve `word` from disk, or synthesize and persist it.
    pub async fn get_or_fetch(
        &self,
        word: &str,
        credential: &Credential,
    ) -> Result<CachedAudio, MenuError> {
        let path = self.path_for(word);
        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(word, path = %path.display(), "audio served from cache");
                return Ok(CachedAudio {
                    path,
                    bytes,
                    source: AudioSource::Cache,
                });
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if word.trim().is_empty() {
            return Err(MenuError::InvalidInput("Word is empty".to_string()));
        }
        if !credential.is_complete() {
            return Err(MenuError::MissingCredential);
        }

        let reply = self
            .synth
            .synthesize(word, &credential.email, &credential.token)
            .await?;
        if !reply.is_success() {
            warn!(word, code = reply.code, "audio synthesis refused");
            return Err(match reply.code {
                RemoteReply::TOKEN_REJECTED => MenuError::TokenRejected {
                    message: reply.message,
                },
                code => MenuError::Remote {
                    code,
                    message: reply.message,
                },
            });
        }

        let payload: String = reply
            .message
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = STANDARD.decode(payload)?;

        fs::create_dir_all(&self.dir).await?;
        let tmp_path = path.with_extension("mp3.tmp");
        fs::write(&tmp_path, &bytes).await?;
        fs::rename(&tmp_path, &path).await?;
        info!(word, path = %path.display(), size = bytes.len(), "audio cached");

        Ok(CachedAudio {
            path,
            bytes,
            source: AudioSource::Remote,
        })
    }

    /// Drop the cached file for `word`. Returns whether a file was removed.
    pub async fn invalidate(&self, word: &str) -> Result<bool, MenuError> {
        let path = self.path_for(word);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(word, "cached audio removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
