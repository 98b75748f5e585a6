pub mod audio_cache;
pub mod login;
pub mod study;

pub use audio_cache::{AudioCache, AudioSource, CachedAudio, SpeechSynthesizer};
pub use login::LoginFlow;
pub use study::StudySession;
