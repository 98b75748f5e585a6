pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod prefs;
pub mod service;
pub mod types;

pub use api::SynthesisClient;
pub use db::{CardFilter, CardStore, FlashCard, InsertOutcome, NewCard};
pub use error::MenuError;
pub use prefs::{Credential, PreferenceStore};
pub use service::{AudioCache, LoginFlow, StudySession};
