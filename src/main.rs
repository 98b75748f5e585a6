use clap::{Parser, Subcommand};
use menuannam::config::{CONFIG, Config};
use menuannam::db::CardId;
use menuannam::service::AudioSource;
use menuannam::{
    AudioCache, CardFilter, CardStore, InsertOutcome, LoginFlow, MenuError, NewCard,
    PreferenceStore, StudySession, SynthesisClient,
};
use mimalloc::MiMalloc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "menuannam", version, about = "English-Vietnamese flash cards")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a flash card
    Add { english: String, vietnamese: String },
    /// List every flash card
    List,
    /// Show one flash card
    Show { id: CardId },
    /// Search by English and/or Vietnamese text
    Search {
        #[arg(long, default_value = "")]
        english: String,
        #[arg(long)]
        exact_english: bool,
        #[arg(long, default_value = "")]
        vietnamese: String,
        #[arg(long)]
        exact_vietnamese: bool,
    },
    /// Replace both sides of a flash card
    Edit {
        id: CardId,
        english: String,
        vietnamese: String,
    },
    /// Replace the flash card matching the old text pair
    EditPair {
        old_english: String,
        old_vietnamese: String,
        english: String,
        vietnamese: String,
    },
    /// Delete a flash card by id
    Delete { id: CardId },
    /// Delete a flash card by its text pair
    DeletePair { english: String, vietnamese: String },
    /// Number of stored flash cards
    Count,
    /// Draw a random study deck
    Study,
    /// Request a token for EMAIL; it is delivered by email
    Login { email: String },
    /// Save the token received by email
    Token { email: String, token: String },
    /// Forget the stored email and token
    Logout,
    /// Show the stored email
    Whoami,
    /// Fetch (or reuse) the pronunciation of WORD
    Audio { word: String },
    /// Delete the cached pronunciation of WORD
    CleanAudio { word: String },
}

/// Components built once by the composition root and handed to each command.
struct App {
    store: CardStore,
    prefs: PreferenceStore,
    client: SynthesisClient,
    audio: AudioCache,
    lesson_size: usize,
}

impl App {
    async fn build(cfg: &Config) -> Result<Self, MenuError> {
        tokio::fs::create_dir_all(&cfg.data_dir).await?;
        let store = CardStore::connect(&cfg.database_url())
            .await?
            .with_empty_term_policy(cfg.search.empty_term);
        let client = SynthesisClient::new(&cfg.remote)?;
        Ok(Self {
            store,
            prefs: PreferenceStore::new(cfg.prefs_path()),
            audio: AudioCache::new(cfg.audio_dir(), client.clone()),
            client,
            lesson_size: cfg.study.lesson_size,
        })
    }

    async fn run(&self, command: Command) -> Result<String, MenuError> {
        match command {
            Command::Add {
                english,
                vietnamese,
            } => Ok(match self.store.insert(&NewCard::new(english, vietnamese)).await {
                InsertOutcome::Inserted(id) => format!("Flash card {id} added"),
                InsertOutcome::Ignored => "Flash card already exists".to_string(),
                InsertOutcome::Failed(reason) => format!("Flash card not added: {reason}"),
            }),
            Command::List => {
                let cards = self.store.get_all().await?;
                Ok(render_cards(&cards))
            }
            Command::Show { id } => Ok(match self.store.get_by_id(id).await? {
                Some(card) => render_cards(std::slice::from_ref(&card)),
                None => "Flash card not found".to_string(),
            }),
            Command::Search {
                english,
                exact_english,
                vietnamese,
                exact_vietnamese,
            } => {
                let filter = CardFilter {
                    english,
                    exact_english,
                    vietnamese,
                    exact_vietnamese,
                };
                let cards = self.store.get_filtered(&filter).await?;
                Ok(format!("{}Found {} cards", render_rows(&cards), cards.len()))
            }
            Command::Edit {
                id,
                english,
                vietnamese,
            } => {
                let changed = self
                    .store
                    .update_by_id(id, Some(&english), Some(&vietnamese))
                    .await?;
                Ok(if changed > 0 {
                    "Flash card updated successfully".to_string()
                } else {
                    "Flash card not found".to_string()
                })
            }
            Command::EditPair {
                old_english,
                old_vietnamese,
                english,
                vietnamese,
            } => {
                let changed = self
                    .store
                    .update_by_pair(
                        Some(&old_english),
                        Some(&old_vietnamese),
                        Some(&english),
                        Some(&vietnamese),
                    )
                    .await?;
                Ok(if changed > 0 {
                    "Flash card updated successfully".to_string()
                } else {
                    "Flash card not found".to_string()
                })
            }
            Command::Delete { id } => Ok(if self.store.delete_by_id(id).await? {
                "Card deleted successfully!".to_string()
            } else {
                "Flash card not found".to_string()
            }),
            Command::DeletePair {
                english,
                vietnamese,
            } => {
                let removed = self
                    .store
                    .delete_by_pair(Some(&english), Some(&vietnamese))
                    .await?;
                Ok(format!("{removed} card(s) deleted"))
            }
            Command::Count => Ok(format!("{} cards", self.store.count().await?)),
            Command::Study => {
                let mut session = StudySession::start(&self.store, self.lesson_size).await?;
                if session.is_empty() {
                    return Ok(session.progress());
                }
                let mut out = String::new();
                for _ in 0..session.len() {
                    let front = session.visible_text().unwrap_or_default().to_string();
                    session.flip();
                    let back = session.visible_text().unwrap_or_default();
                    out.push_str(&format!("{}: {front} = {back}\n", session.progress()));
                    session.next();
                }
                Ok(out.trim_end().to_string())
            }
            Command::Login { email } => {
                let message = LoginFlow::new(&self.client, &self.prefs)
                    .request_token(&email)
                    .await?;
                Ok(format!("Token sent to email: {message}"))
            }
            Command::Token { email, token } => {
                LoginFlow::new(&self.client, &self.prefs)
                    .confirm_token(&email, &token)
                    .await?;
                Ok(format!("Token received for {}", email.trim()))
            }
            Command::Logout => {
                LoginFlow::new(&self.client, &self.prefs).logout().await?;
                Ok("Logged out".to_string())
            }
            Command::Whoami => {
                let cred = LoginFlow::new(&self.client, &self.prefs).current().await?;
                Ok(if cred.email.is_empty() {
                    "Not logged in".to_string()
                } else {
                    format!("Email loaded: {}", cred.email)
                })
            }
            Command::Audio { word } => {
                let cred = self.prefs.read().await?;
                let audio = self.audio.get_or_fetch(&word, &cred).await?;
                let origin = match audio.source {
                    AudioSource::Cache => "cached",
                    AudioSource::Remote => "generated",
                };
                Ok(format!("Audio {origin}: {}", audio.path.display()))
            }
            Command::CleanAudio { word } => Ok(if self.audio.invalidate(&word).await? {
                "Audio deleted successfully".to_string()
            } else {
                "No audio stored for this word".to_string()
            }),
        }
    }
}

fn render_rows(cards: &[menuannam::FlashCard]) -> String {
    cards
        .iter()
        .map(|c| {
            format!(
                "{:>5}  {} = {}\n",
                c.id,
                c.display_english(),
                c.display_vietnamese()
            )
        })
        .collect()
}

fn render_cards(cards: &[menuannam::FlashCard]) -> String {
    if cards.is_empty() {
        return "No flashcards found".to_string();
    }
    render_rows(cards).trim_end().to_string()
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let loaded = &*CONFIG;
    let loglevel = loaded.as_ref().map_or("info", |cfg| cfg.loglevel.as_str());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "configuration could not be loaded");
            println!("{}", e.status_message());
            std::process::exit(1);
        }
    };

    info!(
        data_dir = %cfg.data_dir.display(),
        database_url = %cfg.database_url(),
        proxy = %cfg.remote.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.loglevel,
    );

    let cli = Cli::parse();

    let status = match App::build(cfg).await {
        Ok(app) => app.run(cli.command).await,
        Err(e) => Err(e),
    };

    match status {
        Ok(line) => println!("{line}"),
        Err(e) => {
            warn!(error = %e, "command failed");
            println!("{}", e.status_message());
        }
    }
}
