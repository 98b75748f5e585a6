//! SQL DDL for initializing the flash card storage.

/// SQLite schema with:
/// - `uid` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `english_card` / `vietnamese_card` nullable TEXT
/// - a UNIQUE expression index on the pair; `IFNULL(.., X'')` maps NULL onto an
///   empty blob so that NULL halves collide too, while never equalling any text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS flash_cards (
    uid INTEGER PRIMARY KEY AUTOINCREMENT,
    english_card TEXT NULL,
    vietnamese_card TEXT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_flash_cards_pair
    ON flash_cards(IFNULL(english_card, X''), IFNULL(vietnamese_card, X''));
"#;
