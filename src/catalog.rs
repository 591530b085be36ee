use crate::app_dirs::AppDirs;
use crate::language::Language;
use rusqlite::{params, Connection, Result};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Resample budget for `pick_one` before giving up.
const MAX_PICK_ATTEMPTS: usize = 64;

/// Draw failures that the game surfaces to the player.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog holds fewer distinct words than the draw asked for.
    Insufficient {
        language: Language,
        requested: usize,
        available: usize,
    },
    Db(rusqlite::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Insufficient {
                language,
                requested,
                available,
            } => write!(
                f,
                "catalog has {available} {language} words, {requested} requested"
            ),
            CatalogError::Db(e) => write!(f, "catalog database error: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Db(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Db(e)
    }
}

/// Database-backed catalog of candidate words per language
#[derive(Debug)]
pub struct WordCatalog {
    conn: Connection,
}

impl WordCatalog {
    /// Open the catalog at the default location and create tables if needed
    pub fn new() -> Result<Self> {
        let db_path = Self::get_db_path().unwrap_or_else(|| PathBuf::from("unscramble.db"));

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(&db_path)?;
        Self::init_schema(&conn)?;
        Ok(WordCatalog { conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(WordCatalog { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(WordCatalog { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                language TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_words_title_language ON words(title, language)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_words_language ON words(language)",
            [],
        )?;

        Ok(())
    }

    fn get_db_path() -> Option<PathBuf> {
        AppDirs::db_path()
    }

    /// Insert the bundled word lists when the catalog is empty.
    ///
    /// Returns the number of words inserted (0 when already seeded).
    pub fn seed_bundled(&mut self) -> Result<usize> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(0);
        }

        let mut inserted = 0;
        for language in Language::all() {
            let list = language.word_list();
            inserted += list.words.len();
            self.insert_many(language, &list.words)?;
        }
        Ok(inserted)
    }

    /// Insert a batch of words for one language in a single transaction
    pub fn insert_many(&mut self, language: Language, words: &[String]) -> Result<()> {
        let tx = self.conn.transaction()?;

        for word in words {
            tx.execute(
                "INSERT INTO words (title, language) VALUES (?1, ?2)",
                params![word, language.code()],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn word_count(&self, language: Language) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM words WHERE language = ?1",
            [language.code()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// All words for a language in title order
    pub fn query_all(&self, language: Language) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM words WHERE language = ?1 ORDER BY title ASC")?;

        let word_iter = stmt.query_map([language.code()], |row| row.get::<_, String>(0))?;

        let mut words = Vec::new();
        for word in word_iter {
            words.push(word?);
        }
        Ok(words)
    }

    /// Draw `count` distinct words for `language`, sampled without
    /// replacement. A catalog smaller than `count` is an explicit error,
    /// never a silent truncation.
    pub fn draw_words(
        &self,
        language: Language,
        count: usize,
    ) -> std::result::Result<Vec<String>, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM words WHERE language = ?1 ORDER BY RANDOM() LIMIT ?2")?;

        let word_iter =
            stmt.query_map(params![language.code(), count as i64], |row| {
                row.get::<_, String>(0)
            })?;

        let mut words = Vec::new();
        for word in word_iter {
            words.push(word?);
        }

        if words.len() < count {
            return Err(CatalogError::Insufficient {
                language,
                requested: count,
                available: words.len(),
            });
        }
        Ok(words)
    }

    /// Draw one word for `language` outside `excluding`.
    ///
    /// Bounded resampling; fails explicitly instead of recursing forever
    /// when the exclusion set covers the catalog.
    pub fn pick_one(
        &self,
        language: Language,
        excluding: &HashSet<String>,
    ) -> std::result::Result<String, CatalogError> {
        for _ in 0..MAX_PICK_ATTEMPTS {
            let word: Option<String> = self
                .conn
                .query_row(
                    "SELECT title FROM words WHERE language = ?1 ORDER BY RANDOM() LIMIT 1",
                    [language.code()],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;

            match word {
                Some(word) if !excluding.contains(&word) => return Ok(word),
                Some(_) => continue,
                None => break,
            }
        }

        let total = self.word_count(language)?;
        Err(CatalogError::Insufficient {
            language,
            requested: 1,
            available: total.saturating_sub(excluding.len()),
        })
    }
}
