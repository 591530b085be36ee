use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use itertools::Itertools;
use rusqlite::{params, Connection, Result, Row};
use std::path::{Path, PathBuf};

/// One completed game session; immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub name: String,
    pub date: DateTime<Local>,
    pub score: u32,
    pub right_words: Vec<String>,
    pub wrong_words: Vec<String>,
}

/// Append-only database of completed games
#[derive(Debug)]
pub struct RankingDb {
    conn: Connection,
}

impl RankingDb {
    /// Open the ranking database at the default location and create tables
    /// if needed
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("unscramble.db"));

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
        Ok(RankingDb { conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(RankingDb { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(RankingDb { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                score INTEGER NOT NULL,
                right_words TEXT NOT NULL,
                wrong_words TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_games_score ON games(score)",
            [],
        )?;

        Ok(())
    }

    pub fn insert(&self, record: &GameRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO games (name, date, score, right_words, wrong_words)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.name,
                record.date.to_rfc3339(),
                record.score,
                record.right_words.iter().join(","),
                record.wrong_words.iter().join(","),
            ],
        )?;

        Ok(())
    }

    /// All completed games in the order they were played
    pub fn all_by_date(&self) -> Result<Vec<GameRecord>> {
        self.query_records("SELECT name, date, score, right_words, wrong_words FROM games ORDER BY date")
    }

    /// All completed games, best score first.
    ///
    /// The secondary `id ASC` key keeps equal scores in insertion order so
    /// the ranking display is deterministic.
    pub fn ranking(&self) -> Result<Vec<GameRecord>> {
        self.query_records(
            "SELECT name, date, score, right_words, wrong_words FROM games ORDER BY score DESC, id ASC",
        )
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM games", [])?;
        Ok(())
    }

    fn query_records(&self, sql: &str) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let record_iter = stmt.query_map([], Self::record_from_row)?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }
        Ok(records)
    }

    fn record_from_row(row: &Row) -> Result<GameRecord> {
        let date_str: String = row.get(1)?;
        let date = DateTime::parse_from_rfc3339(&date_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    1,
                    "date".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?
            .with_timezone(&Local);

        Ok(GameRecord {
            name: row.get(0)?,
            date,
            score: row.get(2)?,
            right_words: split_words(&row.get::<_, String>(3)?),
            wrong_words: split_words(&row.get::<_, String>(4)?),
        })
    }
}

fn split_words(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        Vec::new()
    } else {
        joined.split(',').map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(name: &str, score: u32, secs: i64) -> GameRecord {
        GameRecord {
            name: name.to_string(),
            date: Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            score,
            right_words: vec!["cat".to_string()],
            wrong_words: vec![],
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let db = RankingDb::open_in_memory().unwrap();
        let rec = GameRecord {
            name: "ana".to_string(),
            date: Local.timestamp_opt(1_700_000_000, 0).unwrap(),
            score: 40,
            right_words: vec!["cat".to_string(), "dog".to_string()],
            wrong_words: vec!["fox".to_string()],
        };

        db.insert(&rec).unwrap();

        let all = db.all_by_date().unwrap();
        assert_eq!(all, vec![rec]);
    }

    #[test]
    fn test_ranking_orders_by_score_descending() {
        let db = RankingDb::open_in_memory().unwrap();
        db.insert(&record("low", 10, 0)).unwrap();
        db.insert(&record("high", 50, 1)).unwrap();
        db.insert(&record("mid", 30, 2)).unwrap();

        let scores: Vec<u32> = db.ranking().unwrap().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![50, 30, 10]);
    }

    #[test]
    fn test_ranking_ties_keep_insertion_order() {
        let db = RankingDb::open_in_memory().unwrap();
        db.insert(&record("first", 10, 1)).unwrap();
        db.insert(&record("top", 20, 2)).unwrap();
        db.insert(&record("second", 10, 3)).unwrap();

        let names: Vec<String> = db
            .ranking()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_all_by_date_keeps_play_order() {
        let db = RankingDb::open_in_memory().unwrap();
        db.insert(&record("b", 50, 10)).unwrap();
        db.insert(&record("a", 10, 20)).unwrap();

        let names: Vec<String> = db
            .all_by_date()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_empty_word_lists_roundtrip() {
        let db = RankingDb::open_in_memory().unwrap();
        let rec = GameRecord {
            name: String::new(),
            date: Local.timestamp_opt(1_700_000_000, 0).unwrap(),
            score: 0,
            right_words: vec![],
            wrong_words: vec![],
        };

        db.insert(&rec).unwrap();

        let all = db.all_by_date().unwrap();
        assert!(all[0].right_words.is_empty());
        assert!(all[0].wrong_words.is_empty());
    }

    #[test]
    fn test_clear() {
        let db = RankingDb::open_in_memory().unwrap();
        db.insert(&record("x", 10, 0)).unwrap();
        assert_eq!(db.all_by_date().unwrap().len(), 1);

        db.clear().unwrap();
        assert!(db.all_by_date().unwrap().is_empty());
    }
}
