use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use std::error::Error;

static LANG_DIR: Dir = include_dir!("src/lang");

/// Languages with a bundled word list.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    strum_macros::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    /// Two-letter code stored in the `language` column of the catalog.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "es" => Some(Language::Spanish),
            _ => None,
        }
    }

    pub fn all() -> [Language; 2] {
        [Language::English, Language::Spanish]
    }

    /// Bundled word list for this language.
    pub fn word_list(&self) -> WordList {
        read_word_list(format!("{}.json", self.code())).unwrap()
    }
}

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

fn read_word_list(file_name: String) -> Result<WordList, Box<dyn Error>> {
    let file = LANG_DIR
        .get_file(file_name)
        .expect("Word list file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let list = from_str(file_as_str).expect("Unable to deserialize word list json");

    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_word_list() {
        let list = Language::English.word_list();

        assert_eq!(list.name, "english");
        assert!(!list.words.is_empty());
        assert_eq!(list.size as usize, list.words.len());
    }

    #[test]
    fn test_spanish_word_list() {
        let list = Language::Spanish.word_list();

        assert_eq!(list.name, "spanish");
        assert!(!list.words.is_empty());
        assert_eq!(list.size as usize, list.words.len());
    }

    #[test]
    fn test_language_codes_roundtrip() {
        for lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_word_list_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 3,
            "words": ["hello", "world", "test"]
        }
        "#;

        let list: WordList = from_str(json_data).expect("Failed to deserialize test word list");

        assert_eq!(list.name, "test");
        assert_eq!(list.size, 3);
        assert_eq!(list.words.len(), 3);
    }

    #[test]
    #[should_panic(expected = "Word list file not found")]
    fn test_read_nonexistent_word_list() {
        let _result = read_word_list("nonexistent.json".to_string());
    }

    #[test]
    fn test_no_duplicate_words_in_bundled_lists() {
        for lang in Language::all() {
            let list = lang.word_list();
            let mut seen = std::collections::HashSet::new();
            for word in &list.words {
                assert!(seen.insert(word), "duplicate word {word:?} in {}", list.name);
            }
        }
    }
}
