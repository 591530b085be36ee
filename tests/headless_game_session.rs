// Headless end-to-end runs of the session state machine against real
// (in-memory) sqlite stores, without the terminal front end.

use std::collections::HashSet;

use unscramble::catalog::WordCatalog;
use unscramble::game::GameSession;
use unscramble::language::Language;
use unscramble::ranking::RankingDb;
use unscramble::scramble::is_permutation;
use unscramble::settings::{Settings, SCORE_INCREASE};

fn seeded_catalog() -> WordCatalog {
    let mut catalog = WordCatalog::open_in_memory().unwrap();
    catalog.seed_bundled().unwrap();
    catalog
}

#[test]
fn perfect_game_ends_ranked_first() {
    let catalog = seeded_catalog();
    let ranking = RankingDb::open_in_memory().unwrap();
    let settings = Settings {
        language: Language::English,
        word_count: 5,
    };

    let mut session = GameSession::new(&settings);
    session.start(&settings, &catalog);

    // Guess every word correctly; the answer is on the state snapshot.
    while !session.state().is_game_over {
        let answer = session.state().current_word.clone();
        assert!(is_permutation(&answer, &session.state().scrambled_word));
        assert!(session.submit_guess(&answer));
    }

    let state = session.state();
    assert_eq!(state.score, 5 * SCORE_INCREASE);
    assert_eq!(state.word_index, 5);
    assert_eq!(state.right_words.len(), 5);
    assert!(state.wrong_words.is_empty());

    let record = session.complete("champ").unwrap();
    ranking.insert(&record).unwrap();

    let rows = ranking.ranking().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "champ");
    assert_eq!(rows[0].score, 5 * SCORE_INCREASE);
}

#[test]
fn skipped_words_land_in_the_wrong_column() {
    let catalog = seeded_catalog();
    let settings = Settings {
        language: Language::Spanish,
        word_count: 5,
    };

    let mut session = GameSession::new(&settings);
    session.start(&settings, &catalog);

    while !session.state().is_game_over {
        session.skip();
    }

    let state = session.state();
    assert_eq!(state.score, 0);
    assert!(state.right_words.is_empty());
    assert_eq!(state.wrong_words.len(), 5);
    assert_eq!(state.wrong_words, state.used_words);
}

#[test]
fn no_word_repeats_within_a_session() {
    let catalog = seeded_catalog();
    let settings = Settings {
        language: Language::English,
        word_count: 15,
    };

    let mut session = GameSession::new(&settings);
    session.start(&settings, &catalog);

    while !session.state().is_game_over {
        session.skip();
    }

    let used = &session.state().used_words;
    let unique: HashSet<&String> = used.iter().collect();
    assert_eq!(used.len(), 15);
    assert_eq!(unique.len(), 15);
}

#[test]
fn language_switch_discards_the_old_queue() {
    let mut catalog = WordCatalog::open_in_memory().unwrap();
    catalog
        .insert_many(
            Language::English,
            &["cat".into(), "dog".into(), "fox".into()],
        )
        .unwrap();
    catalog
        .insert_many(
            Language::Spanish,
            &["gato".into(), "perro".into(), "lobo".into()],
        )
        .unwrap();

    let english = Settings {
        language: Language::English,
        word_count: 3,
    };
    let spanish = Settings {
        language: Language::Spanish,
        word_count: 3,
    };

    let mut session = GameSession::new(&english);
    session.start(&english, &catalog);
    session.skip();

    // Settings change mid-session: the English queue must vanish.
    session.start(&spanish, &catalog);

    let english_words = ["cat", "dog", "fox"];
    while !session.state().is_game_over {
        assert!(!english_words.contains(&session.state().current_word.as_str()));
        session.skip();
    }
    for word in &session.state().used_words {
        assert!(!english_words.contains(&word.as_str()));
    }
}

#[test]
fn reset_after_game_over_records_and_restarts() {
    let catalog = seeded_catalog();
    let ranking = RankingDb::open_in_memory().unwrap();
    let settings = Settings {
        language: Language::English,
        word_count: 5,
    };

    let mut session = GameSession::new(&settings);
    session.start(&settings, &catalog);

    let first_answer = session.state().current_word.clone();
    session.submit_guess(&first_answer);
    while !session.state().is_game_over {
        session.skip();
    }

    let record = session.complete("ana").unwrap();
    ranking.insert(&record).unwrap();
    session.start(&settings, &catalog);

    // Fresh session: score back to zero, queue refilled.
    let state = session.state();
    assert_eq!(state.score, 0);
    assert_eq!(state.word_index, 1);
    assert!(!state.is_game_over);

    // The stored record kept the finished game's audit trail.
    let rows = ranking.all_by_date().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].score, SCORE_INCREASE);
    assert_eq!(rows[0].right_words, vec![first_answer]);
    assert_eq!(rows[0].wrong_words.len(), 4);
}

#[test]
fn every_bundled_word_scrambles_cleanly() {
    for language in Language::all() {
        for word in &language.word_list().words {
            let scrambled = unscramble::scramble::scramble(word);
            assert!(is_permutation(word, &scrambled), "{word}");

            let distinct: HashSet<char> = word.chars().collect();
            if distinct.len() > 1 {
                assert_ne!(&scrambled, word);
            }
        }
    }
}
