use std::fmt::Write;

use engace_api::{require, Acknowledgement, RequestOptions, SearchHistoryItem, WordDefinition};
use futures::future::join;

use crate::utilities::confirm;
use crate::{samples, App};

pub async fn search(app: &App, keyword: &str) -> anyhow::Result<()> {
    let tracker = app.tracker::<WordDefinition>();
    let word = if app.use_samples {
        tracker
            .request(
                move || async move { require("search term", keyword).map(samples::definition) },
                RequestOptions::new(),
            )
            .await
    } else {
        let dictionary = app.client.dictionary();
        tracker
            .request(|| dictionary.search_word(keyword), RequestOptions::new())
            .await
    };

    let Some(word) = word else {
        if tracker.error().is_some_and(|error| error.is_not_found()) {
            println!("Couldn't find the word you were looking for.");
            suggest(app).await;
        }
        return Ok(());
    };
    print!("{}", format_definition(&word));

    if !app.use_samples && confirm("Add this word to your favorites? (y/N): ")? {
        add_favorite(app, &word.word).await;
    }
    Ok(())
}

pub async fn history(app: &App) {
    if app.use_samples {
        println!("Search history is not available with sample data.");
        return;
    }
    let dictionary = app.client.dictionary();
    let history = app
        .tracker::<Vec<SearchHistoryItem>>()
        .request(|| dictionary.search_history(), RequestOptions::new())
        .await;
    match history {
        Some(items) if items.is_empty() => println!("No searches yet."),
        Some(items) => {
            for item in items {
                println!("  {:<30} {}", item.word, item.timestamp);
            }
        }
        None => {}
    }
}

pub async fn favorites(app: &App) {
    if app.use_samples {
        println!("Favorites are not available with sample data.");
        return;
    }
    let dictionary = app.client.dictionary();
    let favorites = app
        .tracker::<Vec<String>>()
        .request(|| dictionary.favorites(), RequestOptions::new())
        .await;
    match favorites {
        Some(words) if words.is_empty() => println!("No favorite words yet."),
        Some(words) => {
            for word in words {
                println!("  * {word}");
            }
        }
        None => {}
    }
}

pub async fn add_favorite(app: &App, word: &str) {
    if app.use_samples {
        println!("Favorites are not available with sample data.");
        return;
    }
    let dictionary = app.client.dictionary();
    app.tracker::<Acknowledgement>()
        .request(
            || dictionary.add_to_favorites(word),
            RequestOptions::new().success_message(format!("Added '{}' to favorites", word.trim())),
        )
        .await;
}

pub async fn remove_favorite(app: &App, word: &str) {
    if app.use_samples {
        println!("Favorites are not available with sample data.");
        return;
    }
    let dictionary = app.client.dictionary();
    app.tracker::<Acknowledgement>()
        .request(
            || dictionary.remove_from_favorites(word),
            RequestOptions::new()
                .success_message(format!("Removed '{}' from favorites", word.trim())),
        )
        .await;
}

/// Favorites and recent searches, or the built-in suggestions when there are none.
pub async fn suggest(app: &App) {
    let suggestions = if app.use_samples {
        Vec::new()
    } else {
        let dictionary = app.client.dictionary();
        let favorites = app.tracker::<Vec<String>>();
        let history = app.tracker::<Vec<SearchHistoryItem>>();
        let (favorites, history) = join(
            favorites.request(|| dictionary.favorites(), RequestOptions::new().skip_toast()),
            history.request(
                || dictionary.search_history(),
                RequestOptions::new().skip_toast(),
            ),
        )
        .await;
        merge_suggestions(
            &favorites.unwrap_or_default(),
            &history.unwrap_or_default(),
        )
    };
    let suggestions = if suggestions.is_empty() {
        samples::SUGGESTED_SEARCHES.map(str::to_string).to_vec()
    } else {
        suggestions
    };
    println!("Try searching for: {}", suggestions.join(", "));
}

fn merge_suggestions(favorites: &[String], history: &[SearchHistoryItem]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for word in favorites
        .iter()
        .chain(history.iter().map(|item| &item.word))
    {
        if !merged.iter().any(|seen| seen.eq_ignore_ascii_case(word)) {
            merged.push(word.clone());
        }
    }
    merged.truncate(samples::SUGGESTED_SEARCHES.len());
    merged
}

pub fn format_definition(word: &WordDefinition) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Showing definition for '{}':", word.word);
    if let Some(phonetic) = &word.phonetic {
        let _ = writeln!(out, "  pronunciation: {phonetic}");
    }
    for translation in &word.translations {
        let _ = writeln!(out, "    {}:", translation.part_of_speech);
        for sense in &translation.definitions {
            let _ = writeln!(out, "        {}", sense.definition);
            if let Some(example) = &sense.example {
                let _ = writeln!(out, "          example: {example}");
            }
        }
    }
    if !word.examples.is_empty() {
        let _ = writeln!(out, "  examples:");
        for example in &word.examples {
            let _ = writeln!(out, "    - {example}");
        }
    }
    if !word.related_words().is_empty() {
        let _ = writeln!(out, "  related: {}", word.related_words().join(", "));
    }
    out
}
