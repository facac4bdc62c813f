use serde::{Deserialize, Serialize};

use crate::client::{encode_component, ApiClient};
use crate::envelope::Acknowledgement;
use crate::{require, ApiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDefinition {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_words: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Sense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    pub word: String,
    pub timestamp: String,
}

impl WordDefinition {
    pub fn related_words(&self) -> &[String] {
        self.related_words.as_deref().unwrap_or_default()
    }

    pub fn sense_count(&self) -> usize {
        self.translations
            .iter()
            .map(|translation| translation.definitions.len())
            .sum()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DictionaryService<'a> {
    api: &'a ApiClient,
}

impl<'a> DictionaryService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn search_word(&self, keyword: &str) -> Result<WordDefinition, ApiError> {
        let keyword = require("search term", keyword)?;
        let endpoint = format!("/dictionary/search?keyword={}", encode_component(keyword));
        self.api.get_data(&endpoint).await
    }

    pub async fn search_history(&self) -> Result<Vec<SearchHistoryItem>, ApiError> {
        self.api.get_data("/dictionary/history").await
    }

    pub async fn add_to_favorites(&self, word: &str) -> Result<Acknowledgement, ApiError> {
        let word = require("word", word)?;
        self.api
            .post_data("/dictionary/favorites", &serde_json::json!({ "word": word }))
            .await
    }

    pub async fn favorites(&self) -> Result<Vec<String>, ApiError> {
        self.api.get_data("/dictionary/favorites").await
    }

    pub async fn remove_from_favorites(&self, word: &str) -> Result<Acknowledgement, ApiError> {
        let word = require("word", word)?;
        let endpoint = format!("/dictionary/favorites/{}", encode_component(word));
        self.api.delete_data(&endpoint).await
    }
}
