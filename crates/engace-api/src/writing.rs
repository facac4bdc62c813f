use serde::{Deserialize, Serialize};

use crate::client::{encode_component, ApiClient};
use crate::envelope::Acknowledgement;
use crate::{require, ApiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingSubmission {
    pub prompt: String,
    pub content: String,
}

impl WritingSubmission {
    pub fn new(prompt: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        require("writing prompt", &self.prompt)?;
        require("writing content", &self.content)?;
        Ok(())
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingFeedback {
    pub title: String,
    #[serde(default)]
    pub points: Vec<String>,
    #[serde(default)]
    pub sections: Vec<FeedbackSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSection {
    pub title: String,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    pub title: String,
    #[serde(default)]
    pub points: Vec<QuestionAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// A saved, unsubmitted writing submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,
    pub prompt: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftId {
    pub id: String,
}

#[derive(Debug, Clone, Copy)]
pub struct WritingService<'a> {
    api: &'a ApiClient,
}

impl<'a> WritingService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn submit_writing(
        &self,
        submission: &WritingSubmission,
    ) -> Result<WritingFeedback, ApiError> {
        submission.validate()?;
        self.api.post_data("/writing/feedback", submission).await
    }

    pub async fn writing_history(&self) -> Result<Vec<WritingSubmission>, ApiError> {
        self.api.get_data("/writing/history").await
    }

    pub async fn list_drafts(&self) -> Result<Vec<Draft>, ApiError> {
        self.api.get_data("/writing/drafts").await
    }

    pub async fn get_draft(&self, id: &str) -> Result<Draft, ApiError> {
        self.api.get_data(&draft_endpoint(id)?).await
    }

    pub async fn save_draft(&self, submission: &WritingSubmission) -> Result<DraftId, ApiError> {
        submission.validate()?;
        self.api.post_data("/writing/drafts", submission).await
    }

    pub async fn update_draft(
        &self,
        id: &str,
        submission: &WritingSubmission,
    ) -> Result<Draft, ApiError> {
        let endpoint = draft_endpoint(id)?;
        submission.validate()?;
        self.api.put_data(&endpoint, submission).await
    }

    pub async fn delete_draft(&self, id: &str) -> Result<Acknowledgement, ApiError> {
        self.api.delete_data(&draft_endpoint(id)?).await
    }
}

fn draft_endpoint(id: &str) -> Result<String, ApiError> {
    let id = require("draft id", id)?;
    Ok(format!("/writing/drafts/{}", encode_component(id)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn submission_validation() {
        assert!(WritingSubmission::new("Describe your city", "It is big.")
            .validate()
            .is_ok());
        assert!(WritingSubmission::new("", "It is big.").validate().is_err());
        assert!(WritingSubmission::new("Describe your city", " \n ")
            .validate()
            .is_err());
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        let submission = WritingSubmission::new("p", "  I   like\ncats. ");
        assert_eq!(submission.word_count(), 3);
    }

    #[test]
    fn feedback_nests_sections() {
        let feedback: WritingFeedback = serde_json::from_value(json!({
            "title": "Overall",
            "points": ["Clear structure"],
            "sections": [{
                "title": "Grammar",
                "subsections": [{
                    "title": "Tenses",
                    "points": [{"question": "Is the tense consistent?", "answer": "Mostly."}]
                }]
            }]
        }))
        .unwrap();
        assert_eq!(feedback.sections[0].subsections[0].points[0].answer, "Mostly.");
    }

    #[test]
    fn draft_endpoint_encodes_ids() {
        assert_eq!(draft_endpoint(" a/b ").unwrap(), "/writing/drafts/a%2Fb");
        assert!(draft_endpoint("").is_err());
    }
}
