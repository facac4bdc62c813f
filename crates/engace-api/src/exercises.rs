use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::{encode_component, ApiClient};
use crate::{require, ApiError};

pub const MIN_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 50;

/// Chosen option text keyed by question id.
pub type Answers = BTreeMap<u32, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseType {
    MostSuitable,
    VerbConjugation,
    Conditional,
    IndirectSpeech,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 4] = [
        ExerciseType::MostSuitable,
        ExerciseType::VerbConjugation,
        ExerciseType::Conditional,
        ExerciseType::IndirectSpeech,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ExerciseType::MostSuitable => "most-suitable",
            ExerciseType::VerbConjugation => "verb-conjugation",
            ExerciseType::Conditional => "conditional",
            ExerciseType::IndirectSpeech => "indirect-speech",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExerciseType::MostSuitable => "Most Suitable Word",
            ExerciseType::VerbConjugation => "Verb Conjugation",
            ExerciseType::Conditional => "Conditional Sentences",
            ExerciseType::IndirectSpeech => "Indirect Speech",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(slug.trim()))
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseParams {
    pub topic: String,
    pub question_count: u32,
    pub exercise_type: ExerciseType,
}

impl ExerciseParams {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("topic", &self.topic)?;
        if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&self.question_count) {
            return Err(ApiError::Validation(format!(
                "question count must be between {MIN_QUESTION_COUNT} and {MAX_QUESTION_COUNT}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub id: String,
    pub topic: String,
    pub questions: Vec<Question>,
    /// Seconds.
    pub time_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub score: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub feedback: String,
}

impl ExerciseSet {
    /// Grades without the backend. `None` unless every question carries its answer.
    pub fn grade_locally(&self, answers: &Answers) -> Option<SubmissionResult> {
        if self.questions.is_empty() {
            return None;
        }
        let mut correct = 0;
        for question in &self.questions {
            let expected = question.correct_answer.as_deref()?;
            if answers
                .get(&question.id)
                .is_some_and(|given| given.trim().eq_ignore_ascii_case(expected.trim()))
            {
                correct += 1;
            }
        }
        let total = self.questions.len() as u32;
        let score = (f64::from(correct) * 100.0 / f64::from(total)).round();
        let feedback = match score as u32 {
            90.. => "Excellent work!",
            70..=89 => "Good job, keep practicing.",
            50..=69 => "Not bad. Review the questions you missed.",
            _ => "Keep going, revisit this topic and try again.",
        };
        Some(SubmissionResult {
            score,
            total_questions: total,
            correct_answers: correct,
            feedback: feedback.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExerciseService<'a> {
    api: &'a ApiClient,
}

impl<'a> ExerciseService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn generate_exercise(&self, params: &ExerciseParams) -> Result<ExerciseSet, ApiError> {
        params.validate()?;
        let params = ExerciseParams {
            topic: params.topic.trim().to_string(),
            ..params.clone()
        };
        self.api.post_data("/exercises/generate", &params).await
    }

    pub async fn submit_answers(
        &self,
        exercise_id: &str,
        answers: &Answers,
    ) -> Result<SubmissionResult, ApiError> {
        let exercise_id = require("exercise id", exercise_id)?;
        let endpoint = format!("/exercises/{}/submit", encode_component(exercise_id));
        self.api
            .post_data(&endpoint, &serde_json::json!({ "answers": answers }))
            .await
    }

    pub async fn exercise_history(&self) -> Result<Vec<ExerciseSet>, ApiError> {
        self.api.get_data("/exercises/history").await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(topic: &str, question_count: u32) -> ExerciseParams {
        ExerciseParams {
            topic: topic.to_string(),
            question_count,
            exercise_type: ExerciseType::MostSuitable,
        }
    }

    fn question(id: u32, answer: Option<&str>) -> Question {
        Question {
            id,
            text: format!("question {id}"),
            options: vec!["day".into(), "week".into(), "year".into(), "season".into()],
            correct_answer: answer.map(str::to_string),
        }
    }

    #[test]
    fn params_use_wire_names() {
        let value = serde_json::to_value(params("Favorite food", 10)).unwrap();
        assert_eq!(
            value,
            json!({"topic": "Favorite food", "questionCount": 10, "exerciseType": "most-suitable"})
        );
    }

    #[test]
    fn params_validation() {
        assert!(params("Animals I like", 10).validate().is_ok());
        assert!(params("  ", 10).validate().is_err());
        assert!(params("Animals", 4).validate().is_err());
        assert!(params("Animals", 51).validate().is_err());
        assert!(params("Animals", 5).validate().is_ok());
        assert!(params("Animals", 50).validate().is_ok());
    }

    #[test]
    fn exercise_type_slugs() {
        for kind in ExerciseType::ALL {
            assert_eq!(ExerciseType::from_slug(kind.slug()), Some(kind));
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                json!(kind.slug())
            );
        }
        assert_eq!(ExerciseType::from_slug("nope"), None);
    }

    #[test]
    fn local_grading() {
        let set = ExerciseSet {
            id: "ex-1".into(),
            topic: "Time".into(),
            questions: vec![question(1, Some("year")), question(2, Some("week"))],
            time_limit: 600,
        };
        let mut answers = Answers::new();
        answers.insert(1, "Year".into());
        answers.insert(2, "day".into());
        let result = set.grade_locally(&answers).unwrap();
        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.total_questions, 2);
        assert_eq!(result.score, 50.0);
    }

    #[test]
    fn local_grading_needs_every_answer_key() {
        let set = ExerciseSet {
            id: "ex-2".into(),
            topic: "Time".into(),
            questions: vec![question(1, Some("year")), question(2, None)],
            time_limit: 600,
        };
        assert!(set.grade_locally(&Answers::new()).is_none());
    }
}
