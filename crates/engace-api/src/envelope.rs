use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consultation::{ConversationHistory, Message};
use crate::dictionary::{SearchHistoryItem, WordDefinition};
use crate::exercises::{ExerciseSet, SubmissionResult};
use crate::writing::{Draft, DraftId, WritingFeedback, WritingSubmission};

/// The wrapper every backend endpoint is expected to answer with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub success: bool,
}

/// `{success}` reply of endpoints that only acknowledge.
///
/// A 2xx reply without the flag (including 204) counts as accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default = "accepted")]
    pub success: bool,
}

fn accepted() -> bool {
    true
}

/// Extracts the value a caller is interested in from a resolved response.
pub trait IntoData {
    type Data;

    fn into_data(self) -> Self::Data;
}

impl<T> IntoData for Envelope<T> {
    type Data = T;

    fn into_data(self) -> T {
        self.data
    }
}

impl IntoData for Value {
    type Data = Value;

    fn into_data(self) -> Value {
        match self {
            Value::Object(mut map) if map.get("data").is_some_and(|data| !data.is_null()) => {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        }
    }
}

impl<T> IntoData for Vec<T> {
    type Data = Vec<T>;

    fn into_data(self) -> Vec<T> {
        self
    }
}

impl<T> IntoData for Option<T> {
    type Data = Option<T>;

    fn into_data(self) -> Option<T> {
        self
    }
}

macro_rules! plain_data {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoData for $ty {
                type Data = $ty;

                fn into_data(self) -> $ty {
                    self
                }
            }
        )*
    };
}

plain_data!(
    (),
    String,
    Acknowledgement,
    WordDefinition,
    SearchHistoryItem,
    ExerciseSet,
    SubmissionResult,
    WritingFeedback,
    WritingSubmission,
    Draft,
    DraftId,
    Message,
    ConversationHistory,
);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_defaults_missing_metadata() {
        let envelope: Envelope<Vec<String>> =
            serde_json::from_value(json!({"data": ["cat", "dog"]})).unwrap();
        assert_eq!(envelope.status, 0);
        assert!(!envelope.success);
        assert_eq!(envelope.into_data(), vec!["cat", "dog"]);
    }

    #[test]
    fn acknowledgement_without_flag_is_accepted() {
        let ack: Acknowledgement = serde_json::from_value(json!({})).unwrap();
        assert!(ack.success);
        let ack: Acknowledgement = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(!ack.success);
    }

    #[test]
    fn json_values_unwrap_only_real_envelopes() {
        let wrapped = json!({"data": {"id": "d1"}, "success": true});
        assert_eq!(wrapped.into_data(), json!({"id": "d1"}));

        let bare = json!({"id": "d2"});
        assert_eq!(bare.clone().into_data(), bare);

        let null_data = json!({"data": null});
        assert_eq!(null_data.clone().into_data(), null_data);
    }
}
