//! Built-in responses rendered when `use_sample_data` is on, for trying the
//! front-end without a backend.

use engace_api::{
    ExerciseParams, ExerciseSet, FeedbackSection, Message, Question, QuestionAnswer, Sense,
    Subsection, Translation, WordDefinition, WritingFeedback, WritingSubmission,
};

pub const SUGGESTED_SEARCHES: [&str; 5] = [
    "hello",
    "beat around the bush",
    "spontaneous",
    "come across",
    "innovative",
];

pub const SUGGESTED_TOPICS: [&str; 5] = [
    "Places in town",
    "Numbers around me",
    "Favorite food",
    "Animals I like",
    "Hobbies I enjoy",
];

pub fn definition(keyword: &str) -> WordDefinition {
    let keyword = keyword.trim();
    if !keyword.eq_ignore_ascii_case("meticulous") {
        return WordDefinition {
            word: keyword.to_uppercase(),
            phonetic: None,
            translations: vec![Translation {
                part_of_speech: "unknown".to_string(),
                definitions: vec![Sense {
                    definition: format!("No sample entry for '{keyword}'. Try 'meticulous'."),
                    example: None,
                }],
            }],
            examples: Vec::new(),
            related_words: None,
        };
    }
    WordDefinition {
        word: "METICULOUS".to_string(),
        phonetic: Some("/məˈtɪkjələs/ (me-TIC-u-lous, stress on the second syllable)".to_string()),
        translations: vec![Translation {
            part_of_speech: "adjective".to_string(),
            definitions: vec![Sense {
                definition: "Showing great attention to detail; very careful and precise."
                    .to_string(),
                example: Some("She is a meticulous researcher.".to_string()),
            }],
        }],
        examples: vec![
            "He kept meticulous records.".to_string(),
            "She's always been meticulous about her appearance.".to_string(),
            "The project requires meticulous attention to detail.".to_string(),
        ],
        related_words: Some(vec![
            "be meticulous about (something)".to_string(),
            "meticulous attention to detail".to_string(),
        ]),
    }
}

const SAMPLE_QUESTIONS: [(&str, [&str; 4], &str); 5] = [
    (
        "January is the first month of the ____.",
        ["day", "week", "year", "season"],
        "year",
    ),
    (
        "There are seven days in a ____.",
        ["week", "month", "year", "decade"],
        "week",
    ),
    (
        "I ____ to school every day.",
        ["go", "goes", "going", "gone"],
        "go",
    ),
    (
        "If it rains, we ____ at home.",
        ["stay", "will stay", "stayed", "would stayed"],
        "will stay",
    ),
    (
        "She said that she ____ tired.",
        ["is", "was", "be", "been"],
        "was",
    ),
];

pub fn exercise(params: &ExerciseParams) -> ExerciseSet {
    let questions = SAMPLE_QUESTIONS
        .iter()
        .cycle()
        .take(params.question_count as usize)
        .zip(1..)
        .map(|((text, options, answer), id)| Question {
            id,
            text: text.to_string(),
            options: options.iter().map(|option| option.to_string()).collect(),
            correct_answer: Some(answer.to_string()),
        })
        .collect::<Vec<_>>();
    ExerciseSet {
        id: "sample".to_string(),
        topic: params.topic.trim().to_string(),
        time_limit: 60 * questions.len() as u32,
        questions,
    }
}

pub fn feedback(submission: &WritingSubmission) -> WritingFeedback {
    WritingFeedback {
        title: format!("Feedback on \"{}\"", submission.prompt.trim()),
        points: vec![
            format!("{} words submitted.", submission.word_count()),
            "Your ideas are easy to follow.".to_string(),
            "Vary your sentence openings to keep the reader engaged.".to_string(),
        ],
        sections: vec![FeedbackSection {
            title: "Grammar".to_string(),
            subsections: vec![Subsection {
                title: "Tenses".to_string(),
                points: vec![QuestionAnswer {
                    question: "Are the verb tenses consistent?".to_string(),
                    answer: "Mostly. Keep to the present simple when describing habits."
                        .to_string(),
                }],
            }],
        }],
    }
}

pub fn welcome_message() -> Message {
    Message {
        id: 1,
        content: "Hi! I'm EngAce, an assistant built to help you learn English.\n\n\
                  I always try my best, but I can still make mistakes, so double-check anything important!"
            .to_string(),
        is_user: false,
        timestamp: String::new(),
    }
}

pub fn reply(question: &Message) -> Message {
    Message {
        id: question.id + 1,
        content: format!(
            "You wrote: \"{}\". I'm running on sample data, so connect a backend for real answers.",
            question.content.trim()
        ),
        is_user: false,
        timestamp: question.timestamp.clone(),
    }
}

#[cfg(test)]
mod tests {
    use engace_api::{Answers, ExerciseType};

    use super::*;

    #[test]
    fn sample_exercise_respects_question_count() {
        let params = ExerciseParams {
            topic: " Favorite food ".to_string(),
            question_count: 7,
            exercise_type: ExerciseType::MostSuitable,
        };
        let set = exercise(&params);
        assert_eq!(set.topic, "Favorite food");
        assert_eq!(set.questions.len(), 7);
        assert_eq!(set.questions[6].id, 7);
        assert_eq!(set.time_limit, 420);

        let mut answers = Answers::new();
        answers.insert(1, "year".to_string());
        let result = set.grade_locally(&answers).unwrap();
        assert_eq!(result.correct_answers, 1);
    }

    #[test]
    fn unknown_sample_words_still_render() {
        let word = definition("cat");
        assert_eq!(word.word, "CAT");
        assert_eq!(word.sense_count(), 1);
        assert!(definition("Meticulous").phonetic.is_some());
    }
}
