use std::fmt::Write;
use std::future;
use std::time::{Duration, Instant};

use engace_api::{
    Answers, ApiError, ExerciseParams, ExerciseSet, ExerciseType, RequestOptions,
    SubmissionResult,
};
use rand::seq::SliceRandom;

use crate::utilities::input;
use crate::{samples, App};

const DEFAULT_QUESTION_COUNT: u32 = 10;

#[derive(Debug, PartialEq)]
enum Response<'o> {
    Answer(&'o str),
    Skip,
    Previous,
    Submit,
    Unclear,
}

pub async fn run(app: &App) -> anyhow::Result<()> {
    let params = ask_params()?;

    let tracker = app.tracker::<ExerciseSet>();
    let set = if app.use_samples {
        tracker
            .request(
                || future::ready(params.validate().map(|()| samples::exercise(&params))),
                RequestOptions::new(),
            )
            .await
    } else {
        let exercises = app.client.exercises();
        tracker
            .request(|| exercises.generate_exercise(&params), RequestOptions::new())
            .await
    };
    let Some(set) = set else {
        return Ok(());
    };
    if set.questions.is_empty() {
        println!("The exercise came back without questions.");
        return Ok(());
    }

    println!(
        "Exercise on '{}': {} questions, {} to finish.",
        set.topic,
        set.questions.len(),
        format_remaining(Duration::from_secs(set.time_limit.into()))
    );
    let answers = take_exercise(&set)?;

    let tracker = app.tracker::<SubmissionResult>();
    let result = if app.use_samples {
        tracker
            .request(
                || {
                    future::ready(set.grade_locally(&answers).ok_or_else(|| {
                        ApiError::Validation("this exercise has no answer key".to_string())
                    }))
                },
                RequestOptions::new(),
            )
            .await
    } else {
        let exercises = app.client.exercises();
        tracker
            .request(
                || exercises.submit_answers(&set.id, &answers),
                RequestOptions::new().success_message("Answers submitted"),
            )
            .await
    };
    if let Some(result) = result {
        print!("{}", format_result(&result));
        print!("{}", format_review(&set, &answers));
    }
    Ok(())
}

fn ask_params() -> anyhow::Result<ExerciseParams> {
    println!("Suggested topics:");
    for (index, topic) in samples::SUGGESTED_TOPICS.iter().enumerate() {
        println!("  [{}]: {topic}", index + 1);
    }
    let topic = resolve_topic(&input("Topic (or the number of a suggestion): ")?);

    let question_count = loop {
        let line = input(&format!("Number of questions [{DEFAULT_QUESTION_COUNT}]: "))?;
        match parse_question_count(&line) {
            Some(count) => break count,
            None => println!("Please enter a whole number."),
        }
    };

    println!("Question types:");
    for (index, kind) in ExerciseType::ALL.iter().enumerate() {
        println!("  [{}]: {kind}", index + 1);
    }
    let exercise_type = loop {
        let line = input("Question type [1]: ")?;
        match resolve_type(&line) {
            Some(kind) => break kind,
            None => println!("Please pick one of the listed types."),
        }
    };

    Ok(ExerciseParams {
        topic,
        question_count,
        exercise_type,
    })
}

fn resolve_topic(line: &str) -> String {
    let line = line.trim();
    line.parse::<usize>()
        .ok()
        .and_then(|number| samples::SUGGESTED_TOPICS.get(number.wrapping_sub(1)))
        .map(|topic| topic.to_string())
        .unwrap_or_else(|| line.to_string())
}

fn parse_question_count(line: &str) -> Option<u32> {
    let line = line.trim();
    if line.is_empty() {
        return Some(DEFAULT_QUESTION_COUNT);
    }
    line.parse().ok()
}

fn resolve_type(line: &str) -> Option<ExerciseType> {
    let line = line.trim();
    if line.is_empty() {
        return Some(ExerciseType::MostSuitable);
    }
    match line.parse::<usize>() {
        Ok(number) => ExerciseType::ALL.get(number.wrapping_sub(1)).copied(),
        Err(_) => ExerciseType::from_slug(line),
    }
}

fn take_exercise(set: &ExerciseSet) -> anyhow::Result<Answers> {
    let started = Instant::now();
    let limit = Duration::from_secs(set.time_limit.into());
    let total = set.questions.len();
    let options = set
        .questions
        .iter()
        .map(|question| {
            let mut options = question
                .options
                .iter()
                .map(String::as_str)
                .collect::<Vec<&str>>();
            options.shuffle(&mut rand::thread_rng());
            options
        })
        .collect::<Vec<_>>();

    let mut answers = Answers::new();
    let mut index = 0;
    while index < total {
        let remaining = limit.saturating_sub(started.elapsed());
        if set.time_limit > 0 && remaining.is_zero() {
            println!("Time is up!");
            break;
        }
        let question = &set.questions[index];
        println!("----------------------------------------");
        println!(
            "Question {}/{} {}  {} left",
            index + 1,
            total,
            progress_bar(index + 1, total, 20),
            format_remaining(remaining)
        );
        println!("{}", question.text);
        for (number, option) in options[index].iter().enumerate() {
            let marker = if answers.get(&question.id).map(String::as_str) == Some(*option) {
                "*"
            } else {
                " "
            };
            println!("{marker}[{}]: {option}", number + 1);
        }

        let line = input("Your answer (:p previous, :s skip, :submit): ")?;
        if line.is_empty() {
            break;
        }
        match parse_response(&options[index], &line) {
            Response::Answer(option) => {
                answers.insert(question.id, option.to_string());
                index += 1;
            }
            Response::Skip => index += 1,
            Response::Previous => index = index.saturating_sub(1),
            Response::Submit => break,
            Response::Unclear => {
                println!("Couldn't understand your answer, please try again.");
            }
        }
    }
    Ok(answers)
}

fn parse_response<'o>(options: &[&'o str], line: &str) -> Response<'o> {
    match &line.trim().to_lowercase()[..] {
        ":s" | ":skip" => Response::Skip,
        ":p" | ":prev" | ":previous" => Response::Previous,
        ":submit" | ":q" => Response::Submit,
        other => match match_answer(options, other) {
            Some(option) => Response::Answer(option),
            None => Response::Unclear,
        },
    }
}

/// Accepts an option number or text close enough to exactly one option.
fn match_answer<'o>(options: &[&'o str], given: &str) -> Option<&'o str> {
    if let Ok(number) = given.parse::<usize>() {
        return options.get(number.wrapping_sub(1)).copied();
    }
    let given = given.to_lowercase();
    let mut scored = options
        .iter()
        .map(|option| (*option, strsim::jaro(&option.to_lowercase(), &given)))
        .collect::<Vec<(&str, f64)>>();
    // most similar at the start
    scored.sort_unstable_by(|(_, a), (_, b)| b.total_cmp(a));
    let (best, best_score) = *scored.first()?;
    let runner_up = scored.get(1).map_or(0.0, |(_, score)| *score);
    if best_score == 1.0 || (best_score > 0.9 && best_score - runner_up > 0.25) {
        Some(best)
    } else {
        None
    }
}

fn format_remaining(remaining: Duration) -> String {
    let seconds = remaining.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn progress_bar(current: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 { 0 } else { current.min(total) * width / total };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn format_result(result: &SubmissionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "========================================");
    let _ = writeln!(
        out,
        "Score: {} ({}/{} correct)",
        result.score, result.correct_answers, result.total_questions
    );
    let _ = writeln!(out, "{}", result.feedback);
    out
}

/// Lists the missed questions when the set carries its answer key.
fn format_review(set: &ExerciseSet, answers: &Answers) -> String {
    let mut out = String::new();
    for question in &set.questions {
        let Some(expected) = &question.correct_answer else {
            continue;
        };
        let given = answers.get(&question.id);
        if given.is_some_and(|given| given.eq_ignore_ascii_case(expected)) {
            continue;
        }
        let _ = writeln!(out, "- {}", question.text);
        let _ = writeln!(
            out,
            "    your answer: {}, correct answer: {expected}",
            given.map(String::as_str).unwrap_or("(skipped)")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use engace_api::Question;

    use super::*;

    const OPTIONS: [&str; 4] = ["day", "week", "year", "season"];

    #[test]
    fn answers_by_number_or_text() {
        assert_eq!(match_answer(&OPTIONS, "3"), Some("year"));
        assert_eq!(match_answer(&OPTIONS, "YEAR"), Some("year"));
        assert_eq!(match_answer(&OPTIONS, "0"), None);
        assert_eq!(match_answer(&OPTIONS, "9"), None);
        assert_eq!(match_answer(&OPTIONS, "xyz"), None);
    }

    #[test]
    fn session_commands() {
        assert_eq!(parse_response(&OPTIONS, ":S\n"), Response::Skip);
        assert_eq!(parse_response(&OPTIONS, ":p"), Response::Previous);
        assert_eq!(parse_response(&OPTIONS, ":submit"), Response::Submit);
        assert_eq!(parse_response(&OPTIONS, " week "), Response::Answer("week"));
        assert_eq!(parse_response(&OPTIONS, ""), Response::Unclear);
    }

    #[test]
    fn form_defaults() {
        assert_eq!(parse_question_count("\n"), Some(DEFAULT_QUESTION_COUNT));
        assert_eq!(parse_question_count(" 25 "), Some(25));
        assert_eq!(parse_question_count("ten"), None);
        assert_eq!(resolve_type(""), Some(ExerciseType::MostSuitable));
        assert_eq!(resolve_type("4"), Some(ExerciseType::IndirectSpeech));
        assert_eq!(resolve_type("conditional"), Some(ExerciseType::Conditional));
        assert_eq!(resolve_type("7"), None);
        assert_eq!(resolve_topic("2\n"), "Numbers around me");
        assert_eq!(resolve_topic(" Space travel "), "Space travel");
        assert_eq!(resolve_topic(""), "");
    }

    #[test]
    fn remaining_time_and_progress() {
        assert_eq!(format_remaining(Duration::from_secs(589)), "9:49");
        assert_eq!(format_remaining(Duration::ZERO), "0:00");
        assert_eq!(progress_bar(1, 10, 10), "[#---------]");
        assert_eq!(progress_bar(10, 10, 4), "[####]");
    }

    #[test]
    fn review_lists_missed_questions() {
        let set = ExerciseSet {
            id: "ex".into(),
            topic: "Time".into(),
            questions: vec![
                Question {
                    id: 1,
                    text: "January is the first month of the ____.".into(),
                    options: OPTIONS.map(str::to_string).to_vec(),
                    correct_answer: Some("year".into()),
                },
                Question {
                    id: 2,
                    text: "There are seven days in a ____.".into(),
                    options: OPTIONS.map(str::to_string).to_vec(),
                    correct_answer: Some("week".into()),
                },
            ],
            time_limit: 120,
        };
        let mut answers = Answers::new();
        answers.insert(1, "year".into());
        let review = format_review(&set, &answers);
        assert!(!review.contains("January"));
        assert!(review.contains("your answer: (skipped), correct answer: week"));
    }
}
