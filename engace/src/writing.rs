use std::fmt::Write;
use std::future;

use engace_api::{
    require, Acknowledgement, ApiError, Draft, DraftId, RequestOptions, WritingFeedback,
    WritingSubmission, ERROR_TITLE,
};

use crate::utilities::{confirm, indent, input, input_multiline};
use crate::{samples, App};

pub async fn run(app: &App) -> anyhow::Result<()> {
    let prompt = input("Prompt: ")?;
    let content = input_multiline("Your writing")?;
    let submission = WritingSubmission::new(prompt.trim(), content);

    let tracker = app.tracker::<WritingFeedback>();
    let feedback = if app.use_samples {
        tracker
            .request(
                || future::ready(submission.validate().map(|()| samples::feedback(&submission))),
                RequestOptions::new(),
            )
            .await
    } else {
        let writing = app.client.writing();
        tracker
            .request(|| writing.submit_writing(&submission), RequestOptions::new())
            .await
    };
    let Some(feedback) = feedback else {
        return Ok(());
    };
    print!("{}", format_feedback(&feedback));

    if !app.use_samples && confirm("Save this as a draft? (y/N): ")? {
        let writing = app.client.writing();
        app.tracker::<DraftId>()
            .request(
                || writing.save_draft(&submission),
                RequestOptions::new().on_success(|draft: &DraftId| {
                    println!("Saved draft {}.", draft.id);
                }),
            )
            .await;
    }
    Ok(())
}

pub async fn list_drafts(app: &App) {
    if app.use_samples {
        println!("Drafts are not available with sample data.");
        return;
    }
    let writing = app.client.writing();
    let drafts = app
        .tracker::<Vec<Draft>>()
        .request(|| writing.list_drafts(), RequestOptions::new())
        .await;
    match drafts {
        Some(drafts) if drafts.is_empty() => println!("No drafts saved."),
        Some(drafts) => {
            for draft in drafts {
                println!("  {:<12} {}", draft.id, summary(&draft.prompt, 50));
            }
        }
        None => {}
    }
}

#[derive(Debug, PartialEq)]
enum DraftAction<'a> {
    Show(&'a str),
    Edit(&'a str),
    Delete(&'a str),
}

/// `draft <id>`, `draft edit <id>` and `draft delete <id>`. The id is required.
fn parse_draft_args(args: &str) -> Result<DraftAction<'_>, ApiError> {
    let args = args.trim();
    let (action, id) = args.split_once(' ').unwrap_or((args, ""));
    match action {
        "edit" => require("draft id", id).map(DraftAction::Edit),
        "delete" => require("draft id", id).map(DraftAction::Delete),
        _ => require("draft id", args).map(DraftAction::Show),
    }
}

pub async fn draft(app: &App, args: &str) -> anyhow::Result<()> {
    if app.use_samples {
        println!("Drafts are not available with sample data.");
        return Ok(());
    }
    let action = match parse_draft_args(args) {
        Ok(action) => action,
        Err(error) => {
            app.notifier().error(ERROR_TITLE, &error.to_string());
            return Ok(());
        }
    };
    let writing = app.client.writing();
    match action {
        DraftAction::Delete(id) => {
            app.tracker::<Acknowledgement>()
                .request(
                    || writing.delete_draft(id),
                    RequestOptions::new().success_message(format!("Deleted draft {id}")),
                )
                .await;
        }
        DraftAction::Edit(id) => {
            let Some(draft) = app
                .tracker::<Draft>()
                .request(|| writing.get_draft(id), RequestOptions::new())
                .await
            else {
                return Ok(());
            };
            print!("{}", format_draft(&draft));
            let prompt = input("New prompt (empty keeps the current one): ")?;
            let prompt = match prompt.trim() {
                "" => draft.prompt.clone(),
                prompt => prompt.to_string(),
            };
            let content = input_multiline("New writing")?;
            let submission = WritingSubmission::new(prompt, content);
            app.tracker::<Draft>()
                .request(
                    || writing.update_draft(&draft.id, &submission),
                    RequestOptions::new().success_message(format!("Updated draft {}", draft.id)),
                )
                .await;
        }
        DraftAction::Show(id) => {
            if let Some(draft) = app
                .tracker::<Draft>()
                .request(|| writing.get_draft(id), RequestOptions::new())
                .await
            {
                print!("{}", format_draft(&draft));
            }
        }
    }
    Ok(())
}

fn summary(text: &str, max_chars: usize) -> String {
    let text = text.trim().replace('\n', " ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut = text.chars().take(max_chars.saturating_sub(3)).collect::<String>();
    format!("{}...", cut.trim_end())
}

fn format_draft(draft: &Draft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Draft {}", draft.id);
    if let Some(updated_at) = &draft.updated_at {
        let _ = writeln!(out, "  last saved: {updated_at}");
    }
    let _ = writeln!(out, "  prompt: {}", draft.prompt);
    let _ = writeln!(out, "{}", indent(&draft.content, 4));
    out
}

pub fn format_feedback(feedback: &WritingFeedback) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", feedback.title);
    for point in &feedback.points {
        let _ = writeln!(out, "  - {point}");
    }
    for (number, section) in feedback.sections.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", number + 1, section.title.to_uppercase());
        for subsection in &section.subsections {
            let _ = writeln!(out, "  {}", subsection.title);
            for point in &subsection.points {
                let _ = writeln!(out, "    Q: {}", point.question);
                let _ = writeln!(out, "    A: {}", point.answer);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use engace_api::{FeedbackSection, QuestionAnswer, Subsection};

    use super::*;

    #[test]
    fn feedback_rendering() {
        let feedback = WritingFeedback {
            title: "Overall".into(),
            points: vec!["Clear ideas".into()],
            sections: vec![FeedbackSection {
                title: "Grammar".into(),
                subsections: vec![Subsection {
                    title: "Articles".into(),
                    points: vec![QuestionAnswer {
                        question: "a or the?".into(),
                        answer: "Use 'the' for known nouns.".into(),
                    }],
                }],
            }],
        };
        assert_eq!(
            format_feedback(&feedback),
            "Overall\n  - Clear ideas\n1. GRAMMAR\n  Articles\n    Q: a or the?\n    A: Use 'the' for known nouns.\n"
        );
    }

    #[test]
    fn draft_commands_take_an_id() {
        assert_eq!(parse_draft_args(" d1 ").unwrap(), DraftAction::Show("d1"));
        assert_eq!(parse_draft_args("edit d1").unwrap(), DraftAction::Edit("d1"));
        assert_eq!(parse_draft_args("delete  d 2").unwrap(), DraftAction::Delete("d 2"));
    }

    #[test]
    fn draft_commands_without_an_id_are_rejected() {
        for args in ["", "  ", "edit", "delete", "delete  ", "edit\t"] {
            assert!(
                matches!(parse_draft_args(args), Err(ApiError::Validation(_))),
                "{args:?}"
            );
        }
    }

    #[test]
    fn summaries_are_shortened() {
        assert_eq!(summary("Describe your city", 50), "Describe your city");
        assert_eq!(summary("one two three four", 10), "one two...");
        assert_eq!(summary("line\nbreak", 20), "line break");
    }

    #[test]
    fn draft_rendering_indents_content() {
        let draft = Draft {
            id: "d1".into(),
            prompt: "My city".into(),
            content: "It is big.\nIt is busy.".into(),
            updated_at: None,
        };
        assert_eq!(
            format_draft(&draft),
            "Draft d1\n  prompt: My city\n    It is big.\n    It is busy.\n"
        );
    }
}
