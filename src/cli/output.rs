//! CLI output formatting utilities.

use crate::study::{Analysis, Flashcard, QuizQuestion};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print an analysis: summary, counts, key points and concepts.
    pub fn analysis(analysis: &Analysis) {
        Output::header("Summary");
        println!("{}", analysis.summary);
        println!();
        if let Some(subject) = &analysis.subject {
            Output::kv("Subject", subject);
        }
        Output::kv("Words", &analysis.word_count.to_string());
        Output::kv("Sentences", &analysis.sentence_count.to_string());

        if !analysis.key_points.is_empty() {
            Output::header("Key Points");
            for point in &analysis.key_points {
                Output::list_item(point);
            }
        }

        if !analysis.key_concepts.is_empty() {
            Output::header("Key Concepts");
            println!("  {}", analysis.key_concepts.join(", "));
        }
    }

    /// Print a numbered quiz question with its answer.
    pub fn question(number: usize, question: &QuizQuestion) {
        println!(
            "\n{} {} {}",
            style(format!("{}.", number)).bold(),
            style(format!("[{}]", question.kind())).dim(),
            question.question()
        );

        match question {
            QuizQuestion::MultipleChoice {
                options,
                answer,
                explanation,
                ..
            } => {
                for (letter, option) in ('a'..='z').zip(options) {
                    println!("   {}) {}", letter, option);
                }
                println!("   {} {}", style("Answer:").green(), answer);
                print_explanation(explanation.as_deref());
            }
            QuizQuestion::TrueFalse {
                answer,
                explanation,
                ..
            } => {
                println!(
                    "   {} {}",
                    style("Answer:").green(),
                    if *answer { "True" } else { "False" }
                );
                print_explanation(explanation.as_deref());
            }
            QuizQuestion::OpenEnded {
                context,
                suggested_answer,
                key_points,
                ..
            } => {
                if !context.is_empty() {
                    println!("   {}", style(content_preview(context, 200)).dim());
                }
                println!("   {} {}", style("Suggested:").green(), suggested_answer);
                for point in key_points {
                    println!("   {} {}", style("-").dim(), point);
                }
            }
        }
    }

    /// Print a numbered flashcard.
    pub fn flashcard(number: usize, card: &Flashcard) {
        println!(
            "\n{} {}",
            style(format!("{}.", number)).bold(),
            style(&card.front).bold()
        );
        println!("   {}", card.back);
        if !card.example.is_empty() {
            println!("   {} {}", style("Example:").dim(), content_preview(&card.example, 200));
        }
        if !card.related_concepts.is_empty() {
            println!(
                "   {} {}",
                style("Related:").dim(),
                card.related_concepts.join(", ")
            );
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

fn print_explanation(explanation: Option<&str>) {
    if let Some(explanation) = explanation {
        println!("   {}", style(explanation).dim());
    }
}

/// Flatten newlines and cut to `max_chars` characters with an ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short\ntext", 50), "short text");
        assert_eq!(content_preview("abcdef", 3), "abc...");
        assert_eq!(content_preview("héllo wörld", 4), "héll...");
    }
}
