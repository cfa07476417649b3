use colored::Colorize;

use crate::models::CleanupResult;

/// Print the outcome of a cleanup run
pub fn print_result(repository: &str, result: &CleanupResult) {
    println!("\nRepository: {}", repository.bold());
    println!("{}", "─".repeat(60));

    if result.deleted_tags.is_empty() {
        println!("  {}", "No tags deleted.".green());
    } else {
        println!(
            "  {} ({}):",
            "DELETED".red().bold(),
            result.deleted_tags.len()
        );
        for name in &result.deleted_tags {
            println!("    - {}", name);
        }
    }

    println!("\n{}", "═".repeat(60));
    if result.is_success() {
        println!(
            "{} Deleted {} of {} tags seen",
            "SUMMARY:".bold(),
            result.deleted_tags.len().to_string().red().bold(),
            result.original_size
        );
    } else {
        println!(
            "{} Deleted {} of {} tags seen before stopping",
            "SUMMARY:".red().bold(),
            result.deleted_tags.len().to_string().red().bold(),
            result.original_size
        );
        if let Some(message) = &result.error_message {
            println!("  {} {}", "ERROR:".red().bold(), message);
        }
        if let Some(kind) = &result.exception_kind {
            println!("  {} {}", "EXCEPTION:".red().bold(), kind.dimmed());
        }
    }
}
