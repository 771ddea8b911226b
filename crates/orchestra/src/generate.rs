// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `orchestra generate` command implementation.

use colored::Colorize;
use orchestra_core::{ProviderResult, TokenUsage};

/// Print a generation result. Returns the process exit code.
pub fn print(result: &ProviderResult, json: bool) -> i32 {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        match result {
            ProviderResult::Success { content, usage } => {
                println!("{content}");
                eprintln!("{}", usage_line(usage).dimmed());
            }
            ProviderResult::Failure { message, .. } => {
                eprintln!("{}: {message}", "error".red());
            }
        }
    }
    if result.is_success() { 0 } else { 1 }
}

fn usage_line(usage: &TokenUsage) -> String {
    format!(
        "{} input / {} output tokens, ~${:.6}",
        usage.input_tokens, usage.output_tokens, usage.cost_estimate_usd
    )
}

#[cfg(test)]
mod tests {
    use orchestra_core::FailureKind;

    use super::*;

    #[test]
    fn usage_line_formats_cost() {
        let usage = TokenUsage {
            input_tokens: 1200,
            output_tokens: 300,
            cost_estimate_usd: 0.0075,
        };
        assert_eq!(usage_line(&usage), "1200 input / 300 output tokens, ~$0.007500");
    }

    #[test]
    fn failure_exits_nonzero() {
        let failure = ProviderResult::failure(FailureKind::Transport, "down");
        assert_eq!(print(&failure, true), 1);
        let success = ProviderResult::success("ok", TokenUsage::default());
        assert_eq!(print(&success, true), 0);
    }
}
