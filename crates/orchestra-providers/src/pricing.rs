// SPDX-FileCopyrightText: 2026 Orchestra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing tables and cost estimation.
//!
//! List prices in USD per million tokens, checked 2026-09-01. Estimates only:
//! cached-token discounts and batch pricing are ignored.

use orchestra_core::ProviderKind;

/// Per-model pricing in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

const fn price(input_per_mtok: f64, output_per_mtok: f64) -> ModelPricing {
    ModelPricing {
        input_per_mtok,
        output_per_mtok,
    }
}

/// Look up pricing for a provider's model.
///
/// Matches on model-name substrings, most specific first. Unknown models fall
/// back to the provider's default model so estimates are never silently zero.
pub fn get_pricing(provider: ProviderKind, model: &str) -> ModelPricing {
    let lower = model.to_lowercase();

    match provider {
        ProviderKind::OpenAi => {
            if lower.contains("gpt-4o-mini") {
                price(0.15, 0.60)
            } else if lower.contains("gpt-4.1-mini") {
                price(0.40, 1.60)
            } else if lower.contains("gpt-4.1") {
                price(2.0, 8.0)
            } else if lower.starts_with("o1") {
                price(15.0, 60.0)
            } else if lower.starts_with("o3") || lower.starts_with("o4") {
                price(1.10, 4.40)
            } else {
                price(2.50, 10.0)
            }
        }
        ProviderKind::Anthropic => {
            if lower.contains("opus") {
                price(15.0, 75.0)
            } else if lower.contains("haiku") {
                price(0.80, 4.0)
            } else {
                price(3.0, 15.0)
            }
        }
        ProviderKind::Xai => {
            if lower.contains("mini") {
                price(0.30, 0.50)
            } else if lower.contains("grok-3") || lower.contains("grok-4") {
                price(3.0, 15.0)
            } else {
                price(2.0, 10.0)
            }
        }
        ProviderKind::Perplexity => {
            if lower.contains("pro") {
                price(3.0, 15.0)
            } else if lower.contains("reasoning") {
                price(1.0, 5.0)
            } else {
                price(1.0, 1.0)
            }
        }
        ProviderKind::Google => {
            if lower.contains("flash-lite") {
                price(0.075, 0.30)
            } else if lower.contains("pro") {
                price(1.25, 5.0)
            } else {
                price(0.10, 0.40)
            }
        }
        ProviderKind::GitHub => price(0.0, 0.0),
    }
}

/// Estimated cost in USD of one call.
pub fn estimate_cost(provider: ProviderKind, model: &str, input_tokens: u64, output_tokens: u64) -> f64 {
    let pricing = get_pricing(provider, model);
    (input_tokens as f64 / 1_000_000.0) * pricing.input_per_mtok
        + (output_tokens as f64 / 1_000_000.0) * pricing.output_per_mtok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_models_have_pricing() {
        assert_eq!(get_pricing(ProviderKind::OpenAi, "gpt-4o"), price(2.50, 10.0));
        assert_eq!(
            get_pricing(ProviderKind::Anthropic, "claude-sonnet-4-20250514"),
            price(3.0, 15.0)
        );
        assert_eq!(get_pricing(ProviderKind::Xai, "grok-2"), price(2.0, 10.0));
        assert_eq!(get_pricing(ProviderKind::Perplexity, "sonar"), price(1.0, 1.0));
        assert_eq!(
            get_pricing(ProviderKind::Google, "gemini-2.0-flash"),
            price(0.10, 0.40)
        );
    }

    #[test]
    fn more_specific_model_wins() {
        assert_eq!(get_pricing(ProviderKind::OpenAi, "gpt-4o-mini"), price(0.15, 0.60));
        assert_eq!(
            get_pricing(ProviderKind::Google, "gemini-2.0-flash-lite"),
            price(0.075, 0.30)
        );
        assert_eq!(get_pricing(ProviderKind::Perplexity, "sonar-pro"), price(3.0, 15.0));
    }

    #[test]
    fn estimate_cost_for_sonnet() {
        let cost = estimate_cost(ProviderKind::Anthropic, "claude-sonnet-4", 1_000, 500);
        // 1000/1M * 3.0 + 500/1M * 15.0
        assert!(approx(cost, 0.003 + 0.0075));
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        assert!(approx(estimate_cost(ProviderKind::OpenAi, "gpt-4o", 0, 0), 0.0));
    }
}
