use super::canonical::{FinishReason, Role, Usage};

// ---------------------------------------------------------------------------
// Role mappings
// ---------------------------------------------------------------------------

/// Anthropic conversations only carry `user` and `assistant` turns.
#[must_use]
pub fn canonical_role_to_anthropic(role: Role) -> &'static str {
    match role {
        Role::Assistant => "assistant",
        // system is lifted to the top level; tool results ride in user turns
        Role::System | Role::User | Role::Tool => "user",
    }
}

// ---------------------------------------------------------------------------
// Stop reason mappings
// ---------------------------------------------------------------------------

/// Map an Anthropic `stop_reason` to the canonical finish reason.
///
/// Unknown values pass through verbatim.
#[must_use]
pub fn anthropic_stop_to_finish_reason(s: &str) -> FinishReason {
    match s {
        "end_turn" | "stop_sequence" => FinishReason::Stop,
        "max_tokens" => FinishReason::Length,
        "tool_use" => FinishReason::ToolCalls,
        other => FinishReason::Other(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Usage mappings
// ---------------------------------------------------------------------------

#[must_use]
pub fn anthropic_usage_to_canonical(input_tokens: u64, output_tokens: u64) -> Usage {
    Usage::new(input_tokens, output_tokens)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
