//! Retry and fallback policy for chat-completion responses.
//!
//! The upstream API reports some failures inside an otherwise
//! successful response body, phrased as an apology. Detection is
//! string matching on natural-language output and lives behind a named
//! function so it can be swapped for a structured signal if the
//! provider ever exposes one. Known limitation: a legitimately
//! apologetic answer can trip it and cost one extra round trip.

/// Shortest accepted message, counted in characters after trimming.
pub const MIN_MESSAGE_CHARS: usize = 3;

/// Longest accepted message, matching the input field's cap.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Shown inline when a message fails validation.
pub const INPUT_TOO_SHORT_WARNING: &str = "Please enter a longer message.";

/// Substituted for the assistant turn when the provider call fails hard.
pub const FALLBACK_ASSISTANT_MESSAGE: &str =
    "I apologize, but I encountered an issue. Please try asking your question differently.";

/// System instruction for the simplified retry: no grounding context,
/// lower-quality but more likely to succeed.
pub const GENERIC_SYSTEM_INSTRUCTION: &str =
    "You are a helpful AI assistant for an entertainment recommendation app.";

/// Decide whether a response body reads like a transient failure worth
/// one simplified retry.
pub fn response_looks_failed(response: &str) -> bool {
    response.contains("I'm having trouble") || response.to_lowercase().contains("error")
}

/// Validate a raw message from the input form.
///
/// Returns the trimmed message, or a user-visible warning. Rejection
/// must leave all session state untouched; callers validate before
/// mutating anything.
pub fn validate_message(raw: &str) -> Result<&str, &'static str> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_MESSAGE_CHARS {
        return Err(INPUT_TOO_SHORT_WARNING);
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err("Please keep messages under 500 characters.");
    }
    Ok(trimmed)
}
