//! Cleanup of raw LLM output into a usable simplified question. This is
//! heuristic prompt-engineering repair, kept behind one interface so it can
//! be replaced wholesale; nothing downstream depends on its exact rules.

const MARKERS: &[&str] = &[
    "Simplified question (write ONLY the simplified version, nothing else):",
    "Simplified question:",
    "Here's the simplified version:",
    "Simplified version:",
    "Here's a simpler version:",
    "The simplified question is:",
    "Simplified:",
];

const PREFIXES: &[&str] = &[
    "Here's",
    "Here is",
    "The simplified question is",
    "Simplified:",
    "Answer:",
];

/// Longer phrases first so they win over their own substrings.
const REPLACEMENTS: &[(&str, &str)] = &[
    (
        "match the picture to the correct word",
        "find the word that goes with the picture",
    ),
    ("match the picture", "find the word for the picture"),
    ("match", "pick"),
    ("select", "choose"),
    ("identify", "find"),
    ("determine", "figure out"),
    ("click", "tap"),
    ("the correct", "the right"),
    ("correct", "right"),
];

pub trait ResponseSanitizer: Send + Sync {
    /// Distill `raw` model output into a simplified question, given the
    /// `original` it was asked to rewrite. `None` means nothing usable was
    /// produced and the caller should keep the original.
    fn sanitize(&self, original: &str, raw: &str) -> Option<String>;
}

/// Marker stripping, echo removal, then word-replacement as a last resort.
pub struct HeuristicSanitizer;

impl ResponseSanitizer for HeuristicSanitizer {
    fn sanitize(&self, original: &str, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut text = strip_markers(raw).to_string();
        text = drop_original_echo(original, &text);
        text = strip_prefixes(&text);
        text = text.trim_matches(|c| c == '"' || c == '\'').trim().to_string();

        if is_usable(original, &text) {
            return Some(text);
        }

        // scan the raw output for any sentence genuinely different from
        // the original
        for sentence in raw.replace('\n', " ").split('.') {
            let sentence = sentence.trim();
            if sentence.len() > 15 && differs(original, sentence) {
                return Some(sentence.to_string());
            }
        }

        let fallback = apply_replacements(original);
        if fallback.trim().to_lowercase() != original.trim().to_lowercase() {
            return Some(fallback);
        }

        None
    }
}

/// The word-replacement table applied directly to the question, used when
/// the model produced nothing usable (or was never called).
pub fn apply_replacements(question: &str) -> String {
    for (old, new) in REPLACEMENTS {
        if let Some((start, end)) = find_lowercase(question, old) {
            let before = &question[..start];
            let after = &question[end..];
            // keep sentence-initial capitalization
            let replacement = if start == 0
                || before
                    .trim_end()
                    .ends_with(|c| c == '.' || c == '!' || c == '?')
            {
                capitalize(new)
            } else {
                (*new).to_string()
            };
            return format!("{before}{replacement}{after}");
        }
    }
    question.to_string()
}

/// Case-insensitive search returning byte offsets into `haystack` itself.
/// Lowercasing happens per candidate window, never on the indexed string,
/// so characters whose lowercase form has a different byte length cannot
/// skew the offsets. `needle` must already be lowercase.
fn find_lowercase(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    for (start, _) in haystack.char_indices() {
        let window = &haystack[start..];
        let mut window_chars = window.char_indices();
        let mut needle_chars = needle.chars();
        loop {
            let Some(expected) = needle_chars.next() else {
                let end = window_chars
                    .next()
                    .map(|(offset, _)| start + offset)
                    .unwrap_or(haystack.len());
                return Some((start, end));
            };
            let Some((_, actual)) = window_chars.next() else {
                break;
            };
            let mut lowered = actual.to_lowercase();
            if lowered.next() != Some(expected) || lowered.next().is_some() {
                break;
            }
        }
    }
    None
}

fn strip_markers(text: &str) -> &str {
    for marker in MARKERS {
        if let Some(idx) = text.find(marker) {
            return text[idx + marker.len()..].trim();
        }
    }
    text
}

fn strip_prefixes(text: &str) -> String {
    let mut out = text.trim().to_string();
    for prefix in PREFIXES {
        if out.to_lowercase().starts_with(&prefix.to_lowercase()) {
            out = out[prefix.len()..].trim().to_string();
            if let Some(stripped) = out
                .strip_prefix(':')
                .or_else(|| out.strip_prefix('-'))
                .or_else(|| out.strip_prefix('\u{2014}'))
            {
                out = stripped.trim().to_string();
            }
            break;
        }
    }
    out
}

/// Models sometimes echo the original question around the rewrite; keep
/// whichever side of the echo holds new text.
fn drop_original_echo(original: &str, text: &str) -> String {
    if !text.contains(original) {
        return text.to_string();
    }

    let mut parts = text.splitn(2, original);
    let before = parts.next().unwrap_or("").trim();
    let after = parts.next().unwrap_or("").trim();

    if !after.is_empty() {
        return after.to_string();
    }
    if !before.is_empty() {
        return before.to_string();
    }

    // the echo was the whole response: look for any line that differs
    for line in text.lines() {
        let line = line.trim();
        if line.len() > 10 && differs(original, line) {
            return line.to_string();
        }
    }
    text.to_string()
}

fn is_usable(original: &str, candidate: &str) -> bool {
    candidate.trim().len() >= 10 && differs(original, candidate)
}

fn differs(original: &str, candidate: &str) -> bool {
    let original = original.trim().to_lowercase();
    let candidate = candidate.trim().to_lowercase();
    !candidate.is_empty()
        && candidate != original
        && !original.contains(&candidate)
        && !candidate.contains(&original)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
