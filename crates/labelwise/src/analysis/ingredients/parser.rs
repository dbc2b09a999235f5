use once_cell::sync::Lazy;
use regex::Regex;

static LIST_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(ingredients?|contains?):\s*").expect("list label pattern compiles")
});

/// Split a raw ingredients-list string into discrete ingredient phrases.
///
/// A leading "Ingredients:"/"Contains:" label is stripped once, and commas
/// only split at bracket depth zero. Any opening bracket raises the depth and
/// any closing bracket lowers it, so mismatched bracket kinds are tolerated.
pub fn parse_ingredients_list(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let cleaned = LIST_LABEL.replace(text.trim(), "");

    let mut ingredients = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;

    for ch in cleaned.chars() {
        match ch {
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                let segment = current.trim();
                if !segment.is_empty() {
                    ingredients.push(segment.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let segment = current.trim();
    if !segment.is_empty() {
        ingredients.push(segment.to_string());
    }

    ingredients
}

/// Normalize an ingredient name for matching: lowercase, collapse whitespace,
/// strip trailing punctuation. Idempotent.
pub fn normalize_ingredient_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['.', ',', ';', ':', '!', '?'])
        .trim()
        .to_string()
}

/// Parse free text and normalize each phrase, dropping empties.
pub fn extract_and_normalize(text: &str) -> Vec<String> {
    parse_ingredients_list(text)
        .iter()
        .map(|phrase| normalize_ingredient_name(phrase))
        .filter(|name| !name.is_empty())
        .collect()
}
