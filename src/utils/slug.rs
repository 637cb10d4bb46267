/// Post slug: trimmed, lowercased title with whitespace runs collapsed to
/// hyphens, plus a millisecond-timestamp suffix for uniqueness. Non-ASCII
/// characters (Korean titles are the norm) pass through untouched.
/// Collisions are not otherwise checked.
pub fn generate_post_slug(title: &str) -> String {
    let base: String = title
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    format!("{}-{}", base, chrono::Utc::now().timestamp_millis())
}
