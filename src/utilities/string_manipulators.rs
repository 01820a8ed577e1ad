/// Turns an arbitrary string into something safe to use as a file name.
pub fn file_name_safe(input: &str) -> String {
    let cleaned = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();
    let cleaned = cleaned.trim_matches('_').to_string();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
