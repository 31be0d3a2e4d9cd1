pub const MAX_PLAYER_NAME_LENGTH: usize = 16;

pub fn sanitize_player_name(name: &str, fallback: &str) -> String {
    let cleaned = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned.chars().take(MAX_PLAYER_NAME_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize_player_name("  Big \t Boa ", "Player"), "Big Boa");
    }

    #[test]
    fn blank_names_fall_back() {
        assert_eq!(sanitize_player_name("   ", "Player"), "Player");
        assert_eq!(sanitize_player_name("", "Player"), "Player");
    }

    #[test]
    fn long_names_are_truncated_by_chars() {
        let name = sanitize_player_name("ééééééééééééééééééééé", "Player");
        assert_eq!(name.chars().count(), MAX_PLAYER_NAME_LENGTH);
    }
}
