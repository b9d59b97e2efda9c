//! Text encoders used throughout the emitters, ported directly from the
//! free functions at the top of `original_source/ModuleSystem.cpp`
//! (`encode_str`, `encode_res`, `encode_full`, `encode_strip`,
//! `encode_id`). `spec.md` §4.10 gives their contract; this is the
//! literal character-by-character behavior of the original.

/// Replace spaces and tabs with underscores.
pub fn encode_str(s: &str) -> String {
    s.chars()
        .map(|c| if c == ' ' || c == '\t' { '_' } else { c })
        .collect()
}

/// Trim, then `encode_str`.
pub fn encode_res(s: &str) -> String {
    encode_str(s.trim())
}

/// `encode_str`, then drop `,` and `|`, and turn `'`, `` ` ``, `(`, `)`,
/// `-` into underscores.
pub fn encode_full(s: &str) -> String {
    let text = encode_str(s);
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ',' | '|' => {}
            '\'' | '`' | '(' | ')' | '-' => result.push('_'),
            other => result.push(other),
        }
    }
    result
}

/// Trim, then `encode_full`.
pub fn encode_strip(s: &str) -> String {
    encode_full(s.trim())
}

/// `encode_full`, then ASCII-lowercase.
pub fn encode_id(s: &str) -> String {
    encode_full(s).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_replaces_whitespace() {
        assert_eq!(encode_str("Hello, World"), "Hello,_World");
        assert_eq!(encode_str("a\tb c"), "a_b_c");
    }

    #[test]
    fn full_drops_commas_and_pipes() {
        assert_eq!(encode_full("Attack!"), "Attack!");
        assert_eq!(encode_full("a, b|c"), "a_bc");
        assert_eq!(encode_full("don't-stop (now)"), "don_t_stop__now_");
    }

    #[test]
    fn id_lowercases() {
        assert_eq!(encode_id("Sword of War"), "sword_of_war");
    }
}
