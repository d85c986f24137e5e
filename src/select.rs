//! Member selection for the command line: requested names, globs and
//! exclusions.

/// Check if a pattern contains glob wildcard characters.
pub fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Glob matching supporting `*` (any run of characters) and `?` (one
/// character).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if p == t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern, &text)
}

/// Decide whether a member takes part in an extraction.
///
/// An empty `include` list selects everything. Entries in `include` are
/// globs when they contain wildcards and exact names otherwise; `exclude`
/// entries drop a member on a substring or glob match.
pub fn is_selected(name: &str, include: &[String], exclude: &[String]) -> bool {
    if !include.is_empty()
        && !include.iter().any(|f| {
            if has_glob_chars(f) {
                glob_match(f, name)
            } else {
                name == f
            }
        })
    {
        return false;
    }

    !exclude
        .iter()
        .any(|x| name.contains(x.as_str()) || glob_match(x, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn globs() {
        assert!(glob_match("*.tar.*", "data.tar.xz"));
        assert!(glob_match("control.tar.??", "control.tar.gz"));
        assert!(glob_match("*", ""));
        assert!(!glob_match("*.gz", "data.tar.xz"));
        assert!(!glob_match("?", ""));
    }

    #[test]
    fn selection() {
        let none: Vec<String> = Vec::new();
        assert!(is_selected("debian-binary", &none, &none));

        let include = strings(&["control.tar.*"]);
        assert!(is_selected("control.tar.zst", &include, &none));
        assert!(!is_selected("data.tar.zst", &include, &none));

        let include = strings(&["debian-binary"]);
        assert!(is_selected("debian-binary", &include, &none));
        assert!(!is_selected("debian", &include, &none));

        let exclude = strings(&["data"]);
        assert!(!is_selected("data.tar.xz", &none, &exclude));
        assert!(is_selected("control.tar.xz", &none, &exclude));
    }
}
