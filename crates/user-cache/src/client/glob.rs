//! Redis-style glob matching

/// Match `text` against a glob pattern supporting `*`, `?`, `[abc]`,
/// `[a-z]`, `[^a]` and backslash escapes
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    match_from(&pattern, &text)
}

fn match_from(pattern: &[char], text: &[char]) -> bool {
    let Some((&head, rest)) = pattern.split_first() else {
        return text.is_empty();
    };

    match head {
        '*' => (0..=text.len()).any(|skip| match_from(rest, &text[skip..])),
        '?' => !text.is_empty() && match_from(rest, &text[1..]),
        '[' => match (text.first(), parse_class(rest)) {
            (Some(&c), Some((class, after))) => class.matches(c) && match_from(after, &text[1..]),
            // Unterminated class matches a literal '['
            (Some(&'['), None) => match_from(rest, &text[1..]),
            _ => false,
        },
        '\\' if !rest.is_empty() => {
            text.first() == Some(&rest[0]) && match_from(&rest[1..], &text[1..])
        }
        literal => text.first() == Some(&literal) && match_from(rest, &text[1..]),
    }
}

struct CharClass {
    negated: bool,
    ranges: Vec<(char, char)>,
}

impl CharClass {
    fn matches(&self, c: char) -> bool {
        let hit = self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        hit != self.negated
    }
}

/// Parse the body of a `[...]` class; returns the class and the pattern after `]`
fn parse_class(pattern: &[char]) -> Option<(CharClass, &[char])> {
    let (negated, mut i) = match pattern.first() {
        Some('^') => (true, 1),
        _ => (false, 0),
    };
    let mut ranges = Vec::new();

    while i < pattern.len() {
        let c = match pattern[i] {
            ']' => {
                return Some((CharClass { negated, ranges }, &pattern[i + 1..]));
            }
            '\\' if i + 1 < pattern.len() => {
                i += 1;
                pattern[i]
            }
            c => c,
        };

        if i + 2 < pattern.len() && pattern[i + 1] == '-' && pattern[i + 2] != ']' {
            let end = pattern[i + 2];
            ranges.push((c.min(end), c.max(end)));
            i += 3;
        } else {
            ranges.push((c, c));
            i += 1;
        }
    }

    None
}
