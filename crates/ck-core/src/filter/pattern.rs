use regex::{Regex, RegexBuilder};

const REGEX_PREFIX: &str = "re:";

/// Case-insensitive match pattern.
///
/// Plain patterns support the `*` and `?` wildcards and must match the whole
/// input. A pattern starting with `re:` is a regular expression matched
/// anywhere in the input.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn parse(source: &str) -> Result<Self, regex::Error> {
        let expr = match source.strip_prefix(REGEX_PREFIX) {
            Some(expr) => expr.to_string(),
            None => wildcard_to_regex(source),
        };
        let regex = RegexBuilder::new(&expr).case_insensitive(true).build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    let mut literal = String::new();
    for ch in pattern.chars() {
        match ch {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if ch == '*' { ".*" } else { "." });
            }
            other => literal.push(other),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_match_whole_input_case_insensitively() {
        let p = Pattern::parse("*Password*").unwrap();
        assert!(p.is_match("KeePass - password database"));
        assert!(!Pattern::parse("keepass").unwrap().is_match("keepassxc"));
        assert!(Pattern::parse("KeePass?C").unwrap().is_match("keepassxc"));
    }

    #[test]
    fn regex_metacharacters_in_wildcards_are_literal() {
        let p = Pattern::parse("a.b (1)").unwrap();
        assert!(p.is_match("A.B (1)"));
        assert!(!p.is_match("axb (1)"));
    }

    #[test]
    fn regex_prefix_is_unanchored() {
        let p = Pattern::parse("re:^Chrome_Widget.*").unwrap();
        assert!(p.is_match("chrome_widgetwin_1"));
        assert!(Pattern::parse("re:([unclosed").is_err());
    }
}
