//! Minimal path patterns: literal segments, `*` matches one segment, and a
//! trailing `/*` matches the prefix itself plus any remainder. No regex.

#[derive(Debug, Clone)]
pub struct PathPattern {
    segments: Vec<String>,
    trailing_wildcard: bool,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let trailing_wildcard = pattern.ends_with("/*");
        let literal = if trailing_wildcard {
            &pattern[..pattern.len() - 2]
        } else {
            pattern
        };
        let segments = literal
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            segments,
            trailing_wildcard,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let segs: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if self.trailing_wildcard {
            if segs.len() < self.segments.len() {
                return false;
            }
        } else if segs.len() != self.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(segs.iter())
            .all(|(pat, seg)| pat.as_str() == "*" || pat.as_str() == *seg)
    }
}
