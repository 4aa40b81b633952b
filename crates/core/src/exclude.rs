//! User defined exclusions, matched against source-relative paths.

use globset::{Error as GlobError, GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

/// Compiled set of exclusion globs.
///
/// Patterns use `fnmatch` semantics against the whole relative path string:
/// `*` and `?` also match `/`, so `*.tmp` excludes temp files at any depth.
/// `**` is just two stars, with no directory recursion. Backslashes, braces,
/// and a `[` without a closing `]` are literal characters.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ExclusionMatcher {
    /// Compiles the patterns. Surrounding whitespace is trimmed and blank
    /// patterns are dropped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, GlobError> {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let glob = GlobBuilder::new(&fnmatch_to_glob(pattern))
                .literal_separator(false)
                .backslash_escape(false)
                .build()?;
            builder.add(glob);
            kept.push(pattern.to_string());
        }

        Ok(Self {
            patterns: kept,
            set: builder.build()?,
        })
    }

    /// A matcher that excludes nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Whether the source-relative path matches any exclusion pattern.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        self.set.is_match(to_slash_path(relative))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Rewrites an `fnmatch` pattern into equivalent `globset` syntax.
///
/// Runs of `*` collapse to one, since `globset` gives `**` recursive meaning.
/// Characters that `globset` treats specially but `fnmatch` does not are
/// wrapped in a one-character class.
fn fnmatch_to_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while i + 1 < chars.len() && chars[i + 1] == '*' {
                    i += 1;
                }
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            c @ ('{' | '}' | ']') => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            c => out.push(c),
        }
        i += 1;
    }

    out
}

/// Index of the `]` closing the class opened at `start`, following `fnmatch`:
/// a leading `!` negates, and a `]` right after it is a member.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}

fn push_class(out: &mut String, body: &[char]) {
    let (negated, members) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    // A leading `^` negates in globset but is a member for fnmatch.
    let mut members: Vec<char> = members.to_vec();
    if !negated && members.first() == Some(&'^') {
        if members.len() == 1 {
            out.push('^');
            return;
        }
        members.rotate_left(1);
    }

    out.push('[');
    if negated {
        out.push('!');
    }
    out.extend(members);
    out.push(']');
}

/// Joins the normal components of a relative path with `/`, independent of the
/// host separator.
pub(crate) fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
