//! Heading slugs for in-page anchors.

/// Characters dropped without leaving a separator.
const FORBIDDEN_CHARS: &[char] = &[
    '<', '>', ':', '|', '?', '*', '#', '\\', '(', ')', '[', ']', '\'', '"', '`', '.', ',', '!',
];

/// Transliterate to ASCII, lowercase, and join words with `-`.
///
/// `"Héllo, Wörld!"` -> `"hello-world"`
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text.trim());
    let mut slug = String::with_capacity(ascii.len());

    for c in ascii.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)) {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let trimmed = slug.trim_end_matches('-').len();
    slug.truncate(trimmed);
    slug
}

/// Hands out unique slugs within one document: `intro`, `intro-1`, ...
#[derive(Debug, Default)]
pub struct SlugSet {
    seen: rustc_hash::FxHashMap<String, usize>,
}

impl SlugSet {
    /// Mark a fixed slug as taken without renaming it.
    pub fn reserve(&mut self, slug: &str) {
        self.seen.entry(slug.to_owned()).or_insert(0);
    }

    /// `slug` itself if unused, else the first free `{slug}-{n}`.
    pub fn unique(&mut self, slug: String) -> String {
        let Some(&last) = self.seen.get(&slug) else {
            self.seen.insert(slug.clone(), 0);
            return slug;
        };

        let mut count = last;
        let candidate = loop {
            count += 1;
            let candidate = format!("{slug}-{count}");
            if !self.seen.contains_key(&candidate) {
                break candidate;
            }
        };
        self.seen.insert(slug, count);
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}
