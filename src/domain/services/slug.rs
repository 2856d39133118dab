//! Slug generation.
//!
//! Sibling rows of a `slug_group` never reuse the source slug; their slug is
//! derived from the (possibly translated) title and the target locale.

/// Collaborator turning a title into a URL slug for a locale.
#[cfg_attr(test, mockall::automock)]
pub trait SlugGenerator: Send + Sync {
    fn slugify(&self, title: &str, locale: &str) -> String;
}

/// ASCII slugs with Latin diacritics folded and the locale appended.
///
/// `"Thiết kế Web"` in `vi` becomes `"thiet-ke-web-vi"`.
#[derive(Debug, Clone, Default)]
pub struct DefaultSlugGenerator;

impl DefaultSlugGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SlugGenerator for DefaultSlugGenerator {
    fn slugify(&self, title: &str, locale: &str) -> String {
        let base = slugify_text(title);
        let locale = slugify_text(locale);
        match (base.is_empty(), locale.is_empty()) {
            (true, _) => locale,
            (false, true) => base,
            (false, false) => format!("{}-{}", base, locale),
        }
    }
}

/// Base slug of arbitrary text: lowercase ASCII words joined by `-`.
pub fn slugify_text(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let c = fold_diacritic(c);
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Append `-n` to a slug, used when the plain slug is taken.
pub fn with_suffix(slug: &str, n: u32) -> String {
    format!("{}-{}", slug, n)
}

const FOLDS: &[(char, &str)] = &[
    ('a', "àáâãäåāăąảạấầẩẫậắằẳẵặ"),
    ('c', "çćĉċč"),
    ('d', "ďđ"),
    ('e', "èéêëēĕėęěẻẽẹếềểễệ"),
    ('g', "ĝğġģ"),
    ('i', "ìíîïĩīĭįıỉị"),
    ('n', "ñńņňŉ"),
    ('o', "òóôõöøōŏőơỏọốồổỗộớờởỡợ"),
    ('s', "śŝşšß"),
    ('u', "ùúûüũūŭůűųưủụứừửữự"),
    ('y', "ýÿŷỳỷỹỵ"),
    ('z', "źżž"),
];

fn fold_diacritic(c: char) -> char {
    if c.is_ascii() {
        return c;
    }
    FOLDS
        .iter()
        .find(|(_, variants)| variants.contains(c))
        .map(|(base, _)| *base)
        .unwrap_or(c)
}
