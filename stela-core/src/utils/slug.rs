use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Failed to compile slug regex"));

/// Map a character to its ASCII spelling, if the transliteration table
/// defines one. The table covers Latin diacritics and ligatures; callers
/// treat unmapped characters as separators.
fn transliterate(c: char) -> Option<&'static str> {
    let mapped = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'ð' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'ř' => "r",
        'ś' | 'š' => "s",
        'ť' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        'þ' => "th",
        _ => return None,
    };
    Some(mapped)
}

/// Generate a URL-friendly slug from a title.
///
/// Lowercases, folds Latin diacritics to ASCII, and collapses every run
/// of remaining non-alphanumeric characters into a single hyphen. An
/// empty or whitespace-only title yields an empty slug; distinguishing
/// "no title" from an explicitly empty URL is the caller's concern.
pub fn generate_slug(title: &str) -> String {
    let mut folded = String::with_capacity(title.len());
    for c in title.trim().chars() {
        for lower in c.to_lowercase() {
            if lower.is_ascii() {
                folded.push(lower);
            } else if let Some(ascii) = transliterate(lower) {
                folded.push_str(ascii);
            } else {
                folded.push(' ');
            }
        }
    }

    // Replace non-alphanumeric runs with hyphens
    let mut slug = SLUG_REGEX.replace_all(&folded, "-").to_string();

    // Remove leading/trailing hyphens
    slug = slug.trim_matches('-').to_string();

    // Ensure slug doesn't exceed reasonable length (100 chars)
    if slug.len() > 100 {
        slug = slug
            .chars()
            .take(100)
            .collect::<String>()
            .trim_end_matches('-')
            .to_string();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug_basic() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
        assert_eq!(generate_slug("About Us"), "about-us");
        assert_eq!(generate_slug("backbee"), "backbee");
    }

    #[test]
    fn test_generate_slug_special_characters() {
        assert_eq!(generate_slug("Hello, World!"), "hello-world");
        assert_eq!(generate_slug("What's New?"), "what-s-new");
        assert_eq!(generate_slug("Price: $99.99"), "price-99-99");
        assert_eq!(generate_slug("Email@example.com"), "email-example-com");
    }

    #[test]
    fn test_generate_slug_whitespace() {
        assert_eq!(generate_slug("  Hello  World  "), "hello-world");
        assert_eq!(generate_slug("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(generate_slug("\tTabs\tand\tSpaces\t"), "tabs-and-spaces");
    }

    #[test]
    fn test_generate_slug_empty_input() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("   "), "");
        assert_eq!(generate_slug("!!!"), "");
        assert_eq!(generate_slug("---"), "");
    }

    #[test]
    fn test_generate_slug_numbers() {
        assert_eq!(generate_slug("Article 123"), "article-123");
        assert_eq!(generate_slug("2024 Review"), "2024-review");
        assert_eq!(generate_slug("Top 10 Tips"), "top-10-tips");
    }

    #[test]
    fn test_generate_slug_transliteration_table() {
        assert_eq!(generate_slug("Café René"), "cafe-rene");
        assert_eq!(generate_slug("Über uns"), "uber-uns");
        assert_eq!(generate_slug("Straße"), "strasse");
        assert_eq!(generate_slug("Æbleskiver og smørrebrød"), "aebleskiver-og-smorrebrod");
        assert_eq!(generate_slug("Łódź"), "lodz");
        assert_eq!(generate_slug("Señor Muñoz"), "senor-munoz");
        assert_eq!(generate_slug("Þórshöfn"), "thorshofn");
        assert_eq!(generate_slug("Œuvre complète"), "oeuvre-complete");
    }

    #[test]
    fn test_generate_slug_unmapped_unicode_is_separator() {
        assert_eq!(generate_slug("Hello 世界"), "hello");
        assert_eq!(generate_slug("foo☃bar"), "foo-bar");
        assert_eq!(generate_slug("日本語"), "");
    }

    #[test]
    fn test_generate_slug_consecutive_special_chars() {
        assert_eq!(generate_slug("Hello---World"), "hello-world");
        assert_eq!(generate_slug("Test___Case"), "test-case");
        assert_eq!(generate_slug("Multiple!!!Exclamations"), "multiple-exclamations");
    }

    #[test]
    fn test_generate_slug_long_title() {
        let long_title = "This is a very long title that exceeds one hundred characters and should be truncated to ensure reasonable URL length for better usability";
        let slug = generate_slug(long_title);
        assert!(slug.len() <= 100);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_generate_slug_is_stable_on_its_own_output() {
        let titles = vec![
            "Hello World",
            "What's New?",
            "Café René",
            "  Multiple   Spaces  ",
            "",
            "2024 Review",
        ];

        for title in titles {
            let slug = generate_slug(title);
            assert_eq!(generate_slug(&slug), slug, "slug of '{}' should be stable", title);
        }
    }
}
