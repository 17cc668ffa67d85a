//! URL slugs derived from post titles

/// Lowercase, ASCII-transliterated, hyphen-separated form of `text`
///
/// Latin letters with diacritics map to their base letters, every other run of
/// non-alphanumeric characters becomes a single hyphen, and leading/trailing
/// hyphens are dropped. Characters without an ASCII equivalent are removed.
///
/// ```
/// use blog_api::blog::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("  Crème brûlée: 3 façons "), "creme-brulee-3-facons");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let mut ascii = [0u8; 4];
        let mapped = if c.is_ascii_alphanumeric() {
            &*c.encode_utf8(&mut ascii)
        } else {
            transliterate(c)
        };
        if mapped.is_empty() {
            if c.is_alphanumeric() {
                // Non-Latin letter with no ASCII form: drop it without splitting words
                continue;
            }
            pending_hyphen = true;
            continue;
        }

        if pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        pending_hyphen = false;
        slug.push_str(mapped);
    }

    slug
}

fn transliterate(c: char) -> &'static str {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ß' => "ss",
        'ś' | 'š' | 'ş' => "s",
        'ť' | 'ţ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        '&' => "and",
        _ => "",
    }
}
