pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed text or `None` if nothing is left.
pub fn non_empty(text: &str) -> Option<String> {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Replace latin letters with diacritical marks by their base letters.
///
/// Only intended for comparisons, never for display values.
pub fn fold_diacritics(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match fold_char(c) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }
    folded
}

#[rustfmt::skip]
fn fold_char(c: char) -> Option<&'static str> {
    let replacement = match c {
        'ß' | 'ẞ'                               => "ss",
        'æ'                                     => "ae",
        'Æ'                                     => "AE",
        'œ'                                     => "oe",
        'Œ'                                     => "OE",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ą' | 'ă' | 'ā' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ą' | 'Ă' | 'Ā' => "A",
        'ç' | 'ć' | 'č' | 'ĉ'                   => "c",
        'Ç' | 'Ć' | 'Č' | 'Ĉ'                   => "C",
        'ď' | 'đ'                               => "d",
        'Ď' | 'Đ'                               => "D",
        'è' | 'é' | 'ê' | 'ë' | 'ę' | 'ě' | 'ē' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ę' | 'Ě' | 'Ē' => "E",
        'ğ'                                     => "g",
        'Ğ'                                     => "G",
        'ì' | 'í' | 'î' | 'ï' | 'ı' | 'ī'       => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'İ' | 'Ī'       => "I",
        'ł' | 'ľ' | 'ĺ'                         => "l",
        'Ł' | 'Ľ' | 'Ĺ'                         => "L",
        'ñ' | 'ń' | 'ň'                         => "n",
        'Ñ' | 'Ń' | 'Ň'                         => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ő' | 'ō' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ő' | 'Ō' => "O",
        'ř' | 'ŕ'                               => "r",
        'Ř' | 'Ŕ'                               => "R",
        'ś' | 'š' | 'ş' | 'ș'                   => "s",
        'Ś' | 'Š' | 'Ş' | 'Ș'                   => "S",
        'ť' | 'ţ' | 'ț'                         => "t",
        'Ť' | 'Ţ' | 'Ț'                         => "T",
        'ù' | 'ú' | 'û' | 'ü' | 'ů' | 'ű' | 'ū' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ů' | 'Ű' | 'Ū' => "U",
        'ý' | 'ÿ'                               => "y",
        'Ý' | 'Ÿ'                               => "Y",
        'ž' | 'ź' | 'ż'                         => "z",
        'Ž' | 'Ź' | 'Ż'                         => "Z",
        _ => return None,
    };
    Some(replacement)
}

/// Number of leading characters both texts have in common.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(a, b)| a == b).count()
}
