/// Title-cases `value`: every letter that follows a non-letter is uppercased, every other
/// letter lowercased. Digits and punctuation start a new word, so `"2nd floor"` becomes
/// `"2Nd Floor"` and `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut previous_is_letter = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            output.push(ch);
            previous_is_letter = false;
        }
    }

    output
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}

/// City part of a `"City, Region"` location.
pub fn leading_segment(value: &str) -> &str {
    value.split(',').next().unwrap_or(value).trim()
}
