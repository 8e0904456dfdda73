//! Brazilian phone number helpers

/// Country calling code for Brazil
pub const COUNTRY_CODE: &str = "55";

fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize a phone for WhatsApp: digits only, prefixed with `55`
///
/// A number that already starts with `55` and has at least 12 digits is
/// taken to carry the country code.
///
/// ```
/// use shared::phone::normalize_whatsapp;
///
/// assert_eq!(normalize_whatsapp("(11) 98765-4321"), "5511987654321");
/// assert_eq!(normalize_whatsapp("5511987654321"), "5511987654321");
/// ```
pub fn normalize_whatsapp(raw: &str) -> String {
    let digits = digits(raw);
    if has_country_code(&digits) {
        digits
    } else {
        format!("{COUNTRY_CODE}{digits}")
    }
}

fn has_country_code(digits: &str) -> bool {
    digits.starts_with(COUNTRY_CODE) && digits.len() >= 12
}

/// Format as `(11) 98765-4321` (mobile) or `(11) 3456-7890` (landline)
///
/// Anything that is not 10 or 11 digits after dropping the country code is
/// returned unchanged.
pub fn format_br_phone(raw: &str) -> String {
    let mut digits = digits(raw);
    if has_country_code(&digits) {
        digits.drain(..COUNTRY_CODE.len());
    }
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => raw.to_string(),
    }
}

/// Whether `raw` looks like a valid Brazilian phone
///
/// 10 or 11 digits after an optional `55`, area code between 11 and 99, and
/// not a single repeated digit.
pub fn is_valid_br_phone(raw: &str) -> bool {
    let digits = digits(raw);
    let local = digits.strip_prefix(COUNTRY_CODE).unwrap_or(&digits);

    if !matches!(local.len(), 10 | 11) {
        return false;
    }
    let area: u32 = match local[..2].parse() {
        Ok(area) => area,
        Err(_) => return false,
    };
    if !(11..=99).contains(&area) {
        return false;
    }
    let first = local.as_bytes()[0];
    !local.bytes().all(|b| b == first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_country_code() {
        assert_eq!(normalize_whatsapp("11987654321"), "5511987654321");
        assert_eq!(normalize_whatsapp("(11) 3456-7890"), "551134567890");
    }

    #[test]
    fn test_normalize_keeps_country_code() {
        assert_eq!(normalize_whatsapp("5511987654321"), "5511987654321");
        assert_eq!(normalize_whatsapp("+55 (11) 98765-4321"), "5511987654321");
    }

    #[test]
    fn test_normalize_short_number_starting_with_55() {
        // area code 55 (Rio Grande do Sul), no country code yet
        assert_eq!(normalize_whatsapp("5534567890"), "555534567890");
    }

    #[test]
    fn test_format_br_phone() {
        assert_eq!(format_br_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_br_phone("1134567890"), "(11) 3456-7890");
        assert_eq!(format_br_phone("5511987654321"), "(11) 98765-4321");
        assert_eq!(format_br_phone("123"), "123");
    }

    #[test]
    fn test_is_valid_br_phone() {
        assert!(is_valid_br_phone("(11) 98765-4321"));
        assert!(is_valid_br_phone("5511987654321"));
        assert!(is_valid_br_phone("1134567890"));

        assert!(!is_valid_br_phone(""));
        assert!(!is_valid_br_phone("12345"));
        assert!(!is_valid_br_phone("0998765432"));
        assert!(!is_valid_br_phone("11111111111"));
    }
}
