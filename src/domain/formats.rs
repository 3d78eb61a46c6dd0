//! String format checks shared by entity and request validators

use argon2::password_hash::PasswordHash;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

pub static CPF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").expect("valid cpf regex"));

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{1,3} \(\d{2}\) \d{5}-\d{4}$").expect("valid phone regex"));

pub static ONLY_LETTERS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M}'\-\s]+$").expect("valid letters regex"));

static SQL_INJECTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(--|/\*|\*/|\x00|;\s*(select|insert|update|delete|drop|alter|create|truncate|exec|union)\b|\bxp_\w+|\bunion\s+(all\s+)?select\b|'\s*or\s+'?\w*'?\s*=)",
    )
    .expect("valid sql injection regex")
});

/// Strength rule for plain-text passwords chosen at registration: every
/// pattern must match. The regex crate has no look-ahead, hence one pattern
/// per character class.
pub static STRONG_PASSWORD_PATTERNS: Lazy<[Regex; 5]> = Lazy::new(|| {
    [
        r"(?s)^.{12,}$",
        r"[a-z]",
        r"[A-Z]",
        r"[0-9]",
        r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#,
    ]
    .map(|pattern| Regex::new(pattern).expect("valid password regex"))
});

pub fn is_valid_cpf(cpf: &str) -> bool {
    if cpf.trim().is_empty() || !CPF_PATTERN.is_match(cpf) {
        return false;
    }

    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let check_digit = |len: usize| {
        let weight_start = len as u32 + 1;
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (weight_start - i as u32))
            .sum();
        let r = sum % 11;
        if r < 2 { 0 } else { 11 - r }
    };

    digits[9] == check_digit(9) && digits[10] == check_digit(10)
}

pub fn is_valid_phone_number(number: &str) -> bool {
    !number.trim().is_empty() && PHONE_PATTERN.is_match(number)
}

pub fn is_valid_email(email: &str) -> bool {
    if email.trim().is_empty() || email.trim() != email {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    let local_ok = !local.is_empty()
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && !local.chars().any(|c| "()<>[]:;,\\\"".contains(c));

    let domain_ok = !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        });

    local_ok && domain_ok
}


/// True when `value` is a PHC string produced by the argon2 family.
pub fn is_hashed_password(value: &str) -> bool {
    PasswordHash::new(value)
        .map(|hash| hash.algorithm.as_str().starts_with("argon2"))
        .unwrap_or(false)
}

pub fn is_safe_for_sql_input(value: &str) -> bool {
    !SQL_INJECTION_PATTERN.is_match(value)
}

/// Lowercases and strips diacritics so "Açaí" and "acai" compare equal.
pub fn fold_for_search(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_requires_format_and_check_digits() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(!is_valid_cpf("529.982.247-26"));
        assert!(!is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf(""));
    }

    #[test]
    fn phone_number_format() {
        assert!(is_valid_phone_number("+55 (62) 94002-8922"));
        assert!(!is_valid_phone_number("+55 62 94002-8922"));
        assert!(!is_valid_phone_number("(62) 94002-8922"));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("press@google.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("pressgoogle.com"));
        assert!(!is_valid_email("press@@google.com"));
        assert!(!is_valid_email(" press@google.com"));
        assert!(!is_valid_email("press@google..com"));
        assert!(!is_valid_email("pre ss@google.com"));
    }

    #[test]
    fn password_strength() {
        let is_strong_password =
            |p: &str| STRONG_PASSWORD_PATTERNS.iter().all(|r| r.is_match(p));

        assert!(is_strong_password("Str0ng!Passw"));
        assert!(!is_strong_password("Sh0rt!"));
        assert!(!is_strong_password("alllowercase1!"));
        assert!(!is_strong_password("NoDigitsHere!!"));
        assert!(!is_strong_password("NoSpecials1234"));
    }

    #[test]
    fn only_letters_accepts_accents_and_apostrophes() {
        assert!(ONLY_LETTERS_PATTERN.is_match("João"));
        assert!(ONLY_LETTERS_PATTERN.is_match("O'Neil Smith-Jones"));
        assert!(!ONLY_LETTERS_PATTERN.is_match("R2D2"));
    }

    #[test]
    fn sql_safety_flags_injection_shapes_only() {
        assert!(is_safe_for_sql_input("O'Neil"));
        assert!(is_safe_for_sql_input("Str0ng;Pass!"));
        assert!(!is_safe_for_sql_input("x'; DROP TABLE users"));
        assert!(!is_safe_for_sql_input("admin' or '1'='1"));
        assert!(!is_safe_for_sql_input("name -- comment"));
        assert!(!is_safe_for_sql_input("1 UNION SELECT password"));
    }

    #[test]
    fn hashed_password_detection() {
        let hash = crate::auth::hash_password("Str0ng!Passw").unwrap();
        assert!(is_hashed_password(&hash));
        assert!(!is_hashed_password("$2b$12$abcdefghijklmnopqrstuvABCDEFGHIJKLMNOPQRSTUVWXYZ01234"));
        assert!(!is_hashed_password("plain-text"));
    }

    #[test]
    fn folding_removes_accents_and_case() {
        assert_eq!(fold_for_search("Açaí PRESS"), "acai press");
    }
}
