//! Custom field validators used by the `validator` derives on drafts and forms.

use std::borrow::Cow;

use validator::ValidationError;

/// Hosts a restaurant link must point at.
const RESTAURANT_HOSTS: [&str; 2] = ["place.naver.com", "place.map.kakao.com"];

/// Rejects any ASCII punctuation (nicknames must be plain words).
pub fn validate_no_special_characters(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_ascii_punctuation()) {
        let mut error = ValidationError::new("special_characters");
        error.message = Some(Cow::Borrowed("special characters are not allowed"));
        return Err(error);
    }
    Ok(())
}

/// Restaurant links must reference a Naver or Kakao place page.
pub fn validate_restaurant_link(value: &str) -> Result<(), ValidationError> {
    if RESTAURANT_HOSTS.iter().any(|host| value.contains(host)) {
        return Ok(());
    }
    let mut error = ValidationError::new("restaurant_link");
    error.message = Some(Cow::Borrowed(
        "link must contain place.naver.com or place.map.kakao.com",
    ));
    Err(error)
}

/// Django-style required text: whitespace-only counts as blank.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed("this field is required"));
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nickname_rejects_punctuation() {
        assert!(validate_no_special_characters("codeit").is_ok());
        assert!(validate_no_special_characters("맛집탐방").is_ok());
        assert!(validate_no_special_characters("code_it").is_err());
        assert!(validate_no_special_characters("hi!").is_err());
    }

    #[test]
    fn restaurant_link_requires_known_host() {
        assert!(validate_restaurant_link("https://m.place.naver.com/restaurant/1").is_ok());
        assert!(validate_restaurant_link("https://place.map.kakao.com/27").is_ok());
        assert!(validate_restaurant_link("https://example.com/place").is_err());
    }

    #[test]
    fn blank_text_is_required() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank(" ok ").is_ok());
    }
}
