/*!
 * Tests for language utility functions
 */

use yacat::language_utils::{
    LanguageCodeType, get_language_name, language_codes_match, normalize_to_part2t,
    plural_forms_for, primary_subtag, validate_language_code,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    // ISO 639-1 tests
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("fr").unwrap(), LanguageCodeType::Part1));

    // ISO 639-2/T tests
    assert!(matches!(validate_language_code("deu").unwrap(), LanguageCodeType::Part2T));

    // ISO 639-2/B tests
    assert!(matches!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B));

    // Region subtags and case
    assert!(matches!(validate_language_code("pt_BR").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("zh-CN").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1));

    // Invalid codes
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("").is_err());
}

/// Test the primary subtag extraction
#[test]
fn test_primary_subtag_withRegion_shouldReturnLanguageOnly() {
    assert_eq!(primary_subtag("pt_BR"), "pt");
    assert_eq!(primary_subtag("zh-Hant-TW"), "zh");
    assert_eq!(primary_subtag("FR"), "fr");
}

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fr_CA").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert!(normalize_to_part2t("zz").is_err());
}

/// Test language code matching across formats
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("fre", "fr_FR"));
    assert!(!language_codes_match("fr", "de"));
    assert!(!language_codes_match("zz", "zz"));
}

/// Test language names
#[test]
fn test_get_language_name_withValidCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("de_AT").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}

/// Test gettext plural rules
#[test]
fn test_plural_forms_for_withFrench_shouldReturnRule() {
    assert_eq!(plural_forms_for("fr"), Some("nplurals=2; plural=(n > 1);"));
    assert_eq!(plural_forms_for("fr-BE"), Some("nplurals=2; plural=(n > 1);"));
    assert_eq!(plural_forms_for(" FR "), Some("nplurals=2; plural=(n > 1);"));
}

/// Test that other languages get no built-in plural rule
#[test]
fn test_plural_forms_for_withOtherLanguages_shouldReturnNone() {
    assert_eq!(plural_forms_for("de"), None);
    assert_eq!(plural_forms_for("pt_BR"), None);
    assert_eq!(plural_forms_for("ja"), None);
}
