//! # Localization Tests
//!
//! Every message key used by the renderer must exist in every language.

use ecg_tutor::localization::LocalizationManager;
use std::collections::HashMap;

const KEYS: &[&str] = &[
    "welcome",
    "back-to-main",
    "button-teach",
    "button-cases",
    "button-quiz",
    "button-back-main",
    "teach-intro",
    "cases-title",
    "cases-page-empty",
    "button-prev",
    "button-next",
    "button-quiz-this-case",
    "button-back-cases",
    "case-not-found",
    "quiz-menu-title",
    "button-quiz-random",
    "button-quiz-by-number",
    "quiz-question-header",
    "button-back-case",
    "quiz-correct",
    "quiz-wrong",
    "button-quiz-another",
    "ask-case-number",
    "invalid-number",
    "help-hint",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        LocalizationManager::new("ar").expect("Failed to create localization manager")
    }

    #[test]
    fn test_all_keys_translated() {
        let manager = setup_localization();

        for language in ["ar", "en"] {
            for key in KEYS {
                let message = manager.t(key, language);
                assert!(!message.is_empty(), "{language}/{key}");
                assert!(!message.starts_with("Missing"), "{language}/{key}: {message}");
            }
        }
    }

    #[test]
    fn test_languages_differ() {
        let manager = setup_localization();
        assert_ne!(manager.t("help-hint", "ar"), manager.t("help-hint", "en"));
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("nonexistent-key", "en", None);
        assert_eq!(message, "Missing translation: nonexistent-key");
    }

    #[test]
    fn test_unsupported_language_uses_default() {
        let manager = setup_localization();
        assert_eq!(manager.t("invalid-number", "fr"), manager.t("invalid-number", "ar"));
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();

        let mut args = HashMap::new();
        args.insert("answer", "Atrial flutter");

        let message = manager.get_message_in_language("quiz-wrong", "en", Some(&args));
        assert_eq!(message, "❌ Wrong. The correct answer is: <b>Atrial flutter</b>");

        let arabic = manager.t_args("quiz-wrong", &[("answer", "Atrial flutter")], "ar");
        // No bidi isolation marks around the argument
        assert!(arabic.contains("<b>Atrial flutter</b>"));
    }

    #[test]
    fn test_multiline_messages_keep_line_breaks() {
        let manager = setup_localization();
        let intro = manager.t("teach-intro", "en");

        assert!(intro.starts_with("Learning section:\n\n"));
        assert!(intro.contains("\n2. QRS: ventricular depolarization.\n"));
    }

    #[test]
    fn test_language_detection() {
        let manager = setup_localization();

        assert_eq!(manager.detect_language(Some("en")), "en");
        assert_eq!(manager.detect_language(Some("en-US")), "en");
        assert_eq!(manager.detect_language(Some("AR")), "ar");
        assert_eq!(manager.detect_language(Some("ar-SA")), "ar");
        assert_eq!(manager.detect_language(None), "ar");
        assert_eq!(manager.detect_language(Some("unsupported")), "ar");
    }

    #[test]
    fn test_default_language_fallback() {
        let english = LocalizationManager::new("en").unwrap();
        assert_eq!(english.default_language(), "en");
        assert_eq!(english.detect_language(Some("de")), "en");

        let unknown = LocalizationManager::new("xx").unwrap();
        assert_eq!(unknown.default_language(), "ar");
    }
}
