use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

/// Languages shipped with the bot, with their Fluent sources
const LOCALES: &[(&str, &str)] = &[
    ("ar", include_str!("../locales/ar/main.ftl")),
    ("en", include_str!("../locales/en/main.ftl")),
];

/// Localization manager for the ECG tutor bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl LocalizationManager {
    /// Create a localization manager with every bundled language.
    ///
    /// `default_language` falls back to Arabic when it is not supported.
    pub fn new(default_language: &str) -> Result<Self> {
        let mut bundles = HashMap::new();

        for (code, source) in LOCALES {
            let locale: LanguageIdentifier = code.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(code.to_string(), bundle);
        }

        let default_language = if bundles.contains_key(default_language) {
            default_language.to_string()
        } else {
            LOCALES[0].0.to_string()
        };

        Ok(Self {
            bundles,
            default_language,
        })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        locale: &LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Messages are embedded in HTML; bidi isolation marks would leak into the output
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid {} resource: {:?}", locale, errors))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate {} messages: {:?}", locale, errors))?;

        Ok(bundle)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Map a Telegram language code ("en-US", "ar", ...) onto a bundled language
    pub fn detect_language(&self, language_code: Option<&str>) -> &str {
        let primary = language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(|code| code.to_lowercase());

        match primary {
            Some(code) => match self.bundles.get_key_value(code.as_str()) {
                Some((key, _)) => key.as_str(),
                None => &self.default_language,
            },
            None => &self.default_language,
        }
    }

    /// Get a localized message in the given language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(&self.default_language))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            tracing::warn!(key, language, errors = ?errors, "Fluent formatting errors");
        }

        value.into_owned()
    }

    /// Get a localized message without arguments
    pub fn t(&self, key: &str, language: &str) -> String {
        self.get_message_in_language(key, language, None)
    }

    /// Get a localized message with simple string arguments
    pub fn t_args(&self, key: &str, args: &[(&str, &str)], language: &str) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }
}
