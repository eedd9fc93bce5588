use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::sync::OnceLock;
use tracing::error;
use unic_langid::LanguageIdentifier;

const DEFAULT_LOCALE: &str = "en";

/// English messages, embedded so the binary does not depend on its working directory
const MAIN_RESOURCE: &str = include_str!("../locales/en/main.ftl");

/// Localization manager for the Board Game Bot
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a new localization manager
    pub fn new() -> Result<Self> {
        let mut manager = Self::empty();

        let resource = FluentResource::try_new(MAIN_RESOURCE.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid localization resource: {errors:?}"))?;
        manager
            .bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicated localization messages: {errors:?}"))?;

        Ok(manager)
    }

    /// A manager without messages, every lookup reports the missing key
    fn empty() -> Self {
        let locale: LanguageIdentifier = DEFAULT_LOCALE.parse().unwrap_or_default();
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Messages are embedded in HTML, isolation marks would show up verbatim
        bundle.set_use_isolating(false);
        Self { bundle }
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            error!(key, errors = ?errors, "Failed to format localized message");
        }
        value.into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let fluent_args = FluentArgs::from_iter(
            args.iter()
                .map(|(k, v)| (*k, FluentValue::from(v.to_string()))),
        );
        self.get_message(key, Some(&fluent_args))
    }
}

/// Global localization instance
static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager, reporting a broken resource
pub fn init_localization() -> Result<()> {
    if LOCALIZATION_MANAGER.get().is_none() {
        let manager = LocalizationManager::new()?;
        let _ = LOCALIZATION_MANAGER.set(manager);
    }
    Ok(())
}

/// Get the global localization manager, initializing it on first use
pub fn get_localization_manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER.get_or_init(|| match LocalizationManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            error!(error = %e, "Cannot load localization, messages will be missing");
            LocalizationManager::empty()
        }
    })
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    get_localization_manager().get_message(key, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    get_localization_manager().get_message_with_args(key, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_resource_is_valid() {
        assert!(LocalizationManager::new().is_ok());
        assert!(init_localization().is_ok());
    }

    #[test]
    fn test_simple_message() {
        assert_eq!(t("no-result"), "No result found!");
        assert_eq!(t("button-share"), "Share");
    }

    #[test]
    fn test_message_with_args_has_no_isolation_marks() {
        assert_eq!(
            t_args("command-not-supported", &[("command", "foo")]),
            "Sorry, <b>/foo</b> is not a valid command."
        );
        assert_eq!(
            t_args("index-not-valid", &[("index", "7")]),
            "Error, 7 is not a valid search index (out of bound)."
        );
    }

    #[test]
    fn test_multiline_help() {
        let help = t("help");
        assert!(help.starts_with("This bot brings the power of"));
        assert!(help.contains("\n\n<b>Commands:</b>\n/b - "));
        assert!(help.contains("<b>Inline Commands:</b>"));
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(t("does-not-exist"), "Missing translation: does-not-exist");
    }
}
