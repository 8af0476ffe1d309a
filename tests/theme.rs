use portfolio_site::dom::{DocumentRoot, MemoryElement, MemoryStorage, PreferenceStore};
use portfolio_site::error::{PortfolioError, Result};
use portfolio_site::models::Theme;
use portfolio_site::theme::{ThemeController, THEME_ATTRIBUTE, THEME_STORAGE_KEY};

/// Storage that refuses every write, like a browser in a locked-down mode.
struct ReadOnlyStorage(Option<String>);

impl PreferenceStore for ReadOnlyStorage {
    fn get_item(&self, _key: &str) -> Option<String> {
        self.0.clone()
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(PortfolioError::StorageError("quota exceeded".to_string()))
    }
}

#[test]
fn test_stored_dark_applied_and_toggled() {
    let mut root = MemoryElement::new();
    let mut storage = MemoryStorage::with_item(THEME_STORAGE_KEY, "dark");

    let mut controller = ThemeController::start(&mut root, &mut storage, false);
    assert_eq!(controller.current(), Theme::Dark);
    assert_eq!(controller.root().attribute(THEME_ATTRIBUTE).as_deref(), Some("dark"));

    assert_eq!(controller.toggle(), Theme::Light);
    drop(controller);

    assert_eq!(root.attribute(THEME_ATTRIBUTE).as_deref(), Some("light"));
    assert_eq!(storage.get_item(THEME_STORAGE_KEY).as_deref(), Some("light"));
}

#[test]
fn test_stored_preference_beats_system() {
    let storage = MemoryStorage::with_item(THEME_STORAGE_KEY, "light");
    let controller = ThemeController::start(MemoryElement::new(), storage, true);

    assert_eq!(controller.current(), Theme::Light);
}

#[test]
fn test_system_preference_when_unset() {
    let dark = ThemeController::start(MemoryElement::new(), MemoryStorage::new(), true);
    assert_eq!(dark.current(), Theme::Dark);

    let light = ThemeController::start(MemoryElement::new(), MemoryStorage::new(), false);
    assert_eq!(light.current(), Theme::Light);
}

#[test]
fn test_start_does_not_persist() {
    let controller = ThemeController::start(MemoryElement::new(), MemoryStorage::new(), true);
    assert_eq!(controller.store().get_item(THEME_STORAGE_KEY), None);
}

#[test]
fn test_unknown_stored_value_falls_back_to_system() {
    let storage = MemoryStorage::with_item(THEME_STORAGE_KEY, "solarized");
    let controller = ThemeController::start(MemoryElement::new(), storage, true);

    assert_eq!(controller.current(), Theme::Dark);
}

#[test]
fn test_toggle_round_trip() {
    let mut controller = ThemeController::start(MemoryElement::new(), MemoryStorage::new(), false);

    assert_eq!(controller.toggle(), Theme::Dark);
    assert_eq!(controller.toggle(), Theme::Light);
    assert_eq!(controller.store().get_item(THEME_STORAGE_KEY).as_deref(), Some("light"));
}

#[test]
fn test_storage_failure_still_toggles() {
    let mut controller = ThemeController::start(MemoryElement::new(), ReadOnlyStorage(None), true);

    assert_eq!(controller.toggle(), Theme::Light);
    assert_eq!(controller.root().attribute(THEME_ATTRIBUTE).as_deref(), Some("light"));
}

#[test]
fn test_theme_parsing() {
    assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
    assert_eq!(" light\n".parse::<Theme>(), Ok(Theme::Light));
    assert!("Dark".parse::<Theme>().is_err());
    assert_eq!(Theme::Dark.to_string(), "dark");
    assert_eq!(Theme::Light.inverted(), Theme::Dark);
    assert_eq!(Theme::from_system(true), Theme::Dark);
}
