use crate::dom::{DocumentRoot, PreferenceStore};
use crate::models::Theme;
use tracing::{debug, info, warn};

pub const THEME_STORAGE_KEY: &str = "theme";
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Owns the `data-theme` attribute on the document root and the stored preference.
pub struct ThemeController<R, S> {
    root: R,
    store: S,
}

impl<R: DocumentRoot, S: PreferenceStore> ThemeController<R, S> {
    /// Resolve the effective theme (stored preference, else the OS signal) and apply it.
    pub fn start(root: R, store: S, system_prefers_dark: bool) -> Self {
        let mut controller = Self { root, store };
        let theme = controller.resolve(system_prefers_dark);
        controller.apply(theme);
        info!(%theme, "Theme applied");
        controller
    }

    fn resolve(&self, system_prefers_dark: bool) -> Theme {
        match self.store.get_item(THEME_STORAGE_KEY) {
            Some(saved) => match saved.parse::<Theme>() {
                Ok(theme) => theme,
                Err(err) => {
                    warn!(%err, "Ignoring stored theme preference");
                    Theme::from_system(system_prefers_dark)
                }
            },
            None => Theme::from_system(system_prefers_dark),
        }
    }

    /// Theme currently on the root. Anything but `dark` reads as light.
    pub fn current(&self) -> Theme {
        match self.root.attribute(THEME_ATTRIBUTE).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Flip the applied theme and persist the new choice.
    pub fn toggle(&mut self) -> Theme {
        let theme = self.current().inverted();
        self.apply(theme);
        if let Err(err) = self.store.set_item(THEME_STORAGE_KEY, theme.as_str()) {
            warn!(%err, "Theme preference not persisted");
        }
        debug!(%theme, "Theme toggled");
        theme
    }

    fn apply(&mut self, theme: Theme) {
        self.root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
