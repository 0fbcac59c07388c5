//! Typed theme and the persisted light/dark mode store.
//!
//! ## Usage
//!
//! Build a [`Theme`] for the active [`ThemeMode`] and provide it around view
//! construction; components read it with `use_context::<Theme>()`.
//! [`ThemeStore`] owns the mode, persists it as JSON and notifies
//! subscribers when it changes.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use material_color_utilities::{
    dynamiccolor::{DynamicSchemeBuilder, MaterialDynamicColors, SpecVersion, Variant},
    hct::Hct,
};
use serde::{Deserialize, Serialize};
use storeline_ui::{Color, Dp, Observable, Subscription, provide_context};
use thiserror::Error;
use tracing::{debug, warn};

/// Brand seed color (#1E6F5C).
pub const DEFAULT_SEED: Color = Color::from_rgb(0.0129, 0.1589, 0.1070);

const THEME_FILE: &str = "theme.json";
const APP_DIR: &str = "storeline";

/// Light or dark appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light appearance.
    #[default]
    Light,
    /// Dark appearance.
    Dark,
}

impl ThemeMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Whether this is [`ThemeMode::Dark`].
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Color roles, emphasis alphas and text sizes read by picker components.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Mode the palette was built for.
    pub mode: ThemeMode,
    /// Accent color for selected days and confirm actions.
    pub primary: Color,
    /// Content drawn on `primary`.
    pub on_primary: Color,
    /// Picker surface.
    pub surface: Color,
    /// Main text.
    pub text_primary: Color,
    /// Secondary text such as weekday headers.
    pub text_secondary: Color,
    /// Default surface border and today ring.
    pub outline: Color,
    /// Error accent, used for the surface border when validation fails.
    pub error: Color,
    /// Validation banner background.
    pub error_container: Color,
    /// Validation banner text.
    pub on_error_container: Color,
    /// Modal overlay.
    pub scrim: Color,
    /// Background of the highlighted wheel band.
    pub selected_container: Color,
    /// Opacity of de-emphasized wheel rows.
    pub muted_alpha: f32,
    /// Opacity of disabled days.
    pub disabled_alpha: f32,
    /// Opacity of the modal overlay.
    pub scrim_alpha: f32,
    /// Text size of plain wheel rows.
    pub wheel_text_size: Dp,
    /// Text size of emphasized wheel rows.
    pub wheel_selected_text_size: Dp,
}

impl Theme {
    /// Builds a theme from a seed color.
    pub fn from_seed(seed: Color, mode: ThemeMode) -> Self {
        let scheme = DynamicSchemeBuilder::default()
            .source_color_hct(Hct::from_int(seed.to_argb()))
            .variant(Variant::TonalSpot)
            .spec_version(SpecVersion::Spec2025)
            .is_dark(mode.is_dark())
            .build();
        let colors = MaterialDynamicColors::new();

        Self {
            mode,
            primary: Color::from_argb(colors.primary().get_argb(&scheme)),
            on_primary: Color::from_argb(colors.on_primary().get_argb(&scheme)),
            surface: Color::from_argb(colors.surface_container_high().get_argb(&scheme)),
            text_primary: Color::from_argb(colors.on_surface().get_argb(&scheme)),
            text_secondary: Color::from_argb(colors.on_surface_variant().get_argb(&scheme)),
            outline: Color::from_argb(colors.outline_variant().get_argb(&scheme)),
            error: Color::from_argb(colors.error().get_argb(&scheme)),
            error_container: Color::from_argb(colors.error_container().get_argb(&scheme)),
            on_error_container: Color::from_argb(colors.on_error_container().get_argb(&scheme)),
            scrim: Color::from_argb(colors.scrim().get_argb(&scheme)),
            selected_container: Color::from_argb(
                colors.secondary_container().get_argb(&scheme),
            ),
            muted_alpha: 0.4,
            disabled_alpha: 0.38,
            scrim_alpha: 0.32,
            wheel_text_size: Dp(18.0),
            wheel_selected_text_size: Dp(22.0),
        }
    }

    /// Theme for `mode` from the brand seed.
    pub fn for_mode(mode: ThemeMode) -> Self {
        Self::from_seed(DEFAULT_SEED, mode)
    }

    /// Light theme from the brand seed.
    pub fn light() -> Self {
        Self::for_mode(ThemeMode::Light)
    }

    /// Dark theme from the brand seed.
    pub fn dark() -> Self {
        Self::for_mode(ThemeMode::Dark)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Makes `theme` the ambient theme while `child` builds views.
pub fn provide_theme<R>(theme: Theme, child: impl FnOnce() -> R) -> R {
    provide_context(theme, child)
}

/// Errors raised while loading or saving the theme mode.
#[derive(Debug, Error)]
pub enum ThemeStoreError {
    /// Reading or writing the theme file failed.
    #[error("theme file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The theme file is not valid JSON.
    #[error("theme file {path} is malformed: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// No platform config directory is known.
    #[error("no config directory available on this platform")]
    NoConfigDir,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTheme {
    mode: ThemeMode,
}

/// Owns the theme mode, its persistence and change notification.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    mode: Observable<ThemeMode>,
    path: Option<PathBuf>,
}

impl ThemeStore {
    /// Store without persistence.
    pub fn in_memory(mode: ThemeMode) -> Self {
        Self {
            mode: Observable::new(mode),
            path: None,
        }
    }

    /// Loads the mode from `path`. A missing file yields the default mode;
    /// the file is created on the first change.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ThemeStoreError> {
        let path = path.into();
        let mode = match fs::read_to_string(&path) {
            Ok(contents) => {
                let stored: StoredTheme =
                    serde_json::from_str(&contents).map_err(|source| ThemeStoreError::Json {
                        path: path.clone(),
                        source,
                    })?;
                stored.mode
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => ThemeMode::default(),
            Err(source) => return Err(ThemeStoreError::Io { path, source }),
        };
        debug!(path = %path.display(), ?mode, "theme mode loaded");
        Ok(Self {
            mode: Observable::new(mode),
            path: Some(path),
        })
    }

    /// Loads from `<config_dir>/storeline/theme.json`.
    pub fn load_default() -> Result<Self, ThemeStoreError> {
        let path = default_path().ok_or(ThemeStoreError::NoConfigDir)?;
        Self::load(path)
    }

    /// Loads from the default location, falling back to an in-memory light
    /// store when the file is unreadable.
    pub fn load_or_default() -> Self {
        match Self::load_default() {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "falling back to in-memory theme store");
                Self::in_memory(ThemeMode::default())
            }
        }
    }

    /// Backing file, if persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current mode.
    pub fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    /// Theme for the current mode.
    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.mode())
    }

    /// Sets the mode, persists it and notifies subscribers.
    ///
    /// Persisting happens before notification; when it fails the in-memory
    /// mode is unchanged.
    pub fn set_mode(&self, mode: ThemeMode) -> Result<(), ThemeStoreError> {
        if self.mode.get() == mode {
            return Ok(());
        }
        if let Some(path) = &self.path {
            persist(path, mode)?;
        }
        if self.mode.set(mode) {
            debug!(?mode, "theme mode changed");
        }
        Ok(())
    }

    /// Flips between light and dark; returns the new mode.
    pub fn toggle(&self) -> Result<ThemeMode, ThemeStoreError> {
        let next = self.mode().toggled();
        self.set_mode(next)?;
        Ok(next)
    }

    /// Calls `on_change` with each new mode until the subscription drops.
    pub fn subscribe(&self, on_change: impl Fn(ThemeMode) + Send + Sync + 'static) -> Subscription {
        self.mode.subscribe(on_change)
    }

    /// Provides the current theme while `child` builds views.
    pub fn provide<R>(&self, child: impl FnOnce() -> R) -> R {
        provide_theme(self.theme(), child)
    }
}

/// Default theme file location.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(THEME_FILE))
}

fn persist(path: &Path, mode: ThemeMode) -> Result<(), ThemeStoreError> {
    let io_err = |source| ThemeStoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string(&StoredTheme { mode }).map_err(|source| {
        ThemeStoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, json).map_err(io_err)
}
