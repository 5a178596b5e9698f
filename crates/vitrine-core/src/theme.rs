use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
}

impl ThemePreference {
    /// Parses a persisted value. Anything other than `"dark"`/`"light"` is
    /// treated as unset.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// The saved preference wins; otherwise the environment's color-scheme
    /// hint decides.
    #[must_use]
    pub fn resolve(saved: Option<Self>, prefers_dark: bool) -> Self {
        match saved {
            Some(theme) => theme,
            None if prefers_dark => Self::Dark,
            None => Self::Light,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_preference_overrides_hint() {
        assert_eq!(
            ThemePreference::resolve(Some(ThemePreference::Light), true),
            ThemePreference::Light
        );
    }

    #[test]
    fn unset_preference_follows_hint() {
        assert_eq!(ThemePreference::resolve(None, true), ThemePreference::Dark);
        assert_eq!(ThemePreference::resolve(None, false), ThemePreference::Light);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert_eq!(ThemePreference::parse("dark"), Some(ThemePreference::Dark));
        assert_eq!(ThemePreference::parse("sepia"), None);
    }

    #[test]
    fn toggled_twice_is_identity() {
        let theme = ThemePreference::Dark;
        assert_eq!(theme.toggled().toggled(), theme);
    }
}
