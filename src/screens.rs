use std::fmt;
use std::str::FromStr;

/// Screens of the dashboard, selected by the `screen` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Landing,
    Menu,
    PerRegion,
    Province,
}

impl Screen {
    pub fn key(&self) -> &'static str {
        match self {
            Screen::Landing => "awal",
            Screen::Menu => "menu",
            Screen::PerRegion => "perdaerah",
            Screen::Province => "sejawatimur",
        }
    }

    /// Screen for an optional query value; a missing value is the landing screen.
    pub fn resolve(value: Option<&str>) -> Result<Self, UnknownScreen> {
        match value {
            None => Ok(Screen::default()),
            Some(value) => value.parse(),
        }
    }
}

/// A `screen` value with no matching screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScreen(pub String);

impl fmt::Display for UnknownScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown screen {:?}", self.0)
    }
}

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awal" => Ok(Screen::Landing),
            "menu" => Ok(Screen::Menu),
            "perdaerah" => Ok(Screen::PerRegion),
            "sejawatimur" => Ok(Screen::Province),
            other => Err(UnknownScreen(other.to_string())),
        }
    }
}
