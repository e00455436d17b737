use serde::Serialize;

/// Category under which generic culture headlines are stored.
pub const CULTURE_CATEGORY: &str = "culture";

/// Home-page code meaning "no theme filter".
pub const ALL_THEMES_CODE: &str = "todos";

/// A cultural theme. The code doubles as the stored article category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Cinema,
    Musica,
    Arte,
    Literatura,
    Teatro,
    Games,
    Tv,
    Cultura,
}

impl Theme {
    pub const ALL: [Theme; 8] = [
        Theme::Cinema,
        Theme::Musica,
        Theme::Arte,
        Theme::Literatura,
        Theme::Teatro,
        Theme::Games,
        Theme::Tv,
        Theme::Cultura,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Theme::Cinema => "cinema",
            Theme::Musica => "musica",
            Theme::Arte => "arte",
            Theme::Literatura => "literatura",
            Theme::Teatro => "teatro",
            Theme::Games => "games",
            Theme::Tv => "tv",
            Theme::Cultura => "cultura",
        }
    }

    /// NewsAPI `q` expression for `/everything`.
    pub fn keywords(self) -> &'static str {
        match self {
            Theme::Cinema => "cinema OR movie OR film OR hollywood OR streaming",
            Theme::Musica => "music OR concert OR album OR artist OR band OR singer",
            Theme::Arte => "art OR painting OR sculpture OR gallery OR museum OR exhibition",
            Theme::Literatura => "book OR literature OR author OR novel OR poetry OR writer",
            Theme::Teatro => "theater OR theatre OR play OR musical OR broadway OR performance",
            Theme::Games => {
                "gaming OR videogame OR esports OR game OR playstation OR xbox OR nintendo"
            }
            Theme::Tv => "television OR tv show OR series OR netflix OR streaming OR episode",
            Theme::Cultura => "culture OR entertainment OR arts OR cultural",
        }
    }

    pub fn from_code(code: &str) -> Option<Theme> {
        let code = code.trim();
        Theme::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(code))
    }

    /// Unknown codes fall back to the generic culture keywords.
    pub fn from_code_or_default(code: &str) -> Theme {
        Theme::from_code(code).unwrap_or(Theme::Cultura)
    }
}

/// Theme selector parsed from the home page `theme` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeFilter {
    All,
    Only(Theme),
}

impl ThemeFilter {
    /// Absent, empty or `todos` selects everything.
    pub fn parse(raw: Option<&str>) -> ThemeFilter {
        match raw.map(str::trim) {
            None | Some("") => ThemeFilter::All,
            Some(code) if code.eq_ignore_ascii_case(ALL_THEMES_CODE) => ThemeFilter::All,
            Some(code) => ThemeFilter::Only(Theme::from_code_or_default(code)),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ThemeFilter::All => ALL_THEMES_CODE,
            ThemeFilter::Only(theme) => theme.code(),
        }
    }

    /// Category to filter stored articles by; `None` for all.
    pub fn category(self) -> Option<&'static str> {
        match self {
            ThemeFilter::All => None,
            ThemeFilter::Only(theme) => Some(theme.code()),
        }
    }
}

/// Entry of the theme picker shown on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeChoice {
    pub code: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const HOME_THEMES: [ThemeChoice; 8] = [
    ThemeChoice { code: ALL_THEMES_CODE, name: "Todos", icon: "🌐", color: "gray" },
    ThemeChoice { code: "cinema", name: "Cinema", icon: "🎬", color: "red" },
    ThemeChoice { code: "musica", name: "Música", icon: "🎵", color: "purple" },
    ThemeChoice { code: "arte", name: "Arte", icon: "🎨", color: "pink" },
    ThemeChoice { code: "literatura", name: "Literatura", icon: "📚", color: "blue" },
    ThemeChoice { code: "teatro", name: "Teatro", icon: "🎭", color: "indigo" },
    ThemeChoice { code: "games", name: "Games", icon: "🎮", color: "green" },
    ThemeChoice { code: "tv", name: "TV & Séries", icon: "📺", color: "orange" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_code(theme.code()), Some(theme));
        }
        assert_eq!(Theme::from_code("CINEMA"), Some(Theme::Cinema));
    }

    #[test]
    fn unknown_code_uses_culture_keywords() {
        assert_eq!(Theme::from_code("opera"), None);
        let theme = Theme::from_code_or_default("opera");
        assert_eq!(theme, Theme::Cultura);
        assert_eq!(theme.keywords(), "culture OR entertainment OR arts OR cultural");
    }

    #[test]
    fn filter_parsing() {
        assert_eq!(ThemeFilter::parse(None), ThemeFilter::All);
        assert_eq!(ThemeFilter::parse(Some("todos")), ThemeFilter::All);
        assert_eq!(ThemeFilter::parse(Some("")), ThemeFilter::All);
        assert_eq!(
            ThemeFilter::parse(Some("musica")),
            ThemeFilter::Only(Theme::Musica)
        );
        assert_eq!(ThemeFilter::parse(Some("tv")).category(), Some("tv"));
        assert_eq!(ThemeFilter::All.category(), None);
    }

    #[test]
    fn home_picker_lists_every_browsable_theme() {
        assert_eq!(HOME_THEMES[0].code, ALL_THEMES_CODE);
        for choice in &HOME_THEMES[1..] {
            assert!(Theme::from_code(choice.code).is_some(), "{}", choice.code);
        }
    }
}
