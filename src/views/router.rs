//! View Router
//! Maps a route path to one of the three page layouts.

use super::tabs::{EdaTab, IntroTab, ModelTab};

pub const NOT_FOUND_MESSAGE: &str = "Página no encontrada";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Eda,
    Models,
    NotFound(String),
}

/// Sidebar entries: (label, path).
pub const NAV_LINKS: [(&str, &str); 3] = [("INICIO", "/"), ("EDA", "/eda"), ("MODELOS", "/modelos")];

impl Route {
    /// Exact-match routing; anything else is not found.
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Route::Home,
            "/eda" => Route::Eda,
            "/modelos" => Route::Models,
            other => Route::NotFound(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Eda => "/eda",
            Route::Models => "/modelos",
            Route::NotFound(path) => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabGroup {
    Intro,
    Eda,
    Models,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabSpec {
    pub label: &'static str,
    pub tag: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub group: TabGroup,
    pub tabs: Vec<TabSpec>,
}

/// Layout for a route, `None` when the path is not found.
pub fn page_layout(route: &Route) -> Option<PageLayout> {
    let layout = match route {
        Route::Home => PageLayout {
            title: "De vientos y datos",
            subtitle: Some("Análisis de Series de Tiempo en Energía Eólica"),
            group: TabGroup::Intro,
            tabs: IntroTab::ALL
                .iter()
                .map(|t| TabSpec {
                    label: t.label(),
                    tag: t.tag(),
                })
                .collect(),
        },
        Route::Eda => PageLayout {
            title: "Análisis exploratorio de datos",
            subtitle: Some(
                "En esta sección se mostrará por medio de gráficas y tablas el comportamiento de las variables y los datos.",
            ),
            group: TabGroup::Eda,
            tabs: EdaTab::ALL
                .iter()
                .map(|t| TabSpec {
                    label: t.label(),
                    tag: t.tag(),
                })
                .collect(),
        },
        Route::Models => PageLayout {
            title: "Modelos de regresión lineal",
            subtitle: None,
            group: TabGroup::Models,
            tabs: ModelTab::ALL
                .iter()
                .map(|t| TabSpec {
                    label: t.label(),
                    tag: t.tag(),
                })
                .collect(),
        },
        Route::NotFound(_) => return None,
    };
    Some(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_paths() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path("/eda"), Route::Eda);
        assert_eq!(Route::from_path("/modelos"), Route::Models);
        for (_, path) in NAV_LINKS {
            assert_eq!(Route::from_path(path).path(), path);
        }
    }

    #[test]
    fn other_paths_are_not_found() {
        let route = Route::from_path("/eda/");
        assert_eq!(route, Route::NotFound("/eda/".to_string()));
        assert!(page_layout(&route).is_none());
        assert!(page_layout(&Route::from_path("")).is_none());
    }

    #[test]
    fn layouts_carry_their_tabs() {
        let home = page_layout(&Route::Home).unwrap();
        assert_eq!(home.group, TabGroup::Intro);
        assert_eq!(home.tabs.len(), 3);
        assert_eq!(home.tabs[0].tag, "tab-int");

        let models = page_layout(&Route::Models).unwrap();
        assert_eq!(models.tabs.len(), 5);
        assert!(models.subtitle.is_none());
    }
}
