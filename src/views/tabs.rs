//! Tab Dispatcher
//! Maps a selected tab to the content fragment shown below the tab bar.

use super::content::{self, DICTIONARY_COLUMNS, DICTIONARY_TEXT, LOADING_TEXT, LOAD_FAILED_TEXT};
use super::fragment::{Block, Fragment, ImageRef, Span, TableData};
use super::models::{MODEL_REPORTS, SCORE_COLUMNS};
use super::router::TabGroup;
use crate::charts::{ChartBuilder, ChartError, Figure};
use crate::data::schema::VARIABLE_DICTIONARY;
use crate::data::ObservationTable;
use crate::stats::{StatsCalculator, SUMMARY_ROWS};

/// Declares a fixed tab set with its identifiers and labels.
macro_rules! tab_set {
    ($name:ident { $($variant:ident => ($tag:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn tag(self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_tag(tag: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|t| t.tag() == tag)
            }
        }
    };
}

tab_set!(IntroTab {
    Introduction => ("tab-int", "Introducción"),
    Description => ("tab-descripcion", "Descripción de los datos"),
    Dictionary => ("tab-diccionario", "Diccionario de variables"),
});

tab_set!(EdaTab {
    Variables => ("tab-graficos", "Análisis de variables"),
    Seasonal => ("tab-tablas", "Descomposición Estacional"),
    Missing => ("tab-estadisticas", "Datos faltantes"),
});

tab_set!(ModelTab {
    Model1 => ("tab-modelo1", "Modelo 1"),
    Model2 => ("tab-modelo2", "Modelo 2"),
    Model3 => ("tab-modelo3", "Modelo 3"),
    Model4 => ("tab-modelo4", "Modelo 4"),
    Model5 => ("tab-modelo5", "Modelo 5"),
});

impl ModelTab {
    fn index(self) -> usize {
        match self {
            ModelTab::Model1 => 0,
            ModelTab::Model2 => 1,
            ModelTab::Model3 => 2,
            ModelTab::Model4 => 3,
            ModelTab::Model5 => 4,
        }
    }
}

/// A tab of any group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Intro(IntroTab),
    Eda(EdaTab),
    Models(ModelTab),
}

impl Tab {
    /// Resolve a tag within a group; tags of other groups do not match.
    pub fn parse(group: TabGroup, tag: &str) -> Option<Self> {
        match group {
            TabGroup::Intro => IntroTab::from_tag(tag).map(Tab::Intro),
            TabGroup::Eda => EdaTab::from_tag(tag).map(Tab::Eda),
            TabGroup::Models => ModelTab::from_tag(tag).map(Tab::Models),
        }
    }

    pub fn group(self) -> TabGroup {
        match self {
            Tab::Intro(_) => TabGroup::Intro,
            Tab::Eda(_) => TabGroup::Eda,
            Tab::Models(_) => TabGroup::Models,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Tab::Intro(t) => t.tag(),
            Tab::Eda(t) => t.tag(),
            Tab::Models(t) => t.tag(),
        }
    }

    /// Whether the content is built from the loaded dataset.
    pub fn needs_data(self) -> bool {
        matches!(self, Tab::Eda(_))
    }
}

/// Where the dataset behind the EDA tabs stands.
#[derive(Debug, Clone, Copy)]
pub enum DataState<'a> {
    Loading,
    Failed(&'a str),
    Ready(&'a ObservationTable),
}

/// Selected tab per group. Nothing is selected until the user clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabSelections {
    intro: Option<IntroTab>,
    eda: Option<EdaTab>,
    models: Option<ModelTab>,
}

impl TabSelections {
    pub fn get(&self, group: TabGroup) -> Option<Tab> {
        match group {
            TabGroup::Intro => self.intro.map(Tab::Intro),
            TabGroup::Eda => self.eda.map(Tab::Eda),
            TabGroup::Models => self.models.map(Tab::Models),
        }
    }

    pub fn select(&mut self, tab: Tab) {
        match tab {
            Tab::Intro(t) => self.intro = Some(t),
            Tab::Eda(t) => self.eda = Some(t),
            Tab::Models(t) => self.models = Some(t),
        }
    }
}

/// Content for a raw tag. Unknown tags yield an empty fragment.
pub fn dispatch(group: TabGroup, tag: &str, data: DataState<'_>, period: usize) -> Fragment {
    match Tab::parse(group, tag) {
        Some(tab) => tab_content(tab, data, period),
        None => {
            log::debug!("No content for tab {:?}/{}", group, tag);
            Fragment::empty()
        }
    }
}

pub fn tab_content(tab: Tab, data: DataState<'_>, period: usize) -> Fragment {
    match tab {
        Tab::Intro(t) => intro_content(t),
        Tab::Eda(t) => eda_content(t, data, period),
        Tab::Models(t) => models_content(t),
    }
}

pub fn intro_content(tab: IntroTab) -> Fragment {
    let mut fragment = Fragment::empty();
    match tab {
        IntroTab::Introduction => {
            fragment
                .push(Block::Paragraph(content::introduction_paragraph()))
                .push(Block::Images(content::introduction_images()));
        }
        IntroTab::Description => {
            fragment
                .push(Block::Paragraph(vec![Span::plain(content::DESCRIPTION_TEXT)]))
                .push(Block::Collapse(content::description_collapse()));
        }
        IntroTab::Dictionary => {
            let table = TableData {
                columns: DICTIONARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
                rows: VARIABLE_DICTIONARY
                    .iter()
                    .map(|(var, desc)| vec![var.to_string(), desc.to_string()])
                    .collect(),
                ..Default::default()
            };
            fragment
                .push(Block::Paragraph(vec![Span::plain(DICTIONARY_TEXT)]))
                .push(Block::Table(table));
        }
    }
    fragment
}

/// EDA content. Until the table arrives only a loading notice is shown,
/// and a failed load shows its error instead.
pub fn eda_content(tab: EdaTab, data: DataState<'_>, period: usize) -> Fragment {
    let mut fragment = Fragment::empty();
    let table = match data {
        DataState::Ready(table) => table,
        DataState::Loading => {
            fragment.push(Block::Paragraph(vec![Span::plain(LOADING_TEXT)]));
            return fragment;
        }
        DataState::Failed(reason) => {
            fragment.push(Block::Error(format!("{}: {}", LOAD_FAILED_TEXT, reason)));
            return fragment;
        }
    };

    match tab {
        EdaTab::Variables => {
            fragment.push(Block::Subheading("Estadísticas generales del conjunto de datos".into()));
            match summary_table(table) {
                Ok(summary) => fragment.push(Block::Table(summary)),
                Err(e) => fragment.push(Block::Error(e.to_string())),
            };
            fragment.push(Block::Heading("Gráficos de Líneas para Velocidades del Viento".into()));
            push_chart(&mut fragment, ChartBuilder::wind_speed_figure(table));
            fragment
                .push(Block::Heading("Gráficos de dispersión polar".into()))
                .push(Block::Subheading(
                    "Velocidad y dirección del viento a diferentes alturas (100m, 80m, 60m)".into(),
                ));
            push_chart(&mut fragment, ChartBuilder::polar_scatter_figure(table));
            fragment.push(Block::Heading("Gráficos de Temperatura a Diferentes Alturas".into()));
            push_chart(&mut fragment, ChartBuilder::temperature_figure(table));
        }
        EdaTab::Seasonal => {
            fragment.push(Block::Heading("Descomposición Estacional de Velocidades del Viento".into()));
            push_chart(&mut fragment, ChartBuilder::seasonal_decomposition_figure(table, period));
        }
        EdaTab::Missing => {
            fragment.push(Block::Subheading(
                "Datos faltantes, según rango de valores variables meteorológicas".into(),
            ));
            push_chart(&mut fragment, ChartBuilder::missing_data_figure(table));
        }
    }
    fragment
}

pub fn models_content(tab: ModelTab) -> Fragment {
    let report = &MODEL_REPORTS[tab.index()];
    let table = TableData {
        columns: SCORE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: report.scores.iter().map(|s| s.row()).collect(),
        exportable: true,
        ..Default::default()
    };

    let mut fragment = Fragment::empty();
    fragment
        .push(Block::Heading(report.title.to_string()))
        .push(Block::Table(table));
    for image in report.images {
        fragment.push(Block::Images(vec![ImageRef::new(image, 720.0, None)]));
    }
    fragment
}

fn push_chart(fragment: &mut Fragment, figure: Result<Figure, ChartError>) {
    match figure {
        Ok(fig) => {
            log::debug!("Chart {} built with {} traces", fig.id, fig.trace_count());
            fragment.push(Block::Chart(Box::new(fig)));
        }
        Err(e) => {
            log::warn!("Chart not built: {}", e);
            fragment.push(Block::Error(e.to_string()));
        }
    }
}

/// Descriptive statistics laid out with one row per statistic.
fn summary_table(table: &ObservationTable) -> Result<TableData, crate::data::TableError> {
    let stats = StatsCalculator::describe(table)?;

    let mut columns = vec![String::new()];
    columns.extend(stats.iter().map(|s| s.column.clone()));

    let rows = SUMMARY_ROWS
        .iter()
        .map(|&row| {
            let mut cells = vec![row.to_string()];
            cells.extend(stats.iter().map(|s| match s.get(row) {
                Some(v) if v.is_nan() => String::new(),
                Some(v) if row == "count" => format!("{}", v as usize),
                Some(v) => format!("{:.6}", v),
                None => String::new(),
            }));
            cells
        })
        .collect();

    Ok(TableData {
        columns,
        rows,
        highlight_first_row: true,
        exportable: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::sample_table;

    const GROUPS: [TabGroup; 3] = [TabGroup::Intro, TabGroup::Eda, TabGroup::Models];

    fn tags(group: TabGroup) -> Vec<&'static str> {
        match group {
            TabGroup::Intro => IntroTab::ALL.iter().map(|t| t.tag()).collect(),
            TabGroup::Eda => EdaTab::ALL.iter().map(|t| t.tag()).collect(),
            TabGroup::Models => ModelTab::ALL.iter().map(|t| t.tag()).collect(),
        }
    }

    #[test]
    fn every_known_tag_has_content() {
        let table = sample_table(48);
        for group in GROUPS {
            for tag in tags(group) {
                let fragment = dispatch(group, tag, DataState::Ready(&table), 12);
                assert!(!fragment.is_empty(), "{} is empty", tag);
                assert_eq!(fragment.errors().count(), 0, "{} has errors", tag);
            }
        }
    }

    #[test]
    fn unknown_tags_are_empty() {
        let table = sample_table(48);
        for group in GROUPS {
            assert!(dispatch(group, "tab-intro", DataState::Ready(&table), 12).is_empty());
            assert!(dispatch(group, "", DataState::Loading, 12).is_empty());
        }
        // Tags only resolve within their own group.
        assert!(dispatch(TabGroup::Models, "tab-int", DataState::Loading, 12).is_empty());
    }

    #[test]
    fn selections_start_empty() {
        let mut selections = TabSelections::default();
        for group in GROUPS {
            assert_eq!(selections.get(group), None);
        }
        selections.select(Tab::Eda(EdaTab::Missing));
        assert_eq!(selections.get(TabGroup::Eda), Some(Tab::Eda(EdaTab::Missing)));
        assert_eq!(selections.get(TabGroup::Intro), None);
    }

    #[test]
    fn variables_tab_has_summary_and_three_charts() {
        let table = sample_table(48);
        let fragment = eda_content(EdaTab::Variables, DataState::Ready(&table), 12);

        let ids: Vec<&str> = fragment.figures().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), 3);

        let summary = fragment.tables().next().unwrap();
        assert!(summary.highlight_first_row && summary.exportable);
        assert_eq!(summary.rows.len(), SUMMARY_ROWS.len());
        assert_eq!(summary.rows[0][0], "count");
        assert_eq!(summary.columns.len(), table.numeric_columns().len() + 1);
    }

    #[test]
    fn eda_waits_for_data() {
        let fragment = eda_content(EdaTab::Seasonal, DataState::Loading, 12);
        assert_eq!(fragment.figures().count(), 0);
        assert_eq!(fragment.errors().count(), 0);
        assert!(matches!(&fragment.blocks[0], Block::Paragraph(spans) if spans[0].text == LOADING_TEXT));
    }

    #[test]
    fn failed_load_shows_error_not_loading_notice() {
        for &tab in EdaTab::ALL {
            let fragment = dispatch(
                TabGroup::Eda,
                tab.tag(),
                DataState::Failed("Workbook has no sheets"),
                12,
            );
            assert_eq!(fragment.blocks.len(), 1);
            assert_eq!(fragment.errors().count(), 1);
            assert!(matches!(
                &fragment.blocks[0],
                Block::Error(msg) if msg.starts_with(LOAD_FAILED_TEXT) && msg.ends_with("no sheets")
            ));
        }
        // Static tabs do not depend on the dataset.
        let intro = dispatch(TabGroup::Intro, "tab-int", DataState::Failed("x"), 12);
        assert_eq!(intro.errors().count(), 0);
    }

    #[test]
    fn short_series_becomes_error_block() {
        let table = sample_table(20);
        let fragment = eda_content(EdaTab::Seasonal, DataState::Ready(&table), 12);
        assert_eq!(fragment.figures().count(), 0);
        assert_eq!(fragment.errors().count(), 1);
    }

    #[test]
    fn model_tab_shows_results_and_plots() {
        let fragment = models_content(ModelTab::Model3);
        assert!(matches!(&fragment.blocks[0], Block::Heading(h) if h.starts_with("Modelo 3")));

        let results = fragment.tables().next().unwrap();
        assert_eq!(results.columns.len(), 6);
        assert_eq!(results.rows.len(), 4);
        assert_eq!(results.rows[0][0], "Regresión K-NN");
        assert!(results.exportable);

        let images: Vec<&str> = fragment
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Images(imgs) => Some(imgs[0].asset.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(images, ["knn3.png", "lineal3.png", "ridge3.png", "lasso3.png"]);
    }

    #[test]
    fn description_has_collapse_section() {
        let fragment = intro_content(IntroTab::Description);
        let section = fragment
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Collapse(section) => Some(section),
                _ => None,
            })
            .unwrap();
        assert_eq!(section.buttons[0], "Variables Clave");
        assert_eq!(section.left_images.len() + section.right_images.len(), 4);
    }

    #[test]
    fn dictionary_lists_every_variable() {
        let fragment = intro_content(IntroTab::Dictionary);
        let table = fragment.tables().next().unwrap();
        assert_eq!(table.rows.len(), VARIABLE_DICTIONARY.len());
        assert!(!table.exportable);
    }
}
