//! Views module - routing, tab content and collapse state

mod collapse;
mod content;
mod fragment;
mod models;
mod router;
mod tabs;

pub use collapse::CollapseState;
pub use fragment::{Block, CollapseSection, Fragment, ImageRef, Span, TableData};
pub use router::{page_layout, PageLayout, Route, TabGroup, NAV_LINKS, NOT_FOUND_MESSAGE};
pub use tabs::{dispatch, DataState, Tab, TabSelections};
