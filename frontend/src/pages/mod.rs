pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod profile;
pub mod todos;

use sauron::{html::attributes::*, html::*, prelude::*};

use crate::app::Msg;

pub(crate) const INPUT_CLASS: &str = "w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent";
pub(crate) const PRIMARY_BUTTON: &str = "bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200 disabled:opacity-50";
pub(crate) const CARD: &str = "bg-ctp-surface0 rounded-lg shadow-lg p-8 border border-ctp-surface1";

/// Pill used for filters and enum pickers.
pub(crate) fn chip(label: &str, active: bool, msg: Msg) -> Node<Msg> {
    button([
        on_click(move |_| msg.clone()),
        class(&format!(
            "px-3 py-1 rounded-full text-sm transition-colors duration-200 {}",
            if active {
                "bg-ctp-blue text-ctp-base"
            } else {
                "bg-ctp-surface1 text-ctp-subtext1 hover:bg-ctp-surface2"
            }
        )),
    ], [text(label)])
}

pub(crate) fn error_banner(message: Option<&str>) -> Node<Msg> {
    match message {
        Some(message) => div(
            [class("mb-4 rounded-md px-4 py-3 bg-ctp-red/10 border border-ctp-red text-ctp-red text-sm")],
            [text(message)],
        ),
        None => text(""),
    }
}
