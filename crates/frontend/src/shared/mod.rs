pub mod components;
pub mod date_utils;
pub mod download;
pub mod http;
pub mod icons;
pub mod list_utils;
pub mod modal;
pub mod ui_prefs;
