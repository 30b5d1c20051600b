//! HTTP bindings: raw `/translate` and callable `/translateWithDeepL`

pub mod api;
pub mod callable;
pub mod cors;
