// slacksift: relevance-ranked Slack message search and cleanup
//
// This is the library root. Each module corresponds to one stage of the
// search -> score -> rank -> export/delete flow.

pub mod config;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod slack;
pub mod status;
