// Orchestration: search -> score -> rank, and bulk delete.
//
// Both pipelines run one network call at a time. Scoring is sequential to
// stay under provider rate limits; deletes are sequential so a failure is
// reported against exactly one message.

pub mod delete;
pub mod search;
