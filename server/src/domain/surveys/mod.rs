//! Survey management
//!
//! Creation, editing, publishing and response listing for surveys owned by
//! the calling user. List queries go through the query expression compiler.

mod error;
mod history;
mod secret;
mod service;
mod types;

pub use error::SurveyError;
pub use history::HistoryService;
pub use service::{ListRequest, SurveyService};
pub use types::{
    CreateMethod, DataListHead, NewSurvey, PublishResult, SaveConfResult, SurveyDataResult,
    SurveyDetail, SurveyListResult, UserData,
};
