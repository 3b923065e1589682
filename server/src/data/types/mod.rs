//! Shared data types for repository backends

mod survey;

pub use survey::{
    HistoryOperator, HistoryType, ListSurveysParams, StatusRecord, SurveyConf, SurveyHistory,
    SurveyMeta, SurveyStatus, SurveySubmission,
};
