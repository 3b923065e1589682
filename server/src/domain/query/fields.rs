//! Queryable and sortable field allow-lists
//!
//! These lists are a security control: nothing outside them ever reaches the
//! persistence layer's query engine.

/// Fixed set of field names a compiler accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAllowList(&'static [&'static str]);

impl FieldAllowList {
    pub const fn new(fields: &'static [&'static str]) -> Self {
        Self(fields)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(&field)
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Fields a survey list may be filtered by
pub const SURVEY_FILTER_FIELDS: FieldAllowList =
    FieldAllowList::new(&["title", "remark", "questionType", "curStatus.status"]);

/// Fields a survey list may be sorted by
pub const SURVEY_SORT_FIELDS: FieldAllowList =
    FieldAllowList::new(&["createDate", "updateDate", "curStatus.date"]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_filter_fields() {
        for field in ["title", "remark", "questionType", "curStatus.status"] {
            assert!(SURVEY_FILTER_FIELDS.contains(field), "{}", field);
        }
        assert!(!SURVEY_FILTER_FIELDS.contains("owner"));
        assert!(!SURVEY_FILTER_FIELDS.contains("curStatus"));
        assert!(!SURVEY_FILTER_FIELDS.contains("$where"));
    }

    #[test]
    fn survey_sort_fields_are_not_filter_fields() {
        assert!(SURVEY_SORT_FIELDS.contains("curStatus.date"));
        assert!(!SURVEY_SORT_FIELDS.contains("curStatus.status"));
        assert!(!SURVEY_FILTER_FIELDS.contains("createDate"));
    }

    #[test]
    fn matching_is_exact() {
        assert!(!SURVEY_FILTER_FIELDS.contains("Title"));
        assert!(!SURVEY_FILTER_FIELDS.contains("title "));
        assert!(!SURVEY_SORT_FIELDS.contains(""));
    }
}
