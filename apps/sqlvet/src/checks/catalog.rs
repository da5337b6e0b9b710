//! Wrong column names for `SNOWFLAKE.ACCOUNT_USAGE.OBJECT_DEPENDENCIES`.

use crate::lexer::line_of;
use crate::models::{Finding, RuleCode, Script};
use crate::segment::Segmentation;

/// Known-wrong column name and the column the view actually exposes.
pub const WRONG_COLUMNS: [(&str, &str); 4] = [
    ("referenced_database_name", "REFERENCED_DATABASE"),
    ("referenced_schema_name", "REFERENCED_SCHEMA"),
    ("referencing_database_name", "REFERENCING_DATABASE"),
    ("referencing_schema_name", "REFERENCING_SCHEMA"),
];

/// One error per wrong name present, located at its first occurrence.
pub fn check(script: &Script, _seg: &Segmentation) -> Vec<Finding> {
    let text = script.stripped();
    // ASCII lowering keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    WRONG_COLUMNS
        .iter()
        .filter_map(|(wrong, correct)| {
            let pos = lower.find(wrong)?;
            Some(
                Finding::error(
                    script.path(),
                    RuleCode::CatalogColumn,
                    format!("Incorrect OBJECT_DEPENDENCIES column: {}", wrong),
                    format!("Should be: {}", correct),
                )
                .at_line(line_of(text, pos)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::split;

    fn run(sql: &str) -> Vec<Finding> {
        let script = Script::new("deps.sql", sql);
        check(&script, &split(sql))
    }

    #[test]
    fn test_single_wrong_column() {
        let f = run("SELECT referencing_schema_name\nFROM snowflake.account_usage.object_dependencies;");
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].detail, "Should be: REFERENCING_SCHEMA");
        assert_eq!(f[0].location, Some(crate::models::Location::Line(1)));
    }

    #[test]
    fn test_case_insensitive_and_once_per_name() {
        let sql = "SELECT 1;\nSELECT REFERENCED_DATABASE_NAME, Referenced_Database_Name FROM x;";
        let f = run(sql);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].detail, "Should be: REFERENCED_DATABASE");
        assert_eq!(f[0].location, Some(crate::models::Location::Line(2)));
    }

    #[test]
    fn test_correct_names_and_comments_are_clean() {
        let sql = "-- referenced_schema_name was renamed\nSELECT REFERENCED_SCHEMA, REFERENCING_DATABASE FROM x;";
        assert!(run(sql).is_empty());
    }
}
