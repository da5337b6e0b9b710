use sqlvet::models::{Location, RuleCode};
use sqlvet::{split, Engine, Script, Severity};
use std::fs;
use tempfile::tempdir;

const MIGRATION_PROC: &str = r#"-- Automated migration
USE ROLE ACCOUNTADMIN;

CREATE OR REPLACE PROCEDURE admin.migrate(src VARCHAR)
RETURNS STRING
LANGUAGE SQL
AS
$$
DECLARE
  ddl STRING;
BEGIN
  -- fetch definitions; keep going on errors
  ddl := (SELECT GET_DDL('PROCEDURE', 'admin.load_stage(VARCHAR)'));
  INSERT INTO log VALUES (:ddl);
  RETURN 'done';
END;
$$;

CALL admin.migrate('prod_db');
"#;

fn codes(findings: &[sqlvet::Finding]) -> Vec<RuleCode> {
    findings.iter().map(|f| f.code).collect()
}

#[test]
fn test_procedure_script_segments_and_passes() {
    let seg = split(MIGRATION_PROC);
    assert_eq!(seg.statements.len(), 3);
    assert!(seg.statements[1].text.starts_with("CREATE OR REPLACE PROCEDURE admin.migrate"));
    assert!(seg.statements[1].text.ends_with("END;\n$$;"));
    assert_eq!(seg.statements[2].text, "CALL admin.migrate('prod_db');");

    let findings = Engine::new().validate(&Script::new("proc.sql", MIGRATION_PROC));
    assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
}

#[test]
fn test_recursive_cte_true_positive_and_negative() {
    let bad = "WITH RECURSIVE r AS (SELECT 1 AS n UNION ALL SELECT DISTINCT n+1 FROM r WHERE n<5) SELECT * FROM r;";
    let good = "WITH RECURSIVE r AS (SELECT DISTINCT 1 AS n UNION ALL SELECT n+1 FROM r WHERE n<5) SELECT * FROM r;";
    let engine = Engine::new();

    let f = engine.validate(&Script::new("bad.sql", bad));
    assert_eq!(codes(&f), vec![RuleCode::RecursiveCteDistinct]);
    assert_eq!(f[0].severity, Severity::Error);

    let f = engine.validate(&Script::new("good.sql", good));
    assert!(f.iter().all(|x| x.code != RuleCode::RecursiveCteDistinct));
}

#[test]
fn test_catalog_column_names_correction() {
    let sql = "SELECT referencing_schema_name FROM snowflake.account_usage.object_dependencies;";
    let f = Engine::new().validate(&Script::new("deps.sql", sql));
    assert_eq!(codes(&f), vec![RuleCode::CatalogColumn]);
    assert!(f[0].detail.contains("REFERENCING_SCHEMA"));
}

#[test]
fn test_unterminated_body_surfaces_as_error() {
    let sql = "CREATE PROCEDURE p() AS $$\nBEGIN RETURN 1; END;\nSELECT 1;";
    let f = Engine::new().validate(&Script::new("broken.sql", sql));
    assert!(f
        .iter()
        .any(|x| x.code == RuleCode::UnterminatedBody && x.severity == Severity::Error));
}

#[test]
fn test_stray_quote_is_error_and_later_statements_still_checked() {
    let sql = "SELECT 'open;\nSELECT 1;\nCREATE TABLE t (a INT);\nSELECT 2;\n";
    assert_eq!(split(sql).statements.len(), 4);

    let f = Engine::new().validate(&Script::new("stray.sql", sql));
    assert_eq!(
        codes(&f),
        vec![
            RuleCode::UnbalancedQuote,
            RuleCode::UnterminatedLiteral,
            RuleCode::UncheckedStatement
        ]
    );
    assert_eq!(f[1].severity, Severity::Error);
    assert_eq!(f[2].location, Some(Location::Statement(3)));
}

#[test]
fn test_fault_isolation_across_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a_clean.sql"), "SELECT 1;\n").unwrap();
    fs::write(
        root.join("b_warn.sql"),
        "SELECT * FROM IDENTIFIER(my_table);\nSELECT 'multi\nline' AS x;\n",
    )
    .unwrap();
    let paths = vec![
        root.join("a_clean.sql"),
        root.join("missing.sql"),
        root.join("b_warn.sql"),
    ];

    let report = Engine::new().validate_all(root, &paths);
    assert_eq!(report.files(), ["a_clean.sql", "missing.sql", "b_warn.sql"]);

    let unreadable: Vec<_> = report
        .findings()
        .iter()
        .filter(|f| f.code == RuleCode::FileUnreadable)
        .collect();
    assert_eq!(unreadable.len(), 1);
    assert_eq!(unreadable[0].file, "missing.sql");
    assert_eq!(report.findings_for("missing.sql").count(), 1);

    assert_eq!(report.findings_for("a_clean.sql").count(), 0);
    let warn_codes: Vec<_> = report.findings_for("b_warn.sql").map(|f| f.code).collect();
    assert_eq!(
        warn_codes,
        vec![
            RuleCode::IdentifierArgument,
            RuleCode::UnbalancedQuote,
            RuleCode::UnbalancedQuote
        ]
    );

    let s = report.summary();
    assert_eq!((s.errors, s.warnings, s.files), (1, 3, 3));
    assert!(!report.passed());
    assert!(report.file_passed("b_warn.sql"));
}

#[test]
fn test_only_warnings_pass() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("w.sql"), "SELECT * FROM SPLIT_TO_TABLE('a,b', ',');\n").unwrap();
    let report = Engine::new().validate_all(root, &[root.join("w.sql")]);
    assert_eq!(report.summary().warnings, 2);
    assert!(report.passed());
}

#[test]
fn test_report_order_is_reproducible() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let mut paths = Vec::new();
    for i in 0..16 {
        let p = root.join(format!("s{:02}.sql", i));
        fs::write(&p, format!("SELECT * FROM IDENTIFIER(t{});\nUPDATE t SET a = {};\n", i, i)).unwrap();
        paths.push(p);
    }
    let engine = Engine::new();
    let first = engine.validate_all(root, &paths);
    let second = engine.validate_all(root, &paths);
    assert_eq!(first.findings(), second.findings());
    assert_eq!(first.findings()[0].file, "s00.sql");
    assert_eq!(first.summary().unchecked, 16);
}
