use anyhow::Result;
use db_adapter::naming::{Template, TableIdentifier};
use rstest::rstest;

#[rstest]
#[case::plain("django_migrations", "", "", "django_migrations", "django_migrations")]
#[case::namespaced("\"db_adapter\".\"auth_user\"", "", "db_adapter", "auth_user", "auth_user")]
#[case::suffix_format(
    "\"db_adapter\".\"django_session_tbl\"",
    "{table_name}_tbl",
    "db_adapter",
    "django_session_tbl",
    "django_session"
)]
#[case::namespaced_format(
    "tbl_django_site",
    "\"db_adapter\".\"tbl_{table_name}\"",
    "",
    "tbl_django_site",
    "django_site"
)]
#[case::no_match("auth_user", "tbl_{table_name}", "", "auth_user", "auth_user")]
fn test_split_table_identifiers(
    #[case] db_table: &str,
    #[case] format: &str,
    #[case] namespace: &str,
    #[case] table: &str,
    #[case] table_name: &str,
) -> Result<()> {
    let parts = TableIdentifier::parse(db_table, format)?;
    assert_eq!(parts.namespace, namespace);
    assert_eq!(parts.table, table);
    assert_eq!(parts.table_name, table_name);
    Ok(())
}

#[test]
fn test_extra_captures_are_kept() -> Result<()> {
    let parts = TableIdentifier::parse("hr_employee", "{module}_{table_name}")?;
    assert_eq!(parts.table_name, "employee");
    assert_eq!(parts.extra.get("module"), Some("hr"));
    Ok(())
}

#[rstest]
#[case::prefix("tbl_{table_name}", "tbl_django_site", Some("django_site"))]
#[case::suffix("{table_name}_tbl", "django_site_tbl", Some("django_site"))]
#[case::literal("django_migrations", "django_migrations", Some(""))]
#[case::upper_case_prefix("tbl_{table_name}", "TBL_DJANGO_SITE", Some("DJANGO_SITE"))]
#[case::prefix_mismatch("tbl_{table_name}", "django_site", None)]
#[case::empty_capture("tbl_{table_name}", "tbl_", None)]
fn test_template_matches(
    #[case] pattern: &str,
    #[case] text: &str,
    #[case] table_name: Option<&str>,
) -> Result<()> {
    let captures = Template::parse(pattern)?.matches(text);
    match table_name {
        Some("") => assert!(captures.is_some()),
        Some(expected) => assert_eq!(
            captures
                .and_then(|c| c.get("table_name").map(str::to_string))
                .as_deref(),
            Some(expected)
        ),
        None => assert!(captures.is_none()),
    }
    Ok(())
}

#[test]
fn test_anonymous_placeholders_match_any_run() -> Result<()> {
    let template = Template::parse("\"{}\".\"{}\"")?;
    assert!(template.matches("\"admin\".\"django_site\"").is_some());
    assert!(template.matches("django_site").is_none());
    Ok(())
}
