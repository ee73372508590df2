use anyhow::Result;
use db_adapter::naming::normalize_table;
use rstest::rstest;

const NAMESPACED_FORMAT: &str = "\"db_adapter\".\"tbl_{table_name}\"";

#[rstest]
#[case::prefix("django_site", "tbl_{table_name}", "tbl_django_site")]
#[case::suffix("django_site", "{table_name}_tbl", "django_site_tbl")]
#[case::namespace("django_site", "\"db_adapter\".\"{table_name}\"", "\"db_adapter\".\"django_site\"")]
#[case::already_prefixed("tbl_django_site", "tbl_{table_name}", "tbl_django_site")]
#[case::already_suffixed("django_site_tbl", "{table_name}_tbl", "django_site_tbl")]
#[case::already_namespaced(
    "\"db_adapter\".\"django_site\"",
    "\"db_adapter\".\"{table_name}\"",
    "\"db_adapter\".\"django_site\""
)]
#[case::adds_namespace("tbl_django_site", NAMESPACED_FORMAT, "\"db_adapter\".\"tbl_django_site\"")]
#[case::own_namespace_wins("\"hr\".\"employee\"", NAMESPACED_FORMAT, "\"hr\".\"tbl_employee\"")]
#[case::empty_format("django_site", "", "django_site")]
fn test_normalize_table(
    #[case] db_table: &str,
    #[case] format: &str,
    #[case] expected: &str,
) -> Result<()> {
    assert_eq!(normalize_table(db_table, format, &[])?, expected);
    Ok(())
}

#[rstest]
#[case::excluded_by_namespace("\"admin\".\"django_site\"", "\"admin\".\"django_site\"")]
#[case::excluded_by_prefix("adt_report", "adt_report")]
#[case::excluded_by_name("django_migrations", "django_migrations")]
#[case::excluded_ignoring_case("ADT_REPORT", "ADT_REPORT")]
#[case::already_formatted_ignoring_case("TBL_SESSION", "\"db_adapter\".\"TBL_SESSION\"")]
#[case::included("django_session", "\"db_adapter\".\"tbl_django_session\"")]
fn test_normalize_with_exclusions(#[case] db_table: &str, #[case] expected: &str) -> Result<()> {
    let exclude = vec![
        "\"{}\".\"{}\"".to_string(),
        "adt_{}".to_string(),
        "django_migrations".to_string(),
    ];
    assert_eq!(normalize_table(db_table, NAMESPACED_FORMAT, &exclude)?, expected);
    Ok(())
}

#[test]
fn test_normalize_is_idempotent() -> Result<()> {
    let once = normalize_table("django_session", NAMESPACED_FORMAT, &[])?;
    assert_eq!(normalize_table(&once, NAMESPACED_FORMAT, &[])?, once);
    Ok(())
}
