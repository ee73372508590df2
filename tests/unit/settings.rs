use anyhow::Result;
use db_adapter::AdapterError;
use db_adapter::config::{self, ConfigBuilder, SettingValue, Settings, SettingsArgs};
use db_adapter::naming::{NameBuilder, NameBuilderRegistry, ObjectType};
use std::fs;
use tempfile::TempDir;

/// Upper-cases every object name
struct ShoutingNameBuilder;

impl NameBuilder for ShoutingNameBuilder {
    fn build(
        &self,
        db_table: &str,
        columns: &[&str],
        object_type: ObjectType,
        qualifier: &str,
        _include_namespace: bool,
    ) -> db_adapter::Result<String> {
        let name = format!("{}_{}{}_{}", db_table, columns.join("_"), qualifier, object_type);
        Ok(name.to_uppercase())
    }
}

fn shouting_factory(_settings: &Settings) -> db_adapter::Result<Box<dyn NameBuilder>> {
    Ok(Box::new(ShoutingNameBuilder))
}

#[test]
fn test_file_then_cli_layering() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("db_adapter.yaml");
    fs::write(
        &config_path,
        r#"
INSTALLED_APPS: [tests]
DB_ADAPTER:
  DEFAULT_DB_TABLE_FORMAT: "tbl_{table_name}"
  DEFAULT_ROLE_NAME: rl_file
  CHECK_QUALIFIERS:
    boolean: _b
"#,
    )?;

    let (file_input, root_dir) = config::load_config(config_path.to_str().unwrap())?;
    assert_eq!(root_dir, temp_dir.path());

    let cli_args = SettingsArgs {
        role: Some("rl_cli".to_string()),
        ..Default::default()
    };
    let settings = ConfigBuilder::new()
        .with_file(file_input)
        .with_cli_args(cli_args.into())
        .resolve();

    assert_eq!(settings.db_table_format(), "tbl_{table_name}");
    assert_eq!(settings.role_name(), "rl_cli");
    assert_eq!(settings.check_qualifier(Some(config::CheckCategory::Boolean)), "_b");
    assert_eq!(settings.check_qualifier(Some(config::CheckCategory::NotNull)), "_nn");
    Ok(())
}

#[test]
fn test_missing_config_file_uses_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("absent.yaml");
    let (input, _) = config::load_config(path.to_str().unwrap())?;
    let settings = ConfigBuilder::new().with_file(input).resolve();
    assert_eq!(settings.get("DEFAULT_SEQUENCE_NAME")?, SettingValue::Str("{table}_sq".to_string()));
    Ok(())
}

#[test]
fn test_custom_builder_by_path() -> Result<()> {
    let registry =
        NameBuilderRegistry::default().with("tests::ShoutingNameBuilder", shouting_factory);
    let input = config::parse_settings("DB_ADAPTER:\n  DEFAULT_NAME_BUILDER_CLASS: tests::ShoutingNameBuilder\n")?;
    let settings = ConfigBuilder::new()
        .with_file(input)
        .with_registry(registry)
        .resolve();

    let builder = settings.make_name_builder()?;
    assert_eq!(
        builder.build("tbl_post", &["id"], ObjectType::PrimaryKey, "", false)?,
        "TBL_POST_ID_PRIMARY_KEY"
    );
    Ok(())
}

#[test]
fn test_unregistered_builder_path_fails() -> Result<()> {
    let input = config::parse_settings("DB_ADAPTER:\n  DEFAULT_NAME_BUILDER_CLASS: module.package.attribute\n")?;
    let settings = ConfigBuilder::new().with_file(input).resolve();

    let err = settings.make_name_builder().err().expect("unresolved builder");
    assert!(matches!(
        err,
        AdapterError::UnresolvedBuilder { ref path } if path == "module.package.attribute"
    ));
    Ok(())
}
