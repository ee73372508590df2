use crate::helpers::project::ProjectFixture;
use anyhow::Result;
use predicates::prelude::*;

#[test]
fn test_settings_list_defaults() -> Result<()> {
    let fixture = ProjectFixture::new()?;

    fixture
        .command()
        .args(["settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DEFAULT_SEQUENCE_NAME: '{table}_sq'"))
        .stdout(predicate::str::contains("ENABLE_DB_TABLE_NORMALIZATION: true"));
    Ok(())
}

#[test]
fn test_settings_get_with_overrides() -> Result<()> {
    let fixture = ProjectFixture::new()?;
    fixture.write_config("DB_ADAPTER:\n  DEFAULT_ROLE_NAME: rl_file\n")?;

    fixture
        .command()
        .args(["settings", "get", "DEFAULT_ROLE_NAME", "--format", "json"])
        .assert()
        .success()
        .stdout("\"rl_file\"\n");

    fixture
        .command()
        .args(["settings", "get", "DEFAULT_ROLE_NAME", "--format", "json", "--role", "rl_cli"])
        .assert()
        .success()
        .stdout("\"rl_cli\"\n");
    Ok(())
}

#[test]
fn test_settings_unknown_key() -> Result<()> {
    let fixture = ProjectFixture::new()?;

    fixture
        .command()
        .args(["settings", "get", "NOT_A_SETTING"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid setting: 'NOT_A_SETTING'"));
    Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
    let fixture = ProjectFixture::new()?;
    fixture.write_config("DB_ADAPTER:\n  NOT_AN_OPTION: 1\n")?;

    fixture
        .command()
        .args(["settings"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
    Ok(())
}
