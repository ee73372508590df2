/// CLI integration tests
///
/// These run the built binary against a temporary project with
/// `assert_cmd`:
/// ```rust
/// fixture.command()
///     .args(["sqlmigrateall", "out"])
///     .assert()
///     .success();
/// ```
pub mod settings;
