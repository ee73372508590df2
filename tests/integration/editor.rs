//! Schema editor tests against the generic backend profile

use crate::helpers::models::{
    article, author, create_model_sql, post, registry, settings, square, tag, with_role,
};
use anyhow::Result;
use db_adapter::AdapterError;
use db_adapter::backend::{BackendProfile, RecordingConnection};
use db_adapter::config::{Settings, SettingsInput};
use db_adapter::model::{Model, ModelRegistry};
use db_adapter::schema::{DeferredCategory, EditorState, SchemaEditor};
use insta::assert_snapshot;
use rstest::rstest;
use std::sync::Arc;

/// Collected SQL of creating `model` next to the models it references
fn create_sql_for(settings: Arc<Settings>, model: Model) -> Result<Vec<String>> {
    let profile = BackendProfile::generic();
    let db_table = model.db_table.clone();
    let mut registry = ModelRegistry::new();
    registry.register_all([author(), tag(), model], &settings)?;
    let mut connection = RecordingConnection::new(&profile);
    let mut editor =
        SchemaEditor::new(&mut connection, &profile, &registry, settings)?.collect_sql();
    editor.create_model_for_table(&db_table)?;
    editor.finish()?;
    Ok(editor.into_collected_sql())
}

mod statement_helpers {
    use super::*;

    #[test]
    fn test_create_primary_key_sql() -> Result<()> {
        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput::default());
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        let editor = SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;

        let author = registry.by_table("tbl_author")?;
        let sql = editor.create_primary_key_sql(author, author.field("id")?)?;
        assert_eq!(sql, "ALTER TABLE tbl_author ADD CONSTRAINT tbl_author_id_pk PRIMARY KEY (id)");
        Ok(())
    }

    #[test]
    fn test_create_fk_sql() -> Result<()> {
        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput::default());
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        let editor = SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;

        let post = registry.by_table("tbl_post")?;
        let sql = editor.create_fk_sql(post, post.field("author")?)?;
        assert_eq!(
            sql,
            "ALTER TABLE tbl_post ADD CONSTRAINT tbl_post_written_by_fk FOREIGN KEY (written_by) REFERENCES tbl_author (id) DEFERRABLE INITIALLY DEFERRED"
        );
        Ok(())
    }

    #[test]
    fn test_create_unique_sql() -> Result<()> {
        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput::default());
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        let editor = SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;

        let tag = registry.by_table("tbl_tag")?;
        let fields = tag.enforce_model_fields(&["name"])?;
        let sql = editor.create_unique_sql(tag, &fields)?;
        assert_eq!(sql, "ALTER TABLE tbl_tag ADD CONSTRAINT tbl_tag_name_uniq UNIQUE (name)");
        Ok(())
    }

    #[test]
    fn test_create_index_sql() -> Result<()> {
        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput::default());
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        let editor = SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;

        let post = registry.by_table("tbl_post")?;
        let sql = editor.create_index_sql(post, &[post.field("author")?], None)?;
        assert_eq!(sql, "CREATE INDEX tbl_post_written_by_idx ON tbl_post (written_by)");
        Ok(())
    }

    #[test]
    fn test_unknown_column_is_a_lookup_miss() -> Result<()> {
        let settings = settings(SettingsInput::default());
        let registry = registry(&settings)?;
        let post = registry.by_table("tbl_post")?;

        let err = post.enforce_model_fields(&["tag_id", "missing"]).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::FieldNotFound { ref column, .. } if column == "missing"
        ));
        assert!(err.is_lookup_miss());
        Ok(())
    }
}

mod column_sql {
    use super::*;

    /// Column definition of `field` plus the deferred statements it queued
    fn column(
        db_table: &str,
        field: &str,
    ) -> Result<(String, Vec<(DeferredCategory, Vec<String>)>)> {
        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput::default());
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        let mut editor = SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;

        let model = registry.by_table(db_table)?;
        let (sql, params) = editor
            .column_sql(model, model.field(field)?)?
            .expect("field has a column");
        assert!(params.is_empty());

        let deferred = DeferredCategory::ALL
            .into_iter()
            .map(|category| (category, editor.deferred_column_sql().get(category).to_vec()))
            .filter(|(_, statements)| !statements.is_empty())
            .collect();
        Ok((sql, deferred))
    }

    #[test]
    fn test_null_field() -> Result<()> {
        let (sql, deferred) = column("tbl_post", "name")?;
        assert_eq!(sql, "NVARCHAR2(30) NULL");
        assert!(deferred.is_empty());
        Ok(())
    }

    #[test]
    fn test_not_null_field() -> Result<()> {
        let (sql, deferred) = column("tbl_post", "text")?;
        assert_eq!(sql, "NCLOB");
        assert_eq!(
            deferred,
            vec![(
                DeferredCategory::Check,
                vec!["ALTER TABLE tbl_post ADD CONSTRAINT tbl_post_text_nn_check CHECK (text IS NOT NULL)".to_string()]
            )]
        );
        Ok(())
    }

    #[test]
    fn test_primary_key_field() -> Result<()> {
        let (sql, deferred) = column("tbl_post", "id")?;
        assert_eq!(sql, "NUMBER(11)");
        assert_eq!(
            deferred,
            vec![
                (
                    DeferredCategory::PrimaryKey,
                    vec!["ALTER TABLE tbl_post ADD CONSTRAINT tbl_post_id_pk PRIMARY KEY (id)".to_string()]
                ),
                (
                    DeferredCategory::Check,
                    vec!["ALTER TABLE tbl_post ADD CONSTRAINT tbl_post_id_nn_check CHECK (id IS NOT NULL)".to_string()]
                ),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_foreign_key_field() -> Result<()> {
        let (sql, deferred) = column("tbl_post", "tag")?;
        assert_eq!(sql, "NUMBER(11) NULL");
        assert_eq!(
            deferred,
            vec![(
                DeferredCategory::ForeignKey,
                vec!["ALTER TABLE tbl_post ADD CONSTRAINT tbl_post_tag_id_fk FOREIGN KEY (tag_id) REFERENCES tbl_tag (id) DEFERRABLE INITIALLY DEFERRED".to_string()]
            )]
        );
        Ok(())
    }

    #[test]
    fn test_unique_field() -> Result<()> {
        let (sql, deferred) = column("tbl_tag", "name")?;
        assert_eq!(sql, "NVARCHAR2(100)");
        assert_eq!(
            deferred,
            vec![
                (
                    DeferredCategory::Unique,
                    vec!["ALTER TABLE tbl_tag ADD CONSTRAINT tbl_tag_name_uniq UNIQUE (name)".to_string()]
                ),
                (
                    DeferredCategory::Check,
                    vec!["ALTER TABLE tbl_tag ADD CONSTRAINT tbl_tag_name_nn_check CHECK (name IS NOT NULL)".to_string()]
                ),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_value_range_check() -> Result<()> {
        let (sql, deferred) = column("tbl_square", "side")?;
        assert_eq!(sql, "NUMBER(11) NULL");
        assert_eq!(
            deferred,
            vec![(
                DeferredCategory::Check,
                vec!["ALTER TABLE tbl_square ADD CONSTRAINT tbl_square_side_gte_check CHECK (side >= 0)".to_string()]
            )]
        );
        Ok(())
    }

    #[test]
    fn test_help_text_comment() -> Result<()> {
        let (sql, deferred) = column("tbl_tag", "description")?;
        assert_eq!(sql, "NCLOB NULL");
        assert_eq!(
            deferred,
            vec![(
                DeferredCategory::Comment,
                vec!["COMMENT ON COLUMN tbl_tag.description IS 'Optional description for tag'".to_string()]
            )]
        );
        Ok(())
    }
}

mod table_sql {
    use super::*;

    #[test]
    fn test_table_sql() -> Result<()> {
        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput::default());
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        let mut editor = SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;

        let (sql, _) = editor.table_sql(registry.by_table("tbl_article")?)?;
        assert_eq!(
            sql,
            "CREATE TABLE tbl_article (article_id NUMBER(19), name NVARCHAR2(30), text NCLOB NULL, active NUMBER(1) NULL, written_by NUMBER(11) NULL, tag_id NUMBER(11) NULL)"
        );
        assert_eq!(editor.state(), EditorState::ColumnsProcessed);

        let table = editor.deferred_table_sql();
        assert_eq!(
            table.get(DeferredCategory::Unique),
            ["ALTER TABLE tbl_article ADD CONSTRAINT tbl_article_written_by_name_uniq UNIQUE (written_by, name)"]
        );
        assert_eq!(
            table.get(DeferredCategory::Index),
            ["CREATE INDEX tbl_article_tag_id_idx ON tbl_article (tag_id)"]
        );
        assert!(table.get(DeferredCategory::Control).is_empty());
        Ok(())
    }

    #[test]
    fn test_table_grant_with_role() -> Result<()> {
        let profile = BackendProfile::generic();
        let settings = settings(with_role("rl_tests"));
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        let mut editor = SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;

        editor.table_sql(registry.by_table("tbl_tag")?)?;
        assert_eq!(
            editor.deferred_table_sql().get(DeferredCategory::Control),
            ["GRANT SELECT, INSERT, UPDATE, DELETE ON tbl_tag TO rl_tests"]
        );
        Ok(())
    }

    #[test]
    fn test_unknown_unique_together_reference() -> Result<()> {
        let model = square().with_unique_together(&["side", "missing"]);
        let err = create_sql_for(settings(SettingsInput::default()), model).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AdapterError>(),
            Some(AdapterError::FieldNotFound { column, .. }) if column == "missing"
        ));
        Ok(())
    }

    #[test]
    fn test_unknown_index_reference() -> Result<()> {
        let model = square().with_index(&["side", "area"]);
        let err = create_sql_for(settings(SettingsInput::default()), model).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AdapterError>(),
            Some(AdapterError::FieldNotFound { column, .. }) if column == "area"
        ));
        Ok(())
    }
}

mod create_model {
    use super::*;

    // Category of a generic statement, `None` for the CREATE TABLE itself
    fn category(statement: &str) -> Option<DeferredCategory> {
        if statement.starts_with("CREATE TABLE") {
            None
        } else if statement.starts_with("COMMENT ON") {
            Some(DeferredCategory::Comment)
        } else if statement.starts_with("CREATE INDEX") {
            Some(DeferredCategory::Index)
        } else if statement.starts_with("GRANT") {
            Some(DeferredCategory::Control)
        } else if statement.contains("FOREIGN KEY") {
            Some(DeferredCategory::ForeignKey)
        } else if statement.contains("PRIMARY KEY") {
            Some(DeferredCategory::PrimaryKey)
        } else if statement.contains(" UNIQUE (") {
            Some(DeferredCategory::Unique)
        } else {
            Some(DeferredCategory::Check)
        }
    }

    fn reordered_settings() -> Arc<Settings> {
        settings(SettingsInput {
            deferred_sql_order: Some(vec![
                DeferredCategory::Comment,
                DeferredCategory::Index,
                DeferredCategory::Check,
                DeferredCategory::ForeignKey,
                DeferredCategory::Unique,
                DeferredCategory::PrimaryKey,
                DeferredCategory::Control,
                DeferredCategory::Autoincrement,
            ]),
            default_role_name: Some("rl_tests".to_string()),
            ..Default::default()
        })
    }

    #[rstest]
    #[case::declared_order(false)]
    #[case::reversed_fields(true)]
    fn test_category_boundaries_ignore_field_order(#[case] reversed: bool) -> Result<()> {
        let mut model = article();
        if reversed {
            model.fields.reverse();
        }
        let sql = create_sql_for(reordered_settings(), model)?;

        let mut categories: Vec<Option<DeferredCategory>> =
            sql.iter().map(|s| category(s)).collect();
        categories.dedup();
        assert_eq!(
            categories,
            vec![
                None,
                Some(DeferredCategory::Comment),
                Some(DeferredCategory::Index),
                Some(DeferredCategory::Check),
                Some(DeferredCategory::ForeignKey),
                Some(DeferredCategory::Unique),
                Some(DeferredCategory::PrimaryKey),
                Some(DeferredCategory::Control),
            ]
        );

        // Same deferred statements whatever the field order
        let mut deferred = sql[1..].to_vec();
        deferred.sort();
        let mut declared = create_sql_for(reordered_settings(), article())?.split_off(1);
        declared.sort();
        assert_eq!(deferred, declared);
        Ok(())
    }

    #[test]
    fn test_create_model() -> Result<()> {
        let sql = create_model_sql(
            &BackendProfile::generic(),
            settings(SettingsInput::default()),
            "tbl_article",
        )?;

        assert_snapshot!(sql.join("\n"), @r"
        CREATE TABLE tbl_article (article_id NUMBER(19), name NVARCHAR2(30), text NCLOB NULL, active NUMBER(1) NULL, written_by NUMBER(11) NULL, tag_id NUMBER(11) NULL);
        ALTER TABLE tbl_article ADD CONSTRAINT tbl_article_article_id_pk PRIMARY KEY (article_id);
        ALTER TABLE tbl_article ADD CONSTRAINT tbl_article_written_by_name_uniq UNIQUE (written_by, name);
        ALTER TABLE tbl_article ADD CONSTRAINT tbl_article_written_by_fk FOREIGN KEY (written_by) REFERENCES tbl_author (id) DEFERRABLE INITIALLY DEFERRED;
        ALTER TABLE tbl_article ADD CONSTRAINT tbl_article_tag_id_fk FOREIGN KEY (tag_id) REFERENCES tbl_tag (id) DEFERRABLE INITIALLY DEFERRED;
        ALTER TABLE tbl_article ADD CONSTRAINT tbl_article_article_id_nn_check CHECK (article_id IS NOT NULL);
        ALTER TABLE tbl_article ADD CONSTRAINT tbl_article_name_nn_check CHECK (name IS NOT NULL);
        ALTER TABLE tbl_article ADD CONSTRAINT tbl_article_active_bool_check CHECK (active IN (0,1));
        CREATE INDEX tbl_article_tag_id_idx ON tbl_article (tag_id);
        COMMENT ON COLUMN tbl_article.text IS 'Article description';
        ");
        Ok(())
    }

    #[test]
    fn test_custom_deferred_order() -> Result<()> {
        let sql = create_model_sql(
            &BackendProfile::generic(),
            settings(SettingsInput {
                deferred_sql_order: Some(vec![
                    DeferredCategory::Comment,
                    DeferredCategory::Index,
                    DeferredCategory::Check,
                    DeferredCategory::ForeignKey,
                    DeferredCategory::Unique,
                    DeferredCategory::PrimaryKey,
                    DeferredCategory::Control,
                    DeferredCategory::Autoincrement,
                ]),
                ..Default::default()
            }),
            "tbl_tag",
        )?;

        assert_eq!(
            sql,
            vec![
                "CREATE TABLE tbl_tag (id NUMBER(11), name NVARCHAR2(100), description NCLOB NULL);",
                "COMMENT ON COLUMN tbl_tag.description IS 'Optional description for tag';",
                "ALTER TABLE tbl_tag ADD CONSTRAINT tbl_tag_id_nn_check CHECK (id IS NOT NULL);",
                "ALTER TABLE tbl_tag ADD CONSTRAINT tbl_tag_name_nn_check CHECK (name IS NOT NULL);",
                "ALTER TABLE tbl_tag ADD CONSTRAINT tbl_tag_name_uniq UNIQUE (name);",
                "ALTER TABLE tbl_tag ADD CONSTRAINT tbl_tag_id_pk PRIMARY KEY (id);",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_invalid_order_fails_before_executing() -> Result<()> {
        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput {
            deferred_sql_order: Some(vec![DeferredCategory::Check]),
            ..Default::default()
        });
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        {
            let mut editor =
                SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;
            let err = editor.create_model(registry.by_table("tbl_tag")?).unwrap_err();
            assert!(matches!(err, AdapterError::InvalidOrder { .. }));
        }
        assert!(connection.executed().is_empty());
        Ok(())
    }

    #[test]
    fn test_executes_table_then_deferred() -> Result<()> {
        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput::default());
        let registry = registry(&settings)?;
        let mut connection = RecordingConnection::new(&profile);
        {
            let mut editor =
                SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;
            editor.create_model(registry.by_table("tbl_square")?)?;
            assert_eq!(editor.state(), EditorState::DeferredFlushed);
            assert_eq!(editor.deferred_sql().len(), 3);
            editor.finish()?;
            assert!(editor.deferred_sql().is_empty());
        }

        assert_eq!(
            connection.statements(),
            vec![
                "CREATE TABLE tbl_square (id NUMBER(11), side NUMBER(11) NULL)",
                "ALTER TABLE tbl_square ADD CONSTRAINT tbl_square_id_pk PRIMARY KEY (id)",
                "ALTER TABLE tbl_square ADD CONSTRAINT tbl_square_id_nn_check CHECK (id IS NOT NULL)",
                "ALTER TABLE tbl_square ADD CONSTRAINT tbl_square_side_gte_check CHECK (side >= 0)",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_many_to_many_has_no_column() -> Result<()> {
        use db_adapter::model::{Field, FieldType};

        let profile = BackendProfile::generic();
        let settings = settings(SettingsInput::default());
        let mut registry = registry(&settings)?;
        let model = post()
            .with_field(Field::new("tags", FieldType::ManyToManyField).references("Tag"));
        let model = db_adapter::model::Model {
            name: "TaggedPost".to_string(),
            db_table: "tbl_tagged_post".to_string(),
            ..model
        };
        registry.register(model, &settings)?;

        let mut connection = RecordingConnection::new(&profile);
        let mut editor = SchemaEditor::new(&mut connection, &profile, &registry, settings.clone())?;
        let (sql, _) = editor.table_sql(registry.by_table("tbl_tagged_post")?)?;
        assert!(!sql.contains("tags"));
        assert_eq!(editor.deferred_column_sql().get(DeferredCategory::ForeignKey).len(), 2);
        Ok(())
    }

    #[test]
    fn test_fixture_models_build() -> Result<()> {
        for model in [article(), square(), tag()] {
            let sql = create_model_sql(
                &BackendProfile::generic(),
                settings(SettingsInput::default()),
                &model.db_table,
            )?;
            assert!(sql[0].starts_with(&format!("CREATE TABLE {} (", model.db_table)));
            assert!(sql.iter().all(|statement| statement.ends_with(';')));
        }
        Ok(())
    }
}
