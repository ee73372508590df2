//! Backend profiles: data types, checks, integer ranges and SQL templates

use crate::error::Result;
use crate::model::{Field, FieldType};
use crate::naming::{Template, TemplateValues};
use crate::render::QuoteStyle;
use std::collections::BTreeMap;

/// DDL templates; placeholders use `{name}` syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTemplates {
    pub create_table: String,
    pub create_check: String,
    pub create_pk: String,
    pub create_fk: String,
    pub create_unique: String,
    pub create_index: String,
    pub comment_on_column: String,
    pub grant: String,
    /// Absent on backends with native autoincrement
    pub create_sequence: Option<String>,
    pub create_trigger: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BackendProfile {
    pub name: String,
    pub quote_style: QuoteStyle,
    pub deferrable_sql: String,
    pub implied_column_null: bool,
    pub can_rollback_ddl: bool,
    pub data_types: BTreeMap<FieldType, String>,
    /// Value-range check expressions over `{qn_column}`
    pub check_constraints: BTreeMap<FieldType, String>,
    pub integer_ranges: BTreeMap<FieldType, (i128, i128)>,
    pub templates: SqlTemplates,
    pub sql_ending: String,
    pub column_separator: String,
}

const NUMBER_11_MAX: i128 = 99_999_999_999;
const NUMBER_19_MAX: i128 = 9_999_999_999_999_999_999;

fn data_types() -> BTreeMap<FieldType, String> {
    [
        (FieldType::AutoField, "NUMBER(11)"),
        (FieldType::BigAutoField, "NUMBER(19)"),
        (FieldType::BinaryField, "BLOB"),
        (FieldType::BooleanField, "NUMBER(1)"),
        (FieldType::NullBooleanField, "NUMBER(1)"),
        (FieldType::CharField, "NVARCHAR2({max_length})"),
        (FieldType::DateField, "DATE"),
        (FieldType::DateTimeField, "TIMESTAMP"),
        (FieldType::DecimalField, "NUMBER({max_digits}, {decimal_places})"),
        (FieldType::DurationField, "INTERVAL DAY(9) TO SECOND(6)"),
        (FieldType::FileField, "NVARCHAR2({max_length})"),
        (FieldType::FilePathField, "NVARCHAR2({max_length})"),
        (FieldType::FloatField, "DOUBLE PRECISION"),
        (FieldType::IntegerField, "NUMBER(11)"),
        (FieldType::JsonField, "NCLOB"),
        (FieldType::BigIntegerField, "NUMBER(19)"),
        (FieldType::IpAddressField, "VARCHAR2(15)"),
        (FieldType::GenericIpAddressField, "VARCHAR2(39)"),
        (FieldType::PositiveBigIntegerField, "NUMBER(19)"),
        (FieldType::PositiveIntegerField, "NUMBER(11)"),
        (FieldType::PositiveSmallIntegerField, "NUMBER(11)"),
        (FieldType::SlugField, "NVARCHAR2({max_length})"),
        (FieldType::SmallAutoField, "NUMBER(5)"),
        (FieldType::SmallIntegerField, "NUMBER(11)"),
        (FieldType::TextField, "NCLOB"),
        (FieldType::TimeField, "TIMESTAMP"),
        (FieldType::UrlField, "VARCHAR2({max_length})"),
        (FieldType::UuidField, "VARCHAR2(32)"),
    ]
    .into_iter()
    .map(|(field_type, sql)| (field_type, sql.to_string()))
    .collect()
}

fn check_constraints() -> BTreeMap<FieldType, String> {
    [
        (FieldType::BooleanField, "{qn_column} IN (0,1)"),
        (FieldType::NullBooleanField, "{qn_column} IN (0,1)"),
        (FieldType::PositiveBigIntegerField, "{qn_column} >= 0"),
        (FieldType::PositiveIntegerField, "{qn_column} >= 0"),
        (FieldType::PositiveSmallIntegerField, "{qn_column} >= 0"),
    ]
    .into_iter()
    .map(|(field_type, sql)| (field_type, sql.to_string()))
    .collect()
}

fn integer_ranges() -> BTreeMap<FieldType, (i128, i128)> {
    BTreeMap::from([
        (FieldType::SmallIntegerField, (-NUMBER_11_MAX, NUMBER_11_MAX)),
        (FieldType::IntegerField, (-NUMBER_11_MAX, NUMBER_11_MAX)),
        (FieldType::BigIntegerField, (-NUMBER_19_MAX, NUMBER_19_MAX)),
        (FieldType::PositiveBigIntegerField, (0, NUMBER_19_MAX)),
        (FieldType::PositiveSmallIntegerField, (0, NUMBER_11_MAX)),
        (FieldType::PositiveIntegerField, (0, NUMBER_11_MAX)),
        (FieldType::SmallAutoField, (-99_999, 99_999)),
        (FieldType::AutoField, (-NUMBER_11_MAX, NUMBER_11_MAX)),
        (FieldType::BigAutoField, (-NUMBER_19_MAX, NUMBER_19_MAX)),
    ])
}

impl BackendProfile {
    /// Oracle: sequence and trigger autoincrement emulation, no transactional DDL
    pub fn oracle() -> Self {
        let mut integer_ranges = integer_ranges();
        integer_ranges.insert(FieldType::AutoField, (1, NUMBER_11_MAX));
        integer_ranges.insert(FieldType::BigAutoField, (1, NUMBER_19_MAX));

        Self {
            name: "oracle".to_string(),
            quote_style: QuoteStyle::Oracle,
            deferrable_sql: " DEFERRABLE INITIALLY DEFERRED".to_string(),
            implied_column_null: true,
            can_rollback_ddl: false,
            data_types: data_types(),
            check_constraints: check_constraints(),
            integer_ranges,
            templates: SqlTemplates {
                create_table: "CREATE TABLE {table} (\n    {definition}\n)".to_string(),
                create_check: "ALTER TABLE {table}\n    ADD CONSTRAINT {name}\n    CHECK ({check})".to_string(),
                create_pk: "ALTER TABLE {table}\n    ADD CONSTRAINT {name}\n    PRIMARY KEY ({columns})".to_string(),
                create_fk: "ALTER TABLE {table}\n    ADD CONSTRAINT {name} FOREIGN KEY ({column})\n    REFERENCES {to_table} ({to_column}){deferrable}".to_string(),
                create_unique: "ALTER TABLE {table}\n    ADD CONSTRAINT {name}\n    UNIQUE ({columns})".to_string(),
                create_index: "CREATE INDEX {name}\n    ON {table} ({columns})".to_string(),
                comment_on_column: "COMMENT ON COLUMN {table}.{column}\n    IS '{comment}'".to_string(),
                grant: "GRANT {privileges}\n    ON {name}\n    TO {role}".to_string(),
                create_sequence: Some(
                    "CREATE SEQUENCE {sq_name}\n    MINVALUE 1\n    MAXVALUE {sq_max_value}\n    START WITH 1\n    INCREMENT BY 1\n    CACHE 20"
                        .to_string(),
                ),
                create_trigger: Some(
                    "CREATE OR REPLACE TRIGGER {tr_name}\nBEFORE INSERT ON {tbl_name}\nFOR EACH ROW\nWHEN (new.{col_name} IS NULL)\n    BEGIN\n        SELECT {sq_name}.nextval\n        INTO :new.{col_name} FROM dual;\n    END"
                        .to_string(),
                ),
            },
            sql_ending: ";\n/\n".to_string(),
            column_separator: ",\n    ".to_string(),
        }
    }

    /// Single-line templates over a backend with native autoincrement
    pub fn generic() -> Self {
        Self {
            name: "generic".to_string(),
            quote_style: QuoteStyle::Identity,
            deferrable_sql: " DEFERRABLE INITIALLY DEFERRED".to_string(),
            implied_column_null: false,
            can_rollback_ddl: true,
            data_types: data_types(),
            check_constraints: check_constraints(),
            integer_ranges: integer_ranges(),
            templates: SqlTemplates {
                create_table: "CREATE TABLE {table} ({definition})".to_string(),
                create_check: "ALTER TABLE {table} ADD CONSTRAINT {name} CHECK ({check})".to_string(),
                create_pk: "ALTER TABLE {table} ADD CONSTRAINT {name} PRIMARY KEY ({columns})".to_string(),
                create_fk: "ALTER TABLE {table} ADD CONSTRAINT {name} FOREIGN KEY ({column}) REFERENCES {to_table} ({to_column}){deferrable}".to_string(),
                create_unique: "ALTER TABLE {table} ADD CONSTRAINT {name} UNIQUE ({columns})".to_string(),
                create_index: "CREATE INDEX {name} ON {table} ({columns})".to_string(),
                comment_on_column: "COMMENT ON COLUMN {table}.{column} IS '{comment}'".to_string(),
                grant: "GRANT {privileges} ON {name} TO {role}".to_string(),
                create_sequence: None,
                create_trigger: None,
            },
            sql_ending: ";".to_string(),
            column_separator: ", ".to_string(),
        }
    }

    /// Look a profile up by name
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "oracle" => Some(Self::oracle()),
            "generic" => Some(Self::generic()),
            _ => None,
        }
    }

    /// Column type of `field`, with parameters taken from `params_from`.
    ///
    /// Relation columns pass the referenced field as `params_from`. `None`
    /// means the type has no column on this backend.
    pub fn db_type(&self, field_type: FieldType, params_from: &Field) -> Result<Option<String>> {
        let Some(template) = self.data_types.get(&field_type) else {
            return Ok(None);
        };
        let mut values = TemplateValues::new();
        if let Some(max_length) = params_from.max_length {
            values.insert("max_length", max_length.to_string());
        }
        if let Some(max_digits) = params_from.max_digits {
            values.insert("max_digits", max_digits.to_string());
        }
        if let Some(decimal_places) = params_from.decimal_places {
            values.insert("decimal_places", decimal_places.to_string());
        }
        Template::parse(template)?.render(&values).map(Some)
    }

    /// Value-range check for a column of `field_type`, over the quoted column
    pub fn check_constraint(
        &self,
        field_type: FieldType,
        qn_column: &str,
    ) -> Result<Option<String>> {
        self.check_constraints
            .get(&field_type)
            .map(|template| {
                Template::parse(template)?
                    .render(&TemplateValues::new().with("qn_column", qn_column))
            })
            .transpose()
    }

    pub fn integer_range(&self, field_type: FieldType) -> Option<(i128, i128)> {
        self.integer_ranges.get(&field_type).copied()
    }

    /// Whether autoincrement is emulated with a sequence and trigger
    pub fn emulates_autoincrement(&self) -> bool {
        self.templates.create_sequence.is_some() || self.templates.create_trigger.is_some()
    }
}
