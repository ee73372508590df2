use crate::config::CheckCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal field type names as declared by the ORM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum FieldType {
    AutoField,
    BigAutoField,
    SmallAutoField,
    BinaryField,
    BooleanField,
    NullBooleanField,
    CharField,
    DateField,
    DateTimeField,
    DecimalField,
    DurationField,
    FileField,
    FilePathField,
    FloatField,
    IntegerField,
    BigIntegerField,
    #[serde(rename = "IPAddressField")]
    IpAddressField,
    #[serde(rename = "GenericIPAddressField")]
    GenericIpAddressField,
    #[serde(rename = "JSONField")]
    JsonField,
    PositiveBigIntegerField,
    PositiveIntegerField,
    PositiveSmallIntegerField,
    SlugField,
    SmallIntegerField,
    TextField,
    TimeField,
    #[serde(rename = "URLField")]
    UrlField,
    #[serde(rename = "UUIDField")]
    UuidField,
    ForeignKey,
    OneToOneField,
    ManyToManyField,
}

impl FieldType {
    pub fn internal_type(&self) -> &'static str {
        match self {
            FieldType::AutoField => "AutoField",
            FieldType::BigAutoField => "BigAutoField",
            FieldType::SmallAutoField => "SmallAutoField",
            FieldType::BinaryField => "BinaryField",
            FieldType::BooleanField => "BooleanField",
            FieldType::NullBooleanField => "NullBooleanField",
            FieldType::CharField => "CharField",
            FieldType::DateField => "DateField",
            FieldType::DateTimeField => "DateTimeField",
            FieldType::DecimalField => "DecimalField",
            FieldType::DurationField => "DurationField",
            FieldType::FileField => "FileField",
            FieldType::FilePathField => "FilePathField",
            FieldType::FloatField => "FloatField",
            FieldType::IntegerField => "IntegerField",
            FieldType::BigIntegerField => "BigIntegerField",
            FieldType::IpAddressField => "IPAddressField",
            FieldType::GenericIpAddressField => "GenericIPAddressField",
            FieldType::JsonField => "JSONField",
            FieldType::PositiveBigIntegerField => "PositiveBigIntegerField",
            FieldType::PositiveIntegerField => "PositiveIntegerField",
            FieldType::PositiveSmallIntegerField => "PositiveSmallIntegerField",
            FieldType::SlugField => "SlugField",
            FieldType::SmallIntegerField => "SmallIntegerField",
            FieldType::TextField => "TextField",
            FieldType::TimeField => "TimeField",
            FieldType::UrlField => "URLField",
            FieldType::UuidField => "UUIDField",
            FieldType::ForeignKey => "ForeignKey",
            FieldType::OneToOneField => "OneToOneField",
            FieldType::ManyToManyField => "ManyToManyField",
        }
    }

    /// Auto-incrementing integer types
    pub fn is_auto(&self) -> bool {
        matches!(
            self,
            FieldType::AutoField | FieldType::BigAutoField | FieldType::SmallAutoField
        )
    }

    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            FieldType::ForeignKey | FieldType::OneToOneField | FieldType::ManyToManyField
        )
    }

    /// Many-to-many relations live in a join table, not a column
    pub fn has_column(&self) -> bool {
        !matches!(self, FieldType::ManyToManyField)
    }

    /// Type used by a column referencing a field of this type
    pub fn rel_type(&self) -> FieldType {
        match self {
            FieldType::AutoField => FieldType::IntegerField,
            FieldType::BigAutoField => FieldType::BigIntegerField,
            FieldType::SmallAutoField => FieldType::SmallIntegerField,
            FieldType::PositiveBigIntegerField
            | FieldType::PositiveIntegerField
            | FieldType::PositiveSmallIntegerField => FieldType::IntegerField,
            other => *other,
        }
    }

    /// Category selecting the qualifier of this type's value-range check
    pub fn check_category(&self) -> Option<CheckCategory> {
        match self {
            FieldType::BooleanField | FieldType::NullBooleanField => Some(CheckCategory::Boolean),
            FieldType::PositiveBigIntegerField
            | FieldType::PositiveIntegerField
            | FieldType::PositiveSmallIntegerField => Some(CheckCategory::Positive),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.internal_type())
    }
}

fn default_true() -> bool {
    true
}

/// Target of a relation field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Relation {
    /// `app_label.Model`, a model name of the same app, or a table name
    pub to: String,
    /// Target field name; the target's primary key when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field: Option<String>,
    #[serde(default = "default_true")]
    pub db_constraint: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_column: Option<String>,
    #[serde(default)]
    pub null: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub db_index: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_digits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            db_column: None,
            null: false,
            primary_key: false,
            unique: false,
            db_index: false,
            max_length: None,
            max_digits: None,
            decimal_places: None,
            help_text: None,
            relation: None,
        }
    }

    /// Column name: `db_column`, else `<name>_id` for relations, else the field name
    pub fn column(&self) -> String {
        match &self.db_column {
            Some(column) => column.clone(),
            None if self.field_type.is_relation() => format!("{}_id", self.name),
            None => self.name.clone(),
        }
    }

    pub fn has_column(&self) -> bool {
        self.field_type.has_column()
    }

    /// Relation enforced by a foreign key constraint
    pub fn constrained_relation(&self) -> Option<&Relation> {
        self.relation
            .as_ref()
            .filter(|relation| relation.db_constraint && self.has_column())
    }

    pub fn with_null(mut self) -> Self {
        self.null = true;
        self
    }

    pub fn with_primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn with_unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_db_index(mut self) -> Self {
        self.db_index = true;
        self
    }

    pub fn with_db_column(mut self, column: impl Into<String>) -> Self {
        self.db_column = Some(column.into());
        self
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn references(mut self, to: impl Into<String>) -> Self {
        self.relation = Some(Relation {
            to: to.into(),
            to_field: None,
            db_constraint: true,
        });
        self
    }

    pub fn without_constraint(mut self) -> Self {
        if let Some(relation) = self.relation.as_mut() {
            relation.db_constraint = false;
        }
        self
    }
}
