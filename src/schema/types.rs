//! Source column names and the output schema

use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use std::sync::{Arc, LazyLock};

/// A column the pipeline reads from the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceColumn {
    /// Full name, "ФИО"
    FullName,
    /// Phone number, "Телефон"
    Phone,
    /// Insurance account number
    Snils,
    /// Birthdate, "Дата рождения"
    Birthdate,
    /// Taxpayer identification number
    Inn,
    Email,
    /// Free-text address, "Адрес"
    Address,
}

impl SourceColumn {
    /// All source columns, in the order they are stored in a record
    pub const ALL: [SourceColumn; 7] = [
        SourceColumn::FullName,
        SourceColumn::Phone,
        SourceColumn::Snils,
        SourceColumn::Birthdate,
        SourceColumn::Inn,
        SourceColumn::Email,
        SourceColumn::Address,
    ];

    /// Header text of the column in the input file
    pub fn header(self) -> &'static str {
        match self {
            SourceColumn::FullName => "ФИО",
            SourceColumn::Phone => "Телефон",
            SourceColumn::Snils => "Snils",
            SourceColumn::Birthdate => "Дата рождения",
            SourceColumn::Inn => "INN",
            SourceColumn::Email => "Email",
            SourceColumn::Address => "Адрес",
        }
    }

    /// Slot of the column inside a record
    pub fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for SourceColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

pub(crate) const FNAME: &str = "fname";
pub(crate) const MNAME: &str = "mname";
pub(crate) const LNAME: &str = "lname";
pub(crate) const BIRTHDAY: &str = "birthday";
pub(crate) const PHONE_NUMBER: &str = "phoneNumber";
pub(crate) const SNILS: &str = "snils";
pub(crate) const INN: &str = "inn";
pub(crate) const EMAIL: &str = "email";
pub(crate) const ADDRESS: &str = "address";

/// Output column names, in file order
pub fn output_columns() -> [&'static str; 9] {
    [
        FNAME,
        MNAME,
        LNAME,
        BIRTHDAY,
        PHONE_NUMBER,
        SNILS,
        INN,
        EMAIL,
        ADDRESS,
    ]
}

static TAXPAYER_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(vec![
        Field::new(FNAME, DataType::Utf8, true),
        Field::new(MNAME, DataType::Utf8, true),
        Field::new(LNAME, DataType::Utf8, true),
        Field::new(
            BIRTHDAY,
            DataType::Timestamp(TimeUnit::Nanosecond, None),
            true,
        ),
        Field::new(PHONE_NUMBER, DataType::UInt64, false),
        Field::new(SNILS, DataType::UInt64, false),
        Field::new(INN, DataType::UInt64, false),
        Field::new(EMAIL, DataType::Utf8, true),
        Field::new(ADDRESS, DataType::Utf8, true),
    ]))
});

/// The fixed Arrow schema of every batch the pipeline writes
pub fn taxpayer_schema() -> SchemaRef {
    Arc::clone(&TAXPAYER_SCHEMA)
}
