//! Record shape module
//!
//! The pipeline handles exactly one record shape. This module names the
//! source columns as they appear in the input header, resolves their
//! positions, and defines the fixed Arrow schema of the output file.
//!
//! # Output columns
//!
//! | column        | Arrow type                  | nullable |
//! |---------------|-----------------------------|----------|
//! | `fname`       | Utf8                        | yes      |
//! | `mname`       | Utf8                        | yes      |
//! | `lname`       | Utf8                        | yes      |
//! | `birthday`    | Timestamp(Nanosecond, None) | yes      |
//! | `phoneNumber` | UInt64                      | no       |
//! | `snils`       | UInt64                      | no       |
//! | `inn`         | UInt64                      | no       |
//! | `email`       | Utf8                        | yes      |
//! | `address`     | Utf8                        | yes      |

mod layout;
mod types;

pub use layout::SourceLayout;
pub use types::{output_columns, taxpayer_schema, SourceColumn};
