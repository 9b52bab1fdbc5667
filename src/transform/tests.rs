//! Tests for transform module

use super::*;
use crate::config::LengthLimits;
use crate::decode::{Chunk, RawRecord};
use crate::schema::{output_columns, taxpayer_schema};
use crate::types::NamePolicy;
use arrow::array::{Array, StringArray, TimestampNanosecondArray, UInt64Array};
use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn formats() -> Vec<String> {
    CleaningRules::default().date_formats
}

fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Build a record from (name, phone, snils, birthdate, inn, email, address)
fn raw(
    line: u64,
    name: &str,
    phone: &str,
    snils: &str,
    birthdate: &str,
    inn: &str,
    email: &str,
) -> RawRecord {
    RawRecord::new(
        line,
        [
            Some(name),
            Some(phone),
            Some(snils),
            Some(birthdate),
            Some(inn),
            Some(email),
            Some("г. Москва, ул. Ленина, д. 1"),
        ],
    )
}

// ============================================================================
// Digit Extraction Tests
// ============================================================================

#[test_case(Some("9161234567"), "9161234567" ; "plain digits")]
#[test_case(Some("+7 (916) 123-45-67"), "7" ; "formatted phone keeps first run")]
#[test_case(Some("tel: 916-1234"), "916" ; "leading text")]
#[test_case(Some("112-233-445 95"), "112" ; "snils with separators")]
#[test_case(Some("9161234567.0"), "9161234567" ; "float rendering")]
#[test_case(Some("n/a"), "0" ; "no digits")]
#[test_case(Some(""), "0" ; "empty")]
#[test_case(None, "0" ; "missing")]
#[test_case(Some("٣٤٥"), "0" ; "non ascii digits are not digits")]
fn test_extract_digits(input: Option<&str>, expected: &str) {
    assert_eq!(extract_digits(input), expected);
}

// ============================================================================
// Birthdate Tests
// ============================================================================

#[test_case("1980-01-15", midnight(1980, 1, 15) ; "iso date")]
#[test_case("15.01.1980", midnight(1980, 1, 15) ; "dotted day first")]
#[test_case("15/01/1980", midnight(1980, 1, 15) ; "slashed day first")]
#[test_case("1980/01/15", midnight(1980, 1, 15) ; "slashed year first")]
#[test_case(" 1980-01-15 ", midnight(1980, 1, 15) ; "surrounding whitespace")]
fn test_parse_birthdate_dates(input: &str, expected: NaiveDateTime) {
    assert_eq!(parse_birthdate(Some(input), &formats()), Some(expected));
}

#[test]
fn test_parse_birthdate_with_time() {
    let expected = NaiveDate::from_ymd_opt(1975, 6, 30)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap();
    assert_eq!(
        parse_birthdate(Some("1975-06-30 12:30:00"), &formats()),
        Some(expected)
    );
}

#[test_case("0001-01-01" ; "far past")]
#[test_case("1500-05-05" ; "before nanosecond range")]
#[test_case("3020-01-01" ; "after nanosecond range")]
#[test_case("31.02.1990" ; "impossible day")]
#[test_case("not a date" ; "garbage")]
#[test_case("" ; "empty")]
fn test_parse_birthdate_becomes_null(input: &str) {
    assert_eq!(parse_birthdate(Some(input), &formats()), None);
}

#[test]
fn test_parse_birthdate_missing() {
    assert_eq!(parse_birthdate(None, &formats()), None);
}

#[test]
fn test_parse_birthdate_nanosecond_bounds() {
    assert!(parse_birthdate(Some("1677-09-22"), &formats()).is_some());
    assert!(parse_birthdate(Some("1677-09-20"), &formats()).is_none());
    assert!(parse_birthdate(Some("2262-04-11"), &formats()).is_some());
    assert!(parse_birthdate(Some("2262-04-12"), &formats()).is_none());
}

#[test]
fn test_parse_birthdate_respects_format_list() {
    let only_iso = vec!["%Y-%m-%d".to_string()];
    assert!(parse_birthdate(Some("1980-01-15"), &only_iso).is_some());
    assert!(parse_birthdate(Some("15.01.1980"), &only_iso).is_none());
}

// ============================================================================
// Email Tests
// ============================================================================

#[test]
fn test_normalize_email() {
    assert_eq!(
        normalize_email(Some("Ivan.Petrov@Mail.RU")),
        Some("ivan.petrov@mail.ru".to_string())
    );
    assert_eq!(
        normalize_email(Some("ИВАН@ПОЧТА.РФ")),
        Some("иван@почта.рф".to_string())
    );
    assert_eq!(normalize_email(None), None);
}

// ============================================================================
// Name Splitting Tests
// ============================================================================

fn parts(first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> NameParts {
    NameParts {
        first: first.map(str::to_owned),
        middle: middle.map(str::to_owned),
        last: last.map(str::to_owned),
    }
}

#[test_case(NamePolicy::Pad ; "pad")]
#[test_case(NamePolicy::Reject ; "reject")]
fn test_split_three_tokens(policy: NamePolicy) {
    assert_eq!(
        split_full_name(Some("Иванов  Иван\tИванович"), policy),
        Some(parts(Some("Иванов"), Some("Иван"), Some("Иванович")))
    );
}

#[test]
fn test_split_pad_policy() {
    let pad = NamePolicy::Pad;
    assert_eq!(split_full_name(None, pad), Some(NameParts::default()));
    assert_eq!(split_full_name(Some("   "), pad), Some(NameParts::default()));
    assert_eq!(
        split_full_name(Some("Мадонна"), pad),
        Some(parts(Some("Мадонна"), None, None))
    );
    assert_eq!(
        split_full_name(Some("Иванов Иван"), pad),
        Some(parts(Some("Иванов"), None, Some("Иван")))
    );
    assert_eq!(
        split_full_name(Some("Оглы Мамед Али Оглы Гусейн"), pad),
        Some(parts(Some("Оглы"), Some("Мамед Али Оглы"), Some("Гусейн")))
    );
}

#[test_case(None ; "missing")]
#[test_case(Some("Мадонна") ; "one token")]
#[test_case(Some("Иванов Иван") ; "two tokens")]
#[test_case(Some("a b c d") ; "four tokens")]
fn test_split_reject_policy(input: Option<&str>) {
    assert_eq!(split_full_name(input, NamePolicy::Reject), None);
}

// ============================================================================
// Record Cleaning Tests
// ============================================================================

#[test]
fn test_clean_record_happy_path() {
    let record = raw(
        2,
        "Иванов Иван Иванович",
        "916-123-45-67",
        "11223344595",
        "15.01.1980",
        "7707083893",
        "Ivan@Mail.RU",
    );
    let cleaned = clean_record(&record, &CleaningRules::default()).unwrap();

    assert_eq!(cleaned.name, parts(Some("Иванов"), Some("Иван"), Some("Иванович")));
    assert_eq!(cleaned.phone, 916);
    assert_eq!(cleaned.snils, 11_223_344_595);
    assert_eq!(cleaned.inn, 7_707_083_893);
    assert_eq!(cleaned.birthday, Some(midnight(1980, 1, 15)));
    assert_eq!(cleaned.email.as_deref(), Some("ivan@mail.ru"));
    assert_eq!(
        cleaned.address.as_deref(),
        Some("г. Москва, ул. Ленина, д. 1")
    );
}

#[test]
fn test_clean_record_missing_identifiers_become_zero() {
    let record = RawRecord::new(
        3,
        [Some("a b c"), None, Some("нет"), None, Some("-"), None, None],
    );
    let cleaned = clean_record(&record, &CleaningRules::default()).unwrap();
    assert_eq!((cleaned.phone, cleaned.snils, cleaned.inn), (0, 0, 0));
    assert_eq!(cleaned.birthday, None);
    assert_eq!(cleaned.email, None);
    assert_eq!(cleaned.address, None);
}

#[test_case("79161234567", "1", "1" ; "phone with eleven digits")]
#[test_case("1", "770708389312", "1" ; "inn with twelve digits")]
#[test_case("1", "77070838931", "1" ; "inn with eleven digits")]
#[test_case("1", "1", "112233445951" ; "snils with twelve digits")]
fn test_clean_record_length_filter(phone: &str, inn: &str, snils: &str) {
    let record = raw(1, "a b c", phone, snils, "", inn, "");
    assert_eq!(
        clean_record(&record, &CleaningRules::default()),
        Err(Rejection::Length)
    );
}

#[test]
fn test_clean_record_length_measured_after_extraction() {
    // Eleven characters, but the first digit run is a single "7"
    let record = raw(1, "a b c", "+7 916 1234", "1", "", "1", "");
    assert!(clean_record(&record, &CleaningRules::default()).is_ok());
}

#[test]
fn test_clean_record_boundary_lengths_kept() {
    let record = raw(1, "a b c", "9161234567", "11223344595", "", "7707083893", "");
    let cleaned = clean_record(&record, &CleaningRules::default()).unwrap();
    assert_eq!(cleaned.phone, 9_161_234_567);
}

#[test]
fn test_clean_record_limits_too_large_for_u64() {
    let rules = CleaningRules {
        limits: LengthLimits {
            phone: 30,
            inn: 30,
            snils: 30,
        },
        ..CleaningRules::default()
    };
    let record = raw(1, "a b c", "123456789012345678901234", "1", "", "1", "");
    assert_eq!(clean_record(&record, &rules), Err(Rejection::Length));
}

#[test]
fn test_clean_record_name_policy_reject() {
    let rules = CleaningRules::default().with_name_policy(NamePolicy::Reject);
    let record = raw(1, "Иванов Иван", "1", "1", "", "1", "");
    assert_eq!(clean_record(&record, &rules), Err(Rejection::Name));
}

// ============================================================================
// Batch Tests
// ============================================================================

#[test]
fn test_build_batch_empty() {
    let batch = build_batch(&[]).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.schema(), taxpayer_schema());
}

#[test]
fn test_clean_chunk() {
    let chunk = Chunk {
        index: 4,
        records: vec![
            raw(
                10,
                "Иванов Иван Иванович",
                "9161234567",
                "112-233-445 95",
                "1980-01-15",
                "7707083893",
                "A@B.RU",
            ),
            raw(
                11,
                "Петров Пётр Петрович",
                "89161234567",
                "1",
                "1981-01-01",
                "1",
                "x@y.ru",
            ),
            raw(12, "Сидоров Сидор", "1", "2", "1500-01-01", "3", "Z@Y.RU"),
        ],
    };

    let cleaned = clean_chunk(&chunk, &CleaningRules::default()).unwrap();
    assert_eq!(cleaned.index, 4);
    assert_eq!(
        cleaned.stats,
        ChunkStats {
            rows_in: 3,
            rows_out: 2,
            rejected_length: 1,
            rejected_name: 0,
            null_birthdays: 1,
        }
    );

    let batch = &cleaned.batch;
    assert_eq!(batch.num_rows(), 2);
    let names: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(names, output_columns().to_vec());

    let fname = batch
        .column_by_name("fname")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(fname.value(0), "Иванов");
    assert_eq!(fname.value(1), "Сидоров");

    let mname = batch
        .column_by_name("mname")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert!(mname.is_null(1));

    let snils = batch
        .column_by_name("snils")
        .unwrap()
        .as_any()
        .downcast_ref::<UInt64Array>()
        .unwrap();
    assert_eq!(snils.value(0), 112);

    let birthday = batch
        .column_by_name("birthday")
        .unwrap()
        .as_any()
        .downcast_ref::<TimestampNanosecondArray>()
        .unwrap();
    assert_eq!(
        birthday.value(0),
        midnight(1980, 1, 15).and_utc().timestamp_nanos_opt().unwrap()
    );
    assert!(birthday.is_null(1));

    let email = batch
        .column_by_name("email")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(email.value(0), "a@b.ru");
    assert_eq!(email.value(1), "z@y.ru");
}

#[test]
fn test_clean_chunk_all_rejected_gives_empty_batch() {
    let chunk = Chunk {
        index: 0,
        records: vec![raw(1, "a b c", "123456789012", "1", "", "1", "")],
    };
    let cleaned = clean_chunk(&chunk, &CleaningRules::default()).unwrap();
    assert_eq!(cleaned.batch.num_rows(), 0);
    assert_eq!(cleaned.batch.schema(), taxpayer_schema());
    assert_eq!(cleaned.stats.rejected_length, 1);
}

#[test]
fn test_clean_chunk_reject_policy_counts() {
    let chunk = Chunk {
        index: 0,
        records: vec![
            raw(1, "Иванов Иван", "1", "1", "", "1", ""),
            raw(2, "a b c", "1", "1", "", "1", ""),
        ],
    };
    let rules = CleaningRules::default().with_name_policy(NamePolicy::Reject);
    let cleaned = clean_chunk(&chunk, &rules).unwrap();
    assert_eq!(cleaned.stats.rejected_name, 1);
    assert_eq!(cleaned.stats.rows_out, 1);
}
