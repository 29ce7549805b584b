//! Field validation for races, drivers, results and user credentials.
//!
//! Request bodies arrive as loosely typed JSON: a field may be missing,
//! `null`, a string, a number or a boolean. The `validate_*` functions take
//! those raw [`Value`]s and return an ordered list of human-readable error
//! messages; an empty list means the input is valid. They are pure and
//! deterministic.
//!
//! Each validator checks for missing required fields first and returns a
//! single "must be filled" message in that case, so a client never sees
//! format complaints about a field it did not send.
//!
//! The `*Form` types wrap the same rules and, on success, hand back the
//! parsed input (`RaceInput`, `DriverInput`, ...) so callers never parse a raw
//! value twice.
//!
//! # Examples
//!
//! ```
//! use racetrack_core::validation::validate_user;
//! use serde_json::json;
//!
//! assert!(validate_user(&json!("bob"), &json!("Secret1")).is_empty());
//!
//! let errors = validate_user(&json!("bo"), &json!("secret"));
//! assert_eq!(errors.len(), 3);
//! ```

use crate::{
    Result,
    constants::{
        LICENSE_DIGITS, LICENSE_LETTERS, MIN_CAR_MODEL_LEN, MIN_DRIVER_NAME_LEN,
        MIN_NATIONALITY_LEN, MIN_PASSWORD_LEN, MIN_TRACK_NAME_LEN, MIN_USERNAME_LEN,
    },
    error::Error,
};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

/// Whether race dates in the past are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePolicy {
    /// Any valid calendar date is accepted.
    #[default]
    AnyDate,
    /// Dates strictly before the given day are rejected.
    NotBefore(NaiveDate),
}

pub const RACE_FIELDS_REQUIRED: &str =
    "Error: All fields (Track, Date, Distance, Weather) must be filled.";
pub const TRACK_NAME_TOO_SHORT: &str = "Error: Track name must be at least 3 characters long.";
pub const DISTANCE_NOT_POSITIVE: &str = "Error: Distance must be a positive number.";
pub const INVALID_DATE: &str = "Error: Invalid date format.";
pub const DATE_IN_PAST: &str = "Error: Race date cannot be in the past.";

pub const USER_FIELDS_REQUIRED: &str = "Error: Username and password must be filled.";
pub const USERNAME_TOO_SHORT: &str = "Error: Username must be at least 3 characters long.";
pub const PASSWORD_TOO_SHORT: &str = "Error: Password must be at least 6 characters long.";
pub const PASSWORD_NEEDS_UPPERCASE: &str =
    "Error: Password must contain at least one uppercase letter.";
pub const PASSWORD_NEEDS_DIGIT: &str = "Error: Password must contain at least one digit.";

pub const DRIVER_FIELDS_REQUIRED: &str =
    "Error: All fields (Name, Nationality, License) must be filled.";
pub const DRIVER_NAME_TOO_SHORT: &str = "Error: Full name must be at least 3 characters long.";
pub const NATIONALITY_TOO_SHORT: &str = "Error: Nationality must be at least 2 characters long.";
pub const INVALID_LICENSE: &str = "Error: License number must match the format XX-0000.";
pub const INVALID_ACTIVE_FLAG: &str = "Error: Active status must be 0 or 1.";

pub const RESULT_FIELDS_REQUIRED: &str =
    "Error: All fields (Race, Driver, Car model) must be filled.";
pub const INVALID_RACE_ID: &str = "Error: Race ID must be a positive integer.";
pub const INVALID_DRIVER_ID: &str = "Error: Driver ID must be a positive integer.";
pub const INVALID_FINISH_POSITION: &str = "Error: Finish position must be a positive integer.";
pub const CAR_MODEL_TOO_SHORT: &str = "Error: Car model must be at least 2 characters long.";

/// Validate a race submission.
///
/// All four fields are required. On top of that the track name needs
/// [`MIN_TRACK_NAME_LEN`] characters, the distance must parse to a positive
/// number and the date must be a real calendar day allowed by `policy`.
pub fn validate_race(
    track: &Value,
    date: &Value,
    distance: &Value,
    weather: &Value,
    policy: DatePolicy,
) -> Vec<String> {
    let mut errors = Vec::new();

    let track_name = text(track);
    let race_date = text(date);
    let distance_str = text(distance);
    let weather_str = text(weather);

    if track_name.is_empty()
        || race_date.is_empty()
        || distance_str.is_empty()
        || weather_str.is_empty()
    {
        errors.push(RACE_FIELDS_REQUIRED.to_string());
        return errors;
    }

    if char_len(&track_name) < MIN_TRACK_NAME_LEN {
        errors.push(TRACK_NAME_TOO_SHORT.to_string());
    }

    if number(distance).is_none_or(|d| d <= 0.0) {
        errors.push(DISTANCE_NOT_POSITIVE.to_string());
    }

    match parse_date(&race_date) {
        None => errors.push(INVALID_DATE.to_string()),
        Some(day) => {
            if let DatePolicy::NotBefore(today) = policy
                && day < today
            {
                errors.push(DATE_IN_PAST.to_string());
            }
        }
    }

    errors
}

/// Validate registration credentials.
///
/// The username is trimmed and needs [`MIN_USERNAME_LEN`] characters. The
/// password is taken verbatim and needs [`MIN_PASSWORD_LEN`] characters, an
/// ASCII uppercase letter and an ASCII digit. Messages come back in that order.
pub fn validate_user(username: &Value, password: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let username = text(username);
    let password = raw_text(password);

    if username.is_empty() || password.is_empty() {
        errors.push(USER_FIELDS_REQUIRED.to_string());
        return errors;
    }

    if char_len(&username) < MIN_USERNAME_LEN {
        errors.push(USERNAME_TOO_SHORT.to_string());
    }
    if char_len(&password) < MIN_PASSWORD_LEN {
        errors.push(PASSWORD_TOO_SHORT.to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(PASSWORD_NEEDS_UPPERCASE.to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(PASSWORD_NEEDS_DIGIT.to_string());
    }

    errors
}

/// Validate a driver submission.
///
/// Name, nationality and license are required. The active flag must coerce
/// to exactly 0 or 1 (see [`active_flag`]).
pub fn validate_driver(
    name: &Value,
    nationality: &Value,
    license: &Value,
    is_active: &Value,
) -> Vec<String> {
    let mut errors = Vec::new();

    let full_name = text(name);
    let nationality = text(nationality);
    let license_number = text(license);

    if full_name.is_empty() || nationality.is_empty() || license_number.is_empty() {
        errors.push(DRIVER_FIELDS_REQUIRED.to_string());
        return errors;
    }

    if char_len(&full_name) < MIN_DRIVER_NAME_LEN {
        errors.push(DRIVER_NAME_TOO_SHORT.to_string());
    }
    if char_len(&nationality) < MIN_NATIONALITY_LEN {
        errors.push(NATIONALITY_TOO_SHORT.to_string());
    }
    if !is_license_number(&license_number) {
        errors.push(INVALID_LICENSE.to_string());
    }
    if active_flag(is_active).is_none() {
        errors.push(INVALID_ACTIVE_FLAG.to_string());
    }

    errors
}

/// Validate a race result submission.
///
/// Race id, driver id and car model are required. The finish position is
/// optional; when absent, `null` or empty the result is a DNF.
pub fn validate_result(
    race_id: &Value,
    driver_id: &Value,
    finish_position: &Value,
    car_model: &Value,
) -> Vec<String> {
    let mut errors = Vec::new();

    let car_model = text(car_model);

    if is_missing(race_id) || is_missing(driver_id) || car_model.is_empty() {
        errors.push(RESULT_FIELDS_REQUIRED.to_string());
        return errors;
    }

    if positive_integer(race_id).is_none() {
        errors.push(INVALID_RACE_ID.to_string());
    }
    if positive_integer(driver_id).is_none() {
        errors.push(INVALID_DRIVER_ID.to_string());
    }
    if !is_missing(finish_position) && positive_integer(finish_position).is_none() {
        errors.push(INVALID_FINISH_POSITION.to_string());
    }
    if char_len(&car_model) < MIN_CAR_MODEL_LEN {
        errors.push(CAR_MODEL_TOO_SHORT.to_string());
    }

    errors
}

/// Check the `XX-0000` license format: two uppercase ASCII letters, a dash,
/// four ASCII digits, nothing else.
pub fn is_license_number(license: &str) -> bool {
    let bytes = license.as_bytes();
    bytes.len() == LICENSE_LETTERS + 1 + LICENSE_DIGITS
        && bytes[..LICENSE_LETTERS].iter().all(u8::is_ascii_uppercase)
        && bytes[LICENSE_LETTERS] == b'-'
        && bytes[LICENSE_LETTERS + 1..].iter().all(u8::is_ascii_digit)
}

/// Coerce an active flag. Accepts booleans, the numbers 0 and 1, and the
/// strings `"0"`, `"1"`, `"true"` and `"false"`.
pub fn active_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 0.0 => Some(false),
            Some(v) if v == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a value to a strictly positive integer.
///
/// JSON integers and integer strings (`"12"`, `" 3 "`, `"4.0"`) are accepted;
/// fractions, zero, negatives and non-numeric text are not.
pub fn positive_integer(value: &Value) -> Option<i64> {
    number(value)
        .filter(|v| v.fract() == 0.0 && *v >= 1.0 && *v <= i64::MAX as f64)
        .map(|v| v as i64)
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its calendar day.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn is_missing(value: &Value) -> bool {
    text(value).is_empty()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn check(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

/// A validated race.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceInput {
    pub track_name: String,
    pub race_date: NaiveDate,
    pub distance_km: f64,
    pub weather_forecast: String,
}

/// Raw race body as received over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RaceForm {
    pub track_name: Value,
    pub race_date: Value,
    pub distance_km: Value,
    pub weather_forecast: Value,
}

impl RaceForm {
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with the messages of [`validate_race`].
    pub fn validate(&self, policy: DatePolicy) -> Result<RaceInput> {
        check(validate_race(
            &self.track_name,
            &self.race_date,
            &self.distance_km,
            &self.weather_forecast,
            policy,
        ))?;

        // The rules above guarantee both parses succeed.
        let (Some(race_date), Some(distance_km)) =
            (parse_date(&text(&self.race_date)), number(&self.distance_km))
        else {
            return Err(Error::Validation(vec![INVALID_DATE.to_string()]));
        };

        Ok(RaceInput {
            track_name: text(&self.track_name),
            race_date,
            distance_km,
            weather_forecast: text(&self.weather_forecast),
        })
    }
}

/// A validated driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInput {
    pub full_name: String,
    pub nationality: String,
    pub license_number: String,
    pub is_active: bool,
}

/// Raw driver body as received over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverForm {
    pub full_name: Value,
    pub nationality: Value,
    pub license_number: Value,
    pub is_active: Value,
}

impl DriverForm {
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with the messages of [`validate_driver`].
    pub fn validate(&self) -> Result<DriverInput> {
        check(validate_driver(
            &self.full_name,
            &self.nationality,
            &self.license_number,
            &self.is_active,
        ))?;

        Ok(DriverInput {
            full_name: text(&self.full_name),
            nationality: text(&self.nationality),
            license_number: text(&self.license_number),
            is_active: active_flag(&self.is_active).unwrap_or_default(),
        })
    }
}

/// A validated race result. `finish_position` is `None` for a DNF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultInput {
    pub race_id: i64,
    pub driver_id: i64,
    pub finish_position: Option<i64>,
    pub car_model: String,
}

/// Raw result body as received over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResultForm {
    pub race_id: Value,
    pub driver_id: Value,
    pub finish_position: Value,
    pub car_model: Value,
}

impl ResultForm {
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with the messages of [`validate_result`].
    pub fn validate(&self) -> Result<ResultInput> {
        check(validate_result(
            &self.race_id,
            &self.driver_id,
            &self.finish_position,
            &self.car_model,
        ))?;

        let (Some(race_id), Some(driver_id)) = (
            positive_integer(&self.race_id),
            positive_integer(&self.driver_id),
        ) else {
            return Err(Error::Validation(vec![RESULT_FIELDS_REQUIRED.to_string()]));
        };

        Ok(ResultInput {
            race_id,
            driver_id,
            finish_position: positive_integer(&self.finish_position),
            car_model: text(&self.car_model),
        })
    }
}

/// Username and password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw credentials body as received over HTTP.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    pub username: Value,
    pub password: Value,
}

impl CredentialsForm {
    /// Validate for registration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with the messages of [`validate_user`].
    pub fn validate(&self) -> Result<Credentials> {
        check(validate_user(&self.username, &self.password))?;
        Ok(self.credentials())
    }

    /// Extract credentials without applying the registration rules, as a
    /// login attempt does. Missing fields become empty strings.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: text(&self.username),
            password: raw_text(&self.password),
        }
    }
}
