//! Demo-class booking requests and the messaging deep link they turn into.
//!
//! The message template is read by a person on the receiving end, so its
//! labels and their order are fixed.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use time::{Date, macros::date};

const NAME_RANGE: (usize, usize) = (2, 100);
const CITY_RANGE: (usize, usize) = (2, 100);
const CONTACT_RANGE: (usize, usize) = (10, 15);
const EMAIL_MAX: usize = 255;
const EARLIEST_BIRTH_DATE: Date = date!(1900 - 01 - 01);

/// Address shape accepted by the booking form. The leading-dot and
/// doubled-dot rules need lookarounds, so [`is_valid_email`] checks them
/// separately.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("valid email regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Laptop,
    Desktop,
    Tablet,
    Smartphone,
}

impl Device {
    pub const ALL: [Device; 4] = [
        Device::Laptop,
        Device::Desktop,
        Device::Tablet,
        Device::Smartphone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Laptop => "Laptop",
            Device::Desktop => "Desktop",
            Device::Tablet => "Tablet",
            Device::Smartphone => "Smartphone",
        }
    }
}

impl FromStr for Device {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|device| device.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Tamil,
    Both,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Tamil, Language::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Tamil => "Tamil",
            Language::Both => "Both",
        }
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|language| language.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    Name,
    City,
    ContactNumber,
    DateOfBirth,
    Email,
    Device,
    Language,
    Terms,
}

impl BookingField {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingField::Name => "name",
            BookingField::City => "city",
            BookingField::ContactNumber => "contact_number",
            BookingField::DateOfBirth => "date_of_birth",
            BookingField::Email => "email",
            BookingField::Device => "device",
            BookingField::Language => "language",
            BookingField::Terms => "terms",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: BookingField,
    pub message: &'static str,
}

/// Every field-level failure of one submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingErrors {
    errors: Vec<FieldError>,
}

impl BookingErrors {
    fn push(&mut self, field: BookingField, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn message_for(&self, field: BookingField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }
}

impl fmt::Display for BookingErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .errors
            .iter()
            .map(|error| error.field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "invalid booking fields: {fields}")
    }
}

impl std::error::Error for BookingErrors {}

/// The booking form exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingSubmission {
    pub name: String,
    pub city: String,
    pub contact_number: String,
    /// `YYYY-MM-DD`, as produced by a date input.
    pub date_of_birth: String,
    pub email: String,
    pub device: String,
    pub language: String,
    /// Checkbox value; present when ticked.
    pub terms: Option<String>,
}

/// A submission that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub name: String,
    pub city: String,
    pub contact_number: String,
    pub date_of_birth: Date,
    pub email: String,
    pub device: Device,
    pub language: Language,
}

impl BookingSubmission {
    /// Check every field against the booking rules. `today` bounds the date
    /// of birth; a child born today is accepted.
    pub fn validate(&self, today: Date) -> Result<BookingRequest, BookingErrors> {
        let mut errors = BookingErrors::default();

        let name = self.name.trim();
        match char_len(name) {
            n if n < NAME_RANGE.0 => {
                errors.push(BookingField::Name, "Name must be at least 2 characters")
            }
            n if n > NAME_RANGE.1 => errors.push(BookingField::Name, "Name is too long"),
            _ => {}
        }

        let city = self.city.trim();
        match char_len(city) {
            n if n < CITY_RANGE.0 => {
                errors.push(BookingField::City, "City must be at least 2 characters")
            }
            n if n > CITY_RANGE.1 => errors.push(BookingField::City, "City name is too long"),
            _ => {}
        }

        let contact_number = self.contact_number.trim();
        match char_len(contact_number) {
            n if n < CONTACT_RANGE.0 => errors.push(
                BookingField::ContactNumber,
                "Please enter a valid WhatsApp number",
            ),
            n if n > CONTACT_RANGE.1 => {
                errors.push(BookingField::ContactNumber, "Number is too long")
            }
            _ => {}
        }

        let date_of_birth = match parse_iso_date(self.date_of_birth.trim()) {
            None => {
                errors.push(
                    BookingField::DateOfBirth,
                    "Please select your child's date of birth",
                );
                None
            }
            Some(dob) if dob > today => {
                errors.push(
                    BookingField::DateOfBirth,
                    "Date of birth cannot be in the future",
                );
                None
            }
            Some(dob) if dob < EARLIEST_BIRTH_DATE => {
                errors.push(
                    BookingField::DateOfBirth,
                    "Please select your child's date of birth",
                );
                None
            }
            Some(dob) => Some(dob),
        };

        let email = self.email.trim();
        if !is_valid_email(email) {
            errors.push(BookingField::Email, "Please enter a valid email address");
        } else if char_len(email) > EMAIL_MAX {
            errors.push(BookingField::Email, "Email is too long");
        }

        let device = self.device.trim().parse::<Device>().ok();
        if device.is_none() {
            errors.push(BookingField::Device, "Please select a device");
        }

        let language = self.language.trim().parse::<Language>().ok();
        if language.is_none() {
            errors.push(BookingField::Language, "Please select a language");
        }

        if !self.terms_accepted() {
            errors.push(
                BookingField::Terms,
                "You must agree to the terms and conditions",
            );
        }

        match (date_of_birth, device, language) {
            (Some(date_of_birth), Some(device), Some(language)) if errors.is_empty() => {
                Ok(BookingRequest {
                    name: name.to_string(),
                    city: city.to_string(),
                    contact_number: contact_number.to_string(),
                    date_of_birth,
                    email: email.to_string(),
                    device,
                    language,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn terms_accepted(&self) -> bool {
        matches!(
            self.terms.as_deref().map(str::trim),
            Some("on" | "true" | "yes" | "1")
        )
    }
}

impl BookingRequest {
    /// Render the booking message sent to the academy.
    pub fn message(&self, organization: &str) -> String {
        format!(
            "*New Demo Booking Request*\n\
             \n\
             *Name:* {name}\n\
             *City:* {city}\n\
             *WhatsApp Number:* {contact}\n\
             *Child's Date of Birth:* {dob}\n\
             *Email:* {email}\n\
             *Device:* {device}\n\
             *Preferred Language:* {language}\n\
             \n\
             Thank you for booking a demo with {organization}!",
            name = self.name,
            city = self.city,
            contact = self.contact_number,
            dob = format_long_date(self.date_of_birth),
            email = self.email,
            device = self.device,
            language = self.language,
        )
    }
}

/// Messaging endpoint that receives booking messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingLink {
    pub scheme: String,
    pub recipient: String,
}

impl MessagingLink {
    pub fn new(scheme: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            recipient: recipient.into(),
        }
    }

    /// App deep link: `<scheme>://send?phone=<recipient>&text=<message>`.
    pub fn app_link(&self, message: &str) -> String {
        format!(
            "{}://send?phone={}&text={}",
            self.scheme,
            self.recipient,
            urlencoding::encode(message)
        )
    }

    /// Browser fallback for devices without the app installed.
    pub fn web_link(&self, message: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.recipient,
            urlencoding::encode(message)
        )
    }

    /// Plain chat link without a prefilled message.
    pub fn chat_link(&self) -> String {
        format!("https://wa.me/{}", self.recipient)
    }
}

/// Long-form date with an ordinal day, e.g. `March 5th, 2016`.
pub fn format_long_date(date: Date) -> String {
    format!(
        "{} {}{}, {}",
        date.month(),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

fn ordinal_suffix(day: u8) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn parse_iso_date(value: &str) -> Option<Date> {
    Date::parse(
        value,
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .ok()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Address check used by the booking form: no leading or doubled dots, one
/// `@`, and a dotted domain whose last label is at least two letters.
pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> BookingSubmission {
        BookingSubmission {
            name: "Anika Raman".into(),
            city: "Hosur".into(),
            contact_number: "9876543210".into(),
            date_of_birth: "2016-03-05".into(),
            email: "parent@example.com".into(),
            device: "Tablet".into(),
            language: "Both".into(),
            terms: Some("on".into()),
        }
    }

    const TODAY: Date = date!(2025 - 10 - 27);

    #[test]
    fn valid_submission_passes() {
        let request = valid_submission().validate(TODAY).expect("valid");
        assert_eq!(request.device, Device::Tablet);
        assert_eq!(request.language, Language::Both);
        assert_eq!(request.date_of_birth, date!(2016 - 03 - 05));
    }

    #[test]
    fn values_are_trimmed_before_checks() {
        let submission = BookingSubmission {
            name: "  A  ".into(),
            ..valid_submission()
        };
        let errors = submission.validate(TODAY).expect_err("name too short");
        assert_eq!(
            errors.message_for(BookingField::Name),
            Some("Name must be at least 2 characters")
        );
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let submission = BookingSubmission {
            date_of_birth: "2025-10-28".into(),
            ..valid_submission()
        };
        let errors = submission.validate(TODAY).expect_err("future date");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.message_for(BookingField::DateOfBirth),
            Some("Date of birth cannot be in the future")
        );
    }

    #[test]
    fn birth_date_today_is_accepted() {
        let submission = BookingSubmission {
            date_of_birth: "2025-10-27".into(),
            ..valid_submission()
        };
        assert!(submission.validate(TODAY).is_ok());
    }

    #[test]
    fn ancient_or_garbled_birth_dates_are_rejected() {
        for value in ["1899-12-31", "05/03/2016", ""] {
            let submission = BookingSubmission {
                date_of_birth: value.into(),
                ..valid_submission()
            };
            let errors = submission.validate(TODAY).expect_err("bad date");
            assert!(errors.message_for(BookingField::DateOfBirth).is_some());
        }
    }

    #[test]
    fn every_failing_field_is_reported_in_form_order() {
        let errors = BookingSubmission::default()
            .validate(TODAY)
            .expect_err("empty form");
        let fields: Vec<_> = errors.iter().map(|error| error.field).collect();
        assert_eq!(
            fields,
            vec![
                BookingField::Name,
                BookingField::City,
                BookingField::ContactNumber,
                BookingField::DateOfBirth,
                BookingField::Email,
                BookingField::Device,
                BookingField::Language,
                BookingField::Terms,
            ]
        );
    }

    #[test]
    fn contact_number_bounds() {
        let short = BookingSubmission {
            contact_number: "123456789".into(),
            ..valid_submission()
        };
        assert_eq!(
            short
                .validate(TODAY)
                .expect_err("short")
                .message_for(BookingField::ContactNumber),
            Some("Please enter a valid WhatsApp number")
        );

        let long = BookingSubmission {
            contact_number: "+91 98765 43210 1".into(),
            ..valid_submission()
        };
        assert_eq!(
            long.validate(TODAY)
                .expect_err("long")
                .message_for(BookingField::ContactNumber),
            Some("Number is too long")
        );
    }

    #[test]
    fn unknown_device_and_language_are_rejected() {
        let submission = BookingSubmission {
            device: "Console".into(),
            language: "laptop".into(),
            ..valid_submission()
        };
        let errors = submission.validate(TODAY).expect_err("bad choices");
        assert!(errors.message_for(BookingField::Device).is_some());
        assert!(errors.message_for(BookingField::Language).is_some());
    }

    #[test]
    fn terms_must_be_ticked() {
        let submission = BookingSubmission {
            terms: None,
            ..valid_submission()
        };
        assert_eq!(
            submission
                .validate(TODAY)
                .expect_err("terms")
                .message_for(BookingField::Terms),
            Some("You must agree to the terms and conditions")
        );
    }

    #[test]
    fn email_syntax() {
        for ok in [
            "a@b.co",
            "first.last+chess@mail.example.org",
            "o'neil@club.in",
            "Coach.Priya@Chess-Club.IN",
        ] {
            assert!(is_valid_email(ok), "{ok} should be accepted");
        }
        for bad in [
            "",
            "plain",
            "@example.com",
            ".lead@example.com",
            "double..dot@example.com",
            "trail.@example.com",
            "a@b",
            "a@b.c",
            "a@-b.com",
            "a@b@c.com",
            "a@b.c0m",
            "a@b.c-m",
            "trailing'@example.com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn overlong_email_is_rejected() {
        let submission = BookingSubmission {
            email: format!("{}@example.com", "a".repeat(250)),
            ..valid_submission()
        };
        assert_eq!(
            submission
                .validate(TODAY)
                .expect_err("too long")
                .message_for(BookingField::Email),
            Some("Email is too long")
        );
    }

    #[test]
    fn long_dates_use_ordinals() {
        assert_eq!(format_long_date(date!(2016 - 03 - 05)), "March 5th, 2016");
        assert_eq!(format_long_date(date!(2019 - 01 - 01)), "January 1st, 2019");
        assert_eq!(format_long_date(date!(2019 - 06 - 22)), "June 22nd, 2019");
        assert_eq!(format_long_date(date!(2019 - 06 - 23)), "June 23rd, 2019");
        assert_eq!(format_long_date(date!(2019 - 06 - 11)), "June 11th, 2019");
        assert_eq!(format_long_date(date!(2019 - 06 - 13)), "June 13th, 2019");
        assert_eq!(format_long_date(date!(2019 - 12 - 31)), "December 31st, 2019");
    }

    #[test]
    fn links_percent_encode_the_message() {
        let link = MessagingLink::new("whatsapp", "916379597908");
        let message = "*Name:* A & B\nDone?";
        assert_eq!(
            link.app_link(message),
            "whatsapp://send?phone=916379597908&text=%2AName%3A%2A%20A%20%26%20B%0ADone%3F"
        );
        assert!(
            link.web_link(message)
                .starts_with("https://wa.me/916379597908?text=%2AName")
        );
        assert_eq!(link.chat_link(), "https://wa.me/916379597908");
    }
}
