//! Front-desk registry rules for rooms and customers.

use chrono::{DateTime, Utc};
use innkeep_shared::types::{CustomerId, Money, MoneyBounds, RoomId};
use serde::Deserialize;

use crate::error::HotelError;
use crate::model::{Customer, Room, RoomState, RoomType};
use crate::sanitize::Sanitizer;

/// Longest room number, in characters.
pub const MAX_ROOM_NUMBER_CHARS: usize = 10;
/// Largest room capacity.
pub const MAX_CAPACITY: i32 = 20;
/// Customer name length limits, in characters.
pub const CUSTOMER_NAME_CHARS: (usize, usize) = (2, 100);
/// Phone digit count limits.
pub const PHONE_DIGITS: (usize, usize) = (6, 20);
/// Longest accepted email address.
pub const MAX_EMAIL_CHARS: usize = 254;

/// Input for a new room.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    /// Door number.
    pub number: String,
    /// Kind of room.
    pub room_type: RoomType,
    /// Initial state, `available` when absent.
    #[serde(default)]
    pub state: Option<RoomState>,
    /// Maximum guests.
    pub capacity: i32,
    /// Nightly list price.
    pub price: Money,
}

/// Input for a new customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    /// Full name.
    pub full_name: String,
    /// Phone number in any common notation.
    pub phone: String,
    /// Optional email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Trims a room number and checks its length and charset.
///
/// # Errors
///
/// Returns `HotelError::Validation` if empty, too long, or not alphanumeric
/// (dashes allowed).
pub fn normalize_room_number(raw: &str) -> Result<String, HotelError> {
    let number = raw.trim();
    let chars = number.chars().count();
    if chars == 0 || chars > MAX_ROOM_NUMBER_CHARS {
        return Err(HotelError::Validation(format!(
            "room number must be 1 to {MAX_ROOM_NUMBER_CHARS} characters"
        )));
    }
    if !number.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(HotelError::Validation(
            "room number may only contain letters, digits and dashes".to_string(),
        ));
    }
    Ok(number.to_uppercase())
}

/// Normalizes a phone number to digits with an optional leading `+`.
///
/// Spaces, dots, dashes and parentheses are dropped.
///
/// # Errors
///
/// Returns `HotelError::Validation` on any other character or a digit count
/// outside 6 to 20.
pub fn normalize_phone(raw: &str) -> Result<String, HotelError> {
    let trimmed = raw.trim();
    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '.' | '-' | '(' | ')' => {}
            _ => {
                return Err(HotelError::Validation(format!(
                    "phone number contains invalid character {c:?}"
                )));
            }
        }
    }

    let (min, max) = PHONE_DIGITS;
    if !(min..=max).contains(&digits.len()) {
        return Err(HotelError::Validation(format!(
            "phone number must have {min} to {max} digits"
        )));
    }
    Ok(format!("{plus}{digits}"))
}

/// Light structural check of an email address.
///
/// # Errors
///
/// Returns `HotelError::Validation` if it lacks a single `@` with non-empty
/// sides, has whitespace, or is too long.
pub fn normalize_email(raw: &str) -> Result<String, HotelError> {
    let email = raw.trim().to_lowercase();
    let valid = email.len() <= MAX_EMAIL_CHARS
        && !email.chars().any(char::is_whitespace)
        && matches!(
            email.split_once('@'),
            Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@')
                && !domain.starts_with('.') && !domain.ends_with('.')
        );
    if valid {
        Ok(email)
    } else {
        Err(HotelError::Validation(format!("invalid email address {raw:?}")))
    }
}

/// Validates input and builds a room.
///
/// # Errors
///
/// Returns `HotelError::Validation` or `HotelError::InvalidAmount`.
pub fn prepare_room(input: &NewRoom) -> Result<Room, HotelError> {
    let number = normalize_room_number(&input.number)?;
    if !(1..=MAX_CAPACITY).contains(&input.capacity) {
        return Err(HotelError::Validation(format!(
            "capacity must be between 1 and {MAX_CAPACITY}"
        )));
    }
    let price = MoneyBounds::RESERVATION_BASE.check(input.price)?;
    Ok(Room {
        id: RoomId::new(),
        number,
        room_type: input.room_type,
        state: input.state.unwrap_or_default(),
        capacity: input.capacity,
        price,
        archived_at: None,
    })
}

/// Validates input and builds a customer.
///
/// # Errors
///
/// Returns `HotelError::InvalidName` or `HotelError::Validation`.
pub fn prepare_customer(
    sanitizer: &dyn Sanitizer,
    input: &NewCustomer,
    now: DateTime<Utc>,
) -> Result<Customer, HotelError> {
    let (min, max) = CUSTOMER_NAME_CHARS;
    let full_name = sanitizer.sanitize(&input.full_name, max + 1);
    let chars = full_name.chars().count();
    if !(min..=max).contains(&chars) {
        return Err(HotelError::InvalidName(format!(
            "customer name must be {min} to {max} characters"
        )));
    }

    let email = match input.email.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(normalize_email(raw)?),
    };

    Ok(Customer {
        id: CustomerId::new(),
        full_name,
        phone: normalize_phone(&input.phone)?,
        email,
        created_at: now,
        archived_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::MarkupSanitizer;

    #[test]
    fn test_room_number() {
        assert_eq!(normalize_room_number(" 101 ").unwrap(), "101");
        assert_eq!(normalize_room_number("b-12").unwrap(), "B-12");
        assert!(normalize_room_number("").is_err());
        assert!(normalize_room_number("12345678901").is_err());
        assert!(normalize_room_number("1 01").is_err());
    }

    #[test]
    fn test_phone() {
        assert_eq!(normalize_phone("+33 6 12 34 56 78").unwrap(), "+33612345678");
        assert_eq!(normalize_phone("(555) 123-4567").unwrap(), "5551234567");
        assert!(normalize_phone("12345").is_err());
        assert!(normalize_phone("555-CALL-NOW").is_err());
        assert!(normalize_phone("++33612345678").is_err());
    }

    #[test]
    fn test_email() {
        assert_eq!(
            normalize_email(" Guest@Example.com ").unwrap(),
            "guest@example.com"
        );
        assert!(normalize_email("guest@example").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("gu est@example.com").is_err());
        assert!(normalize_email("a@b@example.com").is_err());
    }

    #[test]
    fn test_prepare_room() {
        let room = prepare_room(&NewRoom {
            number: "204".into(),
            room_type: RoomType::Twin,
            state: None,
            capacity: 2,
            price: Money::from_minor(8_900),
        })
        .unwrap();
        assert_eq!(room.state, RoomState::Available);

        assert!(
            prepare_room(&NewRoom {
                number: "205".into(),
                room_type: RoomType::Twin,
                state: None,
                capacity: 0,
                price: Money::from_minor(8_900),
            })
            .is_err()
        );
    }

    #[test]
    fn test_prepare_customer() {
        let customer = prepare_customer(
            &MarkupSanitizer,
            &NewCustomer {
                full_name: " <b>Ada</b>  Lovelace ".into(),
                phone: "+44 20 7946 0958".into(),
                email: Some(String::new()),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(customer.full_name, "Ada Lovelace");
        assert_eq!(customer.phone, "+442079460958");
        assert_eq!(customer.email, None);

        assert!(matches!(
            prepare_customer(
                &MarkupSanitizer,
                &NewCustomer {
                    full_name: "A".into(),
                    phone: "0612345678".into(),
                    email: None,
                },
                Utc::now(),
            ),
            Err(HotelError::InvalidName(_))
        ));
    }
}
