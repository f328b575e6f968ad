// src/domain/booking.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::errors::ServerError;

/// Guest information as it appears on a booking: either a plain head count
/// or an adults/children breakdown.
#[derive(Debug, Clone, PartialEq)]
pub enum Guests {
    Count(f64),
    Breakdown { adults: f64, children: f64 },
}

/// `propertyId` is either an opaque reference or the populated property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyRef {
    Id(String),
    Populated {
        id: Option<String>,
        property_name: Option<String>,
        location: Option<String>,
        map_link: Option<String>,
    },
}

/// `userId` is either an opaque reference or the populated user.
#[derive(Debug, Clone, PartialEq)]
pub enum UserRef {
    Id(String),
    Populated {
        id: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        phone: Option<String>,
    },
}

/// A booking record as delivered by the booking API.
///
/// The upstream data is loosely typed, so every field is read leniently:
/// anything absent or of the wrong shape ends up as `None` (or `false`)
/// rather than failing the whole record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Booking {
    pub id: Option<String>,
    /// Only an exact JSON `true` counts.
    pub cancelled: bool,
    pub payment_status: Option<String>,
    pub status: Option<String>,
    pub payment_id: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub guests: Option<Guests>,
    pub grand_total: Option<f64>,
    pub total_amount: Option<f64>,
    pub property: Option<PropertyRef>,
    pub user: Option<UserRef>,
}

impl Booking {
    /// Parse a booking document. Only invalid JSON or a non-object document
    /// is rejected; field-level problems degrade to absent values.
    pub fn from_json(raw: &str) -> Result<Self, ServerError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ServerError::BadRequest(format!("invalid booking json: {e}")))?;
        if !value.is_object() {
            return Err(ServerError::BadRequest(
                "booking must be a json object".into(),
            ));
        }
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Booking::default();
        };

        Booking {
            id: text(obj, "_id").or_else(|| text(obj, "id")),
            cancelled: matches!(obj.get("cancelled"), Some(Value::Bool(true))),
            payment_status: text(obj, "paymentStatus"),
            status: text(obj, "status"),
            payment_id: opaque_id(obj.get("paymentId")),
            check_in: text(obj, "checkIn"),
            check_out: text(obj, "checkOut"),
            guests: obj.get("guests").and_then(parse_guests),
            grand_total: obj.get("grandTotal").and_then(number),
            total_amount: obj.get("totalAmount").and_then(number),
            property: obj.get("propertyId").and_then(parse_property),
            user: obj.get("userId").and_then(parse_user),
        }
    }

    /// Adults plus children for a breakdown, the raw value for a flat count.
    pub fn guest_count(&self) -> u32 {
        let total = match &self.guests {
            Some(Guests::Count(n)) => *n,
            Some(Guests::Breakdown { adults, children }) => adults + children,
            None => 0.0,
        };
        if total.is_finite() && total > 0.0 {
            total.floor() as u32
        } else {
            0
        }
    }

    /// First present of `grandTotal` / `totalAmount`, else zero.
    pub fn amount(&self) -> f64 {
        self.grand_total.or(self.total_amount).unwrap_or(0.0)
    }

    pub fn property_name(&self) -> Option<&str> {
        match &self.property {
            Some(PropertyRef::Populated { property_name, .. }) => property_name.as_deref(),
            _ => None,
        }
    }

    pub fn property_map_link(&self) -> Option<&str> {
        match &self.property {
            Some(PropertyRef::Populated { map_link, .. }) => map_link.as_deref(),
            _ => None,
        }
    }

    pub fn guest_first_name(&self) -> Option<&str> {
        match &self.user {
            Some(UserRef::Populated { first_name, .. }) => first_name.as_deref(),
            _ => None,
        }
    }

    pub fn guest_last_name(&self) -> Option<&str> {
        match &self.user {
            Some(UserRef::Populated { last_name, .. }) => last_name.as_deref(),
            _ => None,
        }
    }

    pub fn guest_phone(&self) -> Option<&str> {
        match &self.user {
            Some(UserRef::Populated { phone, .. }) => phone.as_deref(),
            _ => None,
        }
    }

    pub fn check_out_at(&self) -> Option<DateTime<Utc>> {
        self.check_out.as_deref().and_then(parse_instant)
    }
}

/// Parse the date formats the booking API emits. Date-only and
/// offset-less values are read as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn opaque_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn parse_guests(value: &Value) -> Option<Guests> {
    match value {
        Value::Object(obj) => Some(Guests::Breakdown {
            adults: obj.get("adults").and_then(number).unwrap_or(0.0),
            children: obj.get("children").and_then(number).unwrap_or(0.0),
        }),
        other => number(other).map(Guests::Count),
    }
}

fn parse_property(value: &Value) -> Option<PropertyRef> {
    match value {
        Value::String(id) => Some(PropertyRef::Id(id.clone())),
        Value::Object(obj) => Some(PropertyRef::Populated {
            id: text(obj, "_id"),
            property_name: text(obj, "propertyName"),
            location: text(obj, "location"),
            map_link: text(obj, "mapLink"),
        }),
        _ => None,
    }
}

fn parse_user(value: &Value) -> Option<UserRef> {
    match value {
        Value::String(id) => Some(UserRef::Id(id.clone())),
        Value::Object(obj) => Some(UserRef::Populated {
            id: text(obj, "_id"),
            first_name: text(obj, "firstName"),
            last_name: text(obj, "lastName"),
            phone: text(obj, "phone"),
        }),
        _ => None,
    }
}
