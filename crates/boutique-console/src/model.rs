use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Helpers for fields the backend serializes inconsistently: ids that arrive
/// as strings or numbers, flags that arrive as `1`, `"1"`, `true` or
/// `"actif"`, amounts that arrive as numbers or decimal strings, and
/// timestamps in more than one format.
pub mod loose {
    use super::*;
    use serde::Deserializer;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Bool(bool),
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Scalar::deserialize(deserializer)? {
            Scalar::Text(s) => Ok(s),
            Scalar::Int(n) => Ok(n.to_string()),
            Scalar::Float(n) => Ok(n.to_string()),
            Scalar::Bool(_) => Err(serde::de::Error::custom("invalid id value")),
        }
    }

    pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Scalar::Text(s)) if s.is_empty() => Ok(None),
            Some(Scalar::Text(s)) => Ok(Some(s)),
            Some(Scalar::Int(n)) => Ok(Some(n.to_string())),
            Some(Scalar::Float(n)) => Ok(Some(n.to_string())),
            Some(Scalar::Bool(_)) => Err(serde::de::Error::custom("invalid id value")),
        }
    }

    fn flag_from(scalar: Scalar) -> Option<bool> {
        match scalar {
            Scalar::Bool(b) => Some(b),
            Scalar::Int(n) => Some(n != 0),
            Scalar::Float(n) => Some(n != 0.0),
            Scalar::Text(s) => match s.trim().to_lowercase().as_str() {
                "1" | "true" | "actif" | "active" | "oui" | "yes" => Some(true),
                "" | "0" | "false" | "inactif" | "inactive" | "non" | "no" => Some(false),
                _ => None,
            },
        }
    }

    pub fn opt_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(scalar) => flag_from(scalar)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom("invalid flag value")),
        }
    }

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Scalar>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Scalar::Float(n)) => Ok(Some(n)),
            Some(Scalar::Int(n)) => Ok(Some(n as f64)),
            Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Scalar::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom("invalid numeric value")),
            Some(Scalar::Bool(_)) => Err(serde::de::Error::custom("invalid numeric value")),
        }
    }

    /// Accepts RFC 3339 as well as the backend's bare
    /// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` timestamps.
    pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(parsed.with_timezone(&Utc)));
        }
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Some(parsed.and_utc()));
            }
        }
        if let Ok(parsed) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            if let Some(midnight) = parsed.and_hms_opt(0, 0, 0) {
                return Ok(Some(midnight.and_utc()));
            }
        }
        Err(serde::de::Error::custom("invalid timestamp value"))
    }
}

/// An order as returned by the listing endpoint. Only `id` and `status` are
/// guaranteed; everything else is best-effort display data.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "loose::id")]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "loose::opt_f64")]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "loose::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Commune lookup entry, also embedded inside franchises.
#[derive(Debug, Clone, Deserialize)]
pub struct Commune {
    #[serde(deserialize_with = "loose::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Reference to another entity embedded in a record (`{ id, name }`).
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    #[serde(deserialize_with = "loose::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Franchise {
    #[serde(deserialize_with = "loose::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "loose::opt_flag")]
    pub active: Option<bool>,
    /// Flat foreign key, when the backend sends one.
    #[serde(default, deserialize_with = "loose::opt_id")]
    pub commune_id: Option<String>,
    /// Nested object, when the backend expands the relation instead.
    #[serde(default)]
    pub commune: Option<Commune>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Admin {
    #[serde(deserialize_with = "loose::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "loose::opt_flag")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoutiqueUser {
    #[serde(deserialize_with = "loose::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "loose::opt_id")]
    pub boutique_id: Option<String>,
    #[serde(default)]
    pub boutique: Option<NamedRef>,
    #[serde(default, deserialize_with = "loose::opt_flag")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "loose::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "loose::opt_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "loose::opt_f64")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose::opt_flag")]
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_accepts_strings_and_numbers() {
        let from_number: Order = serde_json::from_value(serde_json::json!({
            "id": 42,
            "status": "En attente",
        }))
        .unwrap();
        assert_eq!(from_number.id, "42");

        let from_string: Order = serde_json::from_value(serde_json::json!({
            "id": "42",
            "status": "En attente",
        }))
        .unwrap();
        assert_eq!(from_string.id, "42");
    }

    #[test]
    fn order_total_accepts_decimal_strings() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 1,
            "status": "Livrée",
            "total": "129.90",
        }))
        .unwrap();
        assert_eq!(order.total, Some(129.90));
    }

    #[test]
    fn order_created_at_accepts_backend_formats() {
        for raw in [
            "2024-05-01T10:30:00Z",
            "2024-05-01 10:30:00",
            "2024-05-01T10:30:00",
        ] {
            let order: Order = serde_json::from_value(serde_json::json!({
                "id": 1,
                "status": "ok",
                "created_at": raw,
            }))
            .unwrap();
            let created = order.created_at.expect(raw);
            assert_eq!(created.to_rfc3339(), "2024-05-01T10:30:00+00:00");
        }
    }

    #[test]
    fn franchise_flag_accepts_every_backend_spelling() {
        for (raw, expected) in [
            (serde_json::json!(1), true),
            (serde_json::json!("1"), true),
            (serde_json::json!("actif"), true),
            (serde_json::json!(true), true),
            (serde_json::json!(0), false),
            (serde_json::json!("0"), false),
            (serde_json::json!("inactif"), false),
        ] {
            let franchise: Franchise = serde_json::from_value(serde_json::json!({
                "id": 1,
                "name": "Atelier Nord",
                "active": raw.clone(),
            }))
            .unwrap();
            assert_eq!(franchise.active, Some(expected), "raw flag: {:?}", raw);
        }
    }

    #[test]
    fn franchise_commune_accepts_flat_and_nested_forms() {
        let nested: Franchise = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Atelier Nord",
            "commune": { "id": 59, "name": "Lille" },
        }))
        .unwrap();
        assert_eq!(nested.commune.as_ref().map(|c| c.id.as_str()), Some("59"));
        assert!(nested.commune_id.is_none());

        let flat: Franchise = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Atelier Nord",
            "commune_id": "59",
        }))
        .unwrap();
        assert_eq!(flat.commune_id.as_deref(), Some("59"));
    }

    #[test]
    fn unknown_flag_spelling_is_rejected() {
        let result: Result<Admin, _> = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Root",
            "active": "maybe",
        }));
        assert!(result.is_err());
    }
}
