//! Business recommendation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored business recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: i64,
    pub business_name: String,
    pub address: String,
    pub website_url: Option<String>,
    pub telephone: Option<String>,
    pub recommendation_reason: String,
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub services: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a recommendation.
///
/// Required fields default to empty so that a missing field and an empty
/// field are rejected the same way by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRecommendation {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub recommendation_reason: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub services: Vec<String>,
}

/// `null` and a missing field both mean "no services"
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewRecommendation {
    pub fn new(
        business_name: impl Into<String>,
        address: impl Into<String>,
        recommendation_reason: impl Into<String>,
    ) -> Self {
        Self {
            business_name: business_name.into(),
            address: address.into(),
            recommendation_reason: recommendation_reason.into(),
            ..Default::default()
        }
    }
}

/// Columns that a partial update may change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationField {
    BusinessName,
    Address,
    WebsiteUrl,
    Telephone,
    RecommendationReason,
}

impl RecommendationField {
    /// Storage column name
    pub fn column(&self) -> &'static str {
        match self {
            RecommendationField::BusinessName => "business_name",
            RecommendationField::Address => "address",
            RecommendationField::WebsiteUrl => "website_url",
            RecommendationField::Telephone => "telephone",
            RecommendationField::RecommendationReason => "recommendation_reason",
        }
    }

    /// Whether the field may never be empty
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            RecommendationField::BusinessName
                | RecommendationField::Address
                | RecommendationField::RecommendationReason
        )
    }
}

impl std::fmt::Display for RecommendationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Partial update: only fields that are `Some` change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_reason: Option<String>,
}

impl RecommendationPatch {
    /// Present fields with their new values, in column order
    pub fn assignments(&self) -> Vec<(RecommendationField, &str)> {
        [
            (RecommendationField::BusinessName, &self.business_name),
            (RecommendationField::Address, &self.address),
            (RecommendationField::WebsiteUrl, &self.website_url),
            (RecommendationField::Telephone, &self.telephone),
            (
                RecommendationField::RecommendationReason,
                &self.recommendation_reason,
            ),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Apply the present fields to a record in place.
    ///
    /// `updated_at` is left to the caller.
    pub fn apply_to(&self, record: &mut RecommendationRecord) {
        for (field, value) in self.assignments() {
            let value = value.to_string();
            match field {
                RecommendationField::BusinessName => record.business_name = value,
                RecommendationField::Address => record.address = value,
                RecommendationField::WebsiteUrl => record.website_url = Some(value),
                RecommendationField::Telephone => record.telephone = Some(value),
                RecommendationField::RecommendationReason => {
                    record.recommendation_reason = value
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RecommendationRecord {
        let now = Utc::now();
        RecommendationRecord {
            id: 1,
            business_name: "Bright Smiles".to_string(),
            address: "1 Market St".to_string(),
            website_url: None,
            telephone: None,
            recommendation_reason: "Gentle with kids".to_string(),
            rating: Some(4.5),
            services: vec!["Cleaning".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_patch_assignments_only_present_fields() {
        let patch = RecommendationPatch {
            telephone: Some("555-1212".to_string()),
            address: Some("2 Mission St".to_string()),
            ..Default::default()
        };

        let fields: Vec<_> = patch.assignments();
        assert_eq!(
            fields,
            vec![
                (RecommendationField::Address, "2 Mission St"),
                (RecommendationField::Telephone, "555-1212"),
            ]
        );
        assert!(!patch.is_empty());
        assert!(RecommendationPatch::default().is_empty());
    }

    #[test]
    fn test_patch_apply_keeps_untouched_fields() {
        let mut rec = record();
        let patch = RecommendationPatch {
            telephone: Some("555-1212".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut rec);

        assert_eq!(rec.telephone.as_deref(), Some("555-1212"));
        assert_eq!(rec.business_name, "Bright Smiles");
        assert_eq!(rec.address, "1 Market St");
        assert_eq!(rec.recommendation_reason, "Gentle with kids");
    }

    #[test]
    fn test_new_recommendation_defaults_missing_fields() {
        let parsed: NewRecommendation =
            serde_json::from_str(r#"{"business_name":"A","address":"1 St"}"#).unwrap();
        assert_eq!(parsed.recommendation_reason, "");
        assert!(parsed.services.is_empty());
        assert_eq!(parsed.rating, None);
    }

    #[test]
    fn test_null_services_read_as_empty() {
        let parsed: NewRecommendation = serde_json::from_str(
            r#"{"business_name":"A","address":"B","recommendation_reason":"C","services":null}"#,
        )
        .unwrap();
        assert!(parsed.services.is_empty());

        let parsed: NewRecommendation =
            serde_json::from_str(r#"{"services":["Cleaning","Whitening"]}"#).unwrap();
        assert_eq!(parsed.services, vec!["Cleaning", "Whitening"]);
    }

    #[test]
    fn test_required_fields() {
        assert!(RecommendationField::BusinessName.is_required());
        assert!(RecommendationField::RecommendationReason.is_required());
        assert!(!RecommendationField::Telephone.is_required());
        assert_eq!(RecommendationField::WebsiteUrl.to_string(), "website_url");
    }
}
