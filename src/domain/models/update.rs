//! Inbound strategic update payloads.
//!
//! The webhook body is loosely shaped JSON. It is parsed in two steps: the
//! `action` tag is read first and selects an [`ActionKind`], then the whole
//! body is deserialized into the variant struct for that action. A missing or
//! unrecognised tag and a malformed variant are reported separately so the
//! handler can answer with the right error.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::domain::errors::RelayError;

/// Dispatch tag carried in the `action` field of an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    StrategicAnalysis,
    DashboardUpdate,
    SendEmail,
    ComplexUpdate,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrategicAnalysis => "strategic-analysis",
            Self::DashboardUpdate => "dashboard-update",
            Self::SendEmail => "send-email",
            Self::ComplexUpdate => "complex-update",
        }
    }

    /// Tags are matched exactly; there are no aliases.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "strategic-analysis" => Some(Self::StrategicAnalysis),
            "dashboard-update" => Some(Self::DashboardUpdate),
            "send-email" => Some(Self::SendEmail),
            "complex-update" => Some(Self::ComplexUpdate),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON object entries kept in document order.
///
/// Project names are rendered one per line in the order the caller sent
/// them, so the mapping cannot be a hash or B-tree map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Progress and context reported for a single project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    /// Kept as the JSON number so it renders exactly as sent
    #[serde(default)]
    pub progress: Option<Number>,
    #[serde(default)]
    pub context: Option<String>,
}

/// One requested outbound communication.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

/// Snapshot of dashboard values to publish.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub projects: Option<OrderedMap<Value>>,
    #[serde(default)]
    pub current_focus: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// Fields used by the `strategic-analysis` action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicAnalysis {
    #[serde(default)]
    pub conversation_type: Option<String>,
    #[serde(default)]
    pub strategic_insights: Option<String>,
    #[serde(default)]
    pub project_updates: Option<OrderedMap<ProjectUpdate>>,
    #[serde(default)]
    pub research_needs: Option<String>,
}

/// Fields used by the `dashboard-update` action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUpdate {
    #[serde(default)]
    pub dashboard_data: Option<DashboardData>,
}

/// Fields used by the `send-email` action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailBatch {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email_requests: Vec<EmailRequest>,
}

/// Fields used by the `complex-update` action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexUpdate {
    #[serde(default)]
    pub conversation_type: Option<String>,
    #[serde(default)]
    pub strategic_insights: Option<String>,
    #[serde(default)]
    pub project_updates: Option<OrderedMap<ProjectUpdate>>,
    #[serde(default)]
    pub research_needs: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email_requests: Vec<EmailRequest>,
    #[serde(default)]
    pub dashboard_data: Option<DashboardData>,
}

impl ComplexUpdate {
    /// The strategic-analysis portion, present only when insights were sent.
    pub fn strategic_part(&self) -> Option<StrategicAnalysis> {
        let insights = self.strategic_insights.as_deref().filter(|s| !s.is_empty())?;
        Some(StrategicAnalysis {
            conversation_type: self.conversation_type.clone(),
            strategic_insights: Some(insights.to_string()),
            project_updates: self.project_updates.clone(),
            research_needs: self.research_needs.clone(),
        })
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Only the dispatch tag; other fields are skipped without being decoded.
#[derive(Deserialize)]
struct ActionTag {
    #[serde(default)]
    action: Option<String>,
}

/// A validated update request, one variant per action.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    StrategicAnalysis(StrategicAnalysis),
    DashboardUpdate(DashboardUpdate),
    SendEmail(EmailBatch),
    ComplexUpdate(ComplexUpdate),
}

impl UpdateAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::StrategicAnalysis(_) => ActionKind::StrategicAnalysis,
            Self::DashboardUpdate(_) => ActionKind::DashboardUpdate,
            Self::SendEmail(_) => ActionKind::SendEmail,
            Self::ComplexUpdate(_) => ActionKind::ComplexUpdate,
        }
    }

    /// Parse a raw request body.
    ///
    /// Bodies that are not a JSON object carry no action and are rejected as
    /// [`RelayError::UnknownAction`]. A body whose tag is readable but whose
    /// other values are not (e.g. a number out of `f64` range) is an
    /// [`RelayError::InvalidPayload`].
    pub fn from_slice(body: &[u8]) -> Result<Self, RelayError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => match serde_json::from_slice::<ActionTag>(body) {
                Ok(ActionTag {
                    action: Some(action),
                }) if ActionKind::from_str(&action).is_some() => {
                    Err(RelayError::InvalidPayload(e.to_string()))
                }
                _ => Err(RelayError::UnknownAction),
            },
        }
    }

    pub fn from_value(value: Value) -> Result<Self, RelayError> {
        let kind = value
            .get("action")
            .and_then(Value::as_str)
            .and_then(ActionKind::from_str)
            .ok_or(RelayError::UnknownAction)?;

        let parsed = match kind {
            ActionKind::StrategicAnalysis => serde_json::from_value(value).map(Self::StrategicAnalysis),
            ActionKind::DashboardUpdate => serde_json::from_value(value).map(Self::DashboardUpdate),
            ActionKind::SendEmail => serde_json::from_value(value).map(Self::SendEmail),
            ActionKind::ComplexUpdate => serde_json::from_value(value).map(Self::ComplexUpdate),
        };

        parsed.map_err(|e| RelayError::InvalidPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_kind_round_trip() {
        for kind in [
            ActionKind::StrategicAnalysis,
            ActionKind::DashboardUpdate,
            ActionKind::SendEmail,
            ActionKind::ComplexUpdate,
        ] {
            assert_eq!(ActionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::from_str("Strategic-Analysis"), None);
        assert_eq!(ActionKind::from_str(""), None);
    }

    #[test]
    fn test_missing_action_is_unknown() {
        let err = UpdateAction::from_value(json!({"strategicInsights": "x"})).unwrap_err();
        assert!(matches!(err, RelayError::UnknownAction));
    }

    #[test]
    fn test_unrecognised_action_is_unknown() {
        let err = UpdateAction::from_value(json!({"action": "delete-everything"})).unwrap_err();
        assert!(matches!(err, RelayError::UnknownAction));

        let err = UpdateAction::from_value(json!({"action": 42})).unwrap_err();
        assert!(matches!(err, RelayError::UnknownAction));
    }

    #[test]
    fn test_non_object_body_is_unknown() {
        assert!(matches!(
            UpdateAction::from_slice(b"not json").unwrap_err(),
            RelayError::UnknownAction
        ));
        assert!(matches!(
            UpdateAction::from_slice(b"[1,2,3]").unwrap_err(),
            RelayError::UnknownAction
        ));
        assert!(matches!(
            UpdateAction::from_slice(b"").unwrap_err(),
            RelayError::UnknownAction
        ));
    }

    #[test]
    fn test_email_requests_must_be_a_list() {
        let err = UpdateAction::from_value(json!({
            "action": "send-email",
            "emailRequests": {"subject": "hi"}
        }))
        .unwrap_err();
        assert!(matches!(err, RelayError::InvalidPayload(_)));
    }

    #[test]
    fn test_null_email_requests_is_empty() {
        let action = UpdateAction::from_value(json!({
            "action": "send-email",
            "emailRequests": null
        }))
        .unwrap();
        match action {
            UpdateAction::SendEmail(batch) => assert!(batch.email_requests.is_empty()),
            other => panic!("Expected SendEmail, got {other:?}"),
        }
    }

    #[test]
    fn test_unrepresentable_number_with_known_action_is_invalid_payload() {
        let err = UpdateAction::from_slice(
            br#"{"action":"strategic-analysis","projectUpdates":{"A":{"progress":1e400}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::InvalidPayload(_)), "got {err:?}");
    }

    #[test]
    fn test_broken_json_without_readable_action_is_unknown() {
        let bodies: [&[u8]; 3] = [
            br#"{"action":"send-email","#,
            br#"{"action":"nope","x":1e400}"#,
            b"not json",
        ];
        for body in bodies {
            let err = UpdateAction::from_slice(body).unwrap_err();
            assert!(matches!(err, RelayError::UnknownAction), "got {err:?}");
        }
    }

    #[test]
    fn test_project_updates_keep_document_order() {
        let action = UpdateAction::from_slice(
            br#"{
                "action": "strategic-analysis",
                "projectUpdates": {
                    "zeta": {"progress": 10},
                    "alpha": {"context": "kickoff"},
                    "mid": {}
                }
            }"#,
        )
        .unwrap();

        let UpdateAction::StrategicAnalysis(analysis) = action else {
            panic!("Expected StrategicAnalysis");
        };
        let projects = analysis.project_updates.unwrap();
        let names: Vec<&str> = projects.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            projects.iter().next().unwrap().1.progress.as_ref().and_then(Number::as_u64),
            Some(10)
        );
    }

    #[test]
    fn test_email_request_type_field() {
        let action = UpdateAction::from_value(json!({
            "action": "send-email",
            "emailRequests": [{"type": "follow-up", "subject": "Q3 plan"}]
        }))
        .unwrap();
        let UpdateAction::SendEmail(batch) = action else {
            panic!("Expected SendEmail");
        };
        assert_eq!(batch.email_requests[0].kind.as_deref(), Some("follow-up"));
        assert_eq!(batch.email_requests[0].subject.as_deref(), Some("Q3 plan"));
    }

    #[test]
    fn test_complex_update_strategic_part_requires_insights() {
        let update = ComplexUpdate {
            strategic_insights: Some(String::new()),
            ..Default::default()
        };
        assert!(update.strategic_part().is_none());

        let update = ComplexUpdate {
            strategic_insights: Some("Focus on retention".to_string()),
            research_needs: Some("Churn drivers".to_string()),
            ..Default::default()
        };
        let part = update.strategic_part().unwrap();
        assert_eq!(part.strategic_insights.as_deref(), Some("Focus on retention"));
        assert_eq!(part.research_needs.as_deref(), Some("Churn drivers"));
    }
}
