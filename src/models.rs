use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub name: String,
    pub popularity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Excellent,
    Good,
    Normal,
}

impl Tier {
    /// Presentation order: best tier first.
    pub const ALL: [Tier; 3] = [Tier::Excellent, Tier::Good, Tier::Normal];

    pub fn from_total(total: Option<u32>) -> Tier {
        match total {
            Some(t) if t >= 80 => Tier::Excellent,
            Some(t) if t >= 60 => Tier::Good,
            _ => Tier::Normal,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Tier::Excellent => "excellent",
            Tier::Good => "good",
            Tier::Normal => "normal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent",
            Tier::Good => "Good",
            Tier::Normal => "Normal",
        }
    }

    pub fn range_caption(self) -> &'static str {
        match self {
            Tier::Excellent => "≥80",
            Tier::Good => "60-79",
            Tier::Normal => "<60",
        }
    }
}

/// Sub-scores as returned by the model. Values that are missing or not a
/// non-negative number deserialize as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBreakdown {
    #[serde(deserialize_with = "lenient_score")]
    pub innovation: Option<u32>,
    #[serde(deserialize_with = "lenient_score")]
    pub topicality: Option<u32>,
    #[serde(deserialize_with = "lenient_score")]
    pub fun: Option<u32>,
    #[serde(deserialize_with = "lenient_score")]
    pub practicality: Option<u32>,
    #[serde(deserialize_with = "lenient_score")]
    pub feasibility: Option<u32>,
    #[serde(deserialize_with = "lenient_score")]
    pub total: Option<u32>,
}

impl ScoreBreakdown {
    pub const MAX_INNOVATION: u32 = 30;
    pub const MAX_TOPICALITY: u32 = 25;
    pub const MAX_FUN: u32 = 25;
    pub const MAX_PRACTICALITY: u32 = 10;
    pub const MAX_FEASIBILITY: u32 = 10;

    /// Sum of the five sub-scores, absent ones counting as zero.
    /// Widened to `u64` so arbitrary model values cannot overflow.
    pub fn component_sum(&self) -> u64 {
        [
            self.innovation,
            self.topicality,
            self.fun,
            self.practicality,
            self.feasibility,
        ]
        .iter()
        .map(|s| u64::from(s.unwrap_or(0)))
        .sum()
    }

    pub fn is_consistent(&self) -> bool {
        self.total.map(u64::from) == Some(self.component_sum())
    }

    /// (label, value, max) rows in display order.
    pub fn rows(&self) -> [(&'static str, u32, u32); 5] {
        [
            ("Innovation", self.innovation.unwrap_or(0), Self::MAX_INNOVATION),
            ("Topicality", self.topicality.unwrap_or(0), Self::MAX_TOPICALITY),
            ("Fun", self.fun.unwrap_or(0), Self::MAX_FUN),
            ("Practicality", self.practicality.unwrap_or(0), Self::MAX_PRACTICALITY),
            ("Feasibility", self.feasibility.unwrap_or(0), Self::MAX_FEASIBILITY),
        ]
    }
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(score_from_value(&value))
}

fn score_from_value(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f.round() as u32)
            }
        }
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(text_from_value(value).unwrap_or_default())
}

fn text_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// a bare string becomes a one-point timeline; null and other shapes become empty
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => {
            items.into_iter().filter_map(text_from_value).collect()
        }
        serde_json::Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_scores<'de, D>(deserializer: D) -> Result<ScoreBreakdown, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => ScoreBreakdown::default(),
    })
}

/// One idea as parsed from the model output, before classification.
/// Null or wrong-typed fields fall back to their defaults instead of failing the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdeaDraft {
    #[serde(rename = "hotTopic", alias = "topic", deserialize_with = "lenient_text")]
    pub topic: String,
    #[serde(deserialize_with = "lenient_text")]
    pub product_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub core_function: String,
    #[serde(deserialize_with = "lenient_text")]
    pub target_users: String,
    #[serde(rename = "eventTimeline", alias = "timeline", deserialize_with = "lenient_list")]
    pub timeline: Vec<String>,
    #[serde(deserialize_with = "lenient_scores")]
    pub scores: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdeaRecord {
    pub topic: String,
    pub product_name: String,
    pub core_function: String,
    pub target_users: String,
    pub timeline: Vec<String>,
    pub scores: ScoreBreakdown,
    pub tier: Tier,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_total(Some(84)), Tier::Excellent);
        assert_eq!(Tier::from_total(Some(80)), Tier::Excellent);
        assert_eq!(Tier::from_total(Some(79)), Tier::Good);
        assert_eq!(Tier::from_total(Some(60)), Tier::Good);
        assert_eq!(Tier::from_total(Some(59)), Tier::Normal);
        assert_eq!(Tier::from_total(Some(0)), Tier::Normal);
        assert_eq!(Tier::from_total(None), Tier::Normal);
    }

    #[test]
    fn test_idea_draft_from_model_keys() {
        let draft: IdeaDraft = serde_json::from_value(json!({
            "hotTopic": "Heatwave",
            "productName": "CoolMap",
            "coreFunction": "Finds shade.",
            "targetUsers": "Commuters",
            "eventTimeline": ["a", "b", "c"],
            "scores": {
                "innovation": 25, "topicality": 22, "fun": 20,
                "practicality": 8, "feasibility": 9, "total": 84
            }
        }))
        .unwrap();

        assert_eq!(draft.topic, "Heatwave");
        assert_eq!(draft.timeline.len(), 3);
        assert_eq!(draft.scores.total, Some(84));
        assert!(draft.scores.is_consistent());
    }

    #[test]
    fn test_lenient_scores() {
        let scores: ScoreBreakdown = serde_json::from_value(json!({
            "innovation": 24.6,
            "topicality": "20",
            "fun": -3,
            "practicality": null,
            "total": "n/a"
        }))
        .unwrap();

        assert_eq!(scores.innovation, Some(25));
        assert_eq!(scores.topicality, Some(20));
        assert_eq!(scores.fun, None);
        assert_eq!(scores.practicality, None);
        assert_eq!(scores.feasibility, None);
        assert_eq!(scores.total, None);
        assert_eq!(scores.component_sum(), 45);
        assert!(!scores.is_consistent());
    }

    #[test]
    fn test_missing_scores_object_defaults() {
        let draft: IdeaDraft = serde_json::from_value(json!({ "hotTopic": "x" })).unwrap();
        assert_eq!(draft.scores, ScoreBreakdown::default());
        assert_eq!(Tier::from_total(draft.scores.total), Tier::Normal);
    }

    #[test]
    fn test_huge_sub_scores_do_not_overflow() {
        let scores: ScoreBreakdown = serde_json::from_value(json!({
            "innovation": 4000000000u64, "topicality": 4000000000u64,
            "fun": 4000000000u64, "practicality": 4000000000u64,
            "feasibility": 4000000000u64, "total": 85
        }))
        .unwrap();
        assert_eq!(scores.component_sum(), 20_000_000_000);
        assert!(!scores.is_consistent());
        assert_eq!(Tier::from_total(scores.total), Tier::Excellent);
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let draft: IdeaDraft = serde_json::from_value(json!({
            "hotTopic": "Heatwave",
            "productName": null,
            "coreFunction": 42,
            "targetUsers": ["not", "text"],
            "eventTimeline": null,
            "scores": null
        }))
        .unwrap();

        assert_eq!(draft.topic, "Heatwave");
        assert_eq!(draft.product_name, "");
        assert_eq!(draft.core_function, "42");
        assert_eq!(draft.target_users, "");
        assert!(draft.timeline.is_empty());
        assert_eq!(draft.scores, ScoreBreakdown::default());
        assert_eq!(Tier::from_total(draft.scores.total), Tier::Normal);
    }

    #[test]
    fn test_single_string_timeline() {
        let draft: IdeaDraft =
            serde_json::from_value(json!({ "eventTimeline": "one; two" })).unwrap();
        assert_eq!(draft.timeline, ["one; two"]);

        let draft: IdeaDraft =
            serde_json::from_value(json!({ "eventTimeline": ["a", null, 3] })).unwrap();
        assert_eq!(draft.timeline, ["a", "3"]);
    }

    #[test]
    fn test_non_object_scores_default() {
        let draft: IdeaDraft =
            serde_json::from_value(json!({ "hotTopic": "x", "scores": "85" })).unwrap();
        assert_eq!(draft.scores, ScoreBreakdown::default());
    }

    #[test]
    fn test_inconsistent_total_is_kept() {
        let scores: ScoreBreakdown = serde_json::from_value(json!({
            "innovation": 10, "topicality": 10, "fun": 10,
            "practicality": 5, "feasibility": 5, "total": 90
        }))
        .unwrap();
        assert_eq!(scores.component_sum(), 40);
        assert!(!scores.is_consistent());
        assert_eq!(Tier::from_total(scores.total), Tier::Excellent);
    }
}
