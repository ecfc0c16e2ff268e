//! Sentiment and emotion aggregation for the client analytics panel.
//!
//! Turns the raw note-distribution payload into bucketed sentiment counts,
//! ranked emotions, chart datasets and a one-paragraph narrative. Everything
//! here is a pure function of the payload.

use crate::errors::ApiError;
use crate::models::{AnalyticsPayload, SentimentCount};
use serde::Serialize;
use std::fmt::Write;

/// Sentinel the backend returns when its own summary generation failed.
pub const SUMMARY_UNAVAILABLE: &str = "Unable to generate analysis summary at this time.";

const SENTIMENT_FILL: [&str; 4] = [
    "rgba(72, 187, 120, 0.8)",
    "rgba(66, 153, 225, 0.8)",
    "rgba(245, 101, 101, 0.8)",
    "rgba(156, 163, 175, 0.8)",
];

const SENTIMENT_BORDER: [&str; 4] = [
    "rgba(72, 187, 120, 1)",
    "rgba(66, 153, 225, 1)",
    "rgba(245, 101, 101, 1)",
    "rgba(156, 163, 175, 1)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Positive,
    Neutral,
    Negative,
    Uncategorized,
}

impl Bucket {
    /// Chart order.
    pub const ALL: [Bucket; 4] = [
        Bucket::Positive,
        Bucket::Neutral,
        Bucket::Negative,
        Bucket::Uncategorized,
    ];

    /// Folds a free-form backend label into a bucket. The checks run in a
    /// fixed order so "uncategorised" wins over anything else it contains.
    pub fn classify(label: &str) -> Option<Bucket> {
        let label = label.to_lowercase();
        if label.contains("uncategorised") || label.contains("uncategorized") {
            Some(Bucket::Uncategorized)
        } else if label.contains("neutral") {
            Some(Bucket::Neutral)
        } else if label.contains("negative") {
            Some(Bucket::Negative)
        } else if label.contains("positive") {
            Some(Bucket::Positive)
        } else {
            None
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Bucket::Positive => "positive",
            Bucket::Neutral => "neutral",
            Bucket::Negative => "negative",
            Bucket::Uncategorized => "uncategorized",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Bucket::Positive => "Positive",
            Bucket::Neutral => "Neutral",
            Bucket::Negative => "Negative",
            Bucket::Uncategorized => "Uncategorized",
        }
    }
}

/// Per-bucket totals. `None` means no label folded into the bucket, which
/// the narrative treats differently from an explicit zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBuckets {
    pub positive: Option<u64>,
    pub neutral: Option<u64>,
    pub negative: Option<u64>,
    pub uncategorized: Option<u64>,
    #[serde(skip)]
    first_seen: Vec<Bucket>,
}

impl SentimentBuckets {
    pub fn from_counts(entries: &[SentimentCount]) -> Self {
        let mut buckets = Self::default();
        for entry in entries {
            if let Some(bucket) = Bucket::classify(&entry.sentiment) {
                if !buckets.first_seen.contains(&bucket) {
                    buckets.first_seen.push(bucket);
                }
                let slot = buckets.slot_mut(bucket);
                *slot = Some(slot.unwrap_or(0).saturating_add(entry.count));
            }
        }
        buckets
    }

    pub fn get(&self, bucket: Bucket) -> Option<u64> {
        match bucket {
            Bucket::Positive => self.positive,
            Bucket::Neutral => self.neutral,
            Bucket::Negative => self.negative,
            Bucket::Uncategorized => self.uncategorized,
        }
    }

    pub fn count(&self, bucket: Bucket) -> u64 {
        self.get(bucket).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        Bucket::ALL
            .iter()
            .fold(0u64, |acc, bucket| acc.saturating_add(self.count(*bucket)))
    }

    pub fn percentage(&self, bucket: Bucket) -> f64 {
        percentage(self.count(bucket), self.total())
    }

    fn slot_mut(&mut self, bucket: Bucket) -> &mut Option<u64> {
        match bucket {
            Bucket::Positive => &mut self.positive,
            Bucket::Neutral => &mut self.neutral,
            Bucket::Negative => &mut self.negative,
            Bucket::Uncategorized => &mut self.uncategorized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketShare {
    pub bucket: Bucket,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionShare {
    pub name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub title: String,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
    pub border_color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub sentiment_buckets: SentimentBuckets,
    pub total_count: u64,
    pub emotions: Vec<EmotionShare>,
    pub narrative_summary: String,
    pub sentiment_chart: ChartDataset,
    pub emotion_chart: ChartDataset,
}

impl AnalyticsSummary {
    pub fn dominant_emotion(&self) -> Option<&EmotionShare> {
        self.emotions.first()
    }

    pub fn primary_emotions(&self) -> &[EmotionShare] {
        let end = self.emotions.len().min(3);
        &self.emotions[..end]
    }

    /// Present buckets, largest first, at most three. Equal counts keep the
    /// order in which their labels first appeared in the payload.
    pub fn sentiment_overview(&self) -> Vec<BucketShare> {
        let mut shares: Vec<BucketShare> = self
            .sentiment_buckets
            .first_seen
            .iter()
            .filter_map(|bucket| self.share(*bucket))
            .collect();
        shares.sort_by(|a, b| b.count.cmp(&a.count));
        shares.truncate(3);
        shares
    }

    /// Present buckets in chart order.
    pub fn present_buckets(&self) -> Vec<BucketShare> {
        Bucket::ALL
            .iter()
            .filter_map(|bucket| self.share(*bucket))
            .collect()
    }

    fn share(&self, bucket: Bucket) -> Option<BucketShare> {
        self.sentiment_buckets.get(bucket).map(|count| BucketShare {
            bucket,
            count,
            percentage: percentage(count, self.total_count),
        })
    }
}

pub fn decode_payload(body: &[u8]) -> Result<AnalyticsPayload, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

pub fn summarize(payload: &AnalyticsPayload) -> Result<AnalyticsSummary, ApiError> {
    let sentiment_buckets = SentimentBuckets::from_counts(&payload.sentiment_distribution);
    let total_count = sentiment_buckets.total();
    let emotions = rank_emotions(payload)?;
    let narrative_summary = narrative(&payload.analysis_summary, &sentiment_buckets, &emotions);
    let sentiment_chart = sentiment_chart(&sentiment_buckets);
    let emotion_chart = emotion_chart(&emotions);

    Ok(AnalyticsSummary {
        sentiment_buckets,
        total_count,
        emotions,
        narrative_summary,
        sentiment_chart,
        emotion_chart,
    })
}

pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

fn rank_emotions(payload: &AnalyticsPayload) -> Result<Vec<EmotionShare>, ApiError> {
    let mut emotions = Vec::with_capacity(payload.emotion_distribution.len());
    for (name, value) in &payload.emotion_distribution {
        let fraction = value.as_f64().ok_or_else(|| {
            ApiError::DataShape(format!("emotion '{name}' has a non-numeric share"))
        })?;
        emotions.push(EmotionShare {
            name: capitalize(name),
            percentage: fraction * 100.0,
        });
    }
    // sort_by is stable, equal shares keep payload order
    emotions.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    Ok(emotions)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn narrative(supplied: &str, buckets: &SentimentBuckets, emotions: &[EmotionShare]) -> String {
    if supplied != SUMMARY_UNAVAILABLE {
        return supplied.to_string();
    }
    fallback_narrative(buckets, emotions)
}

pub fn fallback_narrative(buckets: &SentimentBuckets, emotions: &[EmotionShare]) -> String {
    let (Some(dominant), Some(positive)) = (emotions.first(), buckets.positive) else {
        return String::new();
    };

    let negative = buckets.count(Bucket::Negative);
    let leading = if positive >= negative {
        Bucket::Positive
    } else {
        Bucket::Negative
    };

    let mut text = format!(
        "This client generally shows {} sentiment ({:.1}%) with {} being the dominant emotion ({:.1}%).",
        leading.key(),
        buckets.percentage(leading),
        dominant.name.to_lowercase(),
        dominant.percentage,
    );

    if negative > 0 {
        text.push_str(" There are some instances of negative sentiment that might need attention.");
    }

    if buckets.count(Bucket::Uncategorized) > 0 {
        let _ = write!(
            text,
            " Note: {:.1}% of sentiments remain uncategorized.",
            buckets.percentage(Bucket::Uncategorized)
        );
    }

    text
}

fn sentiment_chart(buckets: &SentimentBuckets) -> ChartDataset {
    ChartDataset {
        title: "Sentiment Distribution".to_string(),
        labels: Bucket::ALL.iter().map(|b| b.title().to_string()).collect(),
        data: Bucket::ALL.iter().map(|b| buckets.percentage(*b)).collect(),
        background_color: SENTIMENT_FILL.iter().map(|c| c.to_string()).collect(),
        border_color: SENTIMENT_BORDER.iter().map(|c| c.to_string()).collect(),
    }
}

fn emotion_chart(emotions: &[EmotionShare]) -> ChartDataset {
    ChartDataset {
        title: "Emotion Distribution".to_string(),
        labels: emotions.iter().map(|e| e.name.clone()).collect(),
        data: emotions.iter().map(|e| e.percentage).collect(),
        background_color: (0..emotions.len()).map(|i| emotion_colour(i, 0.8)).collect(),
        border_color: (0..emotions.len()).map(|i| emotion_colour(i, 1.0)).collect(),
    }
}

fn emotion_colour(index: usize, alpha: f64) -> String {
    format!(
        "rgba({}, {}, {}, {alpha})",
        index * 30 + 100,
        index * 20 + 100,
        index * 40 + 100,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counts(entries: &[(&str, u64)]) -> Vec<SentimentCount> {
        entries
            .iter()
            .map(|(sentiment, count)| SentimentCount {
                sentiment: sentiment.to_string(),
                count: *count,
            })
            .collect()
    }

    fn payload(value: serde_json::Value) -> AnalyticsPayload {
        serde_json::from_value(value).expect("valid payload")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn buckets_sum_to_total_and_ignore_unknown_labels() {
        let buckets = SentimentBuckets::from_counts(&counts(&[
            ("Positive", 2),
            ("very POSITIVE", 3),
            ("Negative", 1),
            ("Mixed", 40),
            ("Uncategorised", 4),
            ("neutral-ish", 5),
        ]));

        assert_eq!(buckets.positive, Some(5));
        assert_eq!(buckets.negative, Some(1));
        assert_eq!(buckets.neutral, Some(5));
        assert_eq!(buckets.uncategorized, Some(4));
        assert_eq!(buckets.total(), 15);
        let summed: u64 = Bucket::ALL.iter().map(|b| buckets.count(*b)).sum();
        assert_eq!(summed, buckets.total());
    }

    #[test]
    fn classify_checks_uncategorised_first() {
        assert_eq!(Bucket::classify("Uncategorized positive"), Some(Bucket::Uncategorized));
        assert_eq!(Bucket::classify("neutral/negative"), Some(Bucket::Neutral));
        assert_eq!(Bucket::classify("NEGATIVE"), Some(Bucket::Negative));
        assert_eq!(Bucket::classify("joyful"), None);
    }

    #[test]
    fn percentages_follow_counts() {
        let buckets = SentimentBuckets::from_counts(&counts(&[("positive", 3), ("negative", 1)]));
        assert!(approx(buckets.percentage(Bucket::Positive), 75.0));
        assert!(approx(buckets.percentage(Bucket::Negative), 25.0));
        assert!(approx(buckets.percentage(Bucket::Neutral), 0.0));
        assert!(approx(buckets.percentage(Bucket::Uncategorized), 0.0));
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let summary = summarize(&payload(json!({
            "sentiment_distribution": [{"sentiment": "Positive", "count": 0}],
            "emotion_distribution": {},
            "analysis_summary": SUMMARY_UNAVAILABLE
        })))
        .unwrap();

        assert_eq!(summary.total_count, 0);
        for value in &summary.sentiment_chart.data {
            assert!(!value.is_nan());
            assert_eq!(*value, 0.0);
        }
        for share in summary.present_buckets() {
            assert_eq!(share.percentage, 0.0);
        }
    }

    #[test]
    fn emotions_rank_descending_with_capitalised_names() {
        let summary = summarize(&payload(json!({
            "sentiment_distribution": [],
            "emotion_distribution": {"joy": 0.5, "anger": 0.2, "calm": 0.3},
            "analysis_summary": "x"
        })))
        .unwrap();

        let names: Vec<&str> = summary.emotions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Joy", "Calm", "Anger"]);
        assert!(approx(summary.emotions[0].percentage, 50.0));
        assert!(approx(summary.emotions[1].percentage, 30.0));
        assert!(approx(summary.emotions[2].percentage, 20.0));
        assert_eq!(summary.dominant_emotion().map(|e| e.name.as_str()), Some("Joy"));
    }

    #[test]
    fn equal_emotion_shares_keep_payload_order() {
        let summary = summarize(&payload(json!({
            "sentiment_distribution": [],
            "emotion_distribution": {"worry": 0.25, "hope": 0.25, "relief": 0.5},
            "analysis_summary": "x"
        })))
        .unwrap();

        let names: Vec<&str> = summary.emotions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Relief", "Worry", "Hope"]);
    }

    #[test]
    fn backend_summary_passes_through_verbatim() {
        let text = "  Client is stable.\nNo concerns.  ";
        let summary = summarize(&payload(json!({
            "sentiment_distribution": [{"sentiment": "Positive", "count": 1}],
            "emotion_distribution": {"joy": 1.0},
            "analysis_summary": text
        })))
        .unwrap();
        assert_eq!(summary.narrative_summary, text);
    }

    #[test]
    fn sentinel_summary_is_replaced_by_fallback() {
        let summary = summarize(&payload(json!({
            "sentiment_distribution": [
                {"sentiment": "Positive", "count": 7},
                {"sentiment": "Negative", "count": 3}
            ],
            "emotion_distribution": {"joy": 0.4, "sadness": 0.1},
            "analysis_summary": SUMMARY_UNAVAILABLE
        })))
        .unwrap();

        assert_eq!(
            summary.narrative_summary,
            "This client generally shows positive sentiment (70.0%) with joy being the dominant \
             emotion (40.0%). There are some instances of negative sentiment that might need attention."
        );
    }

    #[test]
    fn fallback_mentions_uncategorized_share() {
        let buckets = SentimentBuckets::from_counts(&counts(&[
            ("Positive", 2),
            ("Uncategorised", 2),
        ]));
        let emotions = vec![EmotionShare {
            name: "Calm".to_string(),
            percentage: 60.0,
        }];

        assert_eq!(
            fallback_narrative(&buckets, &emotions),
            "This client generally shows positive sentiment (50.0%) with calm being the dominant \
             emotion (60.0%). Note: 50.0% of sentiments remain uncategorized."
        );
    }

    #[test]
    fn fallback_prefers_negative_when_it_leads() {
        let buckets = SentimentBuckets::from_counts(&counts(&[("Positive", 1), ("Negative", 3)]));
        let emotions = vec![EmotionShare {
            name: "Anxiety".to_string(),
            percentage: 55.0,
        }];

        let text = fallback_narrative(&buckets, &emotions);
        assert!(text.starts_with("This client generally shows negative sentiment (75.0%)"));
    }

    #[test]
    fn fallback_is_empty_without_emotions_or_positive_bucket() {
        let buckets = SentimentBuckets::from_counts(&counts(&[("Negative", 3)]));
        let emotions = vec![EmotionShare {
            name: "Anger".to_string(),
            percentage: 80.0,
        }];
        assert_eq!(fallback_narrative(&buckets, &emotions), "");

        let buckets = SentimentBuckets::from_counts(&counts(&[("Positive", 3)]));
        assert_eq!(fallback_narrative(&buckets, &[]), "");
    }

    #[test]
    fn overview_lists_present_buckets_by_count() {
        let summary = summarize(&payload(json!({
            "sentiment_distribution": [
                {"sentiment": "Neutral", "count": 1},
                {"sentiment": "Positive", "count": 6},
                {"sentiment": "Negative", "count": 3},
                {"sentiment": "Uncategorised", "count": 0}
            ],
            "emotion_distribution": {"a": 0.1, "b": 0.2, "c": 0.3, "d": 0.4},
            "analysis_summary": "x"
        })))
        .unwrap();

        let overview: Vec<Bucket> = summary.sentiment_overview().iter().map(|s| s.bucket).collect();
        assert_eq!(overview, [Bucket::Positive, Bucket::Negative, Bucket::Neutral]);
        assert_eq!(summary.primary_emotions().len(), 3);
        assert_eq!(summary.emotion_chart.background_color[1], "rgba(130, 120, 140, 0.8)");
    }

    #[test]
    fn overview_ties_follow_payload_order() {
        let summary = summarize(&payload(json!({
            "sentiment_distribution": [
                {"sentiment": "Negative", "count": 2},
                {"sentiment": "Uncategorised", "count": 1},
                {"sentiment": "Positive", "count": 2},
                {"sentiment": "Neutral", "count": 2}
            ],
            "emotion_distribution": {},
            "analysis_summary": "x"
        })))
        .unwrap();

        let overview: Vec<Bucket> = summary.sentiment_overview().iter().map(|s| s.bucket).collect();
        assert_eq!(overview, [Bucket::Negative, Bucket::Positive, Bucket::Neutral]);
        let charted: Vec<Bucket> = summary.present_buckets().iter().map(|s| s.bucket).collect();
        assert_eq!(charted, Bucket::ALL);
    }

    #[test]
    fn missing_fields_are_a_shape_error() {
        let err = decode_payload(br#"{"sentiment_distribution": []}"#).unwrap_err();
        assert!(matches!(err, ApiError::DataShape(_)));

        let bad = payload(json!({
            "sentiment_distribution": [],
            "emotion_distribution": {"joy": "lots"},
            "analysis_summary": "x"
        }));
        assert!(matches!(summarize(&bad), Err(ApiError::DataShape(_))));
    }
}
