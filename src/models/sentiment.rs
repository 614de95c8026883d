use serde::Serialize;

/// Review polarity as scored by the upstream sentiment model
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Integer code stored in the `sentiment_analysis` column
    pub fn code(self) -> i64 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Sentiment::Negative),
            1 => Some(Sentiment::Neutral),
            2 => Some(Sentiment::Positive),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for sentiment in [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive] {
            assert_eq!(Sentiment::from_code(sentiment.code()), Some(sentiment));
        }
        assert_eq!(Sentiment::from_code(3), None);
    }

    #[test]
    fn test_sentiment_serialization() {
        assert_eq!(serde_json::to_string(&Sentiment::Positive).unwrap(), "\"positive\"");
    }
}
