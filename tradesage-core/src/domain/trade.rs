//! Trade — a journaled discretionary trade with an optional psychology tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::ids::{StrategyId, TradeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[serde(alias = "buy")]
    Long,
    #[serde(alias = "sell")]
    Short,
}

/// Emotional state the trader recorded for the trade.
///
/// Declaration order is the display order of per-emotion breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Confident,
    Fearful,
    Greedy,
    Neutral,
    Anxious,
    Excited,
    Frustrated,
    Disciplined,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confident => "confident",
            Self::Fearful => "fearful",
            Self::Greedy => "greedy",
            Self::Neutral => "neutral",
            Self::Anxious => "anxious",
            Self::Excited => "excited",
            Self::Frustrated => "frustrated",
            Self::Disciplined => "disciplined",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: String,
    pub side: TradeSide,
    pub entry_price: f64,
    #[serde(default)]
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub entry_time: DateTime<Utc>,
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
    /// Realized P&L as reported by the broker, if known.
    #[serde(default)]
    pub pnl: Option<f64>,
    /// Null, missing or an empty CSV cell all read as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub fees: f64,
    #[serde(default)]
    pub emotion: Option<Emotion>,
    #[serde(default)]
    pub strategy_id: Option<StrategyId>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.exit_price.is_some()
    }

    /// Realized P&L net of fees. `None` while the trade is open.
    ///
    /// A broker-reported `pnl` wins over the price-derived value.
    pub fn realized_pnl(&self) -> Option<f64> {
        let exit = self.exit_price?;
        if let Some(pnl) = self.pnl {
            return Some(pnl);
        }
        let gross = match self.side {
            TradeSide::Long => (exit - self.entry_price) * self.quantity,
            TradeSide::Short => (self.entry_price - exit) * self.quantity,
        };
        Some(gross - self.fees)
    }

    /// Holding time in minutes, if both timestamps are known.
    pub fn holding_minutes(&self) -> Option<i64> {
        self.exit_time
            .map(|exit| (exit - self.entry_time).num_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn trade(side: TradeSide, entry: f64, exit: Option<f64>) -> Trade {
        Trade {
            id: TradeId::new("t1"),
            symbol: "AAPL".into(),
            side,
            entry_price: entry,
            exit_price: exit,
            quantity: 10.0,
            entry_time: Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap(),
            exit_time: None,
            pnl: None,
            fees: 1.0,
            emotion: None,
            strategy_id: None,
            notes: None,
        }
    }

    #[test]
    fn long_pnl_from_prices() {
        let t = trade(TradeSide::Long, 100.0, Some(105.0));
        assert_eq!(t.realized_pnl(), Some(49.0));
    }

    #[test]
    fn short_pnl_from_prices() {
        let t = trade(TradeSide::Short, 100.0, Some(105.0));
        assert_eq!(t.realized_pnl(), Some(-51.0));
    }

    #[test]
    fn reported_pnl_wins() {
        let mut t = trade(TradeSide::Long, 100.0, Some(105.0));
        t.pnl = Some(42.0);
        assert_eq!(t.realized_pnl(), Some(42.0));
    }

    #[test]
    fn open_trade_has_no_pnl() {
        let mut t = trade(TradeSide::Long, 100.0, None);
        t.pnl = Some(42.0);
        assert!(!t.is_closed());
        assert_eq!(t.realized_pnl(), None);
    }

    #[test]
    fn side_aliases() {
        let side: TradeSide = serde_json::from_str("\"buy\"").unwrap();
        assert_eq!(side, TradeSide::Long);
        let side: TradeSide = serde_json::from_str("\"short\"").unwrap();
        assert_eq!(side, TradeSide::Short);
    }

    #[test]
    fn emotion_order_follows_journal_tags() {
        let mut tags = vec![
            Emotion::Disciplined,
            Emotion::Greedy,
            Emotion::Neutral,
            Emotion::Confident,
            Emotion::Frustrated,
            Emotion::Fearful,
            Emotion::Excited,
            Emotion::Anxious,
        ];
        tags.sort();
        let names: Vec<&str> = tags.iter().map(Emotion::as_str).collect();
        assert_eq!(
            names,
            vec![
                "confident",
                "fearful",
                "greedy",
                "neutral",
                "anxious",
                "excited",
                "frustrated",
                "disciplined"
            ]
        );
    }

    #[test]
    fn null_fees_read_as_zero() {
        let t: Trade = serde_json::from_str(
            r#"{"id":"t9","symbol":"MSFT","side":"long","entry_price":400.0,
                "exit_price":404.0,"quantity":5,"entry_time":"2024-05-01T14:00:00Z",
                "fees":null}"#,
        )
        .unwrap();
        assert_eq!(t.fees, 0.0);
        assert_eq!(t.realized_pnl(), Some(20.0));
    }

    #[test]
    fn holding_time() {
        let mut t = trade(TradeSide::Long, 100.0, Some(101.0));
        assert_eq!(t.holding_minutes(), None);
        t.exit_time = Some(Utc.with_ymd_and_hms(2024, 5, 1, 15, 30, 0).unwrap());
        assert_eq!(t.holding_minutes(), Some(90));
    }
}
