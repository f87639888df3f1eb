//! Escalation classification
//!
//! Turns a company's urgency signals into a color and severity rank used to
//! prioritise collection. The procedure is strictly sequential; later steps
//! overwrite earlier ones:
//!
//! 1. Base color: from the planned visit if there is one, otherwise from
//!    how long items have been waiting.
//! 2. Saturation: every item in debt forces GRAPHITE.
//! 3. Suppression: the suppression claim-type flag clears the color, even GRAPHITE.
//! 4. Anything still uncolored is WHITE.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ClaimError;

/// Urgency color, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Red,
    Yellow,
    Green,
    White,
    Graphite,
}

impl ColorClass {
    /// 1 (most urgent) to 5
    pub fn severity_rank(&self) -> u8 {
        match self {
            ColorClass::Red => 1,
            ColorClass::Yellow => 2,
            ColorClass::Green => 3,
            ColorClass::White => 4,
            ColorClass::Graphite => 5,
        }
    }

    /// Style class name used by dashboards
    pub fn css_class(&self) -> &'static str {
        match self {
            ColorClass::Red => "red",
            ColorClass::Yellow => "yellow",
            ColorClass::Green => "green",
            ColorClass::White => "white",
            ColorClass::Graphite => "graphite",
        }
    }
}

impl fmt::Display for ColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Tunable bounds of the classification
///
/// Defaults reproduce the production rules: a visit within a day is red,
/// in two days yellow, later green; without a visit more than five days
/// waiting is red, three to five yellow, one to two green.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EscalationThresholds {
    /// Planned visit at most this many days away is red
    #[validate(range(min = 0))]
    pub planned_red_max_days: i64,
    /// Planned visit at most this many days away (and not red) is yellow
    #[validate(range(min = 0))]
    pub planned_yellow_max_days: i64,
    /// Waiting at least this many days is green
    #[validate(range(min = 1))]
    pub elapsed_green_min_days: i64,
    /// Waiting at least this many days is yellow
    #[validate(range(min = 1))]
    pub elapsed_yellow_min_days: i64,
    /// Waiting strictly more than this many days is red
    #[validate(range(min = 1))]
    pub elapsed_red_after_days: i64,
    /// Claim-type flag that suppresses any color
    #[validate(length(min = 1))]
    pub suppression_flag: String,
}

impl Default for EscalationThresholds {
    fn default() -> Self {
        Self {
            planned_red_max_days: 1,
            planned_yellow_max_days: 2,
            elapsed_green_min_days: 1,
            elapsed_yellow_min_days: 3,
            elapsed_red_after_days: 5,
            suppression_flag: "Overdue".to_string(),
        }
    }
}

impl EscalationThresholds {
    /// Checks field ranges and that the bounds are ordered
    pub fn validated(self) -> Result<Self, ClaimError> {
        self.validate()
            .map_err(|err| ClaimError::InvalidThresholds(err.to_string()))?;

        if self.planned_red_max_days >= self.planned_yellow_max_days {
            return Err(ClaimError::InvalidThresholds(format!(
                "planned red bound {} must be below yellow bound {}",
                self.planned_red_max_days, self.planned_yellow_max_days
            )));
        }
        if !(self.elapsed_green_min_days <= self.elapsed_yellow_min_days
            && self.elapsed_yellow_min_days <= self.elapsed_red_after_days)
        {
            return Err(ClaimError::InvalidThresholds(format!(
                "elapsed bounds must be ordered green {} <= yellow {} <= red {}",
                self.elapsed_green_min_days, self.elapsed_yellow_min_days, self.elapsed_red_after_days
            )));
        }
        Ok(self)
    }
}

/// A planned visit together with its distance from today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedWindow {
    pub date: NaiveDate,
    pub days_until: i64,
}

/// Signals classified for one company
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationInput {
    pub planned: Option<PlannedWindow>,
    pub days_in_state: i64,
    pub item_count: usize,
    pub debt_item_count: usize,
    pub claim_type_flag: Option<String>,
}

/// Color and severity assigned to a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    pub color: ColorClass,
    pub severity_rank: u8,
}

impl From<ColorClass> for Escalation {
    fn from(color: ColorClass) -> Self {
        Self {
            color,
            severity_rank: color.severity_rank(),
        }
    }
}

/// Applies the escalation procedure with a given set of thresholds
#[derive(Debug, Clone, Default)]
pub struct EscalationClassifier {
    thresholds: EscalationThresholds,
}

impl EscalationClassifier {
    pub fn new(thresholds: EscalationThresholds) -> Result<Self, ClaimError> {
        Ok(Self {
            thresholds: thresholds.validated()?,
        })
    }

    pub fn thresholds(&self) -> &EscalationThresholds {
        &self.thresholds
    }

    pub fn classify(&self, input: &EscalationInput) -> Escalation {
        let mut color = self.base_color(input);

        if input.item_count > 0 && input.item_count == input.debt_item_count {
            color = Some(ColorClass::Graphite);
        }

        if input.claim_type_flag.as_deref() == Some(self.thresholds.suppression_flag.as_str()) {
            color = None;
        }

        color.unwrap_or(ColorClass::White).into()
    }

    fn base_color(&self, input: &EscalationInput) -> Option<ColorClass> {
        let t = &self.thresholds;

        if let Some(planned) = input.planned {
            return Some(if planned.days_until <= t.planned_red_max_days {
                ColorClass::Red
            } else if planned.days_until <= t.planned_yellow_max_days {
                ColorClass::Yellow
            } else {
                ColorClass::Green
            });
        }

        let days = input.days_in_state;
        if days <= 0 {
            None
        } else if days > t.elapsed_red_after_days {
            Some(ColorClass::Red)
        } else if days >= t.elapsed_yellow_min_days {
            Some(ColorClass::Yellow)
        } else if days >= t.elapsed_green_min_days {
            Some(ColorClass::Green)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planned(days_until: i64) -> Option<PlannedWindow> {
        Some(PlannedWindow {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            days_until,
        })
    }

    fn classify(input: EscalationInput) -> Escalation {
        EscalationClassifier::default().classify(&input)
    }

    #[test]
    fn test_planned_visit_colors() {
        for (days, color) in [
            (-3, ColorClass::Red),
            (0, ColorClass::Red),
            (1, ColorClass::Red),
            (2, ColorClass::Yellow),
            (3, ColorClass::Green),
            (30, ColorClass::Green),
        ] {
            let result = classify(EscalationInput {
                planned: planned(days),
                ..Default::default()
            });
            assert_eq!(result.color, color, "days_until = {}", days);
        }
    }

    #[test]
    fn test_elapsed_colors() {
        for (days, color) in [
            (0, ColorClass::White),
            (1, ColorClass::Green),
            (2, ColorClass::Green),
            (3, ColorClass::Yellow),
            (5, ColorClass::Yellow),
            (6, ColorClass::Red),
        ] {
            let result = classify(EscalationInput {
                days_in_state: days,
                item_count: 1,
                ..Default::default()
            });
            assert_eq!(result.color, color, "days_in_state = {}", days);
        }
    }

    #[test]
    fn test_planned_date_takes_priority_over_elapsed() {
        let result = classify(EscalationInput {
            planned: planned(10),
            days_in_state: 30,
            item_count: 2,
            ..Default::default()
        });
        assert_eq!(result, Escalation { color: ColorClass::Green, severity_rank: 3 });
    }

    #[test]
    fn test_all_debt_saturates_to_graphite() {
        let result = classify(EscalationInput {
            days_in_state: 6,
            item_count: 2,
            debt_item_count: 2,
            ..Default::default()
        });
        assert_eq!(result, Escalation { color: ColorClass::Graphite, severity_rank: 5 });
    }

    #[test]
    fn test_overdue_suppresses_graphite() {
        let result = classify(EscalationInput {
            planned: planned(0),
            days_in_state: 0,
            item_count: 3,
            debt_item_count: 3,
            claim_type_flag: Some("Overdue".to_string()),
        });
        assert_eq!(result, Escalation { color: ColorClass::White, severity_rank: 4 });
    }

    #[test]
    fn test_other_flags_do_not_suppress() {
        let result = classify(EscalationInput {
            planned: planned(0),
            claim_type_flag: Some("Warranty".to_string()),
            ..Default::default()
        });
        assert_eq!(result.color, ColorClass::Red);
    }

    #[test]
    fn test_zero_items_never_graphite() {
        let result = classify(EscalationInput::default());
        assert_eq!(result.color, ColorClass::White);
    }

    #[test]
    fn test_thresholds_must_be_ordered() {
        let thresholds = EscalationThresholds {
            elapsed_yellow_min_days: 7,
            ..Default::default()
        };
        assert!(matches!(
            EscalationClassifier::new(thresholds),
            Err(ClaimError::InvalidThresholds(_))
        ));

        let thresholds = EscalationThresholds {
            suppression_flag: String::new(),
            ..Default::default()
        };
        assert!(EscalationClassifier::new(thresholds).is_err());
    }
}
