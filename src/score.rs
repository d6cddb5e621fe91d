/// One weighted criterion inside a [`ScoringResult`].
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreItem {
    pub name: String,
    pub description: String,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub details: Option<String>,
}

impl ScoreItem {
    pub(crate) fn pass_fail(
        name: &'static str,
        description: &'static str,
        max_score: u32,
        passed: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            score: if passed { max_score } else { 0 },
            max_score,
            passed,
            details: None,
        }
    }

    pub(crate) fn partial(
        name: &'static str,
        description: &'static str,
        max_score: u32,
        score: u32,
        details: Option<String>,
    ) -> Self {
        debug_assert!(score <= max_score);
        Self {
            name: name.to_string(),
            description: description.to_string(),
            score,
            max_score,
            passed: score == max_score,
            details,
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Aggregated outcome of one scoring pass.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringResult {
    pub total_score: u32,
    pub max_possible_score: u32,
    pub percentage: u32,
    pub items: Vec<ScoreItem>,
    pub grade: Grade,
}

impl ScoringResult {
    pub(crate) fn from_items(items: Vec<ScoreItem>) -> Self {
        let total_score = items.iter().map(|item| item.score).sum();
        let max_possible_score = items.iter().map(|item| item.max_score).sum();
        let percentage = if max_possible_score == 0 {
            0
        } else {
            (f64::from(total_score) / f64::from(max_possible_score) * 100.0).round() as u32
        };
        Self {
            total_score,
            max_possible_score,
            percentage,
            items,
            grade: Grade::from_percentage(percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_zero_for_empty_items() {
        let result = ScoringResult::from_items(Vec::new());
        assert_eq!(result.percentage, 0);
        assert_eq!(result.grade, Grade::F);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let items = vec![
            ScoreItem::pass_fail("a", "", 1, true),
            ScoreItem::pass_fail("b", "", 2, false),
        ];
        // 1/3 -> 33%
        assert_eq!(ScoringResult::from_items(items).percentage, 33);
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::from_percentage(100), Grade::A);
        assert_eq!(Grade::from_percentage(90), Grade::A);
        assert_eq!(Grade::from_percentage(89), Grade::B);
        assert_eq!(Grade::from_percentage(80), Grade::B);
        assert_eq!(Grade::from_percentage(70), Grade::C);
        assert_eq!(Grade::from_percentage(60), Grade::D);
        assert_eq!(Grade::from_percentage(59), Grade::F);
    }
}
