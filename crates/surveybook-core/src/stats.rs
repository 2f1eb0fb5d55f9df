//! Response totals and per-category counts.

use serde::Serialize;

use crate::{AgeCategory, Category, Gender, MaritalStatus, ResponseRecord};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: &'static str,
    pub count: usize,
}

/// Totals for a set of responses
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SurveyStats {
    pub total: usize,
    pub gender: Vec<CategoryCount>,
    pub marital_status: Vec<CategoryCount>,
    pub age_category: Vec<CategoryCount>,
}

impl SurveyStats {
    pub fn from_records(records: &[ResponseRecord]) -> Self {
        Self {
            total: records.len(),
            gender: counts::<Gender>(records, |r| r.demographics().gender),
            marital_status: counts::<MaritalStatus>(records, |r| r.demographics().marital_status),
            age_category: counts::<AgeCategory>(records, |r| r.demographics().age_category),
        }
    }
}

fn counts<C: Category>(
    records: &[ResponseRecord],
    value_of: impl Fn(&ResponseRecord) -> C,
) -> Vec<CategoryCount> {
    C::ALL
        .iter()
        .map(|&category| CategoryCount {
            value: category.as_str(),
            count: records.iter().filter(|r| value_of(r) == category).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Demographics, ResponseAnswers};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_every_category_including_empty_ones() {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        let records = vec![
            ResponseRecord::new(
                1,
                at,
                ResponseAnswers::neutral(Demographics::new(
                    Gender::Female,
                    MaritalStatus::Married,
                    AgeCategory::Age18To34,
                )),
            ),
            ResponseRecord::new(
                2,
                at,
                ResponseAnswers::neutral(Demographics::new(
                    Gender::Female,
                    MaritalStatus::Unmarried,
                    AgeCategory::Age18To34,
                )),
            ),
        ];

        let stats = SurveyStats::from_records(&records);

        assert_eq!(stats.total, 2);
        assert_eq!(
            stats.gender,
            vec![
                CategoryCount { value: "Male", count: 0 },
                CategoryCount { value: "Female", count: 2 },
            ]
        );
        assert_eq!(stats.age_category[0].count, 2);
        assert_eq!(stats.age_category[2].value, "65 and older");
    }
}
