//! Survey Data column contract and code book catalog.
//!
//! The sixteen columns of the Survey Data sheet are positional: every
//! formula in the report refers to them by letter, so the order below is
//! fixed for every export.

use serde::{Deserialize, Serialize};

/// Agreement scale labels for the attitude questions, codes 1..=7
pub const AGREEMENT_LABELS: [&str; 7] = [
    "Very strongly disagree",
    "Strongly disagree",
    "Disagree",
    "Neither disagree nor agree",
    "Agree",
    "Strongly agree",
    "Very strongly agree",
];

/// Self-description scale labels for the personality types, codes 1..=7
pub const DESCRIPTION_LABELS: [&str; 7] = [
    "Does not describe me at all",
    "2",
    "3",
    "4",
    "5",
    "6",
    "Describes me perfectly",
];

/// The six attitude statements
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attitude {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
    Q6,
}

impl Attitude {
    pub const ALL: [Attitude; 6] = [
        Attitude::Q1,
        Attitude::Q2,
        Attitude::Q3,
        Attitude::Q4,
        Attitude::Q5,
        Attitude::Q6,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short code, e.g. "Q2"
    pub fn code(self) -> &'static str {
        match self {
            Attitude::Q1 => "Q1",
            Attitude::Q2 => "Q2",
            Attitude::Q3 => "Q3",
            Attitude::Q4 => "Q4",
            Attitude::Q5 => "Q5",
            Attitude::Q6 => "Q6",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Attitude::Q1 => "Q1_Worried_Global_Warming",
            Attitude::Q2 => "Q2_Global_Warming_Threat",
            Attitude::Q3 => "Q3_British_Use_Too_Much_Petrol",
            Attitude::Q4 => "Q4_Look_Petrol_Substitutes",
            Attitude::Q5 => "Q5_Petrol_Prices_Too_High",
            Attitude::Q6 => "Q6_High_Prices_Impact_Cars",
        }
    }

    /// Statement as presented to respondents
    pub fn statement(self) -> &'static str {
        match self {
            Attitude::Q1 => "I am worried about global warming",
            Attitude::Q2 => "Global warming is a real threat",
            Attitude::Q3 => "British use too much Petrol",
            Attitude::Q4 => "We should be looking for Petrol substitutes",
            Attitude::Q5 => "Petrol prices are too high now",
            Attitude::Q6 => "High gasoline prices will impact what type of cars are purchased",
        }
    }

    /// Compact label used in summary tables, e.g. "Q1: Worried about global warming"
    pub fn summary_label(self) -> &'static str {
        match self {
            Attitude::Q1 => "Q1: Worried about global warming",
            Attitude::Q2 => "Q2: Global warming is a real threat",
            Attitude::Q3 => "Q3: British use too much Petrol",
            Attitude::Q4 => "Q4: Look for Petrol substitutes",
            Attitude::Q5 => "Q5: Petrol prices too high",
            Attitude::Q6 => "Q6: High prices impact car purchases",
        }
    }
}

/// The six personality types respondents rate themselves against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personality {
    Novelist,
    Innovator,
    Trendsetter,
    Forerunner,
    Mainstreamer,
    Classic,
}

impl Personality {
    pub const ALL: [Personality; 6] = [
        Personality::Novelist,
        Personality::Innovator,
        Personality::Trendsetter,
        Personality::Forerunner,
        Personality::Mainstreamer,
        Personality::Classic,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Personality::Novelist => "Novelist",
            Personality::Innovator => "Innovator",
            Personality::Trendsetter => "Trendsetter",
            Personality::Forerunner => "Forerunner",
            Personality::Mainstreamer => "Mainstreamer",
            Personality::Classic => "Classic",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Personality::Novelist => "Personality_Novelist",
            Personality::Innovator => "Personality_Innovator",
            Personality::Trendsetter => "Personality_Trendsetter",
            Personality::Forerunner => "Personality_Forerunner",
            Personality::Mainstreamer => "Personality_Mainstreamer",
            Personality::Classic => "Personality_Classic",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Personality::Novelist => "Very early adopter, risk taker, \"way out,\" \"show off\"",
            Personality::Innovator => "Early adopter, less risk taker, likes new technology",
            Personality::Trendsetter => "Opinion leaders, well off financially and educationally",
            Personality::Forerunner => "Early majority, respected and fairly well off",
            Personality::Mainstreamer => "Late majority, \"average people\"",
            Personality::Classic => "Laggards who cling to \"old\" ways",
        }
    }
}

/// A column of the Survey Data sheet, A through P
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataColumn {
    Id,
    Attitude(Attitude),
    Personality(Personality),
    Gender,
    MaritalStatus,
    AgeCategory,
}

impl DataColumn {
    pub const COUNT: usize = 16;

    /// Every column in sheet order
    pub const ALL: [DataColumn; Self::COUNT] = [
        DataColumn::Id,
        DataColumn::Attitude(Attitude::Q1),
        DataColumn::Attitude(Attitude::Q2),
        DataColumn::Attitude(Attitude::Q3),
        DataColumn::Attitude(Attitude::Q4),
        DataColumn::Attitude(Attitude::Q5),
        DataColumn::Attitude(Attitude::Q6),
        DataColumn::Personality(Personality::Novelist),
        DataColumn::Personality(Personality::Innovator),
        DataColumn::Personality(Personality::Trendsetter),
        DataColumn::Personality(Personality::Forerunner),
        DataColumn::Personality(Personality::Mainstreamer),
        DataColumn::Personality(Personality::Classic),
        DataColumn::Gender,
        DataColumn::MaritalStatus,
        DataColumn::AgeCategory,
    ];

    /// Zero-based column index
    pub fn index(self) -> u16 {
        match self {
            DataColumn::Id => 0,
            DataColumn::Attitude(q) => 1 + q.index() as u16,
            DataColumn::Personality(p) => 7 + p.index() as u16,
            DataColumn::Gender => 13,
            DataColumn::MaritalStatus => 14,
            DataColumn::AgeCategory => 15,
        }
    }

    /// Column letter in A1 notation
    pub fn letter(self) -> char {
        char::from(b'A' + self.index() as u8)
    }

    pub fn header(self) -> &'static str {
        match self {
            DataColumn::Id => "ID",
            DataColumn::Attitude(q) => q.header(),
            DataColumn::Personality(p) => p.header(),
            DataColumn::Gender => "Gender",
            DataColumn::MaritalStatus => "Marital_Status",
            DataColumn::AgeCategory => "Age_Category",
        }
    }

    /// Display width in the Survey Data sheet
    pub fn width(self) -> f64 {
        match self {
            DataColumn::Id => 8.0,
            DataColumn::Gender => 10.0,
            DataColumn::AgeCategory => 15.0,
            _ => 12.0,
        }
    }

    /// Registry dataset name for the column's data rows, e.g. `data.Q2_Global_Warming_Threat`
    pub fn dataset(self) -> String {
        format!("data.{}", self.header())
    }

    /// Look up a column by its exact header text
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.header() == header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn column_letters_are_a_through_p() {
        let letters: String = DataColumn::ALL.iter().map(|c| c.letter()).collect();
        assert_eq!(letters, "ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn column_indices_match_position() {
        for (i, column) in DataColumn::ALL.iter().enumerate() {
            assert_eq!(column.index() as usize, i);
        }
    }

    #[test]
    fn fixed_positions_of_key_columns() {
        assert_eq!(DataColumn::Attitude(Attitude::Q2).letter(), 'C');
        assert_eq!(DataColumn::Personality(Personality::Innovator).letter(), 'I');
        assert_eq!(DataColumn::Personality(Personality::Trendsetter).letter(), 'J');
        assert_eq!(DataColumn::Gender.letter(), 'N');
        assert_eq!(DataColumn::MaritalStatus.letter(), 'O');
        assert_eq!(DataColumn::AgeCategory.letter(), 'P');
    }

    #[test]
    fn header_lookup_round_trips() {
        for column in DataColumn::ALL {
            assert_eq!(DataColumn::from_header(column.header()), Some(column));
        }
        assert_eq!(DataColumn::from_header("gender"), None);
    }

    #[test]
    fn scale_labels_have_seven_points() {
        assert_eq!(AGREEMENT_LABELS[3], "Neither disagree nor agree");
        assert_eq!(DESCRIPTION_LABELS[6], "Describes me perfectly");
    }
}
