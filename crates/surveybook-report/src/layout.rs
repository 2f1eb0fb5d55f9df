//! Sheet identities and the two workbook orderings.
//!
//! Build order follows data dependencies: a sheet whose formulas resolve
//! another sheet's ranges must come after it. Presentation order is what
//! the reader sees and is independent of build order.

/// The eight sheets of a survey report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SheetKind {
    SurveyData,
    CodeBook,
    HelperData,
    AnalysisTemplates,
    Crosstab,
    StatisticalTests,
    Summary,
    Charts,
}

impl SheetKind {
    pub fn title(self) -> &'static str {
        match self {
            SheetKind::SurveyData => "Survey Data",
            SheetKind::CodeBook => "Code Book",
            SheetKind::HelperData => "Helper Data",
            SheetKind::AnalysisTemplates => "Analysis Templates",
            SheetKind::Crosstab => "Crosstab - Age × Innovator",
            SheetKind::StatisticalTests => "Statistical Tests",
            SheetKind::Summary => "Summary Statistics",
            SheetKind::Charts => "Charts & Visualizations",
        }
    }
}

/// Dependency-respecting construction order
pub const BUILD_ORDER: [SheetKind; 8] = [
    SheetKind::SurveyData,
    SheetKind::CodeBook,
    SheetKind::HelperData,
    SheetKind::AnalysisTemplates,
    SheetKind::Crosstab,
    SheetKind::StatisticalTests,
    SheetKind::Summary,
    SheetKind::Charts,
];

/// Order in which sheets appear in the saved workbook
pub const PRESENTATION_ORDER: [SheetKind; 8] = [
    SheetKind::SurveyData,
    SheetKind::CodeBook,
    SheetKind::AnalysisTemplates,
    SheetKind::Crosstab,
    SheetKind::StatisticalTests,
    SheetKind::Summary,
    SheetKind::Charts,
    SheetKind::HelperData,
];

/// Build and presentation order of one workbook
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkbookLayout {
    pub build: Vec<SheetKind>,
    pub presentation: Vec<SheetKind>,
}

impl Default for WorkbookLayout {
    fn default() -> Self {
        Self {
            build: BUILD_ORDER.to_vec(),
            presentation: PRESENTATION_ORDER.to_vec(),
        }
    }
}
