use surveybook_core::ReportError;

use super::crosstab::write_observed;
use super::{labeled_row, BuildContext};
use crate::canvas::SheetCanvas;
use crate::layout::SheetKind;

const LAST_COL: u16 = 5;

const RESEARCH_AIMS: [(&str, &str); 5] = [
    ("Research Topic:", "A prominent car manufacturer is seeking to understand consumer attitudes towards fuel prices, global warming, and alternative fuels."),
    ("Research Question:", "How do consumer perceptions of global warming, petrol usage, and fuel prices influence their preferences for alternative fuel vehicles?"),
    ("Research Aim:", "To investigate the relationship between consumer perceptions of environmental issues (global warming), fuel consumption patterns (petrol usage), and economic factors (fuel prices) and their preferences for alternative fuel vehicles, in order to inform the car manufacturer's future vehicle development and marketing strategies."),
    ("Objective 1:", "To examine the extent to which consumer concerns about global warming and environmental issues influence their attitudes towards alternative fuel vehicles."),
    ("Objective 2:", "To analyze how consumer perceptions of petrol prices and fuel consumption patterns affect their preferences for alternative fuel vehicle options."),
];

const TEST_GUIDE: [[&str; 3]; 4] = [
    ["Chi-Square", "Testing association between two categorical variables", "Categorical × Categorical"],
    ["T-Test (Independent)", "Comparing means of two groups", "Continuous × Categorical (2 groups)"],
    ["T-Test (Paired)", "Comparing means of same group on two variables", "Two continuous variables (same subjects)"],
    ["ANOVA", "Comparing means across three or more groups", "Continuous × Categorical (3+ groups)"],
];

/// Function name, purpose, and an example shown as text
const FUNCTIONS: [[&str; 3]; 6] = [
    ["COUNTIFS", "Count with multiple criteria", "COUNTIFS(A:A,\"Male\",B:B,\">5\")"],
    ["AVERAGEIF", "Average with condition", "AVERAGEIF(A:A,\"Married\",B:B)"],
    ["AVERAGEIFS", "Average with multiple conditions", "AVERAGEIFS(B:B,A:A,\"Female\",C:C,\"18 to 34\")"],
    ["STDEV", "Standard deviation", "STDEV(A:A)"],
    ["CHITEST", "Chi-square test p-value", "CHITEST(actual_range, expected_range)"],
    ["T.TEST", "T-test p-value", "T.TEST(array1, array2, tails, type)"],
];

/// Research framing, a live crosstab example and reference tables
pub(super) fn build(ctx: &mut BuildContext<'_>) -> Result<SheetCanvas, ReportError> {
    let mut canvas = SheetCanvas::new(SheetKind::AnalysisTemplates)?;
    let ctx: &BuildContext<'_> = ctx;
    let f = ctx.formats;
    let alpha = ctx.config.significance_level;

    canvas.merge(
        0,
        0,
        0,
        LAST_COL,
        "Statistical Analysis Templates & Guidance",
        &f.title,
    )?;

    let mut row = 2;
    canvas.string_with(row, 0, "1. RESEARCH AIMS AND OBJECTIVES (Question 1.a)", &f.section)?;
    for (label, text) in RESEARCH_AIMS {
        row += 1;
        labeled_row(&mut canvas, f, row, label, text, LAST_COL)?;
    }

    row += 2;
    canvas.string_with(row, 0, "2. CROSSTABULATION TEMPLATE", &f.section)?;
    row += 1;
    labeled_row(
        &mut canvas,
        f,
        row,
        "Note:",
        "A complete crosstabulation for Age Group × Innovator Personality (High/Low) has been created in the 'Crosstab - Age × Innovator' sheet. See that sheet for the actual data and hypothesis testing.",
        LAST_COL,
    )?;
    row += 1;
    canvas.string(
        row,
        0,
        "Example Formula Template (for reference): Age Group × Innovator Personality (High/Low)",
    )?;
    let table = write_observed(&mut canvas, ctx, row + 1, &f.table_header, &f.bordered)?;

    row = table.total_row + 2;
    canvas.string_with(row, 0, "3. STATISTICAL TEST SELECTION GUIDE", &f.section)?;
    row += 1;
    for (col, header) in (0u16..).zip(["Test Type", "When to Use", "Variables"]) {
        canvas.string_with(row, col, header, &f.table_header)?;
    }
    for line in TEST_GUIDE {
        row += 1;
        for (col, text) in (0u16..).zip(line) {
            canvas.string(row, col, text)?;
        }
    }

    row += 2;
    canvas.string_with(row, 0, "4. INTERPRETATION GUIDE", &f.section)?;
    row += 1;
    canvas.string(row, 0, "Significance Level (α):")?;
    canvas.string(row, 1, &format!("Typically {alpha} ({}%)", alpha * 100.0))?;
    let guide = [
        (
            format!("If p-value < {alpha}:"),
            "Reject H0 - There is a statistically significant result",
        ),
        (
            format!("If p-value ≥ {alpha}:"),
            "Fail to reject H0 - No statistically significant result",
        ),
        (
            "Effect Size:".to_string(),
            "Consider practical significance, not just statistical significance",
        ),
    ];
    for (label, text) in &guide {
        row += 1;
        labeled_row(&mut canvas, f, row, label, text, LAST_COL)?;
    }

    row += 2;
    canvas.string_with(row, 0, "5. USEFUL EXCEL FUNCTIONS", &f.section)?;
    row += 1;
    for (col, header) in (0u16..).zip(["Function", "Purpose", "Example"]) {
        canvas.string_with(row, col, header, &f.table_header)?;
    }
    for [name, purpose, example] in FUNCTIONS {
        row += 1;
        canvas.string(row, 0, name)?;
        canvas.string(row, 1, purpose)?;
        canvas.string_with(row, 2, example, &f.literal)?;
    }

    for (col, width) in (0u16..).zip([30.0, 50.0, 30.0, 15.0, 15.0, 15.0]) {
        canvas.set_width(col, width)?;
    }

    Ok(canvas)
}
