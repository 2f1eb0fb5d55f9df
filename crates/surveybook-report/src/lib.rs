//! # surveybook-report
//!
//! Formula-driven Excel workbook for the attitudes & personality survey.
//!
//! The workbook has eight sheets. Survey Data holds one row per response;
//! every other sheet computes from it with live formulas, so a reader can
//! add or fix rows by hand and watch the analysis update. Helper Data
//! splits scores into per-group columns that the t-tests and ANOVA consume.
//!
//! Sheets are built in dependency order and then reordered for reading,
//! with Helper Data moved to the back. Cross-sheet references go through a
//! [`RangeRegistry`] so no builder hard-codes another sheet's coordinates.
//!
//! ## Example
//!
//! ```rust,ignore
//! use surveybook_core::Report;
//! use surveybook_report::SurveyReport;
//!
//! let report = SurveyReport::new().padding(20);
//! let xlsx_bytes = report.render(&records)?;
//! std::fs::write("survey_export.xlsx", xlsx_bytes)?;
//! ```

pub mod canvas;
pub mod config;
pub mod formula;
pub mod layout;
pub mod registry;

mod footer;
mod sheets;
mod styles;

pub use canvas::SheetCanvas;
pub use config::{ConfigError, FooterConfig, ReportConfig};
pub use layout::{SheetKind, WorkbookLayout, BUILD_ORDER, PRESENTATION_ORDER};
pub use registry::{RangeRegistry, RowBasis, SheetRangeDescriptor};

use rust_xlsxwriter::Workbook;
use std::collections::BTreeMap;
use surveybook_core::{
    analyze_responses, CollectingEmitter, Report, ReportError, ResponseRecord,
};
use tracing::{debug, info, warn};

use canvas::xlsx_err;
use sheets::BuildContext;
use styles::ReportFormats;

/// Survey workbook generator
#[derive(Clone, Debug, Default)]
pub struct SurveyReport {
    pub config: ReportConfig,
    pub layout: WorkbookLayout,
}

impl SurveyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self {
            config,
            layout: WorkbookLayout::default(),
        }
    }

    /// Extra rows reserved in every formula range
    pub fn padding(mut self, padding: u32) -> Self {
        self.config.padding = padding;
        self
    }

    /// Innovator score at which a respondent counts as "High"
    pub fn innovator_threshold(mut self, threshold: u8) -> Self {
        self.config.innovator_threshold = threshold;
        self
    }

    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.config.significance_level = alpha;
        self
    }

    pub fn footer(mut self, footer: FooterConfig) -> Self {
        self.config.footer = footer;
        self
    }

    /// Override the construction order; ranges must still be registered before use
    pub fn build_order(mut self, order: Vec<SheetKind>) -> Self {
        self.layout.build = order;
        self
    }

    pub fn presentation_order(mut self, order: Vec<SheetKind>) -> Self {
        self.layout.presentation = order;
        self
    }

    /// Generate the workbook bytes
    pub fn render_to_bytes(&self, records: &[ResponseRecord]) -> Result<Vec<u8>, ReportError> {
        self.config
            .validate()
            .map_err(|e| ReportError::InvalidConfig(e.to_string()))?;
        if records.is_empty() {
            return Err(ReportError::EmptyInput);
        }

        // Sparse categories still export, but some tests will read "Insufficient data"
        let mut emitter = CollectingEmitter::new();
        let warnings = analyze_responses(records, &mut emitter);
        if warnings > 0 {
            warn!(warnings, "category coverage is incomplete");
        }

        let mut registry =
            RangeRegistry::new(RowBasis::new(records.len(), self.config.padding));
        let formats = ReportFormats::new();

        let mut built: BTreeMap<SheetKind, SheetCanvas> = BTreeMap::new();
        for kind in &self.layout.build {
            let mut ctx = BuildContext {
                records,
                config: &self.config,
                formats: &formats,
                registry: &mut registry,
            };
            let mut canvas = sheets::build(*kind, &mut ctx)?;
            footer::append(&mut canvas, &self.config.footer, &formats)?;
            built.insert(*kind, canvas);
        }
        debug!(ranges = registry.len(), "all sheets built");

        let mut workbook = Workbook::new();
        for kind in &self.layout.presentation {
            let canvas = built
                .remove(kind)
                .ok_or_else(|| ReportError::SheetNotBuilt(kind.title().to_string()))?;
            workbook.push_worksheet(canvas.into_worksheet());
        }

        let buffer = workbook.save_to_buffer().map_err(xlsx_err)?;
        info!(
            responses = records.len(),
            bytes = buffer.len(),
            "survey workbook generated"
        );
        Ok(buffer)
    }
}

impl Report for SurveyReport {
    type Output = Vec<u8>;

    fn render(&self, records: &[ResponseRecord]) -> Result<Vec<u8>, ReportError> {
        self.render_to_bytes(records)
    }
}
