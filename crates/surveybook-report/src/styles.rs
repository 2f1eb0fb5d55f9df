//! Reusable cell formats.

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatUnderline};

const BRAND: u32 = 0x366092;
const BAND: u32 = 0xD9E1F2;
const TABLE_GREY: u32 = 0xE7E6E6;
const EXPECTED_GOLD: u32 = 0xFFF2CC;
const CONCLUSION_GREEN: u32 = 0xE2EFDA;

/// Formats shared by every sheet of one report
pub(crate) struct ReportFormats {
    /// Sheet title, large and bold
    pub title: Format,
    /// Sheet title on the brand fill
    pub banner: Format,
    /// Column header on the brand fill
    pub header: Format,
    /// Bordered, centered data cell
    pub cell: Format,
    /// Bordered data cell, left aligned
    pub bordered: Format,
    /// Section heading in brand color
    pub section: Format,
    /// Section heading on the brand fill
    pub section_fill: Format,
    pub bold: Format,
    /// Bold 12pt subheading
    pub subheading: Format,
    /// Wrapped explanatory text
    pub wrap: Format,
    /// SUMMARY / results band
    pub band: Format,
    /// Grey table header and total rows
    pub table_header: Format,
    pub total: Format,
    pub expected_header: Format,
    pub conclusion: Format,
    pub decimal: Format,
    pub p_value: Format,
    pub percent: Format,
    pub mean: Format,
    /// Text that must not be parsed as a formula
    pub literal: Format,
    // Footer formats
    pub footer_rule: Format,
    pub footer_link: Format,
    pub footer_note: Format,
}

impl ReportFormats {
    pub fn new() -> Self {
        let title = Format::new()
            .set_bold()
            .set_font_size(14)
            .set_align(FormatAlign::Center);

        let banner = Format::new()
            .set_bold()
            .set_font_size(14)
            .set_font_color(0xFFFFFF)
            .set_background_color(BRAND)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        let header = Format::new()
            .set_bold()
            .set_font_size(11)
            .set_font_color(0xFFFFFF)
            .set_background_color(BRAND)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);

        let cell = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);

        let bordered = Format::new().set_border(FormatBorder::Thin);

        let section = Format::new()
            .set_bold()
            .set_font_size(12)
            .set_font_color(BRAND);

        let section_fill = Format::new()
            .set_bold()
            .set_font_size(12)
            .set_font_color(0xFFFFFF)
            .set_background_color(BRAND);

        let bold = Format::new().set_bold();

        let subheading = Format::new().set_bold().set_font_size(12);

        let wrap = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Top);

        let band = Format::new()
            .set_bold()
            .set_font_size(11)
            .set_background_color(BAND);

        let table_header = Format::new()
            .set_bold()
            .set_background_color(TABLE_GREY)
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let total = Format::new()
            .set_bold()
            .set_background_color(TABLE_GREY)
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let expected_header = Format::new()
            .set_bold()
            .set_background_color(EXPECTED_GOLD)
            .set_border(FormatBorder::Thin);

        let conclusion = Format::new()
            .set_bold()
            .set_background_color(CONCLUSION_GREEN)
            .set_text_wrap();

        let decimal = Format::new()
            .set_num_format("0.00")
            .set_border(FormatBorder::Thin);

        let p_value = Format::new().set_num_format("0.0000");

        let percent = Format::new().set_num_format("0.0");

        let mean = Format::new().set_num_format("0.00");

        let literal = Format::new().set_num_format("@");

        let footer_rule = Format::new()
            .set_border_top(FormatBorder::Thin)
            .set_border_top_color(0xCCCCCC);

        let footer_link = Format::new()
            .set_font_size(10)
            .set_font_color(0x0066CC)
            .set_underline(FormatUnderline::Single);

        let footer_note = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(0x666666);

        Self {
            title,
            banner,
            header,
            cell,
            bordered,
            section,
            section_fill,
            bold,
            subheading,
            wrap,
            band,
            table_header,
            total,
            expected_header,
            conclusion,
            decimal,
            p_value,
            percent,
            mean,
            literal,
            footer_rule,
            footer_link,
            footer_note,
        }
    }
}
