//! Legal-text and signature block, placed after the last content row.

use crate::fonts;
use crate::record::Fields;

use super::flow::{CONTENT_WIDTH, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, PAGE_WIDTH, PageFlow};
use super::{show_text, show_text_centered, stroke_line};

const LEGAL_TEXT: &str = "I hereby declare that the information given above is true, complete \
and accurate to the best of my knowledge. I understand that any false or misleading statement \
may result in disciplinary action up to and including termination of employment, and that the \
organization may verify any of the particulars stated in this record with the issuing \
authorities.";

const TRAILER_FONT_SIZE: f32 = 9.0;
const TRAILER_LINE_H: f32 = 12.0;
/// Gap between the end of the legal text and the candidate signature line;
/// leaves room for the date stamp and the signature itself.
const SIG_GAP: f32 = 56.0;
/// When content is short the signature line is pinned this far above the
/// bottom margin instead of trailing the text.
const SIG_PIN_OFFSET: f32 = 36.0;
/// Depth of the two caption lines below the signature line.
const CAPTION_DEPTH: f32 = 30.0;
const DATE_RISE: f32 = 40.0;
const SIG_LINE_HALF: f32 = 90.0;

/// Horizontal center of the signature block (right-hand side of the page).
fn signature_center_x() -> f32 {
    PAGE_WIDTH - MARGIN_RIGHT - 130.0
}

/// The one content-length-dependent layout branch: the line follows the text
/// (candidate) unless the candidate would sit higher than the pinned position
/// near the bottom margin, in which case it is pinned there.
pub(crate) fn signature_line_y(cursor_after_text: f32) -> f32 {
    let candidate = cursor_after_text - SIG_GAP;
    let pinned = MARGIN_BOTTOM + SIG_PIN_OFFSET;
    candidate.min(pinned)
}

/// Place the trailer below the flowed sections, forcing at most one page break
/// when the whole block would not fit. Returns the signature line's y.
pub(crate) fn place(flow: &mut PageFlow, fields: &Fields, date_stamp: &str) -> f32 {
    let lines = fonts::wrap(LEGAL_TEXT, TRAILER_FONT_SIZE, false, CONTENT_WIDTH);
    let text_height = lines.len() as f32 * TRAILER_LINE_H;

    flow.ensure_room(text_height + SIG_GAP + CAPTION_DEPTH);

    let page = flow.current();
    let mut y = page.cursor - TRAILER_LINE_H;
    for line in &lines {
        show_text(
            &mut page.content,
            MARGIN_LEFT,
            y,
            line,
            TRAILER_FONT_SIZE,
            false,
        );
        y -= TRAILER_LINE_H;
    }
    let cursor_after_text = page.cursor - text_height;
    page.cursor = cursor_after_text;

    let sig_y = signature_line_y(cursor_after_text);
    let cx = signature_center_x();

    let city = fields.field("city");
    let date_line = if city.is_empty() {
        date_stamp.to_string()
    } else {
        format!("{city}, {date_stamp}")
    };
    show_text_centered(
        &mut page.content,
        cx,
        sig_y + DATE_RISE,
        &date_line,
        TRAILER_FONT_SIZE,
        false,
    );

    stroke_line(
        &mut page.content,
        cx - SIG_LINE_HALF,
        sig_y,
        cx + SIG_LINE_HALF,
        sig_y,
        0.75,
    );

    let name = fields.field("full_name");
    let name_caption = if name.is_empty() {
        "( ................................ )".to_string()
    } else {
        format!("( {name} )")
    };
    show_text_centered(
        &mut page.content,
        cx,
        sig_y - 14.0,
        &name_caption,
        TRAILER_FONT_SIZE,
        true,
    );

    let id = fields.field("employee_id");
    let id_caption = if id.is_empty() {
        "EMPLOYEE NO. ............".to_string()
    } else {
        format!("EMPLOYEE NO. {id}")
    };
    show_text_centered(
        &mut page.content,
        cx,
        sig_y - 26.0,
        &id_caption,
        TRAILER_FONT_SIZE,
        false,
    );

    page.cursor = sig_y - CAPTION_DEPTH;
    sig_y
}
