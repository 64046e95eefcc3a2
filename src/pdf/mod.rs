mod flow;
mod trailer;

use std::path::Path;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts;
use crate::model::{Alignment, Row, Section};
use crate::record::Fields;

use flow::{
    CONTENT_TOP, CONTENT_WIDTH, HEADER_TOP, MARGIN_LEFT, MARGIN_RIGHT, PAGE_HEIGHT, PAGE_WIDTH,
    Page, PageFlow,
};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const LOGO_NAME: &str = "Im1";

const BODY_FONT_SIZE: f32 = 9.0;
const CELL_LINE_H: f32 = 11.0;
const CELL_PAD_X: f32 = 4.0;
const CELL_PAD_Y: f32 = 4.0;
// Baseline drop from the cell's top padding edge (Helvetica ascent at 9pt).
const CELL_ASCENT: f32 = 7.0;
const GRID_LINE_W: f32 = 0.5;
const SECTION_GAP: f32 = 10.0;
const LOGO_BOX: f32 = 44.0;

pub(super) fn show_text(content: &mut Content, x: f32, y: f32, text: &str, size: f32, bold: bool) {
    if text.is_empty() {
        return;
    }
    let font = if bold { FONT_BOLD } else { FONT_REGULAR };
    content
        .begin_text()
        .set_font(Name(font.as_bytes()), size)
        .next_line(x, y)
        .show(Str(&fonts::to_winansi_bytes(text)))
        .end_text();
}

pub(super) fn show_text_centered(
    content: &mut Content,
    center_x: f32,
    y: f32,
    text: &str,
    size: f32,
    bold: bool,
) {
    let w = fonts::text_width(text, size, bold);
    show_text(content, center_x - w / 2.0, y, text, size, bold);
}

pub(super) fn stroke_line(content: &mut Content, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
    content.save_state();
    content.set_line_width(width);
    content.move_to(x1, y1);
    content.line_to(x2, y2);
    content.stroke();
    content.restore_state();
}

/// Header logo, decoded and recompressed for embedding. Loading is the one
/// degradable step: any failure logs and resolves to "absent".
pub struct Logo {
    rgb_zlib: Vec<u8>,
    alpha_zlib: Option<Vec<u8>>,
    pixel_width: u32,
    pixel_height: u32,
}

pub fn load_logo(path: &Path) -> Option<Logo> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("header logo unavailable ({}): {e}", path.display());
            return None;
        }
    };
    let reader = image::ImageReader::with_format(
        std::io::BufReader::new(std::io::Cursor::new(&bytes)),
        image::ImageFormat::Png,
    );
    let decoded = match reader.decode() {
        Ok(img) => img,
        Err(e) => {
            log::warn!("header logo not a usable PNG ({}): {e}", path.display());
            return None;
        }
    };
    let rgba: image::RgbaImage = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
    let rgb_zlib = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let alpha_zlib = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        Some(miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6))
    } else {
        None
    };

    Some(Logo {
        rgb_zlib,
        alpha_zlib,
        pixel_width: w,
        pixel_height: h,
    })
}

fn embed_logo(pdf: &mut Pdf, logo: &Logo, alloc: &mut impl FnMut() -> Ref) -> (Ref, f32, f32) {
    let xobj_ref = alloc();

    let smask_ref = logo.alpha_zlib.as_ref().map(|alpha| {
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(logo.pixel_width as i32);
        mask.height(logo.pixel_height as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        mask_ref
    });

    let mut xobj = pdf.image_xobject(xobj_ref, &logo.rgb_zlib);
    xobj.filter(Filter::FlateDecode);
    xobj.width(logo.pixel_width as i32);
    xobj.height(logo.pixel_height as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    drop(xobj);

    let scale = LOGO_BOX / logo.pixel_width.max(logo.pixel_height).max(1) as f32;
    (
        xobj_ref,
        logo.pixel_width as f32 * scale,
        logo.pixel_height as f32 * scale,
    )
}

/// Redraw the fixed header band. Invoked through the page-start callback, so it
/// runs exactly once per page regardless of how the page came to exist.
fn draw_header(page: &mut Page, fields: &Fields, logo_size: Option<(f32, f32)>) {
    let content = &mut page.content;

    if let Some((w, h)) = logo_size {
        content.save_state();
        content.transform([w, 0.0, 0.0, h, MARGIN_LEFT, HEADER_TOP - h]);
        content.x_object(Name(LOGO_NAME.as_bytes()));
        content.restore_state();
    }

    show_text_centered(
        content,
        PAGE_WIDTH / 2.0,
        HEADER_TOP - 16.0,
        "PERSONNEL RECORD",
        14.0,
        true,
    );

    let name = fields.field("full_name");
    let subject = if name.is_empty() {
        "CONFIDENTIAL".to_string()
    } else {
        name.to_string()
    };
    show_text_centered(
        content,
        PAGE_WIDTH / 2.0,
        HEADER_TOP - 32.0,
        &subject,
        BODY_FONT_SIZE,
        false,
    );

    let page_label = format!("PAGE {}", page.ordinal);
    let label_w = fonts::text_width(&page_label, BODY_FONT_SIZE, false);
    show_text(
        content,
        PAGE_WIDTH - MARGIN_RIGHT - label_w,
        HEADER_TOP - 16.0,
        &page_label,
        BODY_FONT_SIZE,
        false,
    );

    stroke_line(
        content,
        MARGIN_LEFT,
        CONTENT_TOP + 8.0,
        PAGE_WIDTH - MARGIN_RIGHT,
        CONTENT_TOP + 8.0,
        1.0,
    );
}

struct CellLayout {
    x: f32,
    width: f32,
    lines: Vec<String>,
    bold: bool,
    fill: bool,
    alignment: Alignment,
}

/// Wrap every cell of a row at its span width; the row's rendered height is
/// the tallest cell's line count, at least one line.
fn layout_row(row: &Row, columns: u16) -> (Vec<CellLayout>, f32) {
    let unit = CONTENT_WIDTH / columns as f32;
    let mut x = MARGIN_LEFT;
    let mut max_lines = 1usize;

    let cells: Vec<CellLayout> = row
        .cells
        .iter()
        .map(|cell| {
            let width = unit * cell.span as f32;
            let lines = fonts::wrap(
                &cell.text,
                BODY_FONT_SIZE,
                cell.bold,
                (width - 2.0 * CELL_PAD_X).max(1.0),
            );
            max_lines = max_lines.max(lines.len());
            let layout = CellLayout {
                x,
                width,
                lines,
                bold: cell.bold,
                fill: cell.fill,
                alignment: cell.alignment,
            };
            x += width;
            layout
        })
        .collect();

    let height = max_lines as f32 * CELL_LINE_H + 2.0 * CELL_PAD_Y;
    (cells, height)
}

fn draw_row(content: &mut Content, cells: &[CellLayout], top: f32, height: f32) {
    for cell in cells {
        let bottom = top - height;

        if cell.fill {
            content.save_state();
            content.set_fill_gray(0.88);
            content.rect(cell.x, bottom, cell.width, height);
            content.fill_nonzero();
            content.restore_state();
        }

        content.save_state();
        content.set_line_width(GRID_LINE_W);
        content.rect(cell.x, bottom, cell.width, height);
        content.stroke();
        content.restore_state();

        let mut y = top - CELL_PAD_Y - CELL_ASCENT;
        for line in &cell.lines {
            let x = match cell.alignment {
                Alignment::Left => cell.x + CELL_PAD_X,
                Alignment::Center => {
                    let w = fonts::text_width(line, BODY_FONT_SIZE, cell.bold);
                    cell.x + (cell.width - w) / 2.0
                }
            };
            show_text(content, x, y, line, BODY_FONT_SIZE, cell.bold);
            y -= CELL_LINE_H;
        }
    }
}

/// Flow all sections onto pages and render the trailer, then assemble the
/// final PDF. Export happens only after the full page sequence is complete.
pub(crate) fn render(
    sections: &[Section],
    fields: &Fields,
    logo: Option<&Logo>,
    date_stamp: &str,
) -> Result<Vec<u8>, Error> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let font_regular_ref = alloc();
    pdf.type1_font(font_regular_ref)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    let font_bold_ref = alloc();
    pdf.type1_font(font_bold_ref)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let logo_embed = logo.map(|l| embed_logo(&mut pdf, l, &mut alloc));
    let logo_size = logo_embed.map(|(_, w, h)| (w, h));

    let pages = {
        let mut pdf_flow = PageFlow::new(|page| draw_header(page, fields, logo_size));

        for (si, section) in sections.iter().enumerate() {
            if si > 0 {
                pdf_flow.current().cursor -= SECTION_GAP;
            }
            // The break decision is per row; a section may span pages mid-table.
            for row in &section.rows {
                let (cells, height) = layout_row(row, section.columns);
                let top = pdf_flow.place_row(height);
                draw_row(&mut pdf_flow.current().content, &cells, top, height);
            }
        }

        trailer::place(&mut pdf_flow, fields, date_stamp);
        pdf_flow.into_pages()
    };

    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for (i, page) in pages.into_iter().enumerate() {
        let raw = page.content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);

        let mut page_dict = pdf.page(page_ids[i]);
        page_dict
            .media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page_dict.resources();
        {
            let mut font_res = resources.fonts();
            font_res.pair(Name(FONT_REGULAR.as_bytes()), font_regular_ref);
            font_res.pair(Name(FONT_BOLD.as_bytes()), font_bold_ref);
        }
        if let Some((xobj_ref, _, _)) = logo_embed {
            resources
                .x_objects()
                .pair(Name(LOGO_NAME.as_bytes()), xobj_ref);
        }
    }

    log::debug!("assembled {n} page(s)");
    Ok(pdf.finish())
}

/// Deterministic output name from the normalized identifier; fixed fallback
/// when the record carries none.
pub fn output_file_name(fields: &Fields) -> String {
    let id: String = fields
        .field("employee_id")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if id.is_empty() {
        "personnel-report.pdf".to_string()
    } else {
        format!("personnel-{id}.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;
    use crate::record::{Record, normalize};

    #[test]
    fn output_name_uses_sanitized_identifier() {
        let record: Record =
            serde_json::from_value(serde_json::json!({ "employee_id": "hr/2024 001" })).unwrap();
        let fields = normalize(&record);
        assert_eq!(output_file_name(&fields), "personnel-HR2024001.pdf");
    }

    #[test]
    fn output_name_falls_back_when_identifier_absent() {
        let fields = normalize(&Record::default());
        assert_eq!(output_file_name(&fields), "personnel-report.pdf");
    }

    #[test]
    fn row_height_grows_with_wrapped_text() {
        let short = Row::new(vec![Cell::text("SHORT", 6)], 6).unwrap();
        let long = Row::new(
            vec![Cell::text(
                "A VERY LONG ADDRESS LINE THAT CANNOT POSSIBLY FIT INSIDE A SINGLE GRID \
                 CELL WITHOUT WRAPPING ONTO SEVERAL MORE LINES OF TEXT IN THE REPORT BODY \
                 BECAUSE IT KEEPS GOING AND GOING",
                2,
            )],
            2,
        )
        .unwrap();
        let (_, h_short) = layout_row(&short, 6);
        let (_, h_long) = layout_row(&long, 2);
        assert_eq!(h_short, CELL_LINE_H + 2.0 * CELL_PAD_Y);
        assert!(h_long > h_short);
    }

    #[test]
    fn empty_cells_still_occupy_one_line() {
        let row = Row::new(vec![Cell::text("", 3), Cell::text("", 3)], 6).unwrap();
        let (cells, h) = layout_row(&row, 6);
        assert_eq!(h, CELL_LINE_H + 2.0 * CELL_PAD_Y);
        assert!(cells.iter().all(|c| c.lines.is_empty()));
    }
}
