use crate::error::Error;
use crate::model::{Cell, Section};
use crate::record::Fields;

/// Column counts by section family: labelled field grids use 6, list tables 4.
const GRID_COLS: u16 = 6;
const LIST_COLS: u16 = 4;

/// Dependents always materialize as this many rows; extra entries are dropped,
/// missing ones render blank.
pub const DEPENDENT_ROWS: usize = 4;
/// Same rule for the work-history table.
pub const EMPLOYMENT_ROWS: usize = 3;
/// Emergency contacts printed on the form.
const EMERGENCY_ROWS: usize = 2;

/// Mutually exclusive checkbox glyph pair for boolean declarations.
fn checkbox_pair(selected: bool) -> String {
    if selected {
        "[X] YES    [ ] NO".to_string()
    } else {
        "[ ] YES    [X] NO".to_string()
    }
}

fn label(text: &str) -> Cell {
    Cell {
        bold: true,
        ..Cell::text(text, 1)
    }
}

fn value(fields: &Fields, name: &str, span: u16) -> Cell {
    Cell::text(fields.field(name), span)
}

fn head(text: &str) -> Cell {
    Cell::heading(text, 1).centered()
}

fn identity_section(fields: &Fields) -> Result<Section, Error> {
    let mut s = Section::new("PERSONAL DATA", GRID_COLS)?;
    s.push_row(vec![
        label("FULL NAME"),
        value(fields, "full_name", 2),
        label("EMPLOYEE NO."),
        value(fields, "employee_id", 2),
    ])?;
    s.push_row(vec![
        label("PLACE OF BIRTH"),
        value(fields, "birth_place", 2),
        label("DATE OF BIRTH"),
        value(fields, "birth_date", 2),
    ])?;
    s.push_row(vec![
        label("GENDER"),
        value(fields, "gender", 2),
        label("MARITAL STATUS"),
        value(fields, "marital_status", 2),
    ])?;
    s.push_row(vec![
        label("NATIONALITY"),
        value(fields, "nationality", 2),
        label("BLOOD TYPE"),
        value(fields, "blood_type", 2),
    ])?;
    s.push_row(vec![label("ADDRESS"), value(fields, "address", 5)])?;
    s.push_row(vec![
        label("CITY"),
        value(fields, "city", 2),
        label("POSTAL CODE"),
        value(fields, "postal_code", 2),
    ])?;
    s.push_row(vec![
        label("PHONE"),
        value(fields, "phone", 2),
        label("EMAIL"),
        value(fields, "email", 2),
    ])?;
    Ok(s)
}

fn emergency_section(fields: &Fields) -> Result<Section, Error> {
    let mut s = Section::new("EMERGENCY CONTACTS", GRID_COLS)?;
    s.push_row(vec![
        Cell::heading("NAME", 2).centered(),
        Cell::heading("RELATIONSHIP", 1).centered(),
        Cell::heading("PHONE", 1).centered(),
        Cell::heading("ADDRESS", 2).centered(),
    ])?;
    for n in 1..=EMERGENCY_ROWS {
        s.push_row(vec![
            value(fields, &format!("emergency.{n}.name"), 2),
            value(fields, &format!("emergency.{n}.relationship"), 1),
            value(fields, &format!("emergency.{n}.phone"), 1),
            value(fields, &format!("emergency.{n}.address"), 2),
        ])?;
    }
    Ok(s)
}

fn relatives_section(fields: &Fields) -> Result<Section, Error> {
    let mut s = Section::new("RELATIVES IN THE ORGANIZATION", GRID_COLS)?;
    s.push_row(vec![
        Cell {
            bold: true,
            ..Cell::text("DO YOU HAVE A RELATIVE WORKING IN THE ORGANIZATION?", 4)
        },
        Cell::text(checkbox_pair(fields.flag("has_relative_in_org")), 2).centered(),
    ])?;
    s.push_row(vec![
        label("RELATIVE NAME"),
        value(fields, "relative.name", 2),
        label("RELATIONSHIP"),
        value(fields, "relative.relationship", 2),
    ])?;
    s.push_row(vec![label("WORK UNIT"), value(fields, "relative.unit", 5)])?;
    Ok(s)
}

fn dependents_section(fields: &Fields) -> Result<Section, Error> {
    let mut s = Section::new("DEPENDENTS", LIST_COLS)?;
    s.push_row(vec![
        head("NAME"),
        head("RELATIONSHIP"),
        head("DATE OF BIRTH"),
        head("OCCUPATION"),
    ])?;
    // Always exactly DEPENDENT_ROWS rows: entries past the count are dropped,
    // missing indices read back as blanks.
    for n in 1..=DEPENDENT_ROWS {
        s.push_row(vec![
            value(fields, &format!("dependent.{n}.name"), 1),
            value(fields, &format!("dependent.{n}.relationship"), 1),
            value(fields, &format!("dependent.{n}.birth_date"), 1),
            value(fields, &format!("dependent.{n}.occupation"), 1),
        ])?;
    }
    Ok(s)
}

fn education_section(fields: &Fields) -> Result<Section, Error> {
    let mut s = Section::new("EDUCATION", LIST_COLS)?;
    s.push_row(vec![
        head("LEVEL"),
        head("INSTITUTION"),
        head("MAJOR"),
        head("GRADUATED"),
    ])?;
    let entries = fields.list_len("education").max(1);
    for n in 1..=entries {
        s.push_row(vec![
            value(fields, &format!("education.{n}.level"), 1),
            value(fields, &format!("education.{n}.institution"), 1),
            value(fields, &format!("education.{n}.major"), 1),
            value(fields, &format!("education.{n}.graduated"), 1),
        ])?;
    }
    Ok(s)
}

fn employment_section(fields: &Fields) -> Result<Section, Error> {
    let mut s = Section::new("WORK HISTORY", LIST_COLS)?;
    s.push_row(vec![
        head("EMPLOYER"),
        head("POSITION"),
        head("FROM"),
        head("UNTIL"),
    ])?;
    for n in 1..=EMPLOYMENT_ROWS {
        s.push_row(vec![
            value(fields, &format!("employment.{n}.employer"), 1),
            value(fields, &format!("employment.{n}.position"), 1),
            value(fields, &format!("employment.{n}.from"), 1),
            value(fields, &format!("employment.{n}.until"), 1),
        ])?;
    }
    Ok(s)
}

/// Assemble the six report sections in their fixed order.
pub fn build_sections(fields: &Fields) -> Result<Vec<Section>, Error> {
    Ok(vec![
        identity_section(fields)?,
        emergency_section(fields)?,
        relatives_section(fields)?,
        dependents_section(fields)?,
        education_section(fields)?,
        employment_section(fields)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, normalize};

    fn fields_for(json: serde_json::Value) -> Fields {
        let record: Record = serde_json::from_value(json).unwrap();
        normalize(&record)
    }

    fn section<'a>(sections: &'a [Section], title: &str) -> &'a Section {
        sections.iter().find(|s| s.title == title).unwrap()
    }

    /// Data rows only: everything after the title row and the column-head row.
    fn data_rows(s: &Section) -> usize {
        s.rows.len() - 2
    }

    #[test]
    fn dependents_always_four_rows() {
        for count in [0usize, 2, 4, 7] {
            let deps: Vec<serde_json::Value> = (0..count)
                .map(|i| serde_json::json!({ "name": format!("dep {i}") }))
                .collect();
            let fields = fields_for(serde_json::json!({ "details": { "dependents": deps } }));
            let sections = build_sections(&fields).unwrap();
            assert_eq!(
                data_rows(section(&sections, "DEPENDENTS")),
                DEPENDENT_ROWS,
                "with {count} dependents"
            );
        }
    }

    #[test]
    fn work_history_always_three_rows() {
        for count in [0usize, 1, 3, 5] {
            let jobs: Vec<serde_json::Value> = (0..count)
                .map(|i| serde_json::json!({ "employer": format!("co {i}") }))
                .collect();
            let fields = fields_for(serde_json::json!({ "details": { "employment": jobs } }));
            let sections = build_sections(&fields).unwrap();
            assert_eq!(
                data_rows(section(&sections, "WORK HISTORY")),
                EMPLOYMENT_ROWS,
                "with {count} jobs"
            );
        }
    }

    #[test]
    fn dependents_past_the_fixed_count_are_dropped() {
        let deps: Vec<serde_json::Value> = (1..=6)
            .map(|i| serde_json::json!({ "name": format!("dep {i}") }))
            .collect();
        let fields = fields_for(serde_json::json!({ "details": { "dependents": deps } }));
        let sections = build_sections(&fields).unwrap();
        let s = section(&sections, "DEPENDENTS");
        let texts: Vec<&str> = s.rows[2..]
            .iter()
            .map(|r| r.cells[0].text.as_str())
            .collect();
        assert_eq!(texts, ["DEP 1", "DEP 2", "DEP 3", "DEP 4"]);
    }

    #[test]
    fn every_row_span_sum_matches_declared_columns() {
        let fields = fields_for(serde_json::json!({
            "full_name": "x",
            "details": {
                "has_relative_in_org": true,
                "education": [ { "level": "S1" }, { "level": "SMA" } ]
            }
        }));
        for s in build_sections(&fields).unwrap() {
            for row in &s.rows {
                let total: u16 = row.cells.iter().map(|c| c.span).sum();
                assert_eq!(total, s.columns, "section {}", s.title);
            }
        }
    }

    #[test]
    fn checkbox_pair_is_mutually_exclusive() {
        let yes = fields_for(serde_json::json!({ "details": { "has_relative_in_org": true } }));
        let no = fields_for(serde_json::json!({}));
        let pick = |f: &Fields| {
            let sections = build_sections(f).unwrap();
            section(&sections, "RELATIVES IN THE ORGANIZATION").rows[1].cells[1]
                .text
                .clone()
        };
        assert_eq!(pick(&yes), "[X] YES    [ ] NO");
        assert_eq!(pick(&no), "[ ] YES    [X] NO");
    }

    #[test]
    fn empty_record_builds_all_six_sections() {
        let fields = normalize(&Record::default());
        let sections = build_sections(&fields).unwrap();
        assert_eq!(sections.len(), 6);
        // Absent sub-record fields render blank, not as a null token.
        for s in &sections {
            for row in &s.rows {
                for cell in &row.cells {
                    assert_ne!(cell.text, "null");
                    assert_ne!(cell.text, "undefined");
                }
            }
        }
    }
}
