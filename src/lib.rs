mod error;
mod fonts;
mod model;
mod pdf;
mod record;
mod sections;

pub use error::Error;
pub use model::{Alignment, Cell, Row, Section};
pub use pdf::{Logo, load_logo, output_file_name};
pub use record::{
    Dependent, Details, Education, EmergencyContact, Employment, Fields, Record, Relative,
    normalize,
};
pub use sections::build_sections;

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Decode a JSON personnel record. Unknown fields are ignored; missing fields
/// are simply absent.
pub fn parse_record(bytes: &[u8]) -> Result<Record, Error> {
    serde_json::from_slice(bytes).map_err(|e| Error::InvalidRecord(e.to_string()))
}

/// Render one record into PDF bytes. The logo, when given, was already
/// resolved up front; rendering itself never touches the filesystem.
pub fn render_record(record: &Record, logo: Option<&Logo>) -> Result<Vec<u8>, Error> {
    let fields = record::normalize(record);
    let sections = sections::build_sections(&fields)?;
    let date_stamp = chrono::Local::now()
        .format("%d %B %Y")
        .to_string()
        .to_uppercase();
    pdf::render(&sections, &fields, logo, &date_stamp)
}

/// Full pipeline: normalize, build sections, flow pages, place the trailer and
/// write the finished document under its deterministic name. Returns the path
/// of the written file.
pub fn generate_report(
    record: &Record,
    logo_path: Option<&Path>,
    output_dir: &Path,
) -> Result<PathBuf, Error> {
    let t0 = Instant::now();

    // Degradable: a missing or broken logo is logged and omitted.
    let logo = logo_path.and_then(pdf::load_logo);
    let t_logo = t0.elapsed();

    let fields = record::normalize(record);
    let sections = sections::build_sections(&fields)?;
    let t_build = t0.elapsed();

    let date_stamp = chrono::Local::now()
        .format("%d %B %Y")
        .to_string()
        .to_uppercase();
    let bytes = pdf::render(&sections, &fields, logo.as_ref(), &date_stamp)?;
    let t_render = t0.elapsed();

    let path = output_dir.join(pdf::output_file_name(&fields));
    std::fs::write(&path, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: logo={:.1}ms, build={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_logo.as_secs_f64() * 1000.0,
        (t_build - t_logo).as_secs_f64() * 1000.0,
        (t_render - t_build).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(path)
}
