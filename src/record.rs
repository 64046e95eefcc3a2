use std::collections::HashMap;

use serde::Deserialize;

/// Raw personnel record as delivered by the record store. Schema-free in the
/// sense that every field, including the whole secondary sub-record, may be
/// missing; absence is never an error.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Record {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub birth_place: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub nationality: Option<String>,
    pub blood_type: Option<String>,
    /// Secondary attributes; fully optional as a whole.
    pub details: Option<Details>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Details {
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub has_relative_in_org: Option<bool>,
    pub relative: Option<Relative>,
    pub dependents: Vec<Dependent>,
    pub education: Vec<Education>,
    pub employment: Vec<Employment>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Relative {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub unit: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Dependent {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub birth_date: Option<String>,
    pub occupation: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Education {
    pub level: Option<String>,
    pub institution: Option<String>,
    pub major: Option<String>,
    pub graduated: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Employment {
    pub employer: Option<String>,
    pub position: Option<String>,
    pub from: Option<String>,
    pub until: Option<String>,
}

/// Flat field accessor over a normalized record. Every value is upper-cased
/// and trimmed; a missing field reads as the empty string. List entries are
/// reachable under 1-based indexed keys, e.g. `dependent.2.name`.
pub struct Fields {
    values: HashMap<String, String>,
    flags: HashMap<String, bool>,
    counts: HashMap<String, usize>,
}

impl Fields {
    pub fn field(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Boolean declaration; absent reads as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Number of entries present in a flattened list (`dependent`, `education`,
    /// `employment`, `emergency`). Unknown prefixes read as zero.
    pub fn list_len(&self, prefix: &str) -> usize {
        self.counts.get(prefix).copied().unwrap_or(0)
    }
}

fn display(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_uppercase())
}

/// Map a record into the flat field mapping the section builder reads.
/// No side effects; never fails.
pub fn normalize(record: &Record) -> Fields {
    let mut values = HashMap::new();
    let mut flags = HashMap::new();
    let mut counts = HashMap::new();

    let put = |map: &mut HashMap<String, String>, key: &str, v: &Option<String>| {
        if let Some(s) = display(v) {
            map.insert(key.to_string(), s);
        }
    };

    put(&mut values, "employee_id", &record.employee_id);
    put(&mut values, "full_name", &record.full_name);
    put(&mut values, "birth_place", &record.birth_place);
    put(&mut values, "birth_date", &record.birth_date);
    put(&mut values, "gender", &record.gender);
    put(&mut values, "marital_status", &record.marital_status);
    put(&mut values, "nationality", &record.nationality);
    put(&mut values, "blood_type", &record.blood_type);

    if let Some(details) = &record.details {
        put(&mut values, "address", &details.address);
        put(&mut values, "city", &details.city);
        put(&mut values, "postal_code", &details.postal_code);
        put(&mut values, "phone", &details.phone);
        put(&mut values, "email", &details.email);

        if let Some(b) = details.has_relative_in_org {
            flags.insert("has_relative_in_org".to_string(), b);
        }
        if let Some(rel) = &details.relative {
            put(&mut values, "relative.name", &rel.name);
            put(&mut values, "relative.relationship", &rel.relationship);
            put(&mut values, "relative.unit", &rel.unit);
        }

        counts.insert("emergency".to_string(), details.emergency_contacts.len());
        for (i, c) in details.emergency_contacts.iter().enumerate() {
            let n = i + 1;
            put(&mut values, &format!("emergency.{n}.name"), &c.name);
            put(
                &mut values,
                &format!("emergency.{n}.relationship"),
                &c.relationship,
            );
            put(&mut values, &format!("emergency.{n}.phone"), &c.phone);
            put(&mut values, &format!("emergency.{n}.address"), &c.address);
        }

        counts.insert("dependent".to_string(), details.dependents.len());
        for (i, d) in details.dependents.iter().enumerate() {
            let n = i + 1;
            put(&mut values, &format!("dependent.{n}.name"), &d.name);
            put(
                &mut values,
                &format!("dependent.{n}.relationship"),
                &d.relationship,
            );
            put(&mut values, &format!("dependent.{n}.birth_date"), &d.birth_date);
            put(&mut values, &format!("dependent.{n}.occupation"), &d.occupation);
        }

        counts.insert("education".to_string(), details.education.len());
        for (i, e) in details.education.iter().enumerate() {
            let n = i + 1;
            put(&mut values, &format!("education.{n}.level"), &e.level);
            put(
                &mut values,
                &format!("education.{n}.institution"),
                &e.institution,
            );
            put(&mut values, &format!("education.{n}.major"), &e.major);
            put(&mut values, &format!("education.{n}.graduated"), &e.graduated);
        }

        counts.insert("employment".to_string(), details.employment.len());
        for (i, e) in details.employment.iter().enumerate() {
            let n = i + 1;
            put(&mut values, &format!("employment.{n}.employer"), &e.employer);
            put(&mut values, &format!("employment.{n}.position"), &e.position);
            put(&mut values, &format!("employment.{n}.from"), &e.from);
            put(&mut values, &format!("employment.{n}.until"), &e.until);
        }
    }

    Fields {
        values,
        flags,
        counts,
    }
}
