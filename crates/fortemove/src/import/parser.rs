use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};

/// One spreadsheet row, columns named by the header row. Everything is
/// optional at parse time; required-field enforcement happens while
/// reconciling, so one bad cell fails one row instead of the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(
        rename = "jobTitle",
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_title: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(
        rename = "jobDescription",
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_description: Option<String>,
    #[serde(
        rename = "jobRequirements",
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_requirements: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        rename = "coverLetter",
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_letter: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        rename = "appliedAt",
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub applied_at: Option<String>,
}

/// Each record parses independently; a ragged or otherwise malformed row
/// becomes an `Err` entry without stopping the reader.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Vec<Result<ImportRow, csv::Error>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<ImportRow>()
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rows_parse_with_blank_cells_as_none() {
        let csv = "jobTitle,company,email,name,status,appliedAt\n\
Backend Engineer,,jane@example.com,Jane,,2024-01-15\n";
        let rows = parse_rows(Cursor::new(csv));
        assert_eq!(rows.len(), 1);
        let row = rows[0].as_ref().expect("parses");
        assert_eq!(row.job_title.as_deref(), Some("Backend Engineer"));
        assert!(row.company.is_none());
        assert!(row.status.is_none());
        assert_eq!(row.applied_at.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let csv = "email,name,favoriteColor\njane@example.com,Jane,teal\n";
        let rows = parse_rows(Cursor::new(csv));
        let row = rows[0].as_ref().expect("parses");
        assert_eq!(row.email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn a_ragged_row_fails_alone() {
        let csv = "email,name\n\
jane@example.com,Jane,one,cell,too,many\n\
sam@example.com,Sam\n";
        let rows = parse_rows(Cursor::new(csv));
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_err());
        let row = rows[1].as_ref().expect("parses");
        assert_eq!(row.email.as_deref(), Some("sam@example.com"));
    }
}
