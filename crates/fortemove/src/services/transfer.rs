use std::io::Read;

use crate::access::{ensure_admin, Principal};
use crate::export::{import_template_csv, ExportEngine, ExportOutput, ExportQuery};
use crate::import::{ImportEngine, ImportSummary};

use super::ServiceError;

/// Admin-only bulk transfer: spreadsheet import, filtered export, and the
/// import template download.
pub struct TransferService {
    import: ImportEngine,
    export: ExportEngine,
}

impl TransferService {
    pub fn new(import: ImportEngine, export: ExportEngine) -> Self {
        Self { import, export }
    }

    pub fn import_applications<R: Read>(
        &self,
        principal: &Principal,
        reader: R,
    ) -> Result<ImportSummary, ServiceError> {
        ensure_admin(principal)?;
        Ok(self.import.import(reader)?)
    }

    pub fn export_applications(
        &self,
        principal: &Principal,
        query: &ExportQuery,
    ) -> Result<ExportOutput, ServiceError> {
        ensure_admin(principal)?;
        Ok(self.export.export(query)?)
    }

    pub fn import_template(&self, principal: &Principal) -> Result<String, ServiceError> {
        ensure_admin(principal)?;
        Ok(import_template_csv()?)
    }
}
