//! Form field extraction from a submitted modal.
//!
//! Slack returns the layout (`blocks`, where the label lives) and the entered
//! values (`state.values`, keyed by group and then action id) as two separate
//! structures. The only link between them is the element's action id, so the
//! blocks are indexed by action id once and the state is walked in one pass.

use std::collections::HashMap;

use tracing::debug;

use crate::slack::SubmissionView;

/// The fields of the invite form, identified by their label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    F3Name,
    HospitalName,
    EmailAddress,
    CellPhone,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::F3Name,
        FormField::HospitalName,
        FormField::EmailAddress,
        FormField::CellPhone,
    ];

    /// Label shown on the form.
    pub fn label(self) -> &'static str {
        match self {
            FormField::F3Name => "F3 Name",
            FormField::HospitalName => "Hospital Name",
            FormField::EmailAddress => "Email Address",
            FormField::CellPhone => "Cell Phone",
        }
    }

    /// Inverse of [`FormField::label`]. Exact match only.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

/// Values entered on the invite form. Unmatched fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub f3_name: String,
    pub hospital_name: String,
    pub email_address: String,
    pub cell_phone: String,
}

impl ExtractedFields {
    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::F3Name => &mut self.f3_name,
            FormField::HospitalName => &mut self.hospital_name,
            FormField::EmailAddress => &mut self.email_address,
            FormField::CellPhone => &mut self.cell_phone,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::F3Name => &self.f3_name,
            FormField::HospitalName => &self.hospital_name,
            FormField::EmailAddress => &self.email_address,
            FormField::CellPhone => &self.cell_phone,
        }
    }
}

/// Extract the invite form values. Never fails.
pub fn extract_fields(view: &SubmissionView) -> ExtractedFields {
    // action id -> label text; the first block wins on duplicate ids
    let mut labels: HashMap<&str, &str> = HashMap::with_capacity(view.blocks.len());
    for block in &view.blocks {
        if let (Some(action_id), Some(label)) = (block.action_id(), block.label_text()) {
            labels.entry(action_id).or_insert(label);
        }
    }

    let mut fields = ExtractedFields::default();

    for (group, actions) in &view.state.values {
        for (action_id, entry) in actions {
            let Some(label) = labels.get(action_id.as_str()) else {
                debug!(group = %group, action_id = %action_id, "form_value_unmatched");
                continue;
            };

            let Some(field) = FormField::from_label(label) else {
                debug!(label = %label, "form_label_unknown");
                continue;
            };

            *fields.slot(field) = entry.value.clone().unwrap_or_default();
        }
    }

    debug!(
        f3_name = %fields.f3_name,
        hospital_name = %fields.hospital_name,
        email_address = %fields.email_address,
        cell_phone = %fields.cell_phone,
        "form_values_extracted"
    );

    fields
}
