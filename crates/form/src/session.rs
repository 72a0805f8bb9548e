//! The booking form as one editable session.

use crate::lists::{EditableList, PresetPolicy};
use crate::{
    inputs, placeholder, Autosaver, DraftLoad, DraftManager, FormError, FormResult,
    SubmissionClient,
};
use api_shared::{SubmissionRes, MAX_REQUEST_BYTES};
use std::path::Path;
use std::sync::Arc;
use tourdesk_core::constants::{
    PRESET_SPECIAL_TERMS, PRESET_TOUR_FARE_EXCLUDES, PRESET_TOUR_FARE_INCLUDES,
};
use tourdesk_core::{validate_submission, BookingSubmission, FieldError, SubmissionError};
use tourdesk_files::{AttachmentPolicy, AttachmentSlot, DragState, ExtensionSet, UploadedFile};

/// The three editable lists of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Includes,
    Excludes,
    SpecialTerms,
}

/// Form state between page load and a successful submission.
///
/// Scalar fields are edited through [`update`](Self::update); lists and the attachment have
/// their own operations. Every change is handed to the autosaver if one is attached.
pub struct FormSession {
    fields: BookingSubmission,
    includes: EditableList,
    excludes: EditableList,
    terms: EditableList,
    attachment: AttachmentSlot,
    drag: DragState,
    drafts: Arc<DraftManager>,
    autosave: Option<Autosaver>,
    field_error: Option<FieldError>,
    submitting: bool,
    request_limit: usize,
}

impl FormSession {
    pub fn new(drafts: Arc<DraftManager>, extensions: ExtensionSet) -> Self {
        let fields = BookingSubmission::with_presets();
        let attachment =
            AttachmentSlot::new(AttachmentPolicy::new(extensions, fields.file_size_limit_enabled));

        Self {
            fields,
            includes: EditableList::from_presets(
                "Tour fare includes",
                PRESET_TOUR_FARE_INCLUDES,
                PresetPolicy::Removable,
            )
            .with_min_items(1),
            excludes: EditableList::from_presets(
                "Tour fare excludes",
                PRESET_TOUR_FARE_EXCLUDES,
                PresetPolicy::Removable,
            )
            .with_min_items(1),
            terms: EditableList::from_presets(
                "Special terms",
                PRESET_SPECIAL_TERMS,
                PresetPolicy::Removable,
            ),
            attachment,
            drag: DragState::default(),
            drafts,
            autosave: None,
            field_error: None,
            submitting: false,
            request_limit: MAX_REQUEST_BYTES,
        }
    }

    /// Attach a debounced autosaver. Changes made from now on are scheduled on it.
    pub fn with_autosave(mut self, autosaver: Autosaver) -> Self {
        self.autosave = Some(autosaver);
        self
    }

    /// Largest payload the session will send (default [`MAX_REQUEST_BYTES`], the server's
    /// limit).
    pub fn with_request_limit(mut self, request_limit: usize) -> Self {
        self.request_limit = request_limit;
        self
    }

    /// The full booking as it would be submitted now.
    pub fn snapshot(&self) -> BookingSubmission {
        BookingSubmission {
            special_terms: self.terms.items().to_vec(),
            tour_fair_includes: self.includes.items().to_vec(),
            tour_fair_excludes: self.excludes.items().to_vec(),
            uploaded_file: self.attachment.value().cloned(),
            file_size_limit_enabled: self.attachment.policy().size_limit_enabled(),
            ..self.fields.clone()
        }
    }

    pub fn list(&self, kind: ListKind) -> &EditableList {
        match kind {
            ListKind::Includes => &self.includes,
            ListKind::Excludes => &self.excludes,
            ListKind::SpecialTerms => &self.terms,
        }
    }

    pub fn attachment(&self) -> &AttachmentSlot {
        &self.attachment
    }

    pub fn drag(&mut self) -> &mut DragState {
        &mut self.drag
    }

    /// The inline error from the last submit attempt.
    pub fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Edits scalar fields. List and attachment fields changed here are ignored; use the
    /// dedicated operations for those.
    pub fn update(&mut self, edit: impl FnOnce(&mut BookingSubmission)) {
        edit(&mut self.fields);
        self.changed();
    }

    pub fn set_tour_fare_text(&mut self, text: &str) {
        self.update(|b| b.tour_fare = inputs::coerce_amount(text));
    }

    pub fn set_single_supplement_text(&mut self, text: &str) {
        self.update(|b| b.single_supplement = inputs::coerce_amount(text));
    }

    pub fn set_delegates_text(&mut self, text: &str) {
        self.update(|b| b.number_of_delegates = Some(inputs::coerce_count(text)));
    }

    pub fn set_tour_leaders_text(&mut self, text: &str) {
        self.update(|b| b.number_of_tour_leaders = Some(inputs::coerce_count(text)));
    }

    pub fn set_starting_date_text(&mut self, text: &str) {
        self.update(|b| b.starting_date = inputs::coerce_date(text));
    }

    pub fn set_size_limit_enabled(&mut self, enabled: bool) {
        self.attachment.set_size_limit_enabled(enabled);
        self.changed();
    }

    pub fn append_item(&mut self, kind: ListKind, value: &str) -> FormResult<()> {
        self.list_mut(kind).append(value)?;
        self.changed();
        Ok(())
    }

    pub fn edit_item(&mut self, kind: ListKind, index: usize, value: &str) -> FormResult<()> {
        self.list_mut(kind).edit(index, value)?;
        self.changed();
        Ok(())
    }

    pub fn remove_item(&mut self, kind: ListKind, index: usize) -> FormResult<String> {
        let removed = self.list_mut(kind).remove(index)?;
        self.changed();
        Ok(removed)
    }

    /// Sets the `nth` placeholder of special term `index`. A term without placeholders is
    /// edited as plain text with [`edit_item`](Self::edit_item).
    pub fn fill_term_placeholder(
        &mut self,
        index: usize,
        nth: usize,
        value: &str,
    ) -> FormResult<()> {
        let current = self.terms.get(index).ok_or(FormError::NoSuchItem(index))?;
        let filled = placeholder::fill(current, nth, value)?;
        self.edit_item(ListKind::SpecialTerms, index, &filled)
    }

    /// Accepts a dropped or browsed file. On rejection the slot keeps the error message.
    pub fn attach(&mut self, filename: &str, bytes: &[u8]) -> FormResult<()> {
        self.drag.drop_files();
        let outcome = self.attachment.handle_file(filename, bytes);
        self.changed();
        outcome.map_err(Into::into)
    }

    pub fn attach_path(&mut self, path: &Path) -> FormResult<()> {
        let outcome = self.attachment.handle_path(path);
        self.changed();
        outcome.map_err(Into::into)
    }

    pub fn remove_attachment(&mut self) {
        self.attachment.remove();
        self.changed();
    }

    /// Loads the stored draft and applies it. The attachment is left empty; a restored draft
    /// carries a notice asking the user to reselect it. Applying a draft does not schedule an
    /// autosave.
    pub fn restore_draft(&mut self) -> FormResult<DraftLoad> {
        let outcome = self.drafts.load()?;
        if let DraftLoad::Restored { values, .. } = &outcome {
            self.apply(values.clone());
        }
        Ok(outcome)
    }

    /// Replaces every field with `values`, e.g. from a booking file. Any attachment in
    /// `values` is ignored; files go through [`attach`](Self::attach) so the extension and size
    /// rules apply.
    pub fn load_values(&mut self, values: BookingSubmission) {
        self.apply(values);
        self.changed();
    }

    /// Validates the current state and marks the session as submitting.
    ///
    /// Returns the payload to send. On failure the first failing field becomes the inline
    /// error and the session stays ready to submit again.
    ///
    /// # Errors
    ///
    /// Returns `FormError::SubmitInProgress` while a request is in flight, or
    /// `FormError::Invalid` with the first failing field.
    pub fn begin_submit(&mut self) -> FormResult<serde_json::Value> {
        if self.submitting {
            return Err(FormError::SubmitInProgress);
        }
        self.field_error = None;

        let booking = self.snapshot();
        let payload = serde_json::to_value(&booking)?;

        let first_error = match validate_submission(&payload) {
            Ok(_) => match oversized_attachment(&booking) {
                Some(error) => Some(error),
                None => over_request_limit(&payload, self.request_limit)?,
            },
            Err(SubmissionError::Validation(errors)) => errors.first().cloned(),
            Err(e) => return Err(e.into()),
        };
        if let Some(error) = first_error {
            tracing::debug!(field = %error.field, "submission blocked by validation");
            self.field_error = Some(error.clone());
            return Err(FormError::Invalid(error));
        }

        self.submitting = true;
        Ok(payload)
    }

    /// Clears the submitting flag. A successful response clears the draft and resets the form;
    /// a rejected one surfaces the first server-side field error.
    pub fn finish_submit(&mut self, outcome: &FormResult<SubmissionRes>) {
        self.submitting = false;

        let Ok(res) = outcome else {
            return;
        };

        if res.success {
            self.drafts.suppress();
            if let Err(e) = self.drafts.clear() {
                tracing::warn!("failed to clear draft after submission: {e}");
            }
            self.reset();
        } else if let Some(error) = res.errors.as_ref().and_then(|errors| errors.first()) {
            self.field_error = Some(FieldError::new(error.field.clone(), error.message.clone()));
        }
    }

    /// Validates, sends and settles one submission.
    pub async fn submit(&mut self, client: &SubmissionClient) -> FormResult<SubmissionRes> {
        let payload = self.begin_submit()?;
        let outcome = client.submit(&payload).await;
        self.finish_submit(&outcome);
        outcome
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut EditableList {
        match kind {
            ListKind::Includes => &mut self.includes,
            ListKind::Excludes => &mut self.excludes,
            ListKind::SpecialTerms => &mut self.terms,
        }
    }

    fn apply(&mut self, values: BookingSubmission) {
        self.includes.replace_all(values.tour_fair_includes.clone());
        self.excludes.replace_all(values.tour_fair_excludes.clone());
        self.terms.replace_all(values.special_terms.clone());
        self.attachment.remove();
        self.attachment
            .set_size_limit_enabled(values.file_size_limit_enabled);
        self.fields = BookingSubmission {
            uploaded_file: None,
            ..values
        };
    }

    fn reset(&mut self) {
        let extensions = self.attachment.policy().extensions();
        let drafts = self.drafts.clone();
        let autosave = self.autosave.take();
        let request_limit = self.request_limit;

        *self = Self::new(drafts, extensions);
        self.autosave = autosave;
        self.request_limit = request_limit;
    }

    fn changed(&mut self) {
        self.drafts.resume();
        if let Some(autosave) = &self.autosave {
            autosave.schedule(self.snapshot());
        }
    }
}

fn over_request_limit(
    payload: &serde_json::Value,
    limit: usize,
) -> FormResult<Option<FieldError>> {
    if serde_json::to_vec(payload)?.len() <= limit {
        return Ok(None);
    }
    Ok(Some(FieldError::new(
        "uploaded_file.size",
        format!(
            "File is too large to submit; requests are limited to {} MB",
            limit.div_ceil(1024 * 1024)
        ),
    )))
}

fn oversized_attachment(booking: &BookingSubmission) -> Option<FieldError> {
    let file: &UploadedFile = booking.uploaded_file.as_ref()?;
    let policy = AttachmentPolicy::new(ExtensionSet::Rich, booking.file_size_limit_enabled);
    policy
        .check_size(file.size)
        .err()
        .map(|e| FieldError::new("uploaded_file.size", e.to_string()))
}
