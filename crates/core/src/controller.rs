//! The multi-step registration form controller.
//!
//! [`FormController`] owns the record, the error map and the step cursor. All mutation goes
//! through [`change_field`](FormController::change_field), the navigation methods, and the
//! two split-phase network operations (address lookup and final submission).
//!
//! ## Split-phase network operations
//!
//! A network call is started with a `begin_*` method, which validates and snapshots what the
//! call needs, and finished with the matching `complete_*` method, which applies the result.
//! No state is borrowed while the call is outstanding. This lets [`FormSession`] release its
//! lock during the await, and keeps `is_submitting` meaningful: a second `begin_submission`
//! while one is in flight returns `Ok(None)` and no second request is made.
//!
//! [`FormSession`]: crate::session::FormSession

use crate::constants::DEFAULT_SUCCESS_ROUTE;
use crate::error::{FormError, FormResult, GatewayResult};
use crate::field::FieldId;
use crate::gateway::{AddressLookup, AddressLookupService, Navigator, RecordGateway};
use crate::notice::{self, Notice};
use crate::payload::RegistrationPayload;
use crate::record::{ErrorMap, FormRecord};
use crate::steps::{self, StepDefinition, LAST_STEP, STEPS};
use crate::validation::validate_field;

/// How a submission attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The gateway accepted the record.
    Accepted,
    /// The gateway call failed; the form is intact for a retry.
    Failed,
    /// Another submission was already in flight; nothing was sent.
    AlreadyInFlight,
}

#[derive(Debug)]
pub struct FormController {
    current_step: usize,
    record: FormRecord,
    errors: ErrorMap,
    is_submitting: bool,
    notices: Vec<Notice>,
    success_route: String,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_ROUTE)
    }
}

impl FormController {
    /// Creates a controller on the first step with an empty record.
    ///
    /// `success_route` is handed to the [`Navigator`] after a successful submission.
    pub fn new(success_route: impl Into<String>) -> Self {
        Self {
            current_step: 0,
            record: FormRecord::default(),
            errors: ErrorMap::default(),
            is_submitting: false,
            notices: Vec::new(),
            success_route: success_route.into(),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step(&self) -> &'static StepDefinition {
        &STEPS[self.current_step]
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == LAST_STEP
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Pending notices, oldest first. Draining hands them to the presentation layer.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Writes `value` into `field` and re-validates that field only.
    pub fn change_field(&mut self, field: FieldId, value: impl Into<String>) {
        self.record.set(field, value.into());
        let outcome = validate_field(
            field,
            self.record.get(field),
            steps::is_required(field),
            &self.record.credentials.password,
        );
        self.errors.record(field, outcome);
    }

    /// Validates every field of step `index` against the current record.
    ///
    /// Each field's entry in the error map is refreshed. Returns the failing fields in step
    /// order.
    pub fn validate_step(&mut self, index: usize) -> Vec<FieldId> {
        let Some(step) = STEPS.get(index) else {
            return Vec::new();
        };

        let mut failing = Vec::new();
        for spec in step.fields {
            let outcome = validate_field(
                spec.field,
                self.record.get(spec.field),
                spec.required,
                &self.record.credentials.password,
            );
            if outcome.is_err() {
                failing.push(spec.field);
            }
            self.errors.record(spec.field, outcome);
        }
        failing
    }

    /// Moves to the next step if the current one validates.
    ///
    /// Returns the new step index, which stays at the last step once reached.
    ///
    /// # Errors
    ///
    /// Returns `FormError::IncompleteStep` listing the failing fields; the step index does
    /// not change and a notice is queued.
    pub fn advance(&mut self) -> FormResult<usize> {
        self.ensure_current_step_valid()?;
        self.current_step = (self.current_step + 1).min(LAST_STEP);
        tracing::debug!("advanced to step {}", self.current_step);
        Ok(self.current_step)
    }

    /// Moves to the previous step without validating. Stays at step 0.
    pub fn retreat(&mut self) -> usize {
        self.current_step = self.current_step.saturating_sub(1);
        tracing::debug!("retreated to step {}", self.current_step);
        self.current_step
    }

    fn ensure_current_step_valid(&mut self) -> FormResult<()> {
        let failing = self.validate_step(self.current_step);
        if failing.is_empty() {
            return Ok(());
        }
        self.notices.push(Notice::error(notice::FILL_REQUIRED_FIELDS));
        Err(FormError::IncompleteStep {
            step: self.current_step,
            failing,
        })
    }

    // ------------------------------------------------------------------------
    // Address lookup
    // ------------------------------------------------------------------------

    /// Postal code to look up, or `None` (with a notice queued) when none has been entered.
    pub fn begin_lookup(&mut self) -> Option<String> {
        let postal_code = self.record.address.postal_code.trim();
        if postal_code.is_empty() {
            self.notices.push(Notice::error(notice::ENTER_POSTAL_CODE));
            return None;
        }
        Some(postal_code.to_string())
    }

    /// Applies a lookup result. Returns `true` when district and state were filled in.
    pub fn complete_lookup(&mut self, outcome: GatewayResult<AddressLookup>) -> bool {
        match outcome {
            Ok(AddressLookup::Found { district, state }) => {
                self.record.address.district = district;
                self.record.address.state = state;
                self.errors.clear(FieldId::District);
                self.errors.clear(FieldId::State);
                self.notices.push(Notice::success(notice::ADDRESS_FETCHED));
                true
            }
            Ok(AddressLookup::NotFound) => {
                self.notices.push(Notice::error(notice::INVALID_POSTAL_CODE));
                false
            }
            Err(e) => {
                tracing::warn!("address lookup failed: {}", e);
                self.notices.push(Notice::error(notice::ADDRESS_LOOKUP_FAILED));
                false
            }
        }
    }

    /// Looks up district and state for the record's postal code.
    pub async fn lookup_address(&mut self, service: &dyn AddressLookupService) -> bool {
        let Some(postal_code) = self.begin_lookup() else {
            return false;
        };
        tracing::info!("looking up postal code {}", postal_code);
        let outcome = service.lookup(&postal_code).await;
        self.complete_lookup(outcome)
    }

    // ------------------------------------------------------------------------
    // Final submission
    // ------------------------------------------------------------------------

    /// Validates the final step and marks a submission as in flight.
    ///
    /// Returns the payload to send, or `None` when a submission is already in flight.
    ///
    /// # Errors
    ///
    /// - `FormError::NotOnFinalStep` if called before the last step.
    /// - `FormError::IncompleteStep` if the final step does not validate.
    pub fn begin_submission(&mut self) -> FormResult<Option<RegistrationPayload>> {
        if !self.is_last_step() {
            return Err(FormError::NotOnFinalStep);
        }
        self.ensure_current_step_valid()?;
        if self.is_submitting {
            tracing::debug!("submission already in flight, ignoring");
            return Ok(None);
        }
        self.is_submitting = true;
        Ok(Some(RegistrationPayload::from(&self.record)))
    }

    /// Finishes the in-flight submission.
    pub fn complete_submission(
        &mut self,
        outcome: GatewayResult<()>,
        navigator: &dyn Navigator,
    ) -> Submission {
        self.is_submitting = false;
        match outcome {
            Ok(()) => {
                tracing::info!("registration accepted");
                self.notices.push(Notice::success(notice::REGISTRATION_SUCCEEDED));
                navigator.navigate(&self.success_route);
                Submission::Accepted
            }
            Err(e) => {
                tracing::warn!("registration failed: {}", e);
                self.notices.push(Notice::error(notice::REGISTRATION_FAILED));
                Submission::Failed
            }
        }
    }

    /// Validates, submits and applies the result for a single-owner front end.
    pub async fn submit_final(
        &mut self,
        gateway: &dyn RecordGateway,
        navigator: &dyn Navigator,
    ) -> FormResult<Submission> {
        let Some(payload) = self.begin_submission()? else {
            return Ok(Submission::AlreadyInFlight);
        };
        let outcome = gateway.submit_registration(&payload).await;
        Ok(self.complete_submission(outcome, navigator))
    }
}
