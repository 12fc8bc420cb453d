//! A form controller shared between concurrent request handlers.

use crate::controller::{FormController, Submission};
use crate::error::FormResult;
use crate::gateway::{AddressLookupService, Navigator, RecordGateway};
use std::sync::{Mutex, PoisonError};

/// Wraps a [`FormController`] for front ends that may issue overlapping requests.
///
/// The lock is only held for synchronous transitions; it is released before any network
/// await, so a slow gateway never blocks other operations on the session.
#[derive(Debug, Default)]
pub struct FormSession {
    controller: Mutex<FormController>,
}

impl FormSession {
    pub fn new(controller: FormController) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }

    /// Runs `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut FormController) -> R) -> R {
        // A panic inside `f` cannot leave the controller half-updated in a way later
        // operations depend on, so a poisoned lock is still usable.
        let mut guard = self
            .controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub async fn lookup_address(&self, service: &dyn AddressLookupService) -> bool {
        let Some(postal_code) = self.with(FormController::begin_lookup) else {
            return false;
        };
        tracing::info!("looking up postal code {}", postal_code);
        let outcome = service.lookup(&postal_code).await;
        self.with(|c| c.complete_lookup(outcome))
    }

    /// Submits the form unless a submission is already in flight on this session.
    pub async fn submit_final(
        &self,
        gateway: &dyn RecordGateway,
        navigator: &dyn Navigator,
    ) -> FormResult<Submission> {
        let Some(payload) = self.with(FormController::begin_submission)? else {
            return Ok(Submission::AlreadyInFlight);
        };
        let outcome = gateway.submit_registration(&payload).await;
        Ok(self.with(|c| c.complete_submission(outcome, navigator)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{at_final_step, RecordingNavigator};
    use crate::error::GatewayResult;
    use crate::gateway::NoNavigation;
    use crate::payload::{HealthRecordPayload, RegistrationPayload};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Holds every submission until released.
    #[derive(Default)]
    struct GatedGateway {
        calls: AtomicUsize,
        release: Notify,
    }

    #[async_trait]
    impl RecordGateway for GatedGateway {
        async fn submit_registration(&self, _: &RegistrationPayload) -> GatewayResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(())
        }

        async fn submit_health_record(&self, _: &HealthRecordPayload) -> GatewayResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn double_submit_while_pending_makes_one_gateway_call() {
        let session = Arc::new(FormSession::new(at_final_step()));
        let gateway = Arc::new(GatedGateway::default());

        let first = tokio::spawn({
            let session = session.clone();
            let gateway = gateway.clone();
            async move { session.submit_final(gateway.as_ref(), &NoNavigation).await }
        });

        while gateway.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(session.with(|c| c.is_submitting()));

        let second = session
            .submit_final(gateway.as_ref(), &NoNavigation)
            .await
            .unwrap();
        assert_eq!(second, Submission::AlreadyInFlight);

        gateway.release.notify_one();
        let first = first.await.unwrap().unwrap();

        assert_eq!(first, Submission::Accepted);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert!(!session.with(|c| c.is_submitting()));
    }

    #[tokio::test]
    async fn session_is_usable_while_submission_is_pending() {
        let session = Arc::new(FormSession::new(at_final_step()));
        let gateway = Arc::new(GatedGateway::default());
        let navigator = Arc::new(RecordingNavigator::default());

        let pending = tokio::spawn({
            let session = session.clone();
            let gateway = gateway.clone();
            let navigator = navigator.clone();
            async move {
                session
                    .submit_final(gateway.as_ref(), navigator.as_ref())
                    .await
            }
        });

        while gateway.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        // Reading state does not wait on the network call.
        assert_eq!(session.with(|c| c.current_step()), 4);

        gateway.release.notify_one();
        assert_eq!(pending.await.unwrap().unwrap(), Submission::Accepted);
        assert_eq!(*navigator.routes.lock().unwrap(), vec!["/".to_string()]);
    }
}
