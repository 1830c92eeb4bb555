use crate::client::error::FlowError;
use crate::client::PredictionBackend;
use crate::domain::contract::RequestDraft;
use crate::domain::prediction::{PredictionRequest, PredictionResult};
use std::str::FromStr;

pub const PREDICTION_FAILED: &str = "An error occurred while making the prediction";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Hour,
    Load,
    Temperature,
    Weekend,
    Holiday,
}

impl FormField {
    pub fn is_checkbox(self) -> bool {
        matches!(self, FormField::Weekend | FormField::Holiday)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hour" => Ok(FormField::Hour),
            "load" => Ok(FormField::Load),
            "temperature" => Ok(FormField::Temperature),
            "weekend" => Ok(FormField::Weekend),
            "holiday" => Ok(FormField::Holiday),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Checked(bool),
    Raw(String),
}

impl FieldInput {
    fn as_flag(&self) -> bool {
        match self {
            FieldInput::Checked(b) => *b,
            FieldInput::Raw(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "on" | "yes" | "1"
            ),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FieldInput::Checked(_) => None,
            FieldInput::Raw(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub draft: RequestDraft,
    pub loading: bool,
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged { field: FormField, input: FieldInput },
    /// Validation failed before anything was sent.
    SubmitRejected(String),
    SubmitStarted,
    SubmitSucceeded { generation: u64, result: PredictionResult },
    SubmitFailed { generation: u64, message: String },
    /// The in-flight future was dropped before it resolved.
    SubmitAbandoned { generation: u64 },
}

impl FormState {
    /// Generation of the most recently started submission.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reduce(mut self, event: FormEvent) -> Self {
        match event {
            FormEvent::FieldChanged { field, input } => {
                if field.is_checkbox() {
                    let checked = input.as_flag();
                    match field {
                        FormField::Weekend => self.draft.weekend = checked,
                        _ => self.draft.holiday = checked,
                    }
                } else {
                    let value = input.as_number();
                    match field {
                        FormField::Hour => self.draft.hour = value,
                        FormField::Load => self.draft.load = value,
                        _ => self.draft.temperature = value,
                    }
                }
            }
            FormEvent::SubmitRejected(message) => {
                self.result = None;
                self.error = Some(message);
            }
            FormEvent::SubmitStarted => {
                self.generation += 1;
                self.loading = true;
                self.error = None;
            }
            FormEvent::SubmitSucceeded { generation, result } if generation == self.generation => {
                self.loading = false;
                self.error = None;
                self.result = Some(result);
            }
            FormEvent::SubmitFailed { generation, message } if generation == self.generation => {
                self.loading = false;
                self.result = None;
                self.error = Some(message);
            }
            FormEvent::SubmitAbandoned { generation } if generation == self.generation => {
                self.loading = false;
            }
            // Completion of a superseded submission.
            FormEvent::SubmitSucceeded { .. }
            | FormEvent::SubmitFailed { .. }
            | FormEvent::SubmitAbandoned { .. } => {}
        }
        self
    }
}

/// A validated request tagged with the generation that sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub generation: u64,
    pub request: PredictionRequest,
}

#[derive(Debug, Default)]
pub struct PredictionForm {
    state: FormState,
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    fn dispatch(&mut self, event: FormEvent) {
        self.state = std::mem::take(&mut self.state).reduce(event);
    }

    /// Checkbox fields read `raw` as a flag; the rest parse it as a float.
    pub fn update_field(&mut self, name: &str, raw: &str) -> Result<(), UnknownField> {
        let field = name.parse::<FormField>()?;
        self.dispatch(FormEvent::FieldChanged {
            field,
            input: FieldInput::Raw(raw.to_string()),
        });
        Ok(())
    }

    pub fn set_checked(&mut self, field: FormField, checked: bool) {
        self.dispatch(FormEvent::FieldChanged {
            field,
            input: FieldInput::Checked(checked),
        });
    }

    /// Validates the draft and marks a new submission as in flight.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        match self.state.draft.validate_and_into_request() {
            Ok(request) => {
                self.dispatch(FormEvent::SubmitStarted);
                Some(Submission {
                    generation: self.state.generation(),
                    request,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "prediction form rejected before submit");
                let message = FlowError::from(err).user_message(PREDICTION_FAILED);
                self.dispatch(FormEvent::SubmitRejected(message));
                None
            }
        }
    }

    pub fn complete(
        &mut self,
        submission: &Submission,
        outcome: Result<PredictionResult, FlowError>,
    ) {
        let generation = submission.generation;
        if generation != self.state.generation() {
            tracing::debug!(
                generation,
                current = self.state.generation(),
                "dropping stale prediction outcome"
            );
            return;
        }

        let outcome = outcome.and_then(|result| {
            if result.echoes(&submission.request) {
                Ok(result)
            } else {
                Err(FlowError::decode(
                    "prediction response does not echo the submitted inputs",
                ))
            }
        });

        let event = match outcome {
            Ok(result) => {
                tracing::info!(generation, predicted_price = result.predicted_price, "prediction received");
                FormEvent::SubmitSucceeded { generation, result }
            }
            Err(err) => {
                tracing::warn!(generation, error = %err, "prediction failed");
                FormEvent::SubmitFailed {
                    generation,
                    message: err.user_message(PREDICTION_FAILED),
                }
            }
        };
        self.dispatch(event);
    }

    pub async fn submit(&mut self, backend: &dyn PredictionBackend) {
        let Some(submission) = self.begin_submit() else {
            return;
        };

        let in_flight = InFlight {
            generation: submission.generation,
            form: self,
            settled: false,
        };
        let outcome = backend.predict(&submission.request).await;
        in_flight.settle(&submission, outcome);
    }
}

/// Clears `loading` for its generation if the submit future is dropped mid-request.
struct InFlight<'a> {
    form: &'a mut PredictionForm,
    generation: u64,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, submission: &Submission, outcome: Result<PredictionResult, FlowError>) {
        self.form.complete(submission, outcome);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!(generation = self.generation, "prediction submit abandoned");
            self.form.dispatch(FormEvent::SubmitAbandoned {
                generation: self.generation,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::PredictionRecord;
    use std::time::Duration;

    enum Reply {
        Price(f64),
        Status(u16, Option<&'static str>),
        WrongEcho,
        Hang,
    }

    struct FakeBackend(Reply);

    #[async_trait::async_trait]
    impl PredictionBackend for FakeBackend {
        async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, FlowError> {
            let echo = |price| PredictionResult {
                hour: request.hour,
                load: request.load,
                temperature: request.temperature,
                weekend: request.weekend,
                holiday: request.holiday,
                predicted_price: price,
            };
            match &self.0 {
                Reply::Price(p) => Ok(echo(*p)),
                Reply::Status(status, message) => Err(FlowError::Server {
                    status: *status,
                    message: message.map(str::to_string),
                }),
                Reply::WrongEcho => Ok(PredictionResult {
                    hour: (request.hour + 1) % 24,
                    ..echo(1.0)
                }),
                Reply::Hang => std::future::pending().await,
            }
        }

        async fn recent_predictions(&self) -> Result<Vec<PredictionRecord>, FlowError> {
            Ok(Vec::new())
        }
    }

    fn priced(price: f64) -> PredictionResult {
        PredictionResult {
            hour: 12,
            load: 15000.0,
            temperature: 25.0,
            weekend: false,
            holiday: false,
            predicted_price: price,
        }
    }

    #[test]
    fn field_changes_parse_numbers_and_flags() {
        let mut form = PredictionForm::new();
        form.update_field("hour", "7").unwrap();
        form.update_field("load", " 12500.5 ").unwrap();
        form.update_field("temperature", "-4").unwrap();
        form.update_field("weekend", "on").unwrap();
        form.set_checked(FormField::Holiday, true);

        let draft = &form.state().draft;
        assert_eq!(draft.hour, Some(7.0));
        assert_eq!(draft.load, Some(12500.5));
        assert_eq!(draft.temperature, Some(-4.0));
        assert!(draft.weekend);
        assert!(draft.holiday);

        form.update_field("load", "lots").unwrap();
        assert_eq!(form.state().draft.load, None);
        assert!(form.update_field("price", "1").is_err());
    }

    #[test]
    fn out_of_range_values_are_held_until_submit() {
        let mut form = PredictionForm::new();
        form.update_field("hour", "40").unwrap();
        assert_eq!(form.state().draft.hour, Some(40.0));

        assert!(form.begin_submit().is_none());
        assert!(!form.state().loading);
        assert_eq!(form.state().error.as_deref(), Some("Hour must be between 0 and 23"));
        assert_eq!(form.state().generation(), 0);
    }

    #[test]
    fn loading_spans_exactly_one_submission() {
        let mut form = PredictionForm::new();
        assert!(!form.state().loading);

        let submission = form.begin_submit().unwrap();
        assert!(form.state().loading);
        assert_eq!(submission.generation, 1);

        form.complete(&submission, Ok(priced(42.5)));
        assert!(!form.state().loading);
        assert_eq!(form.state().result.as_ref().unwrap().predicted_price, 42.5);
        assert!(form.state().error.is_none());
    }

    #[test]
    fn stale_outcomes_do_not_overwrite_newer_submissions() {
        let mut form = PredictionForm::new();
        let first = form.begin_submit().unwrap();
        let second = form.begin_submit().unwrap();

        form.complete(&first, Ok(priced(10.0)));
        assert!(form.state().loading);
        assert!(form.state().result.is_none());

        form.complete(
            &second,
            Err(FlowError::Server {
                status: 503,
                message: None,
            }),
        );
        assert!(!form.state().loading);
        assert_eq!(form.state().error.as_deref(), Some(PREDICTION_FAILED));

        form.complete(&first, Ok(priced(10.0)));
        assert!(form.state().result.is_none());
    }

    #[test]
    fn stale_failure_leaves_pending_submission_untouched() {
        let mut form = PredictionForm::new();
        let first = form.begin_submit().unwrap();
        let second = form.begin_submit().unwrap();

        form.complete(
            &first,
            Err(FlowError::Server {
                status: 500,
                message: Some("model unavailable".to_string()),
            }),
        );
        assert!(form.state().loading);
        assert!(form.state().error.is_none());
        assert_eq!(form.state().generation(), second.generation);

        form.complete(&second, Ok(priced(42.5)));
        assert!(!form.state().loading);
        assert_eq!(form.state().result.as_ref().map(|r| r.predicted_price), Some(42.5));
    }

    #[test]
    fn trailing_garbage_is_not_a_number() {
        let mut form = PredictionForm::new();
        form.update_field("hour", "12abc").unwrap();
        form.update_field("load", "1e3").unwrap();
        form.update_field("temperature", "20.5C").unwrap();

        let draft = &form.state().draft;
        assert_eq!(draft.hour, None);
        assert_eq!(draft.load, Some(1000.0));
        assert_eq!(draft.temperature, None);

        assert!(form.begin_submit().is_none());
        assert_eq!(form.state().error.as_deref(), Some("Hour is required"));
    }

    #[tokio::test]
    async fn each_submission_yields_result_xor_error() {
        let replies = [
            Reply::Price(42.5),
            Reply::Status(500, Some("model unavailable")),
            Reply::Status(500, None),
            Reply::WrongEcho,
            Reply::Price(17.25),
        ];

        let mut form = PredictionForm::new();
        for reply in replies {
            form.submit(&FakeBackend(reply)).await;
            let state = form.state();
            assert!(!state.loading);
            assert!(state.result.is_some() != state.error.is_some());
            if let Some(error) = &state.error {
                assert!(!error.is_empty());
            }
        }
        assert_eq!(form.state().result.as_ref().unwrap().predicted_price, 17.25);
        assert_eq!(form.state().generation(), 5);
    }

    #[tokio::test]
    async fn server_message_is_preferred_over_fallback() {
        let mut form = PredictionForm::new();
        form.submit(&FakeBackend(Reply::Status(500, Some("model unavailable"))))
            .await;
        assert_eq!(form.state().error.as_deref(), Some("model unavailable"));

        form.submit(&FakeBackend(Reply::WrongEcho)).await;
        assert_eq!(form.state().error.as_deref(), Some(PREDICTION_FAILED));
    }

    #[tokio::test]
    async fn dropping_an_in_flight_submit_clears_loading() {
        let mut form = PredictionForm::new();
        let backend = FakeBackend(Reply::Hang);
        let res = tokio::time::timeout(Duration::from_millis(20), form.submit(&backend)).await;
        assert!(res.is_err());
        assert!(!form.state().loading);
        assert!(form.state().result.is_none());
        assert!(form.state().error.is_none());
    }
}
