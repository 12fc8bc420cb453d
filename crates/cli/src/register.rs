//! Interactive terminal walk through the registration steps.
//!
//! Each field is prompted in step order. Pressing enter keeps the current value, `<` goes
//! back one step and `-` clears the value. Answers are trimmed, except for password fields
//! where only the line ending is removed. Entering a valid postal code looks up district and
//! state straight away, so their prompts come pre-filled.

use medireg_core::{
    AddressLookupService, FieldId, FieldSpec, FormController, FormError, Navigator, Notice,
    NoticeLevel, RecordGateway, Submission, WidgetKind, STEP_COUNT,
};
use std::io::{BufRead, Write};
use std::sync::{Mutex, PoisonError};

/// Input that moves back one step.
pub const BACK: &str = "<";

/// Input that empties the current field.
pub const CLEAR: &str = "-";

#[derive(Default)]
struct RouteCapture(Mutex<Option<String>>);

impl Navigator for RouteCapture {
    fn navigate(&self, route: &str) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(route.to_string());
    }
}

enum Answer {
    Value(String),
    Keep,
    Clear,
    Back,
}

/// Reads one answer. With `verbatim` set only the line ending is stripped, so a password may
/// begin or end with spaces.
fn read_answer<R: BufRead>(input: &mut R, verbatim: bool) -> anyhow::Result<Answer> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("input closed before the registration was complete");
    }
    let line = if verbatim {
        line.trim_end_matches(['\r', '\n'])
    } else {
        line.trim()
    };
    Ok(match line {
        BACK => Answer::Back,
        CLEAR => Answer::Clear,
        "" => Answer::Keep,
        value => Answer::Value(value.to_string()),
    })
}

fn write_prompt<W: Write>(
    output: &mut W,
    spec: &FieldSpec,
    controller: &FormController,
) -> std::io::Result<()> {
    let widget = spec.field.widget();
    let marker = if spec.required { "*" } else { "" };
    write!(output, "{}{}", widget.label, marker)?;

    if widget.kind == WidgetKind::Select {
        let options = widget
            .options
            .iter()
            .map(|o| o.value)
            .collect::<Vec<_>>()
            .join("/");
        write!(output, " ({options})")?;
    }
    if widget.kind == WidgetKind::Date {
        write!(output, " (YYYY-MM-DD)")?;
    }

    let current = controller.record().get(spec.field);
    if !current.is_empty() {
        if spec.field.is_secret() {
            write!(output, " [set]")?;
        } else {
            write!(output, " [{current}]")?;
        }
    }
    write!(output, ": ")?;
    output.flush()
}

fn write_notices<W: Write>(output: &mut W, notices: Vec<Notice>) -> std::io::Result<()> {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        writeln!(output, "[{tag}] {}", notice.message)?;
    }
    Ok(())
}

fn write_field_errors<W: Write>(
    output: &mut W,
    controller: &FormController,
    fields: &[FieldId],
) -> std::io::Result<()> {
    for field in fields {
        writeln!(output, "  {}: {}", field.label(), controller.errors().get(*field))?;
    }
    Ok(())
}

/// Prompts the fields of the current step. Returns `false` if the user went back.
async fn fill_current_step<R: BufRead, W: Write>(
    controller: &mut FormController,
    input: &mut R,
    output: &mut W,
    lookup: &dyn AddressLookupService,
) -> anyhow::Result<bool> {
    let step = controller.step();
    writeln!(
        output,
        "\n== Step {} of {}: {} ==",
        controller.current_step() + 1,
        STEP_COUNT,
        step.title
    )?;

    for spec in step.fields {
        write_prompt(output, spec, controller)?;
        let value = match read_answer(input, spec.field.is_secret())? {
            Answer::Back => {
                controller.retreat();
                return Ok(false);
            }
            Answer::Keep => controller.record().get(spec.field).to_string(),
            Answer::Clear => String::new(),
            Answer::Value(value) => value,
        };
        controller.change_field(spec.field, value);

        let message = controller.errors().get(spec.field);
        if !message.is_empty() {
            writeln!(output, "  ! {message}")?;
        }

        if spec.field == FieldId::PostalCode && controller.errors().is_valid(FieldId::PostalCode) {
            controller.lookup_address(lookup).await;
            write_notices(output, controller.take_notices())?;
        }
    }
    Ok(true)
}

/// Walks the user through every step and submits the registration.
///
/// Returns how the final submission ended. After a failed submission the user may retry;
/// answering anything but `y` gives up and returns [`Submission::Failed`].
///
/// # Errors
///
/// Returns an error if the input ends early or the terminal cannot be written to.
pub async fn run<R: BufRead, W: Write>(
    controller: &mut FormController,
    input: &mut R,
    output: &mut W,
    gateway: &dyn RecordGateway,
    lookup: &dyn AddressLookupService,
) -> anyhow::Result<Submission> {
    writeln!(
        output,
        "Fields marked * are required. Enter keeps a value, {CLEAR} clears it, {BACK} goes back."
    )?;

    loop {
        if !fill_current_step(controller, input, output, lookup).await? {
            continue;
        }

        if !controller.is_last_step() {
            match controller.advance() {
                Ok(_) => {}
                Err(FormError::IncompleteStep { failing, .. }) => {
                    write_notices(output, controller.take_notices())?;
                    write_field_errors(output, controller, &failing)?;
                }
                Err(e) => return Err(e.into()),
            }
            continue;
        }

        let navigator = RouteCapture::default();
        match controller.submit_final(gateway, &navigator).await {
            Ok(Submission::Accepted) => {
                write_notices(output, controller.take_notices())?;
                let route = navigator.0.lock().unwrap_or_else(PoisonError::into_inner).take();
                if let Some(route) = route {
                    writeln!(output, "Continue at {route}")?;
                }
                return Ok(Submission::Accepted);
            }
            Ok(Submission::Failed) => {
                write_notices(output, controller.take_notices())?;
                write!(output, "Retry? [y/N]: ")?;
                output.flush()?;
                match read_answer(input, false)? {
                    Answer::Value(answer) if answer.eq_ignore_ascii_case("y") => continue,
                    _ => return Ok(Submission::Failed),
                }
            }
            Ok(Submission::AlreadyInFlight) => return Ok(Submission::AlreadyInFlight),
            Err(FormError::IncompleteStep { failing, .. }) => {
                write_notices(output, controller.take_notices())?;
                write_field_errors(output, controller, &failing)?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medireg_core::{
        AddressLookup, GatewayError, GatewayResult, HealthRecordPayload, RegistrationPayload,
    };
    use std::io::Cursor;

    #[derive(Default)]
    struct FakeGateway {
        sent: Mutex<Vec<RegistrationPayload>>,
        fail: bool,
    }

    #[async_trait]
    impl RecordGateway for FakeGateway {
        async fn submit_registration(&self, payload: &RegistrationPayload) -> GatewayResult<()> {
            self.sent.lock().unwrap().push(payload.clone());
            if self.fail {
                Err(GatewayError::Transport("connection refused".into()))
            } else {
                Ok(())
            }
        }

        async fn submit_health_record(&self, _: &HealthRecordPayload) -> GatewayResult<()> {
            Ok(())
        }
    }

    struct MumbaiLookup;

    #[async_trait]
    impl AddressLookupService for MumbaiLookup {
        async fn lookup(&self, _: &str) -> GatewayResult<AddressLookup> {
            Ok(AddressLookup::Found {
                district: "Mumbai".into(),
                state: "Maharashtra".into(),
            })
        }
    }

    const STEP_1: &str = "Asha\n\nPatil\n9876543210\nasha@example.com\n123456789012\n";
    const STEP_2: &str = "1990-04-01\nfemale\n\n\nO+\n";
    // District and state are left blank: the lookup fills them.
    const STEP_3: &str = "400001\n12 Marine Drive\nMumbai\n\n\n\n";
    const STEP_4: &str = "\n\n\n";
    const STEP_5: &str = "abcdefgh\nabcdefgh\n";

    async fn run_with(script: &str, gateway: &FakeGateway) -> (anyhow::Result<Submission>, String) {
        let mut controller = FormController::new("/login");
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = run(&mut controller, &mut input, &mut output, gateway, &MumbaiLookup).await;
        (result, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn complete_walkthrough_submits_once() {
        let gateway = FakeGateway::default();
        let script = [STEP_1, STEP_2, STEP_3, STEP_4, STEP_5].concat();

        let (result, output) = run_with(&script, &gateway).await;

        assert_eq!(result.unwrap(), Submission::Accepted);
        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].address.district, "Mumbai");
        assert_eq!(sent[0].address.state, "Maharashtra");
        assert!(output.contains("[ok] Address details fetched successfully"));
        assert!(output.contains("[ok] User registration successful"));
        assert!(output.contains("Continue at /login"));
    }

    #[tokio::test]
    async fn invalid_answer_repeats_the_step() {
        let gateway = FakeGateway::default();
        let bad_step_1 = "Asha\n\nPatil\n12345\nasha@example.com\n123456789012\n";
        // Second pass keeps every value except the mobile number.
        let fix_step_1 = "\n\n\n9876543210\n\n\n";
        let script = [bad_step_1, fix_step_1, STEP_2, STEP_3, STEP_4, STEP_5].concat();

        let (result, output) = run_with(&script, &gateway).await;

        assert_eq!(result.unwrap(), Submission::Accepted);
        assert!(output.contains("! Invalid mobile number"));
        assert!(output.contains("[error] Please fill in all required fields correctly"));
        assert_eq!(output.matches("Step 1 of 5").count(), 2);
    }

    #[tokio::test]
    async fn back_returns_to_previous_step() {
        let gateway = FakeGateway::default();
        let keep_step_1 = "\n\n\n\n\n\n";
        let script = [STEP_1, "<\n", keep_step_1, STEP_2, STEP_3, STEP_4, STEP_5].concat();

        let (result, output) = run_with(&script, &gateway).await;

        assert_eq!(result.unwrap(), Submission::Accepted);
        assert_eq!(output.matches("Step 1 of 5").count(), 2);
        assert!(output.contains("First Name* [Asha]"));
    }

    #[tokio::test]
    async fn failed_submission_can_be_abandoned() {
        let gateway = FakeGateway {
            fail: true,
            ..Default::default()
        };
        let script = [STEP_1, STEP_2, STEP_3, STEP_4, STEP_5, "n\n"].concat();

        let (result, output) = run_with(&script, &gateway).await;

        assert_eq!(result.unwrap(), Submission::Failed);
        assert!(output.contains("[error] User registration failed"));
        assert!(!output.contains("Continue at"));
    }

    #[tokio::test]
    async fn passwords_are_not_echoed_in_prompts() {
        let gateway = FakeGateway {
            fail: true,
            ..Default::default()
        };
        let retry = "y\n\n\n";
        let script = [STEP_1, STEP_2, STEP_3, STEP_4, STEP_5, retry, "n\n"].concat();

        let (result, output) = run_with(&script, &gateway).await;

        assert_eq!(result.unwrap(), Submission::Failed);
        assert_eq!(gateway.sent.lock().unwrap().len(), 2);
        assert!(output.contains("Password* [set]"));
        assert!(!output.contains("abcdefgh"));
    }

    #[tokio::test]
    async fn dash_clears_an_optional_value() {
        let gateway = FakeGateway::default();
        let with_middle = "Asha\nRani\nPatil\n9876543210\nasha@example.com\n123456789012\n";
        let clear_middle = "\n-\n\n\n\n\n";
        let script = [with_middle, "<\n", clear_middle, STEP_2, STEP_3, STEP_4, STEP_5].concat();

        let (result, output) = run_with(&script, &gateway).await;

        assert_eq!(result.unwrap(), Submission::Accepted);
        assert!(output.contains("Middle Name [Rani]"));
        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent[0].fullname.first_name, "Asha");
        assert_eq!(sent[0].fullname.middle_name, "");
    }

    #[tokio::test]
    async fn password_whitespace_is_kept() {
        let gateway = FakeGateway::default();
        let spaced = "  abc def \r\n  abc def \r\n";
        let script = [STEP_1, STEP_2, STEP_3, STEP_4, spaced].concat();

        let (result, _) = run_with(&script, &gateway).await;

        assert_eq!(result.unwrap(), Submission::Accepted);
        assert_eq!(gateway.sent.lock().unwrap()[0].password, "  abc def ");
    }

    #[tokio::test]
    async fn early_end_of_input_is_an_error() {
        let gateway = FakeGateway::default();
        let (result, _) = run_with(STEP_1, &gateway).await;
        assert!(result.is_err());
        assert!(gateway.sent.lock().unwrap().is_empty());
    }
}
