//! Mapping from `medireg-core` state to wire DTOs.

use api_shared::{FieldDto, NoticeDto, SelectOptionDto, SessionRes, StepDto, StepsRes};
use medireg_core::{FieldId, FormController, Notice, NoticeLevel, WidgetKind, STEPS, STEP_COUNT};
use std::collections::BTreeMap;
use uuid::Uuid;

fn kind_name(kind: WidgetKind) -> &'static str {
    match kind {
        WidgetKind::Text => "text",
        WidgetKind::Date => "date",
        WidgetKind::Password => "password",
        WidgetKind::Select => "select",
    }
}

pub fn notice_dto(notice: Notice) -> NoticeDto {
    let level = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Error => "error",
    };
    NoticeDto {
        level: level.into(),
        message: notice.message,
    }
}

pub fn notices(notices: Vec<Notice>) -> Vec<NoticeDto> {
    notices.into_iter().map(notice_dto).collect()
}

/// The step table with each field's rendering hints.
pub fn steps() -> StepsRes {
    let steps = STEPS
        .iter()
        .enumerate()
        .map(|(index, step)| StepDto {
            index,
            title: step.title.into(),
            fields: step
                .fields
                .iter()
                .map(|spec| {
                    let widget = spec.field.widget();
                    FieldDto {
                        field: spec.field.as_str().into(),
                        label: widget.label.into(),
                        kind: kind_name(widget.kind).into(),
                        required: spec.required,
                        options: widget
                            .options
                            .iter()
                            .map(|o| SelectOptionDto {
                                value: o.value.into(),
                                label: o.label.into(),
                            })
                            .collect(),
                    }
                })
                .collect(),
        })
        .collect();
    StepsRes { steps }
}

/// Builds a session snapshot, draining the controller's queued notices.
///
/// Secret fields are left out of `values`.
pub fn snapshot(id: &Uuid, controller: &mut FormController, redirect: Option<String>) -> SessionRes {
    let values = FieldId::ALL
        .into_iter()
        .filter(|field| !field.is_secret())
        .map(|field| (field.as_str().to_string(), controller.record().get(field).to_string()))
        .collect::<BTreeMap<_, _>>();
    let errors = controller
        .errors()
        .iter()
        .filter(|(_, message)| !message.is_empty())
        .map(|(field, message)| (field.as_str().to_string(), message.to_string()))
        .collect::<BTreeMap<_, _>>();

    SessionRes {
        id: id.to_string(),
        current_step: controller.current_step(),
        step_title: controller.step().title.into(),
        step_count: STEP_COUNT,
        values,
        errors,
        is_submitting: controller.is_submitting(),
        notices: notices(controller.take_notices()),
        redirect,
    }
}
