use super::*;
use shared::domain::VisitStatus;

fn draft(name: &str) -> AppointmentDraft {
    AppointmentDraft {
        name: name.into(),
        phone_number: "1234567890".into(),
        doctor_name: "Dr. Jane Smith".into(),
        gender: "Female".into(),
        age: "30".into(),
        date: "2024-05-01".into(),
        time: "09:15".into(),
        status: VisitStatus::Consult,
    }
}

fn stored(id: &str, name: &str) -> Appointment {
    Appointment::new(AppointmentId::new(id), draft(name))
}

fn fill_form(state: &mut BookingState, source: &AppointmentDraft) {
    for field in FormField::ALL {
        let effects = reduce(
            state,
            BookingEvent::FieldChanged {
                field,
                value: source.field(field).to_string(),
            },
        );
        assert!(effects.is_empty());
    }
}

fn loaded_state(items: Vec<Appointment>) -> BookingState {
    let mut state = BookingState::default();
    reduce(&mut state, BookingEvent::ListLoaded(items));
    state
}

#[test]
fn load_requests_a_fetch_and_list_replaces_the_mirror() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    assert_eq!(
        reduce(&mut state, BookingEvent::Load),
        vec![Effect::Remote(RemoteCall::FetchAppointments)]
    );

    reduce(
        &mut state,
        BookingEvent::ListLoaded(vec![stored("b", "Bob"), stored("c", "Cid")]),
    );
    let ids: Vec<&str> = state.mirror.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);
}

#[test]
fn failed_list_keeps_the_mirror() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    assert!(reduce(&mut state, BookingEvent::ListFailed).is_empty());
    assert_eq!(state.mirror.len(), 1);
}

#[test]
fn invalid_submit_exposes_errors_and_issues_no_effect() {
    let mut state = BookingState::default();
    reduce(
        &mut state,
        BookingEvent::FieldChanged {
            field: FormField::Name,
            value: "R2D2".into(),
        },
    );

    assert!(reduce(&mut state, BookingEvent::Submit).is_empty());
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.errors.contains(FormField::Name));
    assert!(state.errors.contains(FormField::PhoneNumber));
    assert_eq!(state.form.name, "R2D2");
}

#[test]
fn create_success_appends_server_copy_and_resets_form() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    fill_form(&mut state, &draft("Bea"));

    let effects = reduce(&mut state, BookingEvent::Submit);
    assert_eq!(
        effects,
        vec![Effect::Remote(RemoteCall::CreateAppointment(draft("Bea")))]
    );
    assert_eq!(state.phase, Phase::Submitting(Submission::Create));

    let effects = reduce(
        &mut state,
        BookingEvent::CreateSucceeded(Some(stored("b", "Bea"))),
    );
    assert!(effects.is_empty());
    assert_eq!(state.mirror.len(), 2);
    assert_eq!(state.mirror[1].id, AppointmentId::new("b"));
    assert_eq!(state.form, AppointmentDraft::default());
    assert_eq!(state.form.status, VisitStatus::Consult);
    assert_eq!(state.phase, Phase::Idle);
}

#[test]
fn create_success_without_server_copy_refetches_instead_of_echoing() {
    let mut state = BookingState::default();
    fill_form(&mut state, &draft("Bea"));
    reduce(&mut state, BookingEvent::Submit);

    let effects = reduce(&mut state, BookingEvent::CreateSucceeded(None));
    assert_eq!(effects, vec![Effect::Remote(RemoteCall::FetchAppointments)]);
    assert!(state.mirror.is_empty());
    assert_eq!(state.form, AppointmentDraft::default());
}

#[test]
fn create_failure_keeps_form_for_correction() {
    let mut state = BookingState::default();
    fill_form(&mut state, &draft("Bea"));
    reduce(&mut state, BookingEvent::Submit);

    assert!(reduce(&mut state, BookingEvent::CreateFailed).is_empty());
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.form, draft("Bea"));
    assert!(state.mirror.is_empty());
}

#[test]
fn submit_while_submitting_is_ignored() {
    let mut state = BookingState::default();
    fill_form(&mut state, &draft("Bea"));
    reduce(&mut state, BookingEvent::Submit);
    assert!(reduce(&mut state, BookingEvent::Submit).is_empty());
    assert!(state.is_busy());
}

#[test]
fn begin_edit_loads_copy_and_switching_discards_edits() {
    let mut state = loaded_state(vec![stored("a", "Ann"), stored("b", "Bob")]);

    reduce(&mut state, BookingEvent::BeginEdit(AppointmentId::new("a")));
    assert_eq!(state.phase, Phase::Editing(AppointmentId::new("a")));
    assert_eq!(state.form.name, "Ann");

    reduce(
        &mut state,
        BookingEvent::FieldChanged {
            field: FormField::Name,
            value: "Annabel".into(),
        },
    );
    reduce(&mut state, BookingEvent::BeginEdit(AppointmentId::new("b")));
    assert_eq!(state.editing_id(), Some(&AppointmentId::new("b")));
    assert_eq!(state.form.name, "Bob");
    assert_eq!(state.mirror[0].details.name, "Ann");
}

#[test]
fn begin_edit_for_unknown_id_is_ignored() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    reduce(&mut state, BookingEvent::BeginEdit(AppointmentId::new("zz")));
    assert_eq!(state.phase, Phase::Idle);
}

#[test]
fn close_edit_resets_the_form() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    reduce(&mut state, BookingEvent::BeginEdit(AppointmentId::new("a")));
    reduce(&mut state, BookingEvent::CloseEdit);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.form, AppointmentDraft::default());
}

#[test]
fn update_sends_only_changed_fields_and_refetches_on_success() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    reduce(&mut state, BookingEvent::BeginEdit(AppointmentId::new("a")));
    reduce(
        &mut state,
        BookingEvent::FieldChanged {
            field: FormField::Status,
            value: "Revisit".into(),
        },
    );

    let effects = reduce(&mut state, BookingEvent::Submit);
    assert_eq!(
        effects,
        vec![Effect::Remote(RemoteCall::UpdateAppointment {
            id: AppointmentId::new("a"),
            patch: AppointmentPatch {
                status: Some(VisitStatus::Revisit),
                ..AppointmentPatch::default()
            },
        })]
    );

    let effects = reduce(&mut state, BookingEvent::UpdateSucceeded);
    assert_eq!(effects, vec![Effect::Remote(RemoteCall::FetchAppointments)]);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.form, AppointmentDraft::default());
}

#[test]
fn failed_update_keeps_session_open_and_mirror_unchanged() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    let before = state.mirror.clone();
    reduce(&mut state, BookingEvent::BeginEdit(AppointmentId::new("a")));
    reduce(
        &mut state,
        BookingEvent::FieldChanged {
            field: FormField::Name,
            value: "Annie".into(),
        },
    );
    reduce(&mut state, BookingEvent::Submit);

    assert!(reduce(&mut state, BookingEvent::UpdateFailed).is_empty());
    assert_eq!(state.phase, Phase::Editing(AppointmentId::new("a")));
    assert_eq!(state.form.name, "Annie");
    assert_eq!(state.mirror, before);
}

#[test]
fn invalid_update_keeps_session_and_reports_errors() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    reduce(&mut state, BookingEvent::BeginEdit(AppointmentId::new("a")));
    reduce(
        &mut state,
        BookingEvent::FieldChanged {
            field: FormField::Age,
            value: "101".into(),
        },
    );
    assert!(reduce(&mut state, BookingEvent::Submit).is_empty());
    assert_eq!(state.phase, Phase::Editing(AppointmentId::new("a")));
    assert!(state.errors.contains(FormField::Age));
}

#[test]
fn delete_requires_confirmation_and_can_be_cancelled() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    assert!(reduce(&mut state, BookingEvent::RequestDelete(AppointmentId::new("a"))).is_empty());
    assert_eq!(state.pending_delete(), Some(&AppointmentId::new("a")));

    assert!(reduce(&mut state, BookingEvent::CancelDelete).is_empty());
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.mirror.len(), 1);
}

#[test]
fn confirmed_delete_removes_entry_and_schedules_notice_clear() {
    let mut state = loaded_state(vec![stored("a", "Ann"), stored("b", "Bob")]);
    reduce(&mut state, BookingEvent::RequestDelete(AppointmentId::new("a")));
    let effects = reduce(&mut state, BookingEvent::ConfirmDelete);
    assert_eq!(
        effects,
        vec![Effect::Remote(RemoteCall::DeleteAppointment(
            AppointmentId::new("a")
        ))]
    );

    let effects = reduce(
        &mut state,
        BookingEvent::DeleteSucceeded(AppointmentId::new("a")),
    );
    let notice = state.notice.expect("notice shown");
    assert_eq!(notice.kind, NoticeKind::Deleted);
    assert_eq!(
        effects,
        vec![Effect::ScheduleNoticeClear {
            token: notice.token,
            after: DEFAULT_NOTICE_TTL,
        }]
    );
    assert_eq!(state.mirror.len(), 1);
    assert_eq!(state.mirror[0].id, AppointmentId::new("b"));

    reduce(&mut state, BookingEvent::NoticeExpired(notice.token));
    assert!(state.notice.is_none());
}

#[test]
fn failed_delete_leaves_entry_in_place() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    reduce(&mut state, BookingEvent::RequestDelete(AppointmentId::new("a")));
    reduce(&mut state, BookingEvent::ConfirmDelete);
    reduce(&mut state, BookingEvent::DeleteFailed(AppointmentId::new("a")));

    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.mirror.len(), 1);
    assert!(state.notice.is_none());
}

#[test]
fn stale_notice_expiry_does_not_clear_newer_notice() {
    let mut state = loaded_state(vec![stored("a", "Ann"), stored("b", "Bob")]);
    for id in ["a", "b"] {
        reduce(&mut state, BookingEvent::RequestDelete(AppointmentId::new(id)));
        reduce(&mut state, BookingEvent::ConfirmDelete);
        reduce(&mut state, BookingEvent::DeleteSucceeded(AppointmentId::new(id)));
    }
    let latest = state.notice.expect("latest notice");

    reduce(&mut state, BookingEvent::NoticeExpired(latest.token - 1));
    assert_eq!(state.notice, Some(latest));
}

#[test]
fn new_delete_request_hides_visible_notice() {
    let mut state = loaded_state(vec![stored("a", "Ann"), stored("b", "Bob")]);
    reduce(&mut state, BookingEvent::RequestDelete(AppointmentId::new("a")));
    reduce(&mut state, BookingEvent::ConfirmDelete);
    reduce(&mut state, BookingEvent::DeleteSucceeded(AppointmentId::new("a")));

    let effects = reduce(&mut state, BookingEvent::RequestDelete(AppointmentId::new("b")));
    assert_eq!(effects, vec![Effect::CancelNoticeClear]);
    assert!(state.notice.is_none());
}

#[test]
fn teardown_cancels_pending_notice() {
    let mut state = BookingState::default();
    assert_eq!(
        reduce(&mut state, BookingEvent::Teardown),
        vec![Effect::CancelNoticeClear]
    );
}

#[test]
fn list_response_overwrites_mirror_even_mid_delete() {
    let mut state = loaded_state(vec![stored("a", "Ann")]);
    reduce(&mut state, BookingEvent::RequestDelete(AppointmentId::new("a")));
    reduce(&mut state, BookingEvent::ConfirmDelete);
    reduce(
        &mut state,
        BookingEvent::ListLoaded(vec![stored("a", "Ann"), stored("c", "Cy")]),
    );
    assert_eq!(state.mirror.len(), 2);
    assert_eq!(state.phase, Phase::Deleting(AppointmentId::new("a")));
}
