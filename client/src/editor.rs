use leptos::prelude::*;

use wayfarer_shared::VisitError;
use wayfarer_shared::visit::parse_year_input;

use crate::app::{FormPlace, FormYear, PlaceOptions, ViewState};

const EDIT_KEY_PROMPT: &str = "Enter edit key:";
const WRONG_KEY: &str = "Incorrect key. You cannot enter edit mode.";
const INCOMPLETE_FORM: &str = "Please select a year and a country before saving the visit.";
const CONFIRM_DELETE: &str = "Are you sure you want to delete this visit?";

fn prompt(message: &str) -> Option<String> {
    web_sys::window()?.prompt_with_message(message).ok().flatten()
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        window.alert_with_message(message).ok();
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Edit-mode toggle, the add/update form and the table of recorded visits.
#[component]
pub fn VisitEditor() -> impl IntoView {
    let view_state: ViewState = expect_context();
    let FormYear(form_year) = expect_context();
    let FormPlace(form_place) = expect_context();
    let editing = view_state.editing;

    let clear_form = move || {
        form_year.set(String::new());
        form_place.set(String::new());
    };

    let on_toggle = move |_: web_sys::MouseEvent| {
        if editing.get_untracked() {
            view_state.dispatch(|viewer| viewer.disable_editing());
            clear_form();
            return;
        }
        // Cancelled prompt: nothing to check.
        let Some(entered) = prompt(EDIT_KEY_PROMPT) else {
            return;
        };
        if view_state.dispatch(|viewer| viewer.enable_editing(&entered)) == Some(false) {
            alert(WRONG_KEY);
        }
    };

    view! {
        <div class="editor">
            <button class="toggle-edit" on:click=on_toggle>
                {move || if editing.get() { "Exit Edit Mode" } else { "Edit" }}
            </button>
            <Show when=move || editing.get()>
                <VisitForm />
                <VisitTable />
            </Show>
        </div>
    }
}

#[component]
fn VisitForm() -> impl IntoView {
    let view_state: ViewState = expect_context();
    let PlaceOptions(places) = expect_context();
    let FormYear(form_year) = expect_context();
    let FormPlace(form_place) = expect_context();
    let year_options = view_state.year_options;
    let edit_target = view_state.edit_target;

    let on_submit = move |_: web_sys::MouseEvent| {
        let year = parse_year_input(&form_year.get_untracked()).ok();
        let place = form_place.get_untracked();
        match view_state.dispatch(|viewer| viewer.submit(year, &place)) {
            Some(Ok(_)) => {
                form_year.set(String::new());
                form_place.set(String::new());
            }
            Some(Err(VisitError::Validation(_))) => alert(INCOMPLETE_FORM),
            Some(Err(e)) => tracing::warn!(error = %e, "visit not saved"),
            None => {}
        }
    };

    let on_cancel = move |_: web_sys::MouseEvent| {
        view_state.dispatch(|viewer| viewer.cancel_edit());
        form_year.set(String::new());
        form_place.set(String::new());
    };

    view! {
        <div class="visit-controls">
            <select
                class="year-select"
                prop:value=move || form_year.get()
                on:change=move |ev| form_year.set(event_target_value(&ev))
            >
                <option value="">"Select year"</option>
                {move || {
                    year_options
                        .get()
                        .into_iter()
                        .map(|year| {
                            let value = year.to_string();
                            view! { <option value=value.clone()>{value.clone()}</option> }
                        })
                        .collect::<Vec<_>>()
                }}
            </select>
            <select
                class="place-select"
                prop:value=move || form_place.get()
                on:change=move |ev| form_place.set(event_target_value(&ev))
            >
                <option value="">"Select country"</option>
                {move || {
                    places
                        .get()
                        .into_iter()
                        .map(|place| {
                            let label = place.label();
                            view! { <option value=place.id>{label}</option> }
                        })
                        .collect::<Vec<_>>()
                }}
            </select>
            <button class="add-visit" on:click=on_submit>
                {move || if edit_target.get().is_some() { "Update Visit" } else { "Add Visit" }}
            </button>
            <Show when=move || edit_target.get().is_some()>
                <button class="cancel-edit" on:click=on_cancel>"Cancel"</button>
            </Show>
        </div>
    }
}

#[component]
fn VisitTable() -> impl IntoView {
    let view_state: ViewState = expect_context();
    let FormYear(form_year) = expect_context();
    let FormPlace(form_place) = expect_context();
    let rows = view_state.rows;

    let on_edit = move |index: usize| {
        match view_state.dispatch(|viewer| viewer.begin_edit(index)) {
            Some(Ok(record)) => {
                form_year.set(record.year.to_string());
                form_place.set(record.place);
            }
            Some(Err(e)) => tracing::warn!(error = %e, index, "cannot edit visit"),
            None => {}
        }
    };
    let on_delete = move |index: usize| {
        if !confirm(CONFIRM_DELETE) {
            return;
        }
        if let Some(Err(e)) = view_state.dispatch(|viewer| viewer.delete(index)) {
            tracing::warn!(error = %e, index, "cannot delete visit");
        }
    };

    view! {
        <table class="visit-list">
            <thead>
                <tr>
                    <th>"Year"</th>
                    <th>"Country"</th>
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                {move || {
                    let rows = rows.get();
                    if rows.is_empty() {
                        return view! {
                            <tr>
                                <td colspan="3">"No visits added yet."</td>
                            </tr>
                        }
                        .into_any();
                    }
                    rows.into_iter()
                        .map(|row| {
                            let index = row.index;
                            view! {
                                <tr>
                                    <td>{row.year}</td>
                                    <td title=row.place>{row.name}</td>
                                    <td>
                                        <button class="edit-btn" on:click=move |_| on_edit(index)>
                                            "Edit"
                                        </button>
                                        <button class="delete-btn" on:click=move |_| on_delete(index)>
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        })
                        .collect::<Vec<_>>()
                        .into_any()
                }}
            </tbody>
        </table>
    }
}
