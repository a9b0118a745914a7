//! Pure Yew view components for the Mapty UI.
//!
//! These render from props only; all state lives in the main component.

use crate::hooks::FormField;
use mapty::{Workout, WorkoutDetails, WorkoutId, WorkoutType};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

/// One value/unit row inside a list entry.
fn render_detail(icon: &str, value: String, unit: &str) -> Html {
    html! {
        <div class="workout__details">
            <span class="workout__icon">{ icon.to_string() }</span>
            <span class="workout__value">{ value }</span>
            <span class="workout__unit">{ unit.to_string() }</span>
        </div>
    }
}

/// Renders a workout as a list entry. Clicking it emits the workout's id.
pub fn render_workout(workout: &Workout, onclick: Callback<WorkoutId>) -> Html {
    let kind = workout.workout_type();
    let id = workout.id().clone();
    let data_id = id.to_string();

    let specific = match *workout.details() {
        WorkoutDetails::Running {
            cadence_spm,
            pace_min_per_km,
        } => html! {
            <>
                { render_detail("⚡️", format!("{:.1}", pace_min_per_km), "min/km") }
                { render_detail("🦶🏼", cadence_spm.to_string(), "spm") }
            </>
        },
        WorkoutDetails::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => html! {
            <>
                { render_detail("⚡️", format!("{:.1}", speed_km_per_h), "km/h") }
                { render_detail("⛰", elevation_gain_m.to_string(), "m") }
            </>
        },
    };

    html! {
        <li class={classes!("workout", format!("workout--{}", kind.name()))}
            data-id={data_id}
            onclick={onclick.reform(move |_| id.clone())}>
            <h2 class="workout__title">{ workout.description().to_string() }</h2>
            { render_detail(kind.icon(), workout.distance_km().to_string(), "km") }
            { render_detail("⏱", workout.duration_min().to_string(), "min") }
            { specific }
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct WorkoutFormProps {
    pub workout_type: WorkoutType,
    pub distance: FormField,
    pub duration: FormField,
    pub cadence: FormField,
    pub elevation: FormField,
    /// `hidden` class applied (slides the form out).
    pub hidden: bool,
    /// `display: none` while the hide transition would otherwise play.
    pub collapsed: bool,
    pub on_type_change: Callback<WorkoutType>,
    pub on_submit: Callback<SubmitEvent>,
    pub on_cancel: Callback<()>,
}

/// A labelled numeric input bound to a [`FormField`].
fn render_input(label: &str, placeholder: &str, field: &FormField, hidden: bool) -> Html {
    html! {
        <div class={classes!("form__row", hidden.then_some("form__row--hidden"))}>
            <label class="form__label">{ label.to_string() }</label>
            <input
                class="form__input"
                placeholder={placeholder.to_string()}
                value={field.text.clone()}
                oninput={field.on_input.clone()}
                ref={field.node.clone()}
            />
        </div>
    }
}

#[function_component(WorkoutFormView)]
pub fn workout_form(props: &WorkoutFormProps) -> Html {
    let on_type_change = {
        let cb = props.on_type_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(kind) = select.value().parse::<WorkoutType>() {
                cb.emit(kind);
            }
        })
    };
    let on_keydown = {
        let cb = props.on_cancel.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                cb.emit(());
            }
        })
    };
    let is_running = props.workout_type == WorkoutType::Running;
    let style = if props.collapsed { "display: none" } else { "display: grid" };

    html! {
        <form class={classes!("form", props.hidden.then_some("hidden"))}
              style={style}
              onsubmit={props.on_submit.clone()}
              onkeydown={on_keydown}>
            <div class="form__row">
                <label class="form__label">{ "Type" }</label>
                <select class="form__input form__input--type" onchange={on_type_change}>
                    <option value="running" selected={is_running}>{ "Running" }</option>
                    <option value="cycling" selected={!is_running}>{ "Cycling" }</option>
                </select>
            </div>
            { render_input("Distance", "km", &props.distance, false) }
            { render_input("Duration", "min", &props.duration, false) }
            { render_input("Cadence", "step/min", &props.cadence, !is_running) }
            { render_input("Elev Gain", "meters", &props.elevation, is_running) }
            <button class="form__btn">{ "OK" }</button>
        </form>
    }
}
