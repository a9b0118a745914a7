//! Main module for the Mapty application using Yew.
//! Wires the controller to the map, the workout form and the workout list.

use gloo_timers::callback::Timeout;
use gloo_utils::window;
use log::{info, warn};
use mapty::config::{FORM_REDISPLAY_DELAY_MS, MAP_ELEMENT_ID, MAP_ZOOM_LEVEL};
use mapty::geolocation::current_position;
use mapty::map::LeafletMap;
use mapty::storage::BrowserStore;
use mapty::{Controller, Coords, MapStatus, Phase, WorkoutForm, WorkoutId, WorkoutType};
use yew::prelude::*;

mod components;
mod hooks;

use components::{render_workout, WorkoutFormView};
use hooks::{use_form_field, FormField};

type AppController = Controller<BrowserStore, LeafletMap>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Blocking browser alert.
fn alert(message: &str) {
    if let Err(e) = window().alert_with_message(message) {
        warn!("alert failed: {:?}", e);
    }
}

/// Slide the form out, then restore its layout once the transition is skipped.
fn hide_form(hidden: &UseStateHandle<bool>, collapsed: &UseStateHandle<bool>) {
    collapsed.set(true);
    hidden.set(true);
    let collapsed = collapsed.clone();
    Timeout::new(FORM_REDISPLAY_DELAY_MS, move || collapsed.set(false)).forget();
}

fn clear_fields(fields: &[&FormField]) {
    for field in fields {
        field.clear.emit(());
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component owning the controller.
#[function_component(App)]
fn app() -> Html {
    let controller = use_mut_ref(|| AppController::new(BrowserStore::open()));
    let refresh = use_force_update();

    let workout_type = use_state(|| WorkoutType::Running);
    let form_hidden = use_state(|| true);
    let form_collapsed = use_state(|| false);

    let distance = use_form_field();
    let duration = use_form_field();
    let cadence = use_form_field();
    let elevation = use_form_field();

    // Locate the user once, then mount the map and draw restored markers.
    {
        let controller = controller.clone();
        let refresh = refresh.clone();
        let form_hidden = form_hidden.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match current_position().await {
                    Ok(center) => {
                        let on_click = {
                            let controller = controller.clone();
                            move |coords: Coords| {
                                controller.borrow_mut().select_location(coords);
                                form_hidden.set(false);
                            }
                        };
                        let map =
                            LeafletMap::mount(MAP_ELEMENT_ID, center, MAP_ZOOM_LEVEL, on_click);
                        controller.borrow_mut().on_map_ready(map);
                        info!("Map ready");
                    }
                    Err(e) => {
                        alert("Could not get your position");
                        controller.borrow_mut().on_position_unavailable(e);
                    }
                }
                refresh.force_update();
            });
            || ()
        });
    }

    // Focus distance after the render that shows the form for a new location.
    {
        let distance = distance.clone();
        let pending = match controller.borrow().phase() {
            Phase::AwaitingFormInput { coords } => Some(coords),
            Phase::Idle => None,
        };
        use_effect_with((*form_hidden, pending), move |&(hidden, _)| {
            if !hidden {
                distance.focus();
            }
            || ()
        });
    }

    let on_type_change = {
        let workout_type = workout_type.clone();
        Callback::from(move |kind: WorkoutType| workout_type.set(kind))
    };

    let on_submit = {
        let controller = controller.clone();
        let workout_type = *workout_type;
        let form_hidden = form_hidden.clone();
        let form_collapsed = form_collapsed.clone();
        let (distance, duration, cadence, elevation) = (
            distance.clone(),
            duration.clone(),
            cadence.clone(),
            elevation.clone(),
        );
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let form = WorkoutForm {
                workout_type,
                distance: distance.text.clone(),
                duration: duration.text.clone(),
                cadence: cadence.text.clone(),
                elevation: elevation.text.clone(),
            };

            // Release the controller before any state setter re-renders.
            let outcome = controller.borrow_mut().submit(&form).map(|_| ());
            match outcome {
                Ok(()) => {
                    clear_fields(&[&distance, &duration, &cadence, &elevation]);
                    hide_form(&form_hidden, &form_collapsed);
                }
                Err(err) => alert(&err.to_string()),
            }
        })
    };

    let on_cancel = {
        let controller = controller.clone();
        let form_hidden = form_hidden.clone();
        let form_collapsed = form_collapsed.clone();
        Callback::from(move |_: ()| {
            controller.borrow_mut().cancel();
            hide_form(&form_hidden, &form_collapsed);
        })
    };

    let on_reset = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| {
            controller.borrow_mut().reset();
            mapty::reload_page();
        })
    };

    let on_workout_click = {
        let controller = controller.clone();
        Callback::from(move |id: WorkoutId| {
            if controller.borrow_mut().focus_workout(&id).is_none() {
                warn!("No workout with id {}", id);
            }
        })
    };

    let ctrl = controller.borrow();
    let status_note = match ctrl.map_status() {
        MapStatus::Loading => Some("Locating you…".to_string()),
        MapStatus::Ready => None,
        MapStatus::Unavailable(e) => Some(format!(
            "{}. Allow location access and reload to log workouts.",
            e
        )),
    };

    let view = html! {
        <>
            <div class="sidebar">
                <h1 class="logo">{ "mapty" }</h1>
                <ul class="workouts">
                    <WorkoutFormView
                        workout_type={*workout_type}
                        distance={distance.clone()}
                        duration={duration.clone()}
                        cadence={cadence.clone()}
                        elevation={elevation.clone()}
                        hidden={*form_hidden}
                        collapsed={*form_collapsed}
                        on_type_change={on_type_change}
                        on_submit={on_submit}
                        on_cancel={on_cancel}
                    />
                    // Newest first, directly under the form.
                    { for ctrl.workouts().iter().rev().map(|w| render_workout(w, on_workout_click.clone())) }
                </ul>
                if let Some(note) = status_note {
                    <p class="map-status">{ note }</p>
                }
                <p class="copyright">
                    { "Your workouts are stored in this browser. " }
                    <button class="btn-reset" onclick={on_reset}>
                        { "Reset" }
                    </button>
                </p>
            </div>
            <div id={MAP_ELEMENT_ID}></div>
        </>
    };
    view
}

/// Entry point: installs logging and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    mapty::logger::init(log::Level::Debug);
    yew::Renderer::<App>::new().render();
}
