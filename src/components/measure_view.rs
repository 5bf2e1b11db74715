use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlCanvasElement, HtmlImageElement, MouseEvent, WheelEvent};
use yew::prelude::*;

use super::{controls_panel::ControlsPanel, distance_panel::DistancePanel};
use crate::canvas::{CanvasSurface, LoadedRaster, export_png};
use crate::config::MeasureConfig;
use crate::error::MeasureError;
use crate::model::{Interaction, MeasureAction, MeasureState, PointerButton};
use crate::render;
use crate::state::{Point, display_to_buffer};

#[derive(Properties, PartialEq, Clone)]
pub struct MeasureViewProps {
    pub config: Rc<MeasureConfig>,
}

/// Pointer position in canvas buffer pixels (the canvas may be CSS-scaled).
fn buffer_position(canvas: &HtmlCanvasElement, e: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    display_to_buffer(
        e.client_x() as f64 - rect.left(),
        e.client_y() as f64 - rect.top(),
        rect.width(),
        rect.height(),
        canvas.width() as f64,
        canvas.height() as f64,
    )
}

#[function_component(MeasureView)]
pub fn measure_view(props: &MeasureViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let state = {
        let config = props.config.clone();
        use_reducer(move || MeasureState::new(Interaction::from(&*config)))
    };
    let state_ref = use_mut_ref(|| state.clone());
    let raster = use_mut_ref(|| None::<LoadedRaster>);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);

    // Effect: refresh handle, cursor and canvas on every state change
    {
        let state_ref = state_ref.clone();
        let current = state.clone();
        let draw_ref = draw_ref.clone();
        let canvas_ref = canvas_ref.clone();
        use_effect_with(state.version, move |_| {
            *state_ref.borrow_mut() = current.clone();
            if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                let _ = canvas.style().set_property("cursor", current.cursor().css());
            }
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }
    // Main mount effect (image load, events, settle timer)
    {
        let canvas_ref = canvas_ref.clone();
        let dispatcher = state.dispatcher();
        let state_ref = state_ref.clone();
        let raster = raster.clone();
        let draw_ref_setup = draw_ref.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let document = window.as_ref().and_then(|w| w.document());
            let canvas = canvas_ref.cast::<HtmlCanvasElement>();
            let image = HtmlImageElement::new().ok();
            let (Some(window), Some(document), Some(canvas), Some(image)) =
                (window, document, canvas, image)
            else {
                log::error!("measuring view disabled: {}", MeasureError::CanvasMissing);
                dispatcher.dispatch(MeasureAction::ImageFailed);
                return Box::new(|| ()) as Box<dyn FnOnce()>;
            };

            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let state_ref = state_ref.clone();
                let raster = raster.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let current = state_ref.borrow().clone();
                    let raster = raster.borrow();
                    let loaded = raster.as_ref();
                    match CanvasSurface::new(&canvas, loaded) {
                        Ok(mut surface) => {
                            render::render(
                                &mut surface,
                                &current,
                                loaded.and_then(LoadedRaster::pixel_source),
                                loaded.is_some_and(|r| r.preview.is_some()),
                            );
                        }
                        Err(e) => log::error!("redraw skipped: {}", e),
                    }
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());
            draw_closure();

            // Image load
            let onload = {
                let image = image.clone();
                let document = document.clone();
                let canvas = canvas.clone();
                let raster = raster.clone();
                let dispatcher = dispatcher.clone();
                Closure::wrap(Box::new(move || {
                    let loaded = LoadedRaster::prepare(&document, image.clone());
                    let size = loaded.size;
                    canvas.set_width(size.width.max(1));
                    canvas.set_height(size.height.max(1));
                    *raster.borrow_mut() = Some(loaded);
                    dispatcher.dispatch(MeasureAction::ImageLoaded { size });
                }) as Box<dyn FnMut()>)
            };
            let onerror = {
                let raster = raster.clone();
                let dispatcher = dispatcher.clone();
                let path = config.map_path.clone();
                Closure::wrap(Box::new(move || {
                    log::error!("failed to load map image '{}', check the path", path);
                    *raster.borrow_mut() = None;
                    dispatcher.dispatch(MeasureAction::ImageFailed);
                }) as Box<dyn FnMut()>)
            };
            image.set_cross_origin(Some("anonymous"));
            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            image.set_src(&config.map_path);

            // Settle timer: back to full resolution after the last wheel tick
            let settle_timer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
            let settle_cb = {
                let dispatcher = dispatcher.clone();
                let settle_timer = settle_timer.clone();
                Closure::wrap(Box::new(move || {
                    settle_timer.set(None);
                    dispatcher.dispatch(MeasureAction::SettleZoom);
                }) as Box<dyn FnMut()>)
            };
            let settle_fn: js_sys::Function = settle_cb.as_ref().unchecked_ref::<js_sys::Function>().clone();

            // Wheel zoom
            let wheel_cb = {
                let canvas_w = canvas.clone();
                let window_w = window.clone();
                let dispatcher = dispatcher.clone();
                let settle_timer = settle_timer.clone();
                let delay = config.settle_delay_ms;
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    e.prevent_default();
                    let anchor = buffer_position(&canvas_w, &e);
                    dispatcher.dispatch(MeasureAction::Wheel {
                        anchor,
                        delta_y: e.delta_y(),
                    });
                    if let Some(id) = settle_timer.take() {
                        window_w.clear_timeout_with_handle(id);
                    }
                    match window_w.set_timeout_with_callback_and_timeout_and_arguments_0(&settle_fn, delay) {
                        Ok(id) => settle_timer.set(Some(id)),
                        Err(_) => log::warn!("settle timer unavailable, staying in preview until next pan"),
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .ok();
            // Mouse events
            let mousedown_cb = {
                let canvas_m = canvas.clone();
                let dispatcher = dispatcher.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    e.prevent_default();
                    let Some(button) = PointerButton::from_dom(e.button()) else {
                        return;
                    };
                    dispatcher.dispatch(MeasureAction::PointerDown {
                        button,
                        screen: buffer_position(&canvas_m, &e),
                        client_x: e.client_x() as f64,
                        client_y: e.client_y() as f64,
                    });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref())
                .ok();
            let mousemove_cb = {
                let canvas_m = canvas.clone();
                let dispatcher = dispatcher.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    dispatcher.dispatch(MeasureAction::PointerMove {
                        screen: buffer_position(&canvas_m, &e),
                        client_x: e.client_x() as f64,
                        client_y: e.client_y() as f64,
                    });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref())
                .ok();
            let mouseup_cb = {
                let dispatcher = dispatcher.clone();
                Closure::wrap(Box::new(move |_e: MouseEvent| {
                    dispatcher.dispatch(MeasureAction::PointerUp);
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .ok();
            let contextmenu_cb = {
                Closure::wrap(Box::new(move |e: web_sys::Event| {
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("contextmenu", contextmenu_cb.as_ref().unchecked_ref())
                .ok();

            // Cleanup
            Box::new(move || {
                let _ = canvas.remove_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());
                let _ = canvas
                    .remove_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref());
                let _ = canvas
                    .remove_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref());
                let _ = canvas
                    .remove_event_listener_with_callback("contextmenu", contextmenu_cb.as_ref().unchecked_ref());
                let _ = window.remove_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref());
                if let Some(id) = settle_timer.take() {
                    window.clear_timeout_with_handle(id);
                }
                image.set_onload(None);
                image.set_onerror(None);
                let _keep_alive = (
                    &onload,
                    &onerror,
                    &settle_cb,
                    &wheel_cb,
                    &mousedown_cb,
                    &mousemove_cb,
                    &mouseup_cb,
                    &contextmenu_cb,
                );
            }) as Box<dyn FnOnce()>
        });
    }

    let on_undo = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_| dispatcher.dispatch(MeasureAction::Undo))
    };
    let on_clear = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_| dispatcher.dispatch(MeasureAction::Clear))
    };
    let on_export = {
        let canvas_ref = canvas_ref.clone();
        let state_ref = state_ref.clone();
        let raster = raster.clone();
        let config = props.config.clone();
        Callback::from(move |_| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                log::error!("export aborted: {}", MeasureError::NoWindow);
                return;
            };
            let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                log::error!("export aborted: {}", MeasureError::CanvasMissing);
                return;
            };
            let current = state_ref.borrow().clone();
            let raster = raster.borrow();
            match export_png(&document, &canvas, &current, raster.as_ref(), &config.export_file_name) {
                Ok(total) => log::info!("exported '{}' (total {:.2} px)", config.export_file_name, total),
                Err(e) => log::error!("{}", e),
            }
        })
    };

    let total = {
        let raster = raster.borrow();
        state.total_distance(raster.as_ref().and_then(LoadedRaster::pixel_source))
    };

    html! {
        <div style="position:relative; width:100vw; height:100vh; overflow:auto; background:#0e1116;">
            <canvas id="cv" ref={canvas_ref} width="800" height="600" style="display:block; max-width:100%;"></canvas>
            <DistancePanel
                total={total}
                points={state.points.len()}
                zoom={state.view.zoom}
                status={state.status().map(AttrValue::from)}
            />
            <ControlsPanel
                mode_label={state.mode_label()}
                can_undo={state.can_undo()}
                on_undo={on_undo}
                on_clear={on_clear}
                on_export={on_export}
            />
        </div>
    }
}
