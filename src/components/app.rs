use super::measure_view::MeasureView;
use crate::config::MeasureConfig;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    // Read once per mount; a changed override takes effect on reload.
    let config = use_memo((), |_| MeasureConfig::load());
    html! { <MeasureView config={config} /> }
}
