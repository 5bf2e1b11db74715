use yew::prelude::*;

use crate::util::format_distance;

#[derive(Properties, PartialEq, Clone)]
pub struct DistancePanelProps {
    pub total: f64,
    pub points: usize,
    pub zoom: f64,
    #[prop_or_default]
    pub status: Option<AttrValue>,
}

#[function_component]
pub fn DistancePanel(props: &DistancePanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:90px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:10px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{} color:#f85149;", label_style)}>{"Distance (px)"}</span>
                <span id="distPx" style={format!("{} color:#f85149;", value_style)}>{ format_distance(props.total) }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Points"}</span>
                <span style={value_style}>{ props.points }</span>
            </div>
            <div style={row_style}>
                <span style={label_style}>{"Zoom"}</span>
                <span style={value_style}>{ format!("{:.0}%", props.zoom * 100.0) }</span>
            </div>
            if let Some(status) = &props.status {
                <div id="status" style="font-size:12px; color:#d29922;">{ status.clone() }</div>
            }
        </div>
    }
}
