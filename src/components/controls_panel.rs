use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub mode_label: AttrValue,
    pub can_undo: bool,
    pub on_undo: Callback<()>,
    pub on_clear: Callback<()>,
    pub on_export: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let undo_cb = {
        let cb = props.on_undo.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let clear_cb = {
        let cb = props.on_clear.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let export_cb = {
        let cb = props.on_export.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:180px; display:flex; flex-direction:column; gap:6px;">
        <button id="undoBtn" onclick={undo_cb} disabled={!props.can_undo}>{"Undo"}</button>
        <button id="clearBtn" onclick={clear_cb}>{"Clear"}</button>
        <button id="exportBtn" onclick={export_cb}>{"Export PNG"}</button>
        <div id="mode" style="font-size:11px; opacity:0.8;">{ props.mode_label.clone() }</div>
        <div style="font-size:11px; opacity:0.7; line-height:1.3;">{"Left: place/drag · Right: remove last · Middle: pan · Wheel: zoom"}</div>
    </div>}
}
