pub mod app;
pub mod controls_panel;
pub mod distance_panel;
pub mod measure_view;
