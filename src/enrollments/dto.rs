use serde::Deserialize;

/// Query string for the student dashboard; `enrolled` carries the course id
/// of a just-confirmed enrollment so the view can show a confirmation.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub enrolled: Option<i32>,
}
