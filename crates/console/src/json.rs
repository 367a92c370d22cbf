use routerwatch_core::RouterSnapshot;

pub fn render_json(snapshot: &RouterSnapshot) -> String {
    serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string())
}
